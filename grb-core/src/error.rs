//! Status codes and error types for GraphBLAS engine calls
//!
//! The engine reports every call through a single integer status. The
//! binding sorts those codes into three groups:
//!
//! - sentinels ([`Outcome`]): success, no value, iterator exhausted
//! - API errors ([`GrbError`]): recoverable, returned to the caller
//! - execution errors ([`ExecutionError`]): fatal, raised as a panic

/// Raw engine status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Info {
    Success,
    NoValue,
    Exhausted,
    UninitializedObject,
    NullPointer,
    InvalidValue,
    InvalidIndex,
    DomainMismatch,
    DimensionMismatch,
    OutputNotEmpty,
    NotImplemented,
    AlreadySet,
    Panic,
    OutOfMemory,
    InsufficientSpace,
    InvalidObject,
    IndexOutOfBounds,
    EmptyObject,
    JitError,
    /// A code this binding does not know about
    Unknown(i32),
}

impl Info {
    /// Decode a native `GrB_Info` value
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Info::Success,
            1 => Info::NoValue,
            7089 => Info::Exhausted,
            -1 => Info::UninitializedObject,
            -2 => Info::NullPointer,
            -3 => Info::InvalidValue,
            -4 => Info::InvalidIndex,
            -5 => Info::DomainMismatch,
            -6 => Info::DimensionMismatch,
            -7 => Info::OutputNotEmpty,
            -8 => Info::NotImplemented,
            -9 => Info::AlreadySet,
            -101 => Info::Panic,
            -102 => Info::OutOfMemory,
            -103 => Info::InsufficientSpace,
            -104 => Info::InvalidObject,
            -105 => Info::IndexOutOfBounds,
            -106 => Info::EmptyObject,
            -7001 => Info::JitError,
            other => Info::Unknown(other),
        }
    }

    /// Encode back to the native `GrB_Info` value
    pub const fn code(self) -> i32 {
        match self {
            Info::Success => 0,
            Info::NoValue => 1,
            Info::Exhausted => 7089,
            Info::UninitializedObject => -1,
            Info::NullPointer => -2,
            Info::InvalidValue => -3,
            Info::InvalidIndex => -4,
            Info::DomainMismatch => -5,
            Info::DimensionMismatch => -6,
            Info::OutputNotEmpty => -7,
            Info::NotImplemented => -8,
            Info::AlreadySet => -9,
            Info::Panic => -101,
            Info::OutOfMemory => -102,
            Info::InsufficientSpace => -103,
            Info::InvalidObject => -104,
            Info::IndexOutOfBounds => -105,
            Info::EmptyObject => -106,
            Info::JitError => -7001,
            Info::Unknown(code) => code,
        }
    }

    /// Sort this status into its tier
    pub const fn classify(self) -> Status {
        match self {
            Info::Success => Status::Outcome(Outcome::Success),
            Info::NoValue => Status::Outcome(Outcome::NoValue),
            Info::Exhausted => Status::Outcome(Outcome::Exhausted),
            Info::UninitializedObject => Status::Api(GrbError::UninitializedObject),
            Info::NullPointer => Status::Api(GrbError::NullPointer),
            Info::InvalidValue => Status::Api(GrbError::InvalidValue),
            Info::InvalidIndex => Status::Api(GrbError::InvalidIndex),
            Info::DomainMismatch => Status::Api(GrbError::DomainMismatch),
            Info::DimensionMismatch => Status::Api(GrbError::DimensionMismatch),
            Info::OutputNotEmpty => Status::Api(GrbError::OutputNotEmpty),
            Info::NotImplemented => Status::Api(GrbError::NotImplemented),
            Info::AlreadySet => Status::Api(GrbError::AlreadySet),
            Info::Panic => Status::Execution(ExecutionError::Panic),
            Info::OutOfMemory => Status::Execution(ExecutionError::OutOfMemory),
            Info::InsufficientSpace => Status::Execution(ExecutionError::InsufficientSpace),
            Info::InvalidObject => Status::Execution(ExecutionError::InvalidObject),
            Info::IndexOutOfBounds => Status::Execution(ExecutionError::IndexOutOfBounds),
            Info::EmptyObject => Status::Execution(ExecutionError::EmptyObject),
            Info::JitError => Status::Execution(ExecutionError::JitError),
            Info::Unknown(code) => Status::Execution(ExecutionError::Unknown(code)),
        }
    }

    /// Translate into a sentinel outcome or a recoverable error
    ///
    /// # Panics
    ///
    /// Panics on execution errors. The binding treats those as misuse of
    /// the engine rather than as control flow.
    pub fn check(self) -> Result<Outcome> {
        match self.classify() {
            Status::Outcome(outcome) => Ok(outcome),
            Status::Api(err) => Err(err),
            Status::Execution(err) => panic!("GraphBLAS execution error: {err}"),
        }
    }

    /// Translate a cursor movement status
    ///
    /// # Panics
    ///
    /// Cursor movements only ever report sentinels; anything else is a
    /// logic error in the engine or the binding.
    pub fn outcome(self) -> Outcome {
        match self.classify() {
            Status::Outcome(outcome) => outcome,
            Status::Api(err) => panic!("unexpected API error from cursor movement: {err}"),
            Status::Execution(err) => panic!("GraphBLAS execution error: {err}"),
        }
    }
}

impl From<GrbError> for Info {
    fn from(err: GrbError) -> Self {
        match err {
            GrbError::UninitializedObject => Info::UninitializedObject,
            GrbError::NullPointer => Info::NullPointer,
            GrbError::InvalidValue => Info::InvalidValue,
            GrbError::InvalidIndex => Info::InvalidIndex,
            GrbError::DomainMismatch => Info::DomainMismatch,
            GrbError::DimensionMismatch => Info::DimensionMismatch,
            GrbError::OutputNotEmpty => Info::OutputNotEmpty,
            GrbError::NotImplemented => Info::NotImplemented,
            GrbError::AlreadySet => Info::AlreadySet,
        }
    }
}

impl core::fmt::Display for Info {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.classify() {
            Status::Outcome(outcome) => write!(f, "{outcome}"),
            Status::Api(err) => write!(f, "{err}"),
            Status::Execution(err) => write!(f, "{err}"),
        }
    }
}

/// A status code sorted into its tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Outcome(Outcome),
    Api(GrbError),
    Execution(ExecutionError),
}

/// Non-error sentinel results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    /// The requested entry is not present
    NoValue,
    /// The iterator has no more entries
    Exhausted,
}

impl Outcome {
    pub const fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub const fn is_exhausted(self) -> bool {
        matches!(self, Outcome::Exhausted)
    }
}

impl core::fmt::Display for Outcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Outcome::Success => "success",
            Outcome::NoValue => "no value",
            Outcome::Exhausted => "iterator exhausted",
        };
        write!(f, "{msg}")
    }
}

/// Recoverable API errors returned to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrbError {
    /// Object was never initialized or has been freed
    UninitializedObject,
    /// Required pointer argument was null
    NullPointer,
    /// Argument value is invalid
    InvalidValue,
    /// Index is negative or otherwise not representable
    InvalidIndex,
    /// Element domains are incompatible
    DomainMismatch,
    /// Container dimensions are incompatible
    DimensionMismatch,
    /// Output container must be empty
    OutputNotEmpty,
    /// The engine does not support this operation
    NotImplemented,
    /// Value has already been set
    AlreadySet,
}

impl core::fmt::Display for GrbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            GrbError::UninitializedObject => "Uninitialized object",
            GrbError::NullPointer => "Null pointer",
            GrbError::InvalidValue => "Invalid value",
            GrbError::InvalidIndex => "Invalid index",
            GrbError::DomainMismatch => "Domain mismatch",
            GrbError::DimensionMismatch => "Dimension mismatch",
            GrbError::OutputNotEmpty => "Output not empty",
            GrbError::NotImplemented => "Not implemented",
            GrbError::AlreadySet => "Already set",
        };
        write!(f, "{msg}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GrbError {}

/// Fatal engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionError {
    Panic,
    OutOfMemory,
    InsufficientSpace,
    InvalidObject,
    IndexOutOfBounds,
    EmptyObject,
    JitError,
    Unknown(i32),
}

impl core::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExecutionError::Panic => write!(f, "Engine panic"),
            ExecutionError::OutOfMemory => write!(f, "Out of memory"),
            ExecutionError::InsufficientSpace => write!(f, "Insufficient space"),
            ExecutionError::InvalidObject => write!(f, "Invalid object"),
            ExecutionError::IndexOutOfBounds => write!(f, "Index out of bounds"),
            ExecutionError::EmptyObject => write!(f, "Empty object"),
            ExecutionError::JitError => write!(f, "JIT error"),
            ExecutionError::Unknown(code) => write!(f, "Unknown status code {code}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExecutionError {}

/// Result type for binding operations
pub type Result<T> = core::result::Result<T, GrbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for code in [0, 1, 7089, -1, -2, -3, -4, -5, -6, -7, -8, -9, -101, -106, -7001, 42] {
            assert_eq!(Info::from_code(code).code(), code);
        }
        assert_eq!(Info::from_code(42), Info::Unknown(42));
    }

    #[test]
    fn test_sentinels_are_not_errors() {
        assert_eq!(Info::Success.check(), Ok(Outcome::Success));
        assert_eq!(Info::NoValue.check(), Ok(Outcome::NoValue));
        assert_eq!(Info::Exhausted.check(), Ok(Outcome::Exhausted));
        assert_eq!(Info::Exhausted.outcome(), Outcome::Exhausted);
    }

    #[test]
    fn test_api_errors_are_returned() {
        assert_eq!(Info::InvalidIndex.check(), Err(GrbError::InvalidIndex));
        assert_eq!(Info::DomainMismatch.check(), Err(GrbError::DomainMismatch));
        assert_eq!(Info::from(GrbError::NotImplemented), Info::NotImplemented);
    }

    #[test]
    #[should_panic(expected = "execution error")]
    fn test_execution_errors_abort() {
        let _ = Info::OutOfMemory.check();
    }

    #[test]
    #[should_panic(expected = "execution error")]
    fn test_unknown_codes_abort() {
        let _ = Info::from_code(-9999).check();
    }
}
