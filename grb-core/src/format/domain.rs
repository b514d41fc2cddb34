//! Element domain definitions
//!
//! A [`Domain`] tags the scalar type stored in a container. The set of
//! built-in domains is closed; user domains are identified by name and only
//! become usable after registration with the engine.

/// Host native word size
///
/// Decides which concrete domain `NativeInt`/`NativeUInt` stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeWidth {
    W32,
    W64,
}

impl NativeWidth {
    /// Word size of the build target, fixed for the life of the process
    #[cfg(target_pointer_width = "64")]
    pub const HOST: NativeWidth = NativeWidth::W64;

    /// Word size of the build target, fixed for the life of the process
    #[cfg(not(target_pointer_width = "64"))]
    pub const HOST: NativeWidth = NativeWidth::W32;

    pub const fn bits(self) -> u32 {
        match self {
            NativeWidth::W32 => 32,
            NativeWidth::W64 => 64,
        }
    }
}

/// Element domain tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Complex32,
    Complex64,
    /// Platform `isize`
    NativeInt,
    /// Platform `usize`
    NativeUInt,
    /// User-registered opaque domain
    User(&'static str),
}

impl Domain {
    /// Every built-in concrete domain, in engine order
    pub const BUILTIN: [Domain; 13] = [
        Domain::Bool,
        Domain::Int8,
        Domain::Int16,
        Domain::Int32,
        Domain::Int64,
        Domain::UInt8,
        Domain::UInt16,
        Domain::UInt32,
        Domain::UInt64,
        Domain::Float32,
        Domain::Float64,
        Domain::Complex32,
        Domain::Complex64,
    ];

    /// Resolve native-width domains for the host word size
    pub const fn canonical(self) -> Domain {
        self.canonical_for(NativeWidth::HOST)
    }

    /// Resolve native-width domains for an explicit word size
    pub const fn canonical_for(self, width: NativeWidth) -> Domain {
        match (self, width) {
            (Domain::NativeInt, NativeWidth::W32) => Domain::Int32,
            (Domain::NativeInt, NativeWidth::W64) => Domain::Int64,
            (Domain::NativeUInt, NativeWidth::W32) => Domain::UInt32,
            (Domain::NativeUInt, NativeWidth::W64) => Domain::UInt64,
            (other, _) => other,
        }
    }

    pub const fn is_builtin(self) -> bool {
        !matches!(self, Domain::User(_))
    }

    pub const fn is_native_width(self) -> bool {
        matches!(self, Domain::NativeInt | Domain::NativeUInt)
    }

    pub const fn is_integer(self) -> bool {
        matches!(
            self.canonical(),
            Domain::Int8
                | Domain::Int16
                | Domain::Int32
                | Domain::Int64
                | Domain::UInt8
                | Domain::UInt16
                | Domain::UInt32
                | Domain::UInt64
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Domain::Float32 | Domain::Float64)
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, Domain::Complex32 | Domain::Complex64)
    }

    /// Built-in and totally ordered (everything but complex)
    pub const fn is_real(self) -> bool {
        self.is_builtin() && !self.is_complex()
    }

    /// Size in bytes of one element, `None` for user domains
    pub const fn size_bytes(self) -> Option<usize> {
        match self.canonical() {
            Domain::Bool | Domain::Int8 | Domain::UInt8 => Some(1),
            Domain::Int16 | Domain::UInt16 => Some(2),
            Domain::Int32 | Domain::UInt32 | Domain::Float32 => Some(4),
            Domain::Int64 | Domain::UInt64 | Domain::Float64 | Domain::Complex32 => Some(8),
            Domain::Complex64 => Some(16),
            Domain::NativeInt | Domain::NativeUInt | Domain::User(_) => None,
        }
    }

    /// Real component domain of a complex domain
    pub const fn component(self) -> Option<Domain> {
        match self {
            Domain::Complex32 => Some(Domain::Float32),
            Domain::Complex64 => Some(Domain::Float64),
            _ => None,
        }
    }

    /// Complex domain built from a float domain
    pub const fn complex_of(self) -> Option<Domain> {
        match self {
            Domain::Float32 => Some(Domain::Complex32),
            Domain::Float64 => Some(Domain::Complex64),
            _ => None,
        }
    }

    /// Suffix used by engine symbol names (`INT32`, `FP64`, `FC32`, ...)
    pub const fn symbol_suffix(self) -> &'static str {
        match self.canonical() {
            Domain::Bool => "BOOL",
            Domain::Int8 => "INT8",
            Domain::Int16 => "INT16",
            Domain::Int32 => "INT32",
            Domain::Int64 => "INT64",
            Domain::UInt8 => "UINT8",
            Domain::UInt16 => "UINT16",
            Domain::UInt32 => "UINT32",
            Domain::UInt64 => "UINT64",
            Domain::Float32 => "FP32",
            Domain::Float64 => "FP64",
            Domain::Complex32 => "FC32",
            Domain::Complex64 => "FC64",
            Domain::NativeInt | Domain::NativeUInt | Domain::User(_) => "UDT",
        }
    }

    /// Engine symbol of the type object (`GrB_INT32`, `GxB_FC64`)
    pub const fn type_symbol(self) -> Option<&'static str> {
        match self.canonical() {
            Domain::Bool => Some("GrB_BOOL"),
            Domain::Int8 => Some("GrB_INT8"),
            Domain::Int16 => Some("GrB_INT16"),
            Domain::Int32 => Some("GrB_INT32"),
            Domain::Int64 => Some("GrB_INT64"),
            Domain::UInt8 => Some("GrB_UINT8"),
            Domain::UInt16 => Some("GrB_UINT16"),
            Domain::UInt32 => Some("GrB_UINT32"),
            Domain::UInt64 => Some("GrB_UINT64"),
            Domain::Float32 => Some("GrB_FP32"),
            Domain::Float64 => Some("GrB_FP64"),
            Domain::Complex32 => Some("GxB_FC32"),
            Domain::Complex64 => Some("GxB_FC64"),
            Domain::NativeInt | Domain::NativeUInt | Domain::User(_) => None,
        }
    }
}

impl core::fmt::Display for Domain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Domain::Bool => write!(f, "bool"),
            Domain::Int8 => write!(f, "i8"),
            Domain::Int16 => write!(f, "i16"),
            Domain::Int32 => write!(f, "i32"),
            Domain::Int64 => write!(f, "i64"),
            Domain::UInt8 => write!(f, "u8"),
            Domain::UInt16 => write!(f, "u16"),
            Domain::UInt32 => write!(f, "u32"),
            Domain::UInt64 => write!(f, "u64"),
            Domain::Float32 => write!(f, "f32"),
            Domain::Float64 => write!(f, "f64"),
            Domain::Complex32 => write!(f, "c32"),
            Domain::Complex64 => write!(f, "c64"),
            Domain::NativeInt => write!(f, "isize"),
            Domain::NativeUInt => write!(f, "usize"),
            Domain::User(name) => write!(f, "{name}"),
        }
    }
}

/// Single precision complex number, layout-compatible with C `float _Complex`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Complex32 {
    pub re: f32,
    pub im: f32,
}

/// Double precision complex number, layout-compatible with C `double _Complex`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Complex64 {
    pub re: f64,
    pub im: f64,
}

impl Complex32 {
    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }
}

impl Complex64 {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_width_resolution() {
        assert_eq!(Domain::NativeInt.canonical_for(NativeWidth::W32), Domain::Int32);
        assert_eq!(Domain::NativeInt.canonical_for(NativeWidth::W64), Domain::Int64);
        assert_eq!(Domain::NativeUInt.canonical_for(NativeWidth::W32), Domain::UInt32);
        assert_eq!(Domain::NativeUInt.canonical_for(NativeWidth::W64), Domain::UInt64);
        assert_eq!(Domain::Float32.canonical_for(NativeWidth::W32), Domain::Float32);
        assert_eq!(
            Domain::NativeInt.canonical().size_bytes(),
            Some(core::mem::size_of::<isize>())
        );
    }

    #[test]
    fn test_domain_classes() {
        assert!(Domain::NativeUInt.is_integer());
        assert!(!Domain::Bool.is_integer());
        assert!(Domain::Complex32.is_builtin());
        assert!(!Domain::Complex32.is_real());
        assert!(!Domain::User("point").is_builtin());
        assert_eq!(Domain::Complex64.component(), Some(Domain::Float64));
        assert_eq!(Domain::Float32.complex_of(), Some(Domain::Complex32));
    }

    #[test]
    fn test_type_symbols() {
        assert_eq!(Domain::Int32.type_symbol(), Some("GrB_INT32"));
        assert_eq!(Domain::Complex64.type_symbol(), Some("GxB_FC64"));
        assert_eq!(Domain::User("point").type_symbol(), None);
        assert_eq!(Domain::Float32.symbol_suffix(), "FP32");
    }

    #[test]
    fn test_complex_layout() {
        assert_eq!(core::mem::size_of::<Complex32>(), 8);
        assert_eq!(core::mem::size_of::<Complex64>(), 16);
    }
}
