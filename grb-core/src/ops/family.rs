//! Built-in operator families and their resolution table
//!
//! Every family is described by one row of [`OpFamily::info`]: its kind,
//! base symbol name, the domain class it is defined over, how the output and
//! second input domains follow from the selecting domain, and which vendor
//! prefix the engine exports it under. Resolution is a pure lookup in that
//! table; nothing is computed at runtime beyond the match.

use super::{BuiltinOp, OpKind, Vendor};
use crate::format::{Domain, NativeWidth};

/// Set of domains a family is defined over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainClass {
    /// Every built-in domain
    All,
    /// Built-in domains with a total order (no complex)
    Real,
    /// Signed and unsigned integers
    Integer,
    /// `f32`, `f64`
    Float,
    /// Floats and complex
    Floating,
    /// Complex only
    Complex,
    /// `int32`, `int64`: outputs of positional operators
    Positional,
    /// `bool` only, exported without a type suffix
    BoolOnly,
    /// No selecting domain at all
    Untyped,
}

const ALL: [Domain; 13] = Domain::BUILTIN;

const REAL: [Domain; 11] = [
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
];

const INTEGER: [Domain; 8] = [
    Domain::Int8,
    Domain::Int16,
    Domain::Int32,
    Domain::Int64,
    Domain::UInt8,
    Domain::UInt16,
    Domain::UInt32,
    Domain::UInt64,
];

const FLOAT: [Domain; 2] = [Domain::Float32, Domain::Float64];

const FLOATING: [Domain; 4] = [
    Domain::Float32,
    Domain::Float64,
    Domain::Complex32,
    Domain::Complex64,
];

const COMPLEX: [Domain; 2] = [Domain::Complex32, Domain::Complex64];

const POSITIONAL: [Domain; 2] = [Domain::Int32, Domain::Int64];

const BOOL_ONLY: [Domain; 1] = [Domain::Bool];

impl DomainClass {
    /// Concrete domains in this class, in engine order
    pub const fn domains(self) -> &'static [Domain] {
        match self {
            DomainClass::All => &ALL,
            DomainClass::Real => &REAL,
            DomainClass::Integer => &INTEGER,
            DomainClass::Float => &FLOAT,
            DomainClass::Floating => &FLOATING,
            DomainClass::Complex => &COMPLEX,
            DomainClass::Positional => &POSITIONAL,
            DomainClass::BoolOnly => &BOOL_ONLY,
            DomainClass::Untyped => &[],
        }
    }

    /// Whether a concrete domain belongs to this class
    pub const fn accepts(self, domain: Domain) -> bool {
        match self {
            DomainClass::All => domain.is_builtin() && !domain.is_native_width(),
            DomainClass::Real => domain.is_real() && !domain.is_native_width(),
            DomainClass::Integer => domain.is_integer() && !domain.is_native_width(),
            DomainClass::Float => domain.is_float(),
            DomainClass::Floating => domain.is_float() || domain.is_complex(),
            DomainClass::Complex => domain.is_complex(),
            DomainClass::Positional => matches!(domain, Domain::Int32 | Domain::Int64),
            DomainClass::BoolOnly => matches!(domain, Domain::Bool),
            DomainClass::Untyped => false,
        }
    }
}

/// How the output domain follows from the selecting domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRule {
    Same,
    Bool,
    /// Complex in, real component out
    Component,
    /// Float in, complex out
    ComplexOf,
}

/// How the inputs follow from the selecting domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRule {
    /// Every input has the selecting domain
    Same,
    /// Values are ignored, only positions are used
    Positional,
    /// First input has the selecting domain, second is `int8`
    ShiftByInt8,
    /// Inputs are any domain; the thunk is `int64`
    AnyWithInt64Thunk,
    /// No domain information at all
    None,
}

/// Which vendor prefix the engine exports a family under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorRule {
    GrB,
    GxB,
    /// `GrB_` for real domains, `GxB_` for complex
    GrBUnlessComplex,
}

/// One row of the resolution table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyInfo {
    pub kind: OpKind,
    pub name: &'static str,
    pub class: DomainClass,
    pub output: OutputRule,
    pub inputs: InputRule,
    pub vendor: VendorRule,
}

const fn row(
    kind: OpKind,
    name: &'static str,
    class: DomainClass,
    output: OutputRule,
    inputs: InputRule,
    vendor: VendorRule,
) -> FamilyInfo {
    FamilyInfo {
        kind,
        name,
        class,
        output,
        inputs,
        vendor,
    }
}

/// Built-in operator families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpFamily {
    // unary
    Identity,
    Ainv,
    Minv,
    One,
    Abs,
    Lnot,
    /// `GrB_LNOT`, behaves exactly as `Lnot` over `bool`
    LnotBool,
    Bnot,
    Sqrt,
    Log,
    Exp,
    Log2,
    Log10,
    Log1p,
    Expm1,
    Exp2,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Signum,
    Ceil,
    Floor,
    Round,
    Trunc,
    Cbrt,
    Lgamma,
    Tgamma,
    Erf,
    Erfc,
    Frexpx,
    Frexpe,
    IsInf,
    IsNan,
    IsFinite,
    Creal,
    Cimag,
    Carg,
    Cabs,
    Conj,
    PositionI,
    PositionI1,
    PositionJ,
    PositionJ1,
    // binary
    First,
    Second,
    Any,
    Pair,
    Plus,
    Minus,
    Rminus,
    Times,
    Div,
    Rdiv,
    Pow,
    Iseq,
    Isne,
    Min,
    Max,
    Isgt,
    Islt,
    Isge,
    Isle,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Lor,
    Land,
    Lxor,
    /// `GrB_LOR`, behaves exactly as `Lor` over `bool`
    LorBool,
    /// `GrB_LAND`, behaves exactly as `Land` over `bool`
    LandBool,
    /// `GrB_LXOR`, behaves exactly as `Lxor` over `bool`
    LxorBool,
    LxnorBool,
    Bor,
    Band,
    Bxor,
    Bxnor,
    Bget,
    Bset,
    Bclr,
    Bshift,
    Atan2,
    Hypot,
    Fmod,
    Remainder,
    Copysign,
    Ldexp,
    Cmplx,
    FirstI,
    FirstI1,
    FirstJ,
    FirstJ1,
    SecondI,
    SecondI1,
    SecondJ,
    SecondJ1,
    IgnoreDup,
    // index-unary
    RowIndex,
    ColIndex,
    DiagIndex,
    Tril,
    Triu,
    Diag,
    Offdiag,
    ColLe,
    ColGt,
    RowLe,
    RowGt,
    ValueEq,
    ValueNe,
    ValueLt,
    ValueLe,
    ValueGt,
    ValueGe,
}

impl OpFamily {
    /// Every family, in table order
    pub const ALL: [OpFamily; 125] = [
        OpFamily::Identity,
        OpFamily::Ainv,
        OpFamily::Minv,
        OpFamily::One,
        OpFamily::Abs,
        OpFamily::Lnot,
        OpFamily::LnotBool,
        OpFamily::Bnot,
        OpFamily::Sqrt,
        OpFamily::Log,
        OpFamily::Exp,
        OpFamily::Log2,
        OpFamily::Log10,
        OpFamily::Log1p,
        OpFamily::Expm1,
        OpFamily::Exp2,
        OpFamily::Sin,
        OpFamily::Cos,
        OpFamily::Tan,
        OpFamily::Asin,
        OpFamily::Acos,
        OpFamily::Atan,
        OpFamily::Sinh,
        OpFamily::Cosh,
        OpFamily::Tanh,
        OpFamily::Asinh,
        OpFamily::Acosh,
        OpFamily::Atanh,
        OpFamily::Signum,
        OpFamily::Ceil,
        OpFamily::Floor,
        OpFamily::Round,
        OpFamily::Trunc,
        OpFamily::Cbrt,
        OpFamily::Lgamma,
        OpFamily::Tgamma,
        OpFamily::Erf,
        OpFamily::Erfc,
        OpFamily::Frexpx,
        OpFamily::Frexpe,
        OpFamily::IsInf,
        OpFamily::IsNan,
        OpFamily::IsFinite,
        OpFamily::Creal,
        OpFamily::Cimag,
        OpFamily::Carg,
        OpFamily::Cabs,
        OpFamily::Conj,
        OpFamily::PositionI,
        OpFamily::PositionI1,
        OpFamily::PositionJ,
        OpFamily::PositionJ1,
        OpFamily::First,
        OpFamily::Second,
        OpFamily::Any,
        OpFamily::Pair,
        OpFamily::Plus,
        OpFamily::Minus,
        OpFamily::Rminus,
        OpFamily::Times,
        OpFamily::Div,
        OpFamily::Rdiv,
        OpFamily::Pow,
        OpFamily::Iseq,
        OpFamily::Isne,
        OpFamily::Min,
        OpFamily::Max,
        OpFamily::Isgt,
        OpFamily::Islt,
        OpFamily::Isge,
        OpFamily::Isle,
        OpFamily::Eq,
        OpFamily::Ne,
        OpFamily::Gt,
        OpFamily::Lt,
        OpFamily::Ge,
        OpFamily::Le,
        OpFamily::Lor,
        OpFamily::Land,
        OpFamily::Lxor,
        OpFamily::LorBool,
        OpFamily::LandBool,
        OpFamily::LxorBool,
        OpFamily::LxnorBool,
        OpFamily::Bor,
        OpFamily::Band,
        OpFamily::Bxor,
        OpFamily::Bxnor,
        OpFamily::Bget,
        OpFamily::Bset,
        OpFamily::Bclr,
        OpFamily::Bshift,
        OpFamily::Atan2,
        OpFamily::Hypot,
        OpFamily::Fmod,
        OpFamily::Remainder,
        OpFamily::Copysign,
        OpFamily::Ldexp,
        OpFamily::Cmplx,
        OpFamily::FirstI,
        OpFamily::FirstI1,
        OpFamily::FirstJ,
        OpFamily::FirstJ1,
        OpFamily::SecondI,
        OpFamily::SecondI1,
        OpFamily::SecondJ,
        OpFamily::SecondJ1,
        OpFamily::IgnoreDup,
        OpFamily::RowIndex,
        OpFamily::ColIndex,
        OpFamily::DiagIndex,
        OpFamily::Tril,
        OpFamily::Triu,
        OpFamily::Diag,
        OpFamily::Offdiag,
        OpFamily::ColLe,
        OpFamily::ColGt,
        OpFamily::RowLe,
        OpFamily::RowGt,
        OpFamily::ValueEq,
        OpFamily::ValueNe,
        OpFamily::ValueLt,
        OpFamily::ValueLe,
        OpFamily::ValueGt,
        OpFamily::ValueGe,
    ];

    /// The resolution table
    pub const fn info(self) -> FamilyInfo {
        use DomainClass as C;
        use InputRule as I;
        use OpKind::{Binary as B, IndexUnary as X, Unary as U};
        use OutputRule as O;
        use VendorRule::{GrB, GrBUnlessComplex as Mixed, GxB};

        match self {
            OpFamily::Identity => row(U, "IDENTITY", C::All, O::Same, I::Same, Mixed),
            OpFamily::Ainv => row(U, "AINV", C::All, O::Same, I::Same, Mixed),
            OpFamily::Minv => row(U, "MINV", C::All, O::Same, I::Same, Mixed),
            OpFamily::One => row(U, "ONE", C::All, O::Same, I::Same, GxB),
            OpFamily::Abs => row(U, "ABS", C::Real, O::Same, I::Same, GrB),
            OpFamily::Lnot => row(U, "LNOT", C::Real, O::Same, I::Same, GxB),
            OpFamily::LnotBool => row(U, "LNOT", C::BoolOnly, O::Same, I::Same, GrB),
            OpFamily::Bnot => row(U, "BNOT", C::Integer, O::Same, I::Same, GrB),
            OpFamily::Sqrt => row(U, "SQRT", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Log => row(U, "LOG", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Exp => row(U, "EXP", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Log2 => row(U, "LOG2", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Log10 => row(U, "LOG10", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Log1p => row(U, "LOG1P", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Expm1 => row(U, "EXPM1", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Exp2 => row(U, "EXP2", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Sin => row(U, "SIN", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Cos => row(U, "COS", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Tan => row(U, "TAN", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Asin => row(U, "ASIN", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Acos => row(U, "ACOS", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Atan => row(U, "ATAN", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Sinh => row(U, "SINH", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Cosh => row(U, "COSH", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Tanh => row(U, "TANH", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Asinh => row(U, "ASINH", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Acosh => row(U, "ACOSH", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Atanh => row(U, "ATANH", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Signum => row(U, "SIGNUM", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Ceil => row(U, "CEIL", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Floor => row(U, "FLOOR", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Round => row(U, "ROUND", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Trunc => row(U, "TRUNC", C::Floating, O::Same, I::Same, GxB),
            OpFamily::Cbrt => row(U, "CBRT", C::Float, O::Same, I::Same, GxB),
            OpFamily::Lgamma => row(U, "LGAMMA", C::Float, O::Same, I::Same, GxB),
            OpFamily::Tgamma => row(U, "TGAMMA", C::Float, O::Same, I::Same, GxB),
            OpFamily::Erf => row(U, "ERF", C::Float, O::Same, I::Same, GxB),
            OpFamily::Erfc => row(U, "ERFC", C::Float, O::Same, I::Same, GxB),
            OpFamily::Frexpx => row(U, "FREXPX", C::Float, O::Same, I::Same, GxB),
            OpFamily::Frexpe => row(U, "FREXPE", C::Float, O::Same, I::Same, GxB),
            OpFamily::IsInf => row(U, "ISINF", C::Floating, O::Bool, I::Same, GxB),
            OpFamily::IsNan => row(U, "ISNAN", C::Floating, O::Bool, I::Same, GxB),
            OpFamily::IsFinite => row(U, "ISFINITE", C::Floating, O::Bool, I::Same, GxB),
            OpFamily::Creal => row(U, "CREAL", C::Complex, O::Component, I::Same, GxB),
            OpFamily::Cimag => row(U, "CIMAG", C::Complex, O::Component, I::Same, GxB),
            OpFamily::Carg => row(U, "CARG", C::Complex, O::Component, I::Same, GxB),
            OpFamily::Cabs => row(U, "CABS", C::Complex, O::Component, I::Same, GxB),
            OpFamily::Conj => row(U, "CONJ", C::Complex, O::Same, I::Same, GxB),
            OpFamily::PositionI => row(U, "POSITIONI", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::PositionI1 => row(U, "POSITIONI1", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::PositionJ => row(U, "POSITIONJ", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::PositionJ1 => row(U, "POSITIONJ1", C::Positional, O::Same, I::Positional, GxB),

            OpFamily::First => row(B, "FIRST", C::All, O::Same, I::Same, Mixed),
            OpFamily::Second => row(B, "SECOND", C::All, O::Same, I::Same, Mixed),
            OpFamily::Any => row(B, "ANY", C::All, O::Same, I::Same, GxB),
            OpFamily::Pair => row(B, "PAIR", C::All, O::Same, I::Same, GxB),
            OpFamily::Plus => row(B, "PLUS", C::All, O::Same, I::Same, Mixed),
            OpFamily::Minus => row(B, "MINUS", C::All, O::Same, I::Same, Mixed),
            OpFamily::Rminus => row(B, "RMINUS", C::All, O::Same, I::Same, GxB),
            OpFamily::Times => row(B, "TIMES", C::All, O::Same, I::Same, Mixed),
            OpFamily::Div => row(B, "DIV", C::All, O::Same, I::Same, Mixed),
            OpFamily::Rdiv => row(B, "RDIV", C::All, O::Same, I::Same, GxB),
            OpFamily::Pow => row(B, "POW", C::All, O::Same, I::Same, GxB),
            OpFamily::Iseq => row(B, "ISEQ", C::All, O::Same, I::Same, GxB),
            OpFamily::Isne => row(B, "ISNE", C::All, O::Same, I::Same, GxB),
            OpFamily::Min => row(B, "MIN", C::Real, O::Same, I::Same, GrB),
            OpFamily::Max => row(B, "MAX", C::Real, O::Same, I::Same, GrB),
            OpFamily::Isgt => row(B, "ISGT", C::Real, O::Same, I::Same, GxB),
            OpFamily::Islt => row(B, "ISLT", C::Real, O::Same, I::Same, GxB),
            OpFamily::Isge => row(B, "ISGE", C::Real, O::Same, I::Same, GxB),
            OpFamily::Isle => row(B, "ISLE", C::Real, O::Same, I::Same, GxB),
            OpFamily::Eq => row(B, "EQ", C::All, O::Bool, I::Same, Mixed),
            OpFamily::Ne => row(B, "NE", C::All, O::Bool, I::Same, Mixed),
            OpFamily::Gt => row(B, "GT", C::Real, O::Bool, I::Same, GrB),
            OpFamily::Lt => row(B, "LT", C::Real, O::Bool, I::Same, GrB),
            OpFamily::Ge => row(B, "GE", C::Real, O::Bool, I::Same, GrB),
            OpFamily::Le => row(B, "LE", C::Real, O::Bool, I::Same, GrB),
            OpFamily::Lor => row(B, "LOR", C::Real, O::Same, I::Same, GxB),
            OpFamily::Land => row(B, "LAND", C::Real, O::Same, I::Same, GxB),
            OpFamily::Lxor => row(B, "LXOR", C::Real, O::Same, I::Same, GxB),
            OpFamily::LorBool => row(B, "LOR", C::BoolOnly, O::Same, I::Same, GrB),
            OpFamily::LandBool => row(B, "LAND", C::BoolOnly, O::Same, I::Same, GrB),
            OpFamily::LxorBool => row(B, "LXOR", C::BoolOnly, O::Same, I::Same, GrB),
            OpFamily::LxnorBool => row(B, "LXNOR", C::BoolOnly, O::Same, I::Same, GrB),
            OpFamily::Bor => row(B, "BOR", C::Integer, O::Same, I::Same, GrB),
            OpFamily::Band => row(B, "BAND", C::Integer, O::Same, I::Same, GrB),
            OpFamily::Bxor => row(B, "BXOR", C::Integer, O::Same, I::Same, GrB),
            OpFamily::Bxnor => row(B, "BXNOR", C::Integer, O::Same, I::Same, GrB),
            OpFamily::Bget => row(B, "BGET", C::Integer, O::Same, I::Same, GxB),
            OpFamily::Bset => row(B, "BSET", C::Integer, O::Same, I::Same, GxB),
            OpFamily::Bclr => row(B, "BCLR", C::Integer, O::Same, I::Same, GxB),
            OpFamily::Bshift => row(B, "BSHIFT", C::Integer, O::Same, I::ShiftByInt8, GxB),
            OpFamily::Atan2 => row(B, "ATAN2", C::Float, O::Same, I::Same, GxB),
            OpFamily::Hypot => row(B, "HYPOT", C::Float, O::Same, I::Same, GxB),
            OpFamily::Fmod => row(B, "FMOD", C::Float, O::Same, I::Same, GxB),
            OpFamily::Remainder => row(B, "REMAINDER", C::Float, O::Same, I::Same, GxB),
            OpFamily::Copysign => row(B, "COPYSIGN", C::Float, O::Same, I::Same, GxB),
            OpFamily::Ldexp => row(B, "LDEXP", C::Float, O::Same, I::Same, GxB),
            OpFamily::Cmplx => row(B, "CMPLX", C::Float, O::ComplexOf, I::Same, GxB),
            OpFamily::FirstI => row(B, "FIRSTI", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::FirstI1 => row(B, "FIRSTI1", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::FirstJ => row(B, "FIRSTJ", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::FirstJ1 => row(B, "FIRSTJ1", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::SecondI => row(B, "SECONDI", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::SecondI1 => row(B, "SECONDI1", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::SecondJ => row(B, "SECONDJ", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::SecondJ1 => row(B, "SECONDJ1", C::Positional, O::Same, I::Positional, GxB),
            OpFamily::IgnoreDup => row(B, "IGNORE_DUP", C::Untyped, O::Same, I::None, GxB),

            OpFamily::RowIndex => row(X, "ROWINDEX", C::Positional, O::Same, I::Positional, GrB),
            OpFamily::ColIndex => row(X, "COLINDEX", C::Positional, O::Same, I::Positional, GrB),
            OpFamily::DiagIndex => row(X, "DIAGINDEX", C::Positional, O::Same, I::Positional, GrB),
            OpFamily::Tril => row(X, "TRIL", C::Untyped, O::Bool, I::AnyWithInt64Thunk, GrB),
            OpFamily::Triu => row(X, "TRIU", C::Untyped, O::Bool, I::AnyWithInt64Thunk, GrB),
            OpFamily::Diag => row(X, "DIAG", C::Untyped, O::Bool, I::AnyWithInt64Thunk, GrB),
            OpFamily::Offdiag => row(X, "OFFDIAG", C::Untyped, O::Bool, I::AnyWithInt64Thunk, GrB),
            OpFamily::ColLe => row(X, "COLLE", C::Untyped, O::Bool, I::AnyWithInt64Thunk, GrB),
            OpFamily::ColGt => row(X, "COLGT", C::Untyped, O::Bool, I::AnyWithInt64Thunk, GrB),
            OpFamily::RowLe => row(X, "ROWLE", C::Untyped, O::Bool, I::AnyWithInt64Thunk, GrB),
            OpFamily::RowGt => row(X, "ROWGT", C::Untyped, O::Bool, I::AnyWithInt64Thunk, GrB),
            OpFamily::ValueEq => row(X, "VALUEEQ", C::All, O::Bool, I::Same, Mixed),
            OpFamily::ValueNe => row(X, "VALUENE", C::All, O::Bool, I::Same, Mixed),
            OpFamily::ValueLt => row(X, "VALUELT", C::Real, O::Bool, I::Same, GrB),
            OpFamily::ValueLe => row(X, "VALUELE", C::Real, O::Bool, I::Same, GrB),
            OpFamily::ValueGt => row(X, "VALUEGT", C::Real, O::Bool, I::Same, GrB),
            OpFamily::ValueGe => row(X, "VALUEGE", C::Real, O::Bool, I::Same, GrB),
        }
    }

    pub const fn kind(self) -> OpKind {
        self.info().kind
    }

    /// Whether this family is exported without a type suffix
    pub const fn is_untyped(self) -> bool {
        matches!(self.info().class, DomainClass::Untyped | DomainClass::BoolOnly)
    }

    /// Whether `domain` (after native-width resolution) selects a variant
    pub const fn accepts(self, domain: Domain) -> bool {
        self.info().class.accepts(domain.canonical())
    }

    /// Resolve against the host native width
    ///
    /// # Panics
    ///
    /// Panics when `domain` is outside the family's class. The typed entry
    /// points in [`crate::ops`] make that unreachable.
    pub fn resolve(self, domain: Domain) -> BuiltinOp {
        self.resolve_for(domain, NativeWidth::HOST)
    }

    /// Resolve against an explicit native width
    pub fn resolve_for(self, domain: Domain, width: NativeWidth) -> BuiltinOp {
        let info = self.info();
        let concrete = domain.canonical_for(width);
        match info.class {
            DomainClass::Untyped => BuiltinOp::new(self, None),
            class if class.accepts(concrete) => BuiltinOp::new(self, Some(concrete)),
            _ => unreachable_domain(self, domain),
        }
    }

    /// Resolve a family that takes no selecting domain
    pub fn untyped(self) -> BuiltinOp {
        match self.info().class {
            DomainClass::Untyped => BuiltinOp::new(self, None),
            DomainClass::BoolOnly => BuiltinOp::new(self, Some(Domain::Bool)),
            _ => panic!("operator family {self:?} requires a domain"),
        }
    }

    pub(crate) const fn vendor_for(self, domain: Option<Domain>) -> Vendor {
        match self.info().vendor {
            VendorRule::GrB => Vendor::GrB,
            VendorRule::GxB => Vendor::GxB,
            VendorRule::GrBUnlessComplex => match domain {
                Some(d) if d.is_complex() => Vendor::GxB,
                _ => Vendor::GrB,
            },
        }
    }
}

#[cold]
fn unreachable_domain(family: OpFamily, domain: Domain) -> ! {
    panic!("operator family {family:?} has no variant for domain {domain}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_family() {
        for family in OpFamily::ALL {
            let info = family.info();
            assert!(!info.name.is_empty());
            if info.class != DomainClass::Untyped {
                assert!(!info.class.domains().is_empty(), "{family:?}");
            }
        }
    }

    #[test]
    fn test_all_lists_each_family_once() {
        for (n, family) in OpFamily::ALL.iter().enumerate() {
            assert!(!OpFamily::ALL[..n].contains(family), "{family:?}");
        }
        assert_eq!(OpFamily::ALL.first(), Some(&OpFamily::Identity));
        assert_eq!(OpFamily::ALL.last(), Some(&OpFamily::ValueGe));
    }

    #[test]
    fn test_class_membership() {
        assert!(OpFamily::Band.accepts(Domain::UInt16));
        assert!(!OpFamily::Band.accepts(Domain::Float32));
        assert!(!OpFamily::Band.accepts(Domain::Bool));
        assert!(OpFamily::Sqrt.accepts(Domain::Complex64));
        assert!(!OpFamily::Sqrt.accepts(Domain::Int32));
        assert!(!OpFamily::Lt.accepts(Domain::Complex32));
        assert!(OpFamily::Eq.accepts(Domain::Complex32));
        assert!(OpFamily::Plus.accepts(Domain::NativeInt));
        assert!(!OpFamily::Plus.accepts(Domain::User("point")));
    }

    #[test]
    fn test_native_width_follows_host_decision() {
        assert_eq!(
            OpFamily::Plus.resolve_for(Domain::NativeInt, NativeWidth::W32),
            OpFamily::Plus.resolve(Domain::Int32)
        );
        assert_eq!(
            OpFamily::Plus.resolve_for(Domain::NativeUInt, NativeWidth::W64),
            OpFamily::Plus.resolve(Domain::UInt64)
        );
        assert_eq!(
            OpFamily::RowIndex.resolve_for(Domain::NativeInt, NativeWidth::W32),
            OpFamily::RowIndex.resolve(Domain::Int32)
        );
    }

    #[test]
    #[should_panic(expected = "no variant")]
    fn test_out_of_class_domain_is_unreachable() {
        let _ = OpFamily::Bor.resolve(Domain::Float64);
    }

    #[test]
    fn test_untyped_families() {
        assert_eq!(OpFamily::Tril.untyped().domain, None);
        assert_eq!(OpFamily::LnotBool.untyped().domain, Some(Domain::Bool));
        assert!(OpFamily::IgnoreDup.is_untyped());
    }
}
