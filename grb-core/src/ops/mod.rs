//! Built-in operator resolution
//!
//! Maps an operator family plus the element type it is requested for to a
//! concrete engine operator. The typed entry points constrain the element
//! type with the marker traits from [`crate::traits::element`], so a request
//! outside a family's domain class does not compile:
//!
//! ```compile_fail
//! let _ = grb_core::ops::band::<f32>();
//! ```
//!
//! ```
//! use grb_core::ops;
//!
//! assert_eq!(ops::plus::<i32>().to_string(), "GrB_PLUS_INT32");
//! assert_eq!(ops::sqrt::<grb_core::Complex64>().to_string(), "GxB_SQRT_FC64");
//! assert_eq!(ops::lnot_bool().to_string(), "GrB_LNOT");
//! ```

pub mod family;
mod typed;

pub use family::{DomainClass, FamilyInfo, InputRule, OpFamily, OutputRule, VendorRule};
pub use typed::*;

use crate::format::Domain;

/// Arity class of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Unary,
    Binary,
    /// `z = f(x, i, j, thunk)`
    IndexUnary,
}

/// Symbol prefix the engine exports an operator under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    /// Standard GraphBLAS C API
    GrB,
    /// SuiteSparse extension
    GxB,
}

impl Vendor {
    pub const fn prefix(self) -> &'static str {
        match self {
            Vendor::GrB => "GrB",
            Vendor::GxB => "GxB",
        }
    }
}

/// A resolved built-in operator
///
/// Two values compare equal exactly when they name the same engine symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuiltinOp {
    pub family: OpFamily,
    /// Concrete domain selecting the variant, `None` for untyped symbols
    pub domain: Option<Domain>,
}

impl BuiltinOp {
    pub(crate) const fn new(family: OpFamily, domain: Option<Domain>) -> Self {
        Self { family, domain }
    }

    pub const fn kind(&self) -> OpKind {
        self.family.kind()
    }

    pub const fn vendor(&self) -> Vendor {
        self.family.vendor_for(self.domain)
    }

    /// Output domain, `None` when it follows the input (untyped families)
    pub fn output(&self) -> Option<Domain> {
        match self.family.info().output {
            OutputRule::Bool => Some(Domain::Bool),
            OutputRule::Same => self.domain,
            OutputRule::Component => self.domain?.component(),
            OutputRule::ComplexOf => self.domain?.complex_of(),
        }
    }

    /// Domain of the first input, `None` when any domain is accepted
    pub fn input(&self) -> Option<Domain> {
        match self.family.info().inputs {
            InputRule::Same | InputRule::ShiftByInt8 => self.domain,
            InputRule::Positional | InputRule::AnyWithInt64Thunk | InputRule::None => None,
        }
    }

    /// Domain of the second input (binary) or thunk (index-unary)
    pub fn second_input(&self) -> Option<Domain> {
        let info = self.family.info();
        match (info.kind, info.inputs) {
            (OpKind::Unary, _) => None,
            (_, InputRule::ShiftByInt8) => Some(Domain::Int8),
            (_, InputRule::AnyWithInt64Thunk) => Some(Domain::Int64),
            (OpKind::IndexUnary, InputRule::Positional) => self.domain,
            (_, InputRule::Same) => self.domain,
            (_, InputRule::Positional | InputRule::None) => None,
        }
    }

    /// Exported engine symbol, e.g. `GrB_PLUS_INT32`
    #[cfg(feature = "alloc")]
    pub fn symbol(&self) -> alloc::string::String {
        use alloc::string::ToString;
        self.to_string()
    }

    /// Whether the exported symbol carries a type suffix
    pub const fn is_suffixed(&self) -> bool {
        !self.family.is_untyped()
    }
}

impl core::fmt::Display for BuiltinOp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let info = self.family.info();
        write!(f, "{}_{}", self.vendor().prefix(), info.name)?;
        match self.domain {
            Some(domain) if self.is_suffixed() => write!(f, "_{}", domain.symbol_suffix()),
            _ => Ok(()),
        }
    }
}

/// Every resolvable `(family, domain)` pair
#[cfg(feature = "alloc")]
pub fn catalog() -> alloc::vec::Vec<BuiltinOp> {
    let mut ops = alloc::vec::Vec::new();
    for family in OpFamily::ALL {
        match family.info().class {
            DomainClass::Untyped | DomainClass::BoolOnly => ops.push(family.untyped()),
            class => ops.extend(
                class
                    .domains()
                    .iter()
                    .map(|domain| BuiltinOp::new(family, Some(*domain))),
            ),
        }
    }
    ops
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_symbols_are_distinct() {
        let ops = catalog();
        let symbols: HashSet<_> = ops.iter().map(ToString::to_string).collect();
        assert_eq!(symbols.len(), ops.len());
        assert!(ops.len() > 400);
    }

    #[test]
    fn test_vendor_prefix_rules() {
        assert_eq!(plus::<f64>().to_string(), "GrB_PLUS_FP64");
        assert_eq!(plus::<crate::Complex32>().to_string(), "GxB_PLUS_FC32");
        assert_eq!(rminus::<u8>().to_string(), "GxB_RMINUS_UINT8");
        assert_eq!(ignore_dup().to_string(), "GxB_IGNORE_DUP");
        assert_eq!(tril().to_string(), "GrB_TRIL");
        assert_eq!(row_index::<i64>().to_string(), "GrB_ROWINDEX_INT64");
    }

    #[test]
    fn test_domain_rules() {
        let op = creal::<crate::Complex64>();
        assert_eq!(op.input(), Some(Domain::Complex64));
        assert_eq!(op.output(), Some(Domain::Float64));

        let op = cmplx::<f32>();
        assert_eq!(op.output(), Some(Domain::Complex32));
        assert_eq!(op.to_string(), "GxB_CMPLX_FP32");

        let op = bshift::<u32>();
        assert_eq!(op.second_input(), Some(Domain::Int8));

        let op = lt::<i16>();
        assert_eq!(op.output(), Some(Domain::Bool));
        assert_eq!(op.input(), Some(Domain::Int16));

        let op = tril();
        assert_eq!(op.output(), Some(Domain::Bool));
        assert_eq!(op.input(), None);
        assert_eq!(ignore_dup().output(), None);
        assert_eq!(op.second_input(), Some(Domain::Int64));
        assert_eq!(identity::<f32>().second_input(), None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(lnot_bool().domain, lnot::<bool>().domain);
        assert_eq!(lnot_bool().output(), lnot::<bool>().output());
        assert_ne!(lnot_bool(), lnot::<bool>());
        assert_eq!(cast::<f64, i32>(), identity::<f64>());
        assert_eq!(cast::<f64, u8>(), cast::<f64, bool>());
    }

    #[test]
    fn test_native_width_matches_concrete() {
        let expected = if cfg!(target_pointer_width = "64") {
            plus::<i64>()
        } else {
            plus::<i32>()
        };
        assert_eq!(plus::<isize>(), expected);
        assert_eq!(first_i::<isize>().domain, expected.domain);
    }
}
