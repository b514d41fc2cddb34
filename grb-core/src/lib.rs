#![cfg_attr(not(feature = "std"), no_std)]

//! GraphBLAS binding core
//!
//! Definitions shared by the binding and its engines: element domains,
//! status codes, the operator resolution table, storage format names,
//! descriptors, marshaling helpers and the [`Engine`] trait. Nothing in
//! this crate calls into an engine.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod descriptor;
pub mod error;
pub mod format;
pub mod marshal;
pub mod ops;
pub mod traits;

pub use descriptor::{Descriptor, MaskMode};
pub use error::*;
pub use format::*;
pub use marshal::{flatten_optional, flatten_optional_triple, Select};
#[cfg(feature = "alloc")]
pub use marshal::{to_index_list, IndexList};
pub use ops::{BuiltinOp, OpFamily, OpKind};
pub use traits::*;

#[doc(hidden)]
pub mod __private {
    pub use bytemuck;
}
