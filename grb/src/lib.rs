//! GRB - Typed GraphBLAS binding
//!
//! This library exposes a GraphBLAS engine through typed handles: element
//! domains resolved at compile time, operators resolved from family tables,
//! and one generic cursor over the engine's four traversal orders.
//!
//! ## Architecture
//!
//! GRB keeps definitions and implementation apart:
//!
//! - **grb-core**: domains, status codes, operator tables, the `Engine`
//!   trait, pack descriptors and marshaling helpers (no engine calls)
//! - **grb**: the context, typed containers, cursors and the engines
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "reference")]
//! # fn main() -> Result<(), grb::GrbError> {
//! use grb::{ops, Context, EngineConfig, ReferenceEngine};
//!
//! let ctx = Context::init(ReferenceEngine::new(), EngineConfig::default())?;
//! let mut m = ctx.matrix::<i32>(3, 3)?;
//! m.build(&[0, 2, 0], &[1, 2, 1], &[4, 5, 6], ctx.operator(ops::plus::<i32>()))?;
//! assert_eq!(m.get(0, 1)?, Some(10));
//! assert_eq!(m.get(1, 1)?, None);
//!
//! let total: i32 = m.row_cursor()?.entries().map(|(_, v)| v).sum();
//! assert_eq!(total, 15);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "reference"))]
//! # fn main() {}
//! ```
//!
//! ## Features
//!
//! - **reference** (default): in-process engine for tests and demos
//! - **suitesparse**: links `libgraphblas` through the FFI backend

// Re-export core abstractions and format definitions
pub use grb_core::{
    // Element types and domains
    user_element, Builtin, Complex32, Complex64, ComplexElement, Domain, Element, Float, Floating,
    Integer, NativeWidth, PositionalIndex, Real,
    // Engine seam
    BinaryFn, Engine, EngineResult, GlobalOption, HasRaw, RawHandle, UnaryFn,
    // Formats and pack/unpack
    Format, Mode, Orientation, PackedMatrix, PackedVector, Sparsity, WaitMode, INDEX_MAX,
    // Errors
    ExecutionError, GrbError, Info, Outcome, Result, Status,
    // Cursors
    ColOrder, CursorKind, CursorState, MatrixEntryOrder, RowOrder, TraversalOrder, VectorEntryOrder,
    // Descriptors and marshaling
    flatten_optional, flatten_optional_triple, to_index_list, Descriptor, IndexList, MaskMode, Select,
};

// Implementation modules
pub mod config;
pub mod context;
pub mod cursor;
pub mod matrix;
pub mod ops;
pub mod registry;
mod status;
pub mod vector;

#[cfg(feature = "reference")]
pub mod reference_backend;
#[cfg(feature = "suitesparse")]
pub mod ffi_backend;

// Public exports
pub use config::{ConfigError, EngineConfig};
pub use context::{Context, Desc};
pub use cursor::{Accessor, ColCursor, Cursor, Entries, MatrixEntryCursor, RowCursor, VectorCursor};
pub use matrix::{Mask, Matrix};
pub use ops::{BuiltinOp, OpFamily, OpRef, Operator, UserOp};
pub use registry::{FieldKind, TypeRegistry, UserDomain};
pub use vector::Vector;

#[cfg(feature = "reference")]
pub use reference_backend::{EngineOptions, ReferenceEngine};

#[cfg(feature = "suitesparse")]
pub use ffi_backend::SuiteSparse;
