//! Trait abstractions shared by the binding and its engines
//!
//! Pure interfaces: element types, handles, the engine seam and the
//! cursor traversal policies. No implementations beyond the built-in
//! element types.

pub mod element;
pub mod handle;
#[cfg(feature = "alloc")]
pub mod cursor;
#[cfg(feature = "alloc")]
pub mod engine;

pub use element::{Builtin, ComplexElement, Element, Float, Floating, Integer, PositionalIndex, Real};
pub use handle::{HasRaw, RawHandle};
#[cfg(feature = "alloc")]
pub use cursor::{
    ColOrder, CursorKind, CursorState, MatrixEntryOrder, RowOrder, TraversalOrder, VectorEntryOrder,
};
#[cfg(feature = "alloc")]
pub use engine::{BinaryFn, Engine, EngineResult, GlobalOption, UnaryFn};
