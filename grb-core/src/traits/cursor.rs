//! Traversal-order policies for cursors
//!
//! The four cursor variants share one state machine and differ only in
//! which engine entry points move them and what a position looks like.
//! A [`TraversalOrder`] carries exactly that difference.

use super::engine::Engine;
use crate::error::{Info, Outcome};

/// Which engine iterator family a cursor drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    Row,
    Col,
    MatrixEntry,
    VectorEntry,
}

impl CursorKind {
    /// Whether positions are `(outer vector, entry within it)` pairs
    pub const fn is_nested(self) -> bool {
        matches!(self, CursorKind::Row | CursorKind::Col)
    }
}

/// Cursor position state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorState {
    #[default]
    Unpositioned,
    /// At a stored entry, `get` is valid
    AtEntry,
    /// At an outer vector without entries (row and column cursors only)
    AtEmpty,
    /// Past the last entry; terminal
    Exhausted,
}

impl CursorState {
    /// State after a movement reported `outcome`
    pub const fn after(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => CursorState::AtEntry,
            Outcome::NoValue => CursorState::AtEmpty,
            Outcome::Exhausted => CursorState::Exhausted,
        }
    }

    pub const fn is_exhausted(self) -> bool {
        matches!(self, CursorState::Exhausted)
    }
}

/// Traversal policy: how to seek, advance and report a position
pub trait TraversalOrder: 'static {
    const KIND: CursorKind;

    /// Position reported by the cursor
    type Position: Copy + core::fmt::Debug + PartialEq;

    /// Move to outer vector or linear position `target`
    fn seek<E: Engine>(engine: &E, it: &mut E::Iterator, target: u64) -> Info {
        engine.iterator_seek(it, Self::KIND, target)
    }

    /// Move to the next outer vector or stored entry
    fn advance<E: Engine>(engine: &E, it: &mut E::Iterator) -> Info {
        engine.iterator_next(it, Self::KIND)
    }

    fn position<E: Engine>(engine: &E, it: &E::Iterator) -> Self::Position;
}

/// Row-by-row over a by-row matrix
#[derive(Debug, Clone, Copy)]
pub struct RowOrder;

/// Column-by-column over a by-column matrix
#[derive(Debug, Clone, Copy)]
pub struct ColOrder;

/// Linear over every stored entry of a matrix
#[derive(Debug, Clone, Copy)]
pub struct MatrixEntryOrder;

/// Linear over every stored entry of a vector
#[derive(Debug, Clone, Copy)]
pub struct VectorEntryOrder;

impl TraversalOrder for RowOrder {
    const KIND: CursorKind = CursorKind::Row;
    type Position = (u64, u64);

    fn position<E: Engine>(engine: &E, it: &E::Iterator) -> (u64, u64) {
        engine.iterator_index(it, Self::KIND)
    }
}

impl TraversalOrder for ColOrder {
    const KIND: CursorKind = CursorKind::Col;
    type Position = (u64, u64);

    fn position<E: Engine>(engine: &E, it: &E::Iterator) -> (u64, u64) {
        engine.iterator_index(it, Self::KIND)
    }
}

impl TraversalOrder for MatrixEntryOrder {
    const KIND: CursorKind = CursorKind::MatrixEntry;
    type Position = (u64, u64);

    fn position<E: Engine>(engine: &E, it: &E::Iterator) -> (u64, u64) {
        engine.iterator_index(it, Self::KIND)
    }
}

impl TraversalOrder for VectorEntryOrder {
    const KIND: CursorKind = CursorKind::VectorEntry;
    type Position = u64;

    fn position<E: Engine>(engine: &E, it: &E::Iterator) -> u64 {
        engine.iterator_index(it, Self::KIND).0
    }
}
