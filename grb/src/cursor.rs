//! Cursors over stored entries
//!
//! One [`Cursor`] core drives all four traversal orders; the order is a
//! type parameter implementing [`TraversalOrder`]. The value accessor is
//! picked once from `T` when the cursor is attached.
//!
//! State machine:
//!
//! ```text
//!                 seek / advance
//! Unpositioned ───────────────────► AtEntry ◄──► AtEmpty   (row/col only)
//!                                      │            │
//!                                      └─────┬──────┘
//!                                            ▼
//!                                        Exhausted   (terminal)
//! ```
//!
//! A cursor borrows its container, so the container can be neither
//! mutated nor dropped while the cursor lives. Cursors are `!Sync`.
//! Several cursors over one container may run on different threads; that
//! is only as safe as the engine's concurrent reads of its storage, which
//! this crate does not check.

use std::cell::RefCell;
use std::marker::PhantomData;

use grb_core::{
    ColOrder, CursorState, Element, Engine, MatrixEntryOrder, Outcome, RowOrder, TraversalOrder,
    VectorEntryOrder,
};

use crate::status;

/// Decodes one engine value
pub type Accessor<T> = fn(&[u8]) -> T;

fn accessor<T: Element>() -> Accessor<T> {
    T::read_bytes
}

/// Cursor over a container's stored entries in traversal order `O`
pub struct Cursor<'a, T: Element, O: TraversalOrder, E: Engine> {
    engine: &'a E,
    it: E::Iterator,
    state: CursorState,
    accessor: Accessor<T>,
    scratch: RefCell<Vec<u8>>,
    _order: PhantomData<O>,
}

pub type RowCursor<'a, T, E> = Cursor<'a, T, RowOrder, E>;
pub type ColCursor<'a, T, E> = Cursor<'a, T, ColOrder, E>;
pub type MatrixEntryCursor<'a, T, E> = Cursor<'a, T, MatrixEntryOrder, E>;
pub type VectorCursor<'a, T, E> = Cursor<'a, T, VectorEntryOrder, E>;

impl<'a, T: Element, O: TraversalOrder, E: Engine> Cursor<'a, T, O, E> {
    pub(crate) fn attach(engine: &'a E, it: E::Iterator) -> Self {
        Self {
            engine,
            it,
            state: CursorState::Unpositioned,
            accessor: accessor::<T>(),
            scratch: RefCell::new(vec![0u8; T::size_bytes()]),
            _order: PhantomData,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    fn moved(&mut self, outcome: Outcome) -> Outcome {
        self.state = CursorState::after(outcome);
        outcome
    }

    /// Move to outer vector (row/column cursors) or linear position `target`
    ///
    /// An exhausted cursor stays exhausted.
    pub fn seek(&mut self, target: u64) -> Outcome {
        if self.is_exhausted() {
            return Outcome::Exhausted;
        }
        let info = O::seek(self.engine, &mut self.it, target);
        let outcome = status::movement(info, "iterator_seek");
        self.moved(outcome)
    }

    /// Move to the next outer vector or entry; the first call seeks to 0
    pub fn advance(&mut self) -> Outcome {
        match self.state {
            CursorState::Exhausted => Outcome::Exhausted,
            CursorState::Unpositioned => self.seek(0),
            CursorState::AtEntry | CursorState::AtEmpty => {
                let info = O::advance(self.engine, &mut self.it);
                let outcome = status::movement(info, "iterator_next");
                self.moved(outcome)
            }
        }
    }

    /// Position of the current entry
    pub fn position(&self) -> Option<O::Position> {
        (self.state == CursorState::AtEntry).then(|| O::position(self.engine, &self.it))
    }

    /// Value of the current entry
    ///
    /// # Panics
    ///
    /// Panics when the cursor is not at an entry.
    pub fn get(&self) -> T {
        assert_eq!(
            self.state,
            CursorState::AtEntry,
            "cursor is not positioned at an entry"
        );
        let mut scratch = self.scratch.borrow_mut();
        self.engine.iterator_value(&self.it, T::DOMAIN, &mut scratch);
        (self.accessor)(&scratch)
    }

    fn outer_count(&self) -> u64 {
        self.engine.iterator_kount(&self.it, O::KIND)
    }

    /// Outer vector the cursor sits on, with or without an entry there
    fn outer(&self) -> Option<u64> {
        match self.state {
            CursorState::AtEntry | CursorState::AtEmpty => {
                Some(self.engine.iterator_outer(&self.it, O::KIND))
            }
            CursorState::Unpositioned | CursorState::Exhausted => None,
        }
    }

    fn seek_rank(&mut self, k: u64) -> Outcome {
        if self.is_exhausted() {
            return Outcome::Exhausted;
        }
        let info = self.engine.iterator_kseek(&mut self.it, O::KIND, k);
        let outcome = status::movement(info, "iterator_kseek");
        self.moved(outcome)
    }

    /// Next entry inside the current outer vector
    fn next_inner(&mut self) -> bool {
        if self.state != CursorState::AtEntry {
            return false;
        }
        let info = self.engine.iterator_next_inner(&mut self.it, O::KIND);
        match status::movement(info, "iterator_next_inner") {
            Outcome::Success => true,
            // end of this vector: nothing to read, outer position kept
            Outcome::NoValue | Outcome::Exhausted => {
                self.state = CursorState::AtEmpty;
                false
            }
        }
    }

    /// Step to the next stored entry in any traversal order
    fn step(&mut self) -> Option<(O::Position, T)> {
        loop {
            let outcome = match self.state {
                CursorState::Exhausted => return None,
                CursorState::Unpositioned => self.seek(0),
                CursorState::AtEntry if O::KIND.is_nested() => {
                    if self.next_inner() {
                        Outcome::Success
                    } else {
                        self.advance()
                    }
                }
                CursorState::AtEntry | CursorState::AtEmpty => self.advance(),
            };
            match outcome {
                Outcome::Success => {
                    let position = O::position(self.engine, &self.it);
                    return Some((position, self.get()));
                }
                Outcome::Exhausted => return None,
                Outcome::NoValue => continue,
            }
        }
    }

    /// Iterate the entries from the current position on
    ///
    /// A cursor sitting on an entry yields that entry first.
    pub fn entries(self) -> Entries<'a, T, O, E> {
        let pending = self.state == CursorState::AtEntry;
        Entries {
            cursor: self,
            pending,
        }
    }
}

impl<'a, T: Element, O: TraversalOrder, E: Engine> Drop for Cursor<'a, T, O, E> {
    fn drop(&mut self) {
        self.engine.iterator_free(&mut self.it);
    }
}

impl<'a, T: Element, O: TraversalOrder, E: Engine> std::fmt::Debug for Cursor<'a, T, O, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("kind", &O::KIND)
            .field("state", &self.state)
            .finish()
    }
}

impl<'a, T: Element, E: Engine> Cursor<'a, T, RowOrder, E> {
    /// Move to row `row`, or the next stored row for hypersparse storage
    pub fn seek_row(&mut self, row: u64) -> Outcome {
        self.seek(row)
    }

    /// Move to the `k`th row the engine stores
    pub fn seek_by_rank(&mut self, k: u64) -> Outcome {
        self.seek_rank(k)
    }

    pub fn next_row(&mut self) -> Outcome {
        self.advance()
    }

    /// Next entry in the current row; `false` at the end of the row
    pub fn next_col_in_row(&mut self) -> bool {
        self.next_inner()
    }

    /// Current row, also reported at a row without entries
    pub fn row(&self) -> Option<u64> {
        self.outer()
    }

    pub fn col(&self) -> Option<u64> {
        self.position().map(|(_, col)| col)
    }

    /// Rows the cursor can visit
    pub fn kount(&self) -> u64 {
        self.outer_count()
    }
}

impl<'a, T: Element, E: Engine> Cursor<'a, T, ColOrder, E> {
    pub fn seek_col(&mut self, col: u64) -> Outcome {
        self.seek(col)
    }

    pub fn seek_by_rank(&mut self, k: u64) -> Outcome {
        self.seek_rank(k)
    }

    pub fn next_col(&mut self) -> Outcome {
        self.advance()
    }

    /// Next entry in the current column; `false` at the end of the column
    pub fn next_row_in_col(&mut self) -> bool {
        self.next_inner()
    }

    pub fn row(&self) -> Option<u64> {
        self.position().map(|(row, _)| row)
    }

    /// Current column, also reported at a column without entries
    pub fn col(&self) -> Option<u64> {
        self.outer()
    }

    pub fn kount(&self) -> u64 {
        self.outer_count()
    }
}

impl<'a, T: Element, E: Engine> Cursor<'a, T, MatrixEntryOrder, E> {
    /// Upper bound of linear positions
    pub fn pmax(&self) -> u64 {
        self.engine.iterator_pmax(&self.it, MatrixEntryOrder::KIND)
    }

    pub fn next(&mut self) -> Outcome {
        self.advance()
    }

    /// Current linear position
    pub fn p(&self) -> u64 {
        self.engine.iterator_p(&self.it, MatrixEntryOrder::KIND)
    }

    pub fn index(&self) -> Option<(u64, u64)> {
        self.position()
    }
}

impl<'a, T: Element, E: Engine> Cursor<'a, T, VectorEntryOrder, E> {
    pub fn pmax(&self) -> u64 {
        self.engine.iterator_pmax(&self.it, VectorEntryOrder::KIND)
    }

    pub fn next(&mut self) -> Outcome {
        self.advance()
    }

    pub fn p(&self) -> u64 {
        self.engine.iterator_p(&self.it, VectorEntryOrder::KIND)
    }

    pub fn index(&self) -> Option<u64> {
        self.position()
    }
}

/// Iterator adapter over a cursor
pub struct Entries<'a, T: Element, O: TraversalOrder, E: Engine> {
    cursor: Cursor<'a, T, O, E>,
    /// The cursor's current entry has not been yielded yet
    pending: bool,
}

impl<'a, T: Element, O: TraversalOrder, E: Engine> Iterator for Entries<'a, T, O, E> {
    type Item = (O::Position, T);

    fn next(&mut self) -> Option<Self::Item> {
        if std::mem::take(&mut self.pending) {
            if let Some(position) = self.cursor.position() {
                return Some((position, self.cursor.get()));
            }
        }
        self.cursor.step()
    }
}

impl<'a, T: Element, O: TraversalOrder, E: Engine> std::iter::FusedIterator for Entries<'a, T, O, E> {}
