//! Typed matrices
//!
//! [`Matrix`] owns one engine matrix whose element domain is fixed by `T`.
//! Mutating calls take `&mut self` and cursors borrow `&self`, so a cursor
//! can never observe a container that is being changed or freed.

use std::marker::PhantomData;

use grb_core::format::packed::encode_values;
use grb_core::{
    flatten_optional_triple, to_index_list, Element, Engine, Format, GrbError, HasRaw, Outcome,
    PackedMatrix, RawHandle, Result, Select, WaitMode,
};
use tracing::debug;

use crate::context::{Context, Desc};
use crate::cursor::{ColCursor, Cursor, MatrixEntryCursor, RowCursor};
use crate::ops::OpRef;
use crate::status;

/// Raw handle of a container used as a write mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask<H>(pub(crate) H);

impl<H: RawHandle> HasRaw for Mask<H> {
    type Raw = H;

    fn raw(&self) -> H {
        self.0
    }
}

/// A matrix of `T` owned by a context
#[derive(Debug)]
pub struct Matrix<'ctx, T: Element, E: Engine> {
    ctx: &'ctx Context<E>,
    handle: E::Matrix,
    nrows: u64,
    ncols: u64,
    _marker: PhantomData<T>,
}

impl<'ctx, T: Element, E: Engine> Matrix<'ctx, T, E> {
    pub(crate) fn new(ctx: &'ctx Context<E>, nrows: u64, ncols: u64) -> Result<Self> {
        let ty = ctx.require_type(T::DOMAIN)?;
        let handle = status::value(ctx.engine().matrix_new(ty, nrows, ncols), "matrix_new")?;
        Ok(Self {
            ctx,
            handle,
            nrows,
            ncols,
            _marker: PhantomData,
        })
    }

    fn engine(&self) -> &'ctx E {
        self.ctx.engine()
    }

    pub fn nrows(&self) -> u64 {
        self.nrows
    }

    pub fn ncols(&self) -> u64 {
        self.ncols
    }

    pub fn dims(&self) -> (u64, u64) {
        (self.nrows, self.ncols)
    }

    /// Stored entries; finishes pending work
    pub fn nvals(&self) -> Result<u64> {
        status::value(self.engine().matrix_nvals(self.handle), "matrix_nvals")
    }

    pub fn format(&self) -> Result<Format> {
        status::value(self.engine().matrix_format(self.handle), "matrix_format")
    }

    pub fn set_format(&mut self, format: Format) -> Result<()> {
        status::ok(self.engine().matrix_set_format(self.handle, format), "matrix_set_format")
    }

    /// This matrix as a write mask
    pub fn mask(&self) -> Mask<E::Matrix> {
        Mask(self.handle)
    }

    pub fn set_element(&mut self, row: u64, col: u64, value: T) -> Result<()> {
        let mut bytes = vec![0u8; T::size_bytes()];
        value.write_bytes(&mut bytes);
        status::ok(
            self.engine().matrix_set_element(self.handle, T::DOMAIN, &bytes, row, col),
            "matrix_set_element",
        )
    }

    /// Value at `(row, col)`, `None` when no entry is stored there
    pub fn get(&self, row: u64, col: u64) -> Result<Option<T>> {
        let mut bytes = vec![0u8; T::size_bytes()];
        let info = self
            .engine()
            .matrix_extract_element(self.handle, T::DOMAIN, &mut bytes, row, col);
        Ok(match status::check(info, "matrix_extract_element")? {
            Outcome::Success => Some(T::read_bytes(&bytes)),
            Outcome::NoValue | Outcome::Exhausted => None,
        })
    }

    pub fn remove_element(&mut self, row: u64, col: u64) -> Result<()> {
        status::ok(self.engine().matrix_remove_element(self.handle, row, col), "matrix_remove_element")
    }

    /// Fill an empty matrix from tuples combining duplicates with `dup`
    pub fn build(&mut self, rows: &[u64], cols: &[u64], values: &[T], dup: impl Into<OpRef<E::Op>>) -> Result<()> {
        self.build_raw(rows, cols, values, dup.into().raw())
    }

    /// Fill an empty matrix from tuples that must not repeat an index
    pub fn build_unique(&mut self, rows: &[u64], cols: &[u64], values: &[T]) -> Result<()> {
        self.build_raw(rows, cols, values, E::Op::NULL)
    }

    fn build_raw(&mut self, rows: &[u64], cols: &[u64], values: &[T], dup: E::Op) -> Result<()> {
        if rows.len() != values.len() {
            return Err(GrbError::InvalidValue);
        }
        let bytes = encode_values(values);
        status::ok(
            self.engine()
                .matrix_build(self.handle, T::DOMAIN, rows, cols, &bytes, dup),
            "matrix_build",
        )
    }

    pub fn clear(&mut self) -> Result<()> {
        status::ok(self.engine().matrix_clear(self.handle), "matrix_clear")
    }

    pub fn wait(&mut self, mode: WaitMode) -> Result<()> {
        status::ok(self.engine().matrix_wait(self.handle, mode), "matrix_wait")
    }

    /// `self<mask> = accum(self, op(input))`
    pub fn apply<X: Element>(
        &mut self,
        mask: Option<Mask<E::Matrix>>,
        accum: Option<OpRef<E::Op>>,
        op: impl Into<OpRef<E::Op>>,
        input: &Matrix<'_, X, E>,
        desc: Option<&Desc<'_, E>>,
    ) -> Result<()> {
        let (mask, accum, desc) = flatten_optional_triple(mask.as_ref(), accum.as_ref(), desc);
        let info = self
            .engine()
            .matrix_apply(self.handle, mask, accum, op.into().raw(), input.handle, desc);
        status::ok(info, "matrix_apply")
    }

    /// `self<mask> = accum(self, input(rows, cols))`
    pub fn extract<I, J>(
        &mut self,
        mask: Option<Mask<E::Matrix>>,
        accum: Option<OpRef<E::Op>>,
        input: &Matrix<'_, T, E>,
        rows: Select<'_, I>,
        cols: Select<'_, J>,
        desc: Option<&Desc<'_, E>>,
    ) -> Result<()>
    where
        I: Copy + TryInto<u64>,
        J: Copy + TryInto<u64>,
    {
        let rows = to_index_list(rows)?;
        let cols = to_index_list(cols)?;
        let (mask, accum, desc) = flatten_optional_triple(mask.as_ref(), accum.as_ref(), desc);
        let info = self
            .engine()
            .matrix_extract(self.handle, mask, accum, input.handle, &rows, &cols, desc);
        status::ok(info, "matrix_extract")
    }

    /// Hand `packed`'s buffers to the engine
    ///
    /// On success every buffer in `packed` is left empty. On failure the
    /// buffers are untouched.
    pub fn pack(&mut self, packed: &mut PackedMatrix) -> Result<()> {
        if packed.domain.canonical() != T::DOMAIN.canonical() {
            return Err(GrbError::DomainMismatch);
        }
        status::ok(self.engine().matrix_pack(self.handle, packed), "matrix_pack")?;
        debug!(nrows = self.nrows, ncols = self.ncols, "packed matrix");
        Ok(())
    }

    /// Take the storage out in `format`, leaving this matrix empty
    pub fn unpack(&mut self, format: Format) -> Result<PackedMatrix> {
        let packed = status::value(
            self.engine().matrix_unpack(self.handle, T::DOMAIN, format),
            "matrix_unpack",
        )?;
        debug!(%format, nvals = packed.nvals(), "unpacked matrix");
        Ok(packed)
    }

    /// Cursor over the rows of a by-row matrix
    pub fn row_cursor(&self) -> Result<RowCursor<'_, T, E>> {
        let it = status::value(
            self.engine().matrix_iterator(self.handle, grb_core::CursorKind::Row),
            "matrix_iterator",
        )?;
        Ok(Cursor::attach(self.engine(), it))
    }

    /// Cursor over the columns of a by-column matrix
    pub fn col_cursor(&self) -> Result<ColCursor<'_, T, E>> {
        let it = status::value(
            self.engine().matrix_iterator(self.handle, grb_core::CursorKind::Col),
            "matrix_iterator",
        )?;
        Ok(Cursor::attach(self.engine(), it))
    }

    /// Cursor over every stored entry
    pub fn entry_cursor(&self) -> Result<MatrixEntryCursor<'_, T, E>> {
        let it = status::value(
            self.engine()
                .matrix_iterator(self.handle, grb_core::CursorKind::MatrixEntry),
            "matrix_iterator",
        )?;
        Ok(Cursor::attach(self.engine(), it))
    }
}

impl<'ctx, T: Element, E: Engine> HasRaw for Matrix<'ctx, T, E> {
    type Raw = E::Matrix;

    fn raw(&self) -> E::Matrix {
        self.handle
    }
}

impl<'ctx, T: Element, E: Engine> Drop for Matrix<'ctx, T, E> {
    fn drop(&mut self) {
        let _ = self.engine().matrix_free(self.handle);
    }
}
