//! Typed vectors

use std::marker::PhantomData;

use grb_core::format::packed::encode_values;
use grb_core::{
    flatten_optional_triple, to_index_list, Element, Engine, GrbError, HasRaw, Outcome,
    PackedVector, RawHandle, Result, Select, Sparsity, WaitMode,
};
use tracing::debug;

use crate::context::{Context, Desc};
use crate::cursor::{Cursor, VectorCursor};
use crate::matrix::Mask;
use crate::ops::OpRef;
use crate::status;

/// A vector of `T` owned by a context
#[derive(Debug)]
pub struct Vector<'ctx, T: Element, E: Engine> {
    ctx: &'ctx Context<E>,
    handle: E::Vector,
    size: u64,
    _marker: PhantomData<T>,
}

impl<'ctx, T: Element, E: Engine> Vector<'ctx, T, E> {
    pub(crate) fn new(ctx: &'ctx Context<E>, size: u64) -> Result<Self> {
        let ty = ctx.require_type(T::DOMAIN)?;
        let handle = status::value(ctx.engine().vector_new(ty, size), "vector_new")?;
        Ok(Self {
            ctx,
            handle,
            size,
            _marker: PhantomData,
        })
    }

    fn engine(&self) -> &'ctx E {
        self.ctx.engine()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn nvals(&self) -> Result<u64> {
        status::value(self.engine().vector_nvals(self.handle), "vector_nvals")
    }

    pub fn mask(&self) -> Mask<E::Vector> {
        Mask(self.handle)
    }

    pub fn set_element(&mut self, index: u64, value: T) -> Result<()> {
        let mut bytes = vec![0u8; T::size_bytes()];
        value.write_bytes(&mut bytes);
        status::ok(
            self.engine().vector_set_element(self.handle, T::DOMAIN, &bytes, index),
            "vector_set_element",
        )
    }

    /// Value at `index`, `None` when no entry is stored there
    pub fn get(&self, index: u64) -> Result<Option<T>> {
        let mut bytes = vec![0u8; T::size_bytes()];
        let info = self
            .engine()
            .vector_extract_element(self.handle, T::DOMAIN, &mut bytes, index);
        Ok(match status::check(info, "vector_extract_element")? {
            Outcome::Success => Some(T::read_bytes(&bytes)),
            Outcome::NoValue | Outcome::Exhausted => None,
        })
    }

    pub fn remove_element(&mut self, index: u64) -> Result<()> {
        status::ok(self.engine().vector_remove_element(self.handle, index), "vector_remove_element")
    }

    pub fn build(&mut self, indices: &[u64], values: &[T], dup: impl Into<OpRef<E::Op>>) -> Result<()> {
        self.build_raw(indices, values, dup.into().raw())
    }

    pub fn build_unique(&mut self, indices: &[u64], values: &[T]) -> Result<()> {
        self.build_raw(indices, values, E::Op::NULL)
    }

    fn build_raw(&mut self, indices: &[u64], values: &[T], dup: E::Op) -> Result<()> {
        if indices.len() != values.len() {
            return Err(GrbError::InvalidValue);
        }
        let bytes = encode_values(values);
        status::ok(
            self.engine()
                .vector_build(self.handle, T::DOMAIN, indices, &bytes, dup),
            "vector_build",
        )
    }

    pub fn clear(&mut self) -> Result<()> {
        status::ok(self.engine().vector_clear(self.handle), "vector_clear")
    }

    pub fn wait(&mut self, mode: WaitMode) -> Result<()> {
        status::ok(self.engine().vector_wait(self.handle, mode), "vector_wait")
    }

    /// `self<mask> = accum(self, op(input))`
    pub fn apply<X: Element>(
        &mut self,
        mask: Option<Mask<E::Vector>>,
        accum: Option<OpRef<E::Op>>,
        op: impl Into<OpRef<E::Op>>,
        input: &Vector<'_, X, E>,
        desc: Option<&Desc<'_, E>>,
    ) -> Result<()> {
        let (mask, accum, desc) = flatten_optional_triple(mask.as_ref(), accum.as_ref(), desc);
        let info = self
            .engine()
            .vector_apply(self.handle, mask, accum, op.into().raw(), input.handle, desc);
        status::ok(info, "vector_apply")
    }

    /// `self<mask> = accum(self, input(indices))`
    pub fn extract<I: Copy + TryInto<u64>>(
        &mut self,
        mask: Option<Mask<E::Vector>>,
        accum: Option<OpRef<E::Op>>,
        input: &Vector<'_, T, E>,
        indices: Select<'_, I>,
        desc: Option<&Desc<'_, E>>,
    ) -> Result<()> {
        let indices = to_index_list(indices)?;
        let (mask, accum, desc) = flatten_optional_triple(mask.as_ref(), accum.as_ref(), desc);
        let info = self
            .engine()
            .vector_extract(self.handle, mask, accum, input.handle, &indices, desc);
        status::ok(info, "vector_extract")
    }

    /// Hand `packed`'s buffers to the engine, leaving them empty
    pub fn pack(&mut self, packed: &mut PackedVector) -> Result<()> {
        if packed.domain.canonical() != T::DOMAIN.canonical() {
            return Err(GrbError::DomainMismatch);
        }
        status::ok(self.engine().vector_pack(self.handle, packed), "vector_pack")?;
        debug!(size = self.size, "packed vector");
        Ok(())
    }

    /// Take the storage out as `sparsity`, leaving this vector empty
    pub fn unpack(&mut self, sparsity: Sparsity) -> Result<PackedVector> {
        let packed = status::value(
            self.engine().vector_unpack(self.handle, T::DOMAIN, sparsity),
            "vector_unpack",
        )?;
        debug!(?sparsity, nvals = packed.nvals(), "unpacked vector");
        Ok(packed)
    }

    pub fn cursor(&self) -> Result<VectorCursor<'_, T, E>> {
        let it = status::value(self.engine().vector_iterator(self.handle), "vector_iterator")?;
        Ok(Cursor::attach(self.engine(), it))
    }
}

impl<'ctx, T: Element, E: Engine> HasRaw for Vector<'ctx, T, E> {
    type Raw = E::Vector;

    fn raw(&self) -> E::Vector {
        self.handle
    }
}

impl<'ctx, T: Element, E: Engine> Drop for Vector<'ctx, T, E> {
    fn drop(&mut self) {
        let _ = self.engine().vector_free(self.handle);
    }
}
