//! Operator handles
//!
//! Built-in operators are resolved in `grb_core::ops` and turned into
//! engine handles by [`Context::operator`](crate::Context::operator); they
//! stay valid for the life of the context. User-defined operators wrap a
//! function pointer and must be released explicitly.

pub use grb_core::ops::*;

use grb_core::{Domain, Engine, HasRaw, RawHandle, Result};
use tracing::{info, warn};

use crate::status;

/// Engine handle of a built-in operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operator<H> {
    handle: H,
    op: BuiltinOp,
}

impl<H: RawHandle> Operator<H> {
    pub(crate) fn new(handle: H, op: BuiltinOp) -> Self {
        Self { handle, op }
    }

    pub fn builtin(&self) -> BuiltinOp {
        self.op
    }

    pub fn output(&self) -> Option<Domain> {
        self.op.output()
    }
}

impl<H: RawHandle> HasRaw for Operator<H> {
    type Raw = H;

    fn raw(&self) -> H {
        self.handle
    }
}

/// Any operator handle, as passed to operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpRef<H>(H);

impl<H: RawHandle> HasRaw for OpRef<H> {
    type Raw = H;

    fn raw(&self) -> H {
        self.0
    }
}

impl<H: RawHandle> From<Operator<H>> for OpRef<H> {
    fn from(op: Operator<H>) -> Self {
        OpRef(op.handle)
    }
}

impl<H: RawHandle> From<&Operator<H>> for OpRef<H> {
    fn from(op: &Operator<H>) -> Self {
        OpRef(op.handle)
    }
}

impl<'ctx, E: Engine> From<&UserOp<'ctx, E>> for OpRef<E::Op> {
    fn from(op: &UserOp<'ctx, E>) -> Self {
        OpRef(op.raw())
    }
}

/// A user-defined unary or binary operator
///
/// Released with [`UserOp::release`]. Dropping an operator that was never
/// released leaks its engine object. Using a released operator is a logic
/// error, caught in debug builds only.
#[derive(Debug)]
pub struct UserOp<'ctx, E: Engine> {
    engine: &'ctx E,
    handle: E::Op,
    name: String,
    output: Domain,
    inputs: Vec<Domain>,
    released: bool,
}

impl<'ctx, E: Engine> UserOp<'ctx, E> {
    pub(crate) fn new(engine: &'ctx E, handle: E::Op, name: &str, output: Domain, inputs: Vec<Domain>) -> Self {
        info!(name, %output, arity = inputs.len(), "created user operator");
        Self {
            engine,
            handle,
            name: name.to_string(),
            output,
            inputs,
            released: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output(&self) -> Domain {
        self.output
    }

    pub fn inputs(&self) -> &[Domain] {
        &self.inputs
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Free the engine operator
    pub fn release(&mut self) -> Result<()> {
        debug_assert!(!self.released, "user operator `{}` released twice", self.name);
        self.released = true;
        status::ok(self.engine.op_free(self.handle), "op_free")
    }
}

impl<'ctx, E: Engine> HasRaw for UserOp<'ctx, E> {
    type Raw = E::Op;

    fn raw(&self) -> E::Op {
        debug_assert!(!self.released, "user operator `{}` used after release", self.name);
        self.handle
    }
}

impl<'ctx, E: Engine> Drop for UserOp<'ctx, E> {
    fn drop(&mut self) {
        if !self.released {
            warn!(name = %self.name, "user operator dropped without release, leaking it");
        }
    }
}
