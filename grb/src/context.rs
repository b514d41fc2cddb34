//! Engine lifetime and object creation
//!
//! A [`Context`] initializes the engine, applies an [`EngineConfig`] and
//! owns the type registry. Everything created through it borrows it, so no
//! container, operator or cursor can outlive the engine. Dropping the
//! context finalizes the engine.

use grb_core::{
    BinaryFn, BuiltinOp, Descriptor, Domain, Element, Engine, GlobalOption, GrbError, HasRaw,
    Info, Result, UnaryFn,
};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::matrix::Matrix;
use crate::ops::{Operator, UserOp};
use crate::registry::{TypeRegistry, UserDomain};
use crate::status;
use crate::vector::Vector;

/// An initialized engine
#[derive(Debug)]
pub struct Context<E: Engine> {
    engine: E,
    config: EngineConfig,
    registry: TypeRegistry<E::Type>,
}

impl<E: Engine> Context<E> {
    /// Initialize `engine` and apply `config`
    pub fn init(engine: E, config: EngineConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejecting engine config");
            return Err(GrbError::InvalidValue);
        }
        status::ok(engine.init(config.mode), "init")?;
        for option in config.global_options() {
            if let Err(err) = status::ok(engine.set_global_option(option), "set_global_option") {
                let _ = engine.finalize();
                return Err(err);
            }
        }
        let registry = TypeRegistry::with_builtins(&engine);
        info!(engine = engine.name(), mode = ?config.mode, nthreads = config.nthreads, "engine initialized");
        Ok(Self {
            engine,
            config,
            registry,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry<E::Type> {
        &self.registry
    }

    pub fn set_option(&self, option: GlobalOption) -> Result<()> {
        status::ok(self.engine.set_global_option(option), "set_global_option")
    }

    /// Engine type of `domain`, if built in or registered
    pub fn type_handle(&self, domain: Domain) -> Option<E::Type> {
        self.registry.resolve(domain)
    }

    pub(crate) fn require_type(&self, domain: Domain) -> Result<E::Type> {
        self.registry.resolve(domain).ok_or(GrbError::UninitializedObject)
    }

    pub fn register_type(&self, user: &UserDomain) -> Result<E::Type> {
        self.registry.register(&self.engine, user)
    }

    /// Register the user domain of a `Pod` element type
    pub fn register<T: Element + bytemuck::Pod>(&self) -> Result<E::Type> {
        match T::DOMAIN {
            Domain::User(name) => self.register_type(&UserDomain::pod::<T>(name)),
            _ => Err(GrbError::AlreadySet),
        }
    }

    pub fn release_type(&self, domain: Domain) -> Result<()> {
        self.registry.release(&self.engine, domain)
    }

    /// Engine handle of a built-in operator
    pub fn operator(&self, op: BuiltinOp) -> Operator<E::Op> {
        Operator::new(self.engine.builtin_op(op), op)
    }

    /// User-defined `z = f(x)`
    pub fn unary_op<Z: Element, X: Element>(&self, f: UnaryFn, name: &str) -> Result<UserOp<'_, E>> {
        let output = self.require_type(Z::DOMAIN)?;
        let input = self.require_type(X::DOMAIN)?;
        let handle = status::value(self.engine.unary_op_new(f, output, input, name), "unary_op_new")?;
        Ok(UserOp::new(&self.engine, handle, name, Z::DOMAIN, vec![X::DOMAIN]))
    }

    /// User-defined `z = f(x, y)`
    pub fn binary_op<Z: Element, X: Element, Y: Element>(&self, f: BinaryFn, name: &str) -> Result<UserOp<'_, E>> {
        let output = self.require_type(Z::DOMAIN)?;
        let left = self.require_type(X::DOMAIN)?;
        let right = self.require_type(Y::DOMAIN)?;
        let handle = status::value(
            self.engine.binary_op_new(f, output, left, right, name),
            "binary_op_new",
        )?;
        Ok(UserOp::new(&self.engine, handle, name, Z::DOMAIN, vec![X::DOMAIN, Y::DOMAIN]))
    }

    pub fn descriptor(&self, desc: &Descriptor) -> Result<Desc<'_, E>> {
        let handle = status::value(self.engine.descriptor_new(desc), "descriptor_new")?;
        Ok(Desc {
            engine: &self.engine,
            handle,
            settings: *desc,
        })
    }

    pub fn matrix<T: Element>(&self, nrows: u64, ncols: u64) -> Result<Matrix<'_, T, E>> {
        Matrix::new(self, nrows, ncols)
    }

    pub fn vector<T: Element>(&self, size: u64) -> Result<Vector<'_, T, E>> {
        Vector::new(self, size)
    }
}

impl<E: Engine> Drop for Context<E> {
    fn drop(&mut self) {
        match self.engine.finalize() {
            Info::Success => debug!(engine = self.engine.name(), "engine finalized"),
            info => warn!(%info, "engine finalize failed"),
        }
    }
}

/// An engine descriptor, freed on drop
#[derive(Debug)]
pub struct Desc<'ctx, E: Engine> {
    engine: &'ctx E,
    handle: E::Descriptor,
    settings: Descriptor,
}

impl<'ctx, E: Engine> Desc<'ctx, E> {
    pub fn settings(&self) -> &Descriptor {
        &self.settings
    }
}

impl<'ctx, E: Engine> HasRaw for Desc<'ctx, E> {
    type Raw = E::Descriptor;

    fn raw(&self) -> E::Descriptor {
        self.handle
    }
}

impl<'ctx, E: Engine> Drop for Desc<'ctx, E> {
    fn drop(&mut self) {
        let _ = self.engine.descriptor_free(self.handle);
    }
}
