//! Element domain to engine type mapping
//!
//! Built-in domains are resolved once when the registry is created and
//! never change. User domains are added by [`TypeRegistry::register`] and
//! removed by [`TypeRegistry::release`]; both directions of the mapping are
//! kept in step under one lock.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use grb_core::{Domain, Engine, GrbError, RawHandle, Result};
use hashbrown::HashMap;
use tracing::{debug, info};

use crate::status;

/// Shape of one field of a user domain
///
/// Values of a registered domain are copied byte for byte into engine
/// memory, so a domain may not contain references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain bytes
    Scalar(usize),
    /// A pointer or reference to host memory
    Reference,
    /// A nested struct
    Struct(Vec<FieldKind>),
}

impl FieldKind {
    pub fn contains_reference(&self) -> bool {
        match self {
            FieldKind::Scalar(_) => false,
            FieldKind::Reference => true,
            FieldKind::Struct(fields) => fields.iter().any(FieldKind::contains_reference),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            FieldKind::Scalar(size) => *size,
            FieldKind::Reference => std::mem::size_of::<usize>(),
            FieldKind::Struct(fields) => fields.iter().map(FieldKind::size).sum(),
        }
    }
}

/// Layout of a user-defined element domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDomain {
    pub name: &'static str,
    /// In-memory size including padding
    pub size: usize,
    pub fields: Vec<FieldKind>,
}

impl UserDomain {
    /// An opaque domain of `size` plain bytes
    pub fn new(name: &'static str, size: usize) -> Self {
        Self {
            name,
            size,
            fields: vec![FieldKind::Scalar(size)],
        }
    }

    /// A struct domain; the size is the sum of the field sizes
    pub fn with_fields(name: &'static str, fields: Vec<FieldKind>) -> Self {
        let size = fields.iter().map(FieldKind::size).sum();
        Self { name, size, fields }
    }

    /// Domain of a `Pod` type, which cannot contain references
    pub fn pod<T: bytemuck::Pod>(name: &'static str) -> Self {
        Self::new(name, std::mem::size_of::<T>())
    }

    pub fn domain(&self) -> Domain {
        Domain::User(self.name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(GrbError::InvalidValue);
        }
        if self.fields.iter().any(FieldKind::contains_reference) {
            return Err(GrbError::InvalidValue);
        }
        if self.fields.iter().map(FieldKind::size).sum::<usize>() > self.size {
            return Err(GrbError::InvalidValue);
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Maps<H> {
    forward: HashMap<Domain, H>,
    reverse: HashMap<H, Domain>,
}

/// Bidirectional domain/handle mapping for one context
#[derive(Debug)]
pub struct TypeRegistry<H> {
    maps: RwLock<Maps<H>>,
}

impl<H: RawHandle> TypeRegistry<H> {
    /// Registry holding every built-in domain of `engine`
    pub fn with_builtins<E: Engine<Type = H>>(engine: &E) -> Self {
        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();
        for domain in Domain::BUILTIN {
            let handle = engine.builtin_type(domain);
            forward.insert(domain, handle);
            reverse.insert(handle, domain);
        }
        Self {
            maps: RwLock::new(Maps { forward, reverse }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Maps<H>> {
        self.maps.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Maps<H>> {
        self.maps.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Engine handle for `domain`
    ///
    /// Native-width domains resolve to the handle of their concrete
    /// fixed-width domain.
    pub fn resolve(&self, domain: Domain) -> Option<H> {
        self.read().forward.get(&domain.canonical()).copied()
    }

    /// Domain a handle was registered for
    pub fn resolve_domain(&self, handle: H) -> Option<Domain> {
        self.read().reverse.get(&handle).copied()
    }

    pub fn contains(&self, domain: Domain) -> bool {
        self.resolve(domain).is_some()
    }

    /// Registered domains, built-ins included
    pub fn len(&self) -> usize {
        self.read().forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create the engine type for a user domain
    pub fn register<E: Engine<Type = H>>(&self, engine: &E, user: &UserDomain) -> Result<H> {
        user.validate()?;
        let domain = user.domain();
        let mut maps = self.write();
        if maps.forward.contains_key(&domain) {
            return Err(GrbError::AlreadySet);
        }
        let handle = status::value(engine.type_new(user.size, user.name), "type_new")?;
        maps.forward.insert(domain, handle);
        maps.reverse.insert(handle, domain);
        info!(name = user.name, size = user.size, "registered user domain");
        Ok(handle)
    }

    /// Free the engine type of a user domain and forget it
    ///
    /// The mapping is only dropped once the engine has freed the type.
    ///
    /// # Panics
    ///
    /// Panics when `domain` is built in.
    pub fn release<E: Engine<Type = H>>(&self, engine: &E, domain: Domain) -> Result<()> {
        assert!(!domain.is_builtin(), "cannot release built-in domain {domain}");
        let mut maps = self.write();
        let handle = *maps.forward.get(&domain).ok_or(GrbError::UninitializedObject)?;
        status::ok(engine.type_free(handle), "type_free")?;
        maps.forward.remove(&domain);
        maps.reverse.remove(&handle);
        debug!(%domain, "released user domain");
        Ok(())
    }
}
