//! In-process reference engine
//!
//! A small, single-process GraphBLAS used for tests, examples and hosts
//! without a native library. Objects live in handle tables behind one
//! mutex; containers keep a materialized [`Storage`] plus a list of pending
//! element updates that is folded in on the next read.
//!
//! Only the subset of the engine surface the binding exercises is
//! evaluated. Operators resolve for every family, but applying a family
//! without a kernel reports `NotImplemented`. Domains must match exactly:
//! the engine never typecasts.

mod iterator;
mod kernels;
mod storage;

pub use iterator::RefIterator;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use grb_core::{
    BinaryFn, BuiltinOp, CursorKind, Descriptor, Domain, Engine, EngineResult, Format,
    GlobalOption, IndexList, Info, Mode, Orientation, PackedMatrix, PackedVector, RawHandle,
    Sparsity, UnaryFn, WaitMode,
};
use hashbrown::HashMap;
use rayon::slice::ParallelSliceMut;
use tracing::{debug, trace};

use kernels::{Binary, Unary};
use storage::{Entries, Storage};

macro_rules! handle_type {
    ($($(#[$doc:meta])* $name:ident;)*) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Table key, `0` for the null handle
            pub const fn id(self) -> u64 {
                self.0
            }
        }

        impl RawHandle for $name {
            const NULL: Self = $name(0);
        }
    )*};
}

handle_type! {
    /// Type handle
    RefType;
    /// Operator handle
    RefOp;
    RefMatrix;
    RefVector;
    RefDescriptor;
}

/// Global options as last set on the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    pub mode: Mode,
    pub threads: i32,
    pub burble: bool,
    pub orientation: Orientation,
    pub hyper_switch: f64,
    pub bitmap_switch: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mode: Mode::NonBlocking,
            threads: 0,
            burble: false,
            orientation: Orientation::ByRow,
            hyper_switch: 0.0625,
            bitmap_switch: 0.04,
        }
    }
}

#[derive(Debug)]
struct TypeObj {
    /// `None` for user types
    domain: Option<Domain>,
    name: String,
    size: usize,
}

#[derive(Debug, Clone, Copy)]
enum OpObj {
    Builtin(BuiltinOp),
    Unary {
        f: UnaryFn,
        output: RefType,
        input: RefType,
    },
    Binary {
        f: BinaryFn,
        output: RefType,
        left: RefType,
        right: RefType,
    },
}

/// Types an operator reads and writes; `None` accepts anything
#[derive(Debug, Clone, Copy, Default)]
struct Signature {
    output: Option<RefType>,
    input: Option<RefType>,
    second: Option<RefType>,
}

#[derive(Debug)]
enum Pending {
    Set(u64, u64, Vec<u8>),
    Remove(u64, u64),
}

#[derive(Debug)]
struct Container {
    ty: RefType,
    size: usize,
    nrows: u64,
    ncols: u64,
    /// Requested format; storage may fall back from full to bitmap
    format: Format,
    storage: Arc<Storage>,
    pending: Vec<Pending>,
}

impl Container {
    fn materialize(&mut self) -> Result<Arc<Storage>, Info> {
        if !self.pending.is_empty() {
            let mut entries = self.storage.entries();
            for op in self.pending.drain(..) {
                match op {
                    Pending::Set(row, col, value) => {
                        entries.insert((row, col), value);
                    }
                    Pending::Remove(row, col) => {
                        entries.remove(&(row, col));
                    }
                }
            }
            self.store(&entries)?;
        }
        Ok(Arc::clone(&self.storage))
    }

    fn store(&mut self, entries: &Entries) -> Result<(), Info> {
        self.pending.clear();
        self.storage = Arc::new(Storage::from_entries(
            self.nrows, self.ncols, self.format, self.size, entries,
        )?);
        Ok(())
    }

    fn check_index(&self, row: u64, col: u64) -> Result<(), Info> {
        if row >= self.nrows || col >= self.ncols {
            return Err(Info::InvalidIndex);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct State {
    initialized: bool,
    options: EngineOptions,
    next_id: u64,
    types: HashMap<RefType, TypeObj>,
    builtin_types: HashMap<Domain, RefType>,
    ops: HashMap<RefOp, OpObj>,
    builtin_ops: HashMap<BuiltinOp, RefOp>,
    containers: HashMap<u64, Container>,
    descriptors: HashMap<RefDescriptor, Descriptor>,
}

/// Fold an internal result into a status
fn status(result: Result<(), Info>) -> Info {
    match result {
        Ok(()) => Info::Success,
        Err(info) => info,
    }
}

impl State {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn register_builtin_types(&mut self) {
        for domain in Domain::BUILTIN {
            let ty = RefType(self.alloc_id());
            self.types.insert(
                ty,
                TypeObj {
                    domain: Some(domain),
                    name: domain.type_symbol().unwrap_or_default().to_string(),
                    size: domain.size_bytes().unwrap_or_default(),
                },
            );
            self.builtin_types.insert(domain, ty);
        }
    }

    fn ensure_init(&self) -> Result<(), Info> {
        if self.initialized {
            Ok(())
        } else {
            Err(Info::UninitializedObject)
        }
    }

    fn type_obj(&self, ty: RefType) -> Result<&TypeObj, Info> {
        self.types.get(&ty).ok_or(Info::UninitializedObject)
    }

    fn builtin_type(&self, domain: Domain) -> Option<RefType> {
        self.builtin_types.get(&domain.canonical()).copied()
    }

    /// Whether values tagged `domain` belong to type `ty`
    fn type_matches(&self, ty: RefType, domain: Domain) -> bool {
        match self.types.get(&ty) {
            Some(obj) => match domain {
                Domain::User(name) => obj.domain.is_none() && obj.name == name,
                builtin => obj.domain == Some(builtin.canonical()),
            },
            None => false,
        }
    }

    fn container(&mut self, id: u64) -> Result<&mut Container, Info> {
        self.containers.get_mut(&id).ok_or(Info::UninitializedObject)
    }

    fn typed_container(&mut self, id: u64, domain: Domain) -> Result<&mut Container, Info> {
        let ty = self.containers.get(&id).ok_or(Info::UninitializedObject)?.ty;
        if !self.type_matches(ty, domain) {
            return Err(Info::DomainMismatch);
        }
        self.container(id)
    }

    fn descriptor(&self, desc: RefDescriptor) -> Result<Descriptor, Info> {
        if desc.is_null() {
            return Ok(Descriptor::default());
        }
        self.descriptors
            .get(&desc)
            .copied()
            .ok_or(Info::UninitializedObject)
    }

    fn intern_op(&mut self, op: BuiltinOp) -> RefOp {
        if let Some(handle) = self.builtin_ops.get(&op) {
            return *handle;
        }
        let handle = RefOp(self.alloc_id());
        self.ops.insert(handle, OpObj::Builtin(op));
        self.builtin_ops.insert(op, handle);
        handle
    }

    fn builtin_signature(&self, op: BuiltinOp) -> Signature {
        let lookup = |d: Option<Domain>| d.and_then(|d| self.builtin_type(d));
        Signature {
            output: lookup(op.output()),
            input: lookup(op.input()),
            second: lookup(op.second_input()),
        }
    }

    fn unary(&self, op: RefOp) -> Result<(Unary, Signature), Info> {
        match self.ops.get(&op).ok_or(Info::UninitializedObject)? {
            OpObj::Builtin(builtin) => Ok((kernels::unary(*builtin)?, self.builtin_signature(*builtin))),
            OpObj::Unary { f, output, input } => Ok((
                Unary::User(*f),
                Signature {
                    output: Some(*output),
                    input: Some(*input),
                    second: None,
                },
            )),
            OpObj::Binary { .. } => Err(Info::DomainMismatch),
        }
    }

    fn binary(&self, op: RefOp) -> Result<(Binary, Signature), Info> {
        match self.ops.get(&op).ok_or(Info::UninitializedObject)? {
            OpObj::Builtin(builtin) => Ok((kernels::binary(*builtin)?, self.builtin_signature(*builtin))),
            OpObj::Binary {
                f,
                output,
                left,
                right,
            } => Ok((
                Binary::User(*f),
                Signature {
                    output: Some(*output),
                    input: Some(*left),
                    second: Some(*right),
                },
            )),
            OpObj::Unary { .. } => Err(Info::DomainMismatch),
        }
    }

    fn new_container(&mut self, ty: RefType, nrows: u64, ncols: u64, format: Format) -> Result<u64, Info> {
        self.ensure_init()?;
        let size = self.type_obj(ty)?.size;
        if nrows > grb_core::INDEX_MAX + 1 || ncols > grb_core::INDEX_MAX + 1 {
            return Err(Info::InvalidValue);
        }
        let storage = Storage::empty(nrows, ncols, Format::new(Sparsity::Sparse, format.orientation), size)?;
        let id = self.alloc_id();
        self.containers.insert(
            id,
            Container {
                ty,
                size,
                nrows,
                ncols,
                format,
                storage: Arc::new(storage),
                pending: Vec::new(),
            },
        );
        Ok(id)
    }

    fn free_container(&mut self, id: u64) -> Info {
        match self.containers.remove(&id) {
            Some(_) => Info::Success,
            None => Info::UninitializedObject,
        }
    }

    fn set_element(&mut self, id: u64, domain: Domain, value: &[u8], row: u64, col: u64) -> Result<(), Info> {
        let c = self.typed_container(id, domain)?;
        c.check_index(row, col)?;
        if value.len() != c.size {
            return Err(Info::InvalidValue);
        }
        c.pending.push(Pending::Set(row, col, value.to_vec()));
        Ok(())
    }

    fn extract_element(&mut self, id: u64, domain: Domain, out: &mut [u8], row: u64, col: u64) -> Result<(), Info> {
        let c = self.typed_container(id, domain)?;
        c.check_index(row, col)?;
        if out.len() != c.size {
            return Err(Info::InvalidValue);
        }
        let storage = c.materialize()?;
        let value = storage.get(row, col).ok_or(Info::NoValue)?;
        out.copy_from_slice(value);
        Ok(())
    }

    fn remove_element(&mut self, id: u64, row: u64, col: u64) -> Result<(), Info> {
        let c = self.container(id)?;
        c.check_index(row, col)?;
        c.pending.push(Pending::Remove(row, col));
        Ok(())
    }

    fn build(
        &mut self,
        id: u64,
        domain: Domain,
        rows: &[u64],
        cols: &[u64],
        values: &[u8],
        dup: RefOp,
    ) -> Result<(), Info> {
        let dup = if dup.is_null() { None } else { Some(self.binary(dup)?) };
        let ty = self.typed_container(id, domain)?.ty;
        if let Some((_, sig)) = &dup {
            for t in [sig.output, sig.input, sig.second].into_iter().flatten() {
                if t != ty {
                    return Err(Info::DomainMismatch);
                }
            }
        }

        let c = self.container(id)?;
        if c.materialize()?.nvals() != 0 {
            return Err(Info::OutputNotEmpty);
        }
        let n = rows.len();
        if cols.len() != n || values.len() != n * c.size {
            return Err(Info::InvalidValue);
        }
        if rows.iter().any(|r| *r >= c.nrows) || cols.iter().any(|col| *col >= c.ncols) {
            return Err(Info::InvalidIndex);
        }

        // stable: duplicates keep their input order
        let mut order: Vec<usize> = (0..n).collect();
        order.par_sort_by_key(|k| (rows[*k], cols[*k]));

        let size = c.size;
        let mut entries = Entries::new();
        for k in order {
            let value = &values[k * size..(k + 1) * size];
            match entries.get_mut(&(rows[k], cols[k])) {
                Some(acc) => {
                    let (kernel, _) = dup.as_ref().ok_or(Info::InvalidValue)?;
                    let mut z = vec![0u8; size];
                    kernel.eval(acc, value, &mut z);
                    *acc = z;
                }
                None => {
                    entries.insert((rows[k], cols[k]), value.to_vec());
                }
            }
        }
        debug!(nvals = entries.len(), tuples = n, "built container");
        c.store(&entries)
    }

    fn set_format(&mut self, id: u64, format: Format) -> Result<(), Info> {
        let c = self.container(id)?;
        let storage = c.materialize()?;
        c.storage = Arc::new(storage.convert(format)?);
        c.format = format;
        Ok(())
    }

    fn clear(&mut self, id: u64) -> Result<(), Info> {
        self.container(id)?.store(&Entries::new())
    }

    /// Storage of `id` with `transpose` applied, plus its type
    fn input(&mut self, id: u64, transpose: bool) -> Result<(RefType, u64, u64, Entries), Info> {
        let c = self.container(id)?;
        let storage = c.materialize()?;
        let mut entries = Entries::new();
        storage.for_each(|row, col, value| {
            let key = if transpose { (col, row) } else { (row, col) };
            entries.insert(key, value.to_vec());
        });
        let (nrows, ncols) = if transpose { (c.ncols, c.nrows) } else { (c.nrows, c.ncols) };
        Ok((c.ty, nrows, ncols, entries))
    }

    fn apply(
        &mut self,
        out: u64,
        mask: u64,
        accum: RefOp,
        op: RefOp,
        input: u64,
        desc: Descriptor,
    ) -> Result<(), Info> {
        let (kernel, sig) = self.unary(op)?;
        let (a_ty, nrows, ncols, a) = self.input(input, desc.transpose_first)?;
        if sig.input.is_some_and(|t| t != a_ty) {
            return Err(Info::DomainMismatch);
        }
        let t_ty = sig.output.unwrap_or(a_ty);
        let t_size = self.type_obj(t_ty)?.size;

        let mut t = Entries::new();
        for ((row, col), x) in &a {
            let mut z = vec![0u8; t_size];
            kernel.eval(*row, *col, x, &mut z);
            t.insert((*row, *col), z);
        }
        self.write(out, mask, accum, (nrows, ncols), t_ty, t, desc)
    }

    #[allow(clippy::too_many_arguments)]
    fn extract(
        &mut self,
        out: u64,
        mask: u64,
        accum: RefOp,
        input: u64,
        rows: &IndexList,
        cols: &IndexList,
        desc: Descriptor,
    ) -> Result<(), Info> {
        let (a_ty, nrows, ncols, a) = self.input(input, desc.transpose_first)?;
        let ni = rows.len_in(nrows);
        let nj = cols.len_in(ncols);
        let row_map = inverse(rows, nrows)?;
        let col_map = inverse(cols, ncols)?;

        let mut t = Entries::new();
        for ((row, col), value) in &a {
            for ki in targets(&row_map, *row) {
                for kj in targets(&col_map, *col) {
                    t.insert((ki, kj), value.clone());
                }
            }
        }
        self.write(out, mask, accum, (ni, nj), a_ty, t, desc)
    }

    /// `C<M> = accum(C, T)`, honoring the descriptor's mask and replace flags
    #[allow(clippy::too_many_arguments)]
    fn write(
        &mut self,
        out: u64,
        mask: u64,
        accum: RefOp,
        dims: (u64, u64),
        t_ty: RefType,
        t: Entries,
        desc: Descriptor,
    ) -> Result<(), Info> {
        let accum = if accum.is_null() { None } else { Some(self.binary(accum)?) };
        let mask = if mask == 0 {
            None
        } else {
            let m = self.container(mask)?;
            if (m.nrows, m.ncols) != dims {
                return Err(Info::DimensionMismatch);
            }
            Some(m.materialize()?)
        };

        let c = self.container(out)?;
        if (c.nrows, c.ncols) != dims {
            return Err(Info::DimensionMismatch);
        }
        let c_ty = c.ty;
        let c_size = c.size;
        let existing = c.materialize()?.entries();

        let z = match accum {
            None => {
                if t_ty != c_ty {
                    return Err(Info::DomainMismatch);
                }
                t
            }
            Some((kernel, sig)) => {
                let expected = [(sig.output, c_ty), (sig.input, c_ty), (sig.second, t_ty)];
                if expected.iter().any(|(got, want)| got.is_some_and(|g| g != *want)) || t_ty != c_ty {
                    return Err(Info::DomainMismatch);
                }
                let mut z = existing.clone();
                for (key, y) in t {
                    match z.get_mut(&key) {
                        Some(x) => {
                            let mut out = vec![0u8; c_size];
                            kernel.eval(x, &y, &mut out);
                            *x = out;
                        }
                        None => {
                            z.insert(key, y);
                        }
                    }
                }
                z
            }
        };

        let allowed = |row: u64, col: u64| -> bool {
            let hit = match &mask {
                None => true,
                Some(m) => match m.get(row, col) {
                    Some(value) => desc.mask.is_structural() || value.iter().any(|b| *b != 0),
                    None => false,
                },
            };
            hit != desc.mask.is_complemented()
        };

        let mut result = Entries::new();
        for ((row, col), value) in z.iter() {
            if allowed(*row, *col) {
                result.insert((*row, *col), value.clone());
            }
        }
        if !desc.replace {
            for ((row, col), value) in existing {
                if !allowed(row, col) {
                    result.insert((row, col), value);
                }
            }
        }
        trace!(nvals = result.len(), "wrote output");
        self.container(out)?.store(&result)
    }

    fn pack(&mut self, id: u64, packed: &mut PackedMatrix) -> Result<(), Info> {
        let c = self.typed_container(id, packed.domain)?;
        if packed.value_size != c.size {
            return Err(Info::DomainMismatch);
        }
        if (packed.nrows, packed.ncols) != (c.nrows, c.ncols) {
            return Err(Info::DimensionMismatch);
        }
        packed.validate()?;
        let storage = Storage::from_packed(packed.take())?;
        c.format = packed.format;
        c.pending.clear();
        c.storage = Arc::new(storage);
        Ok(())
    }

    fn unpack(&mut self, id: u64, domain: Domain, format: Format) -> Result<PackedMatrix, Info> {
        let c = self.typed_container(id, domain)?;
        let storage = c.materialize()?;
        let packed = (*storage).clone().into_packed(format, domain)?;
        c.format = Format::new(Sparsity::Sparse, format.orientation);
        c.store(&Entries::new())?;
        Ok(packed)
    }
}

/// Map from an input index to the output positions selecting it;
/// `None` selects everything in place
fn inverse(list: &IndexList, dim: u64) -> Result<Option<HashMap<u64, Vec<u64>>>, Info> {
    match list {
        IndexList::All => Ok(None),
        IndexList::List(indices) => {
            let mut map: HashMap<u64, Vec<u64>> = HashMap::new();
            for (k, index) in indices.iter().enumerate() {
                if *index >= dim {
                    return Err(Info::InvalidIndex);
                }
                map.entry(*index).or_default().push(k as u64);
            }
            Ok(Some(map))
        }
    }
}

fn targets(map: &Option<HashMap<u64, Vec<u64>>>, index: u64) -> Vec<u64> {
    match map {
        None => vec![index],
        Some(map) => map.get(&index).cloned().unwrap_or_default(),
    }
}

fn to_vector(packed: PackedMatrix) -> PackedVector {
    let sparsity = packed.format.sparsity;
    PackedVector {
        sparsity,
        size: packed.nrows,
        indices: packed.indices,
        bitmap: packed.bitmap,
        values: packed.values,
        domain: packed.domain,
        value_size: packed.value_size,
        jumbled: packed.jumbled,
    }
}

fn to_matrix(packed: PackedVector) -> PackedMatrix {
    let pointers = match packed.sparsity {
        Sparsity::Sparse => vec![0, packed.indices.len() as u64],
        _ => Vec::new(),
    };
    PackedMatrix {
        format: Format::new(packed.sparsity, Orientation::ByCol),
        nrows: packed.size,
        ncols: 1,
        pointers,
        hyper: Vec::new(),
        indices: packed.indices,
        bitmap: packed.bitmap,
        values: packed.values,
        domain: packed.domain,
        value_size: packed.value_size,
        jumbled: packed.jumbled,
    }
}

/// The in-process engine
#[derive(Debug)]
pub struct ReferenceEngine {
    state: Mutex<State>,
    live_iterators: AtomicUsize,
}

impl Default for ReferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceEngine {
    pub fn new() -> Self {
        let mut state = State::default();
        state.register_builtin_types();
        Self {
            state: Mutex::new(state),
            live_iterators: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Global options as last set
    pub fn options(&self) -> EngineOptions {
        self.lock().options
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// User types, user operators, containers and descriptors still alive
    pub fn live_objects(&self) -> usize {
        let state = self.lock();
        let user_types = state.types.values().filter(|t| t.domain.is_none()).count();
        let user_ops = state
            .ops
            .values()
            .filter(|op| !matches!(op, OpObj::Builtin(_)))
            .count();
        user_types + user_ops + state.containers.len() + state.descriptors.len()
    }

    /// Iterators attached and not yet freed
    pub fn live_iterators(&self) -> usize {
        self.live_iterators.load(Ordering::Relaxed)
    }

    fn attach(&self, storage: Arc<Storage>) -> RefIterator {
        self.live_iterators.fetch_add(1, Ordering::Relaxed);
        RefIterator::new(storage)
    }
}

impl Engine for ReferenceEngine {
    type Type = RefType;
    type Op = RefOp;
    type Matrix = RefMatrix;
    type Vector = RefVector;
    type Descriptor = RefDescriptor;
    type Iterator = RefIterator;

    fn name(&self) -> &'static str {
        "reference"
    }

    fn init(&self, mode: Mode) -> Info {
        let mut state = self.lock();
        if state.initialized {
            return Info::InvalidValue;
        }
        state.initialized = true;
        state.options.mode = mode;
        debug!(?mode, "reference engine initialized");
        Info::Success
    }

    fn finalize(&self) -> Info {
        let mut state = self.lock();
        state.initialized = false;
        state.containers.clear();
        state.descriptors.clear();
        state.types.retain(|_, t| t.domain.is_some());
        state.ops.retain(|_, op| matches!(op, OpObj::Builtin(_)));
        debug!("reference engine finalized");
        Info::Success
    }

    fn set_global_option(&self, option: GlobalOption) -> Info {
        let mut state = self.lock();
        match option {
            GlobalOption::Threads(n) if n < 0 => return Info::InvalidValue,
            GlobalOption::Threads(n) => state.options.threads = n,
            GlobalOption::Burble(on) => state.options.burble = on,
            GlobalOption::Orientation(o) => state.options.orientation = o,
            GlobalOption::HyperSwitch(v) => state.options.hyper_switch = v,
            GlobalOption::BitmapSwitch(v) => state.options.bitmap_switch = v,
        }
        Info::Success
    }

    fn builtin_type(&self, domain: Domain) -> RefType {
        self.lock().builtin_type(domain).unwrap_or(RefType::NULL)
    }

    fn type_new(&self, size: usize, name: &str) -> EngineResult<RefType> {
        let mut state = self.lock();
        state.ensure_init()?;
        if size == 0 {
            return Err(Info::InvalidValue);
        }
        let ty = RefType(state.alloc_id());
        state.types.insert(
            ty,
            TypeObj {
                domain: None,
                name: name.to_string(),
                size,
            },
        );
        Ok(ty)
    }

    fn type_free(&self, ty: RefType) -> Info {
        let mut state = self.lock();
        match state.types.get(&ty) {
            Some(t) if t.domain.is_some() => Info::Success,
            Some(_) => {
                state.types.remove(&ty);
                Info::Success
            }
            None => Info::UninitializedObject,
        }
    }

    fn builtin_op(&self, op: BuiltinOp) -> RefOp {
        self.lock().intern_op(op)
    }

    fn unary_op_new(&self, f: UnaryFn, output: RefType, input: RefType, _name: &str) -> EngineResult<RefOp> {
        let mut state = self.lock();
        state.ensure_init()?;
        state.type_obj(output)?;
        state.type_obj(input)?;
        let op = RefOp(state.alloc_id());
        state.ops.insert(op, OpObj::Unary { f, output, input });
        Ok(op)
    }

    fn binary_op_new(
        &self,
        f: BinaryFn,
        output: RefType,
        left: RefType,
        right: RefType,
        _name: &str,
    ) -> EngineResult<RefOp> {
        let mut state = self.lock();
        state.ensure_init()?;
        for ty in [output, left, right] {
            state.type_obj(ty)?;
        }
        let op = RefOp(state.alloc_id());
        state.ops.insert(
            op,
            OpObj::Binary {
                f,
                output,
                left,
                right,
            },
        );
        Ok(op)
    }

    fn op_free(&self, op: RefOp) -> Info {
        let mut state = self.lock();
        match state.ops.get(&op) {
            Some(OpObj::Builtin(_)) => Info::Success,
            Some(_) => {
                state.ops.remove(&op);
                Info::Success
            }
            None => Info::UninitializedObject,
        }
    }

    fn descriptor_new(&self, desc: &Descriptor) -> EngineResult<RefDescriptor> {
        let mut state = self.lock();
        state.ensure_init()?;
        let handle = RefDescriptor(state.alloc_id());
        state.descriptors.insert(handle, *desc);
        Ok(handle)
    }

    fn descriptor_free(&self, desc: RefDescriptor) -> Info {
        match self.lock().descriptors.remove(&desc) {
            Some(_) => Info::Success,
            None => Info::UninitializedObject,
        }
    }

    fn matrix_new(&self, ty: RefType, nrows: u64, ncols: u64) -> EngineResult<RefMatrix> {
        let mut state = self.lock();
        let format = Format::new(Sparsity::Sparse, state.options.orientation);
        state.new_container(ty, nrows, ncols, format).map(RefMatrix)
    }

    fn matrix_free(&self, m: RefMatrix) -> Info {
        self.lock().free_container(m.0)
    }

    fn matrix_dims(&self, m: RefMatrix) -> EngineResult<(u64, u64)> {
        let mut state = self.lock();
        let c = state.container(m.0)?;
        Ok((c.nrows, c.ncols))
    }

    fn matrix_nvals(&self, m: RefMatrix) -> EngineResult<u64> {
        Ok(self.lock().container(m.0)?.materialize()?.nvals())
    }

    fn matrix_format(&self, m: RefMatrix) -> EngineResult<Format> {
        Ok(self.lock().container(m.0)?.materialize()?.format())
    }

    fn matrix_set_format(&self, m: RefMatrix, format: Format) -> Info {
        status(self.lock().set_format(m.0, format))
    }

    fn matrix_set_element(&self, m: RefMatrix, domain: Domain, value: &[u8], row: u64, col: u64) -> Info {
        status(self.lock().set_element(m.0, domain, value, row, col))
    }

    fn matrix_extract_element(&self, m: RefMatrix, domain: Domain, out: &mut [u8], row: u64, col: u64) -> Info {
        status(self.lock().extract_element(m.0, domain, out, row, col))
    }

    fn matrix_remove_element(&self, m: RefMatrix, row: u64, col: u64) -> Info {
        status(self.lock().remove_element(m.0, row, col))
    }

    fn matrix_build(
        &self,
        m: RefMatrix,
        domain: Domain,
        rows: &[u64],
        cols: &[u64],
        values: &[u8],
        dup: RefOp,
    ) -> Info {
        status(self.lock().build(m.0, domain, rows, cols, values, dup))
    }

    fn matrix_clear(&self, m: RefMatrix) -> Info {
        status(self.lock().clear(m.0))
    }

    fn matrix_wait(&self, m: RefMatrix, _mode: WaitMode) -> Info {
        status(self.lock().container(m.0).and_then(|c| c.materialize()).map(drop))
    }

    fn matrix_apply(
        &self,
        out: RefMatrix,
        mask: RefMatrix,
        accum: RefOp,
        op: RefOp,
        input: RefMatrix,
        desc: RefDescriptor,
    ) -> Info {
        let mut state = self.lock();
        status(
            state
                .descriptor(desc)
                .and_then(|desc| state.apply(out.0, mask.0, accum, op, input.0, desc)),
        )
    }

    fn matrix_extract(
        &self,
        out: RefMatrix,
        mask: RefMatrix,
        accum: RefOp,
        input: RefMatrix,
        rows: &IndexList,
        cols: &IndexList,
        desc: RefDescriptor,
    ) -> Info {
        let mut state = self.lock();
        status(
            state
                .descriptor(desc)
                .and_then(|desc| state.extract(out.0, mask.0, accum, input.0, rows, cols, desc)),
        )
    }

    fn matrix_pack(&self, m: RefMatrix, packed: &mut PackedMatrix) -> Info {
        status(self.lock().pack(m.0, packed))
    }

    fn matrix_unpack(&self, m: RefMatrix, domain: Domain, format: Format) -> EngineResult<PackedMatrix> {
        self.lock().unpack(m.0, domain, format)
    }

    fn vector_new(&self, ty: RefType, size: u64) -> EngineResult<RefVector> {
        self.lock().new_container(ty, size, 1, Format::CSC).map(RefVector)
    }

    fn vector_free(&self, v: RefVector) -> Info {
        self.lock().free_container(v.0)
    }

    fn vector_size(&self, v: RefVector) -> EngineResult<u64> {
        Ok(self.lock().container(v.0)?.nrows)
    }

    fn vector_nvals(&self, v: RefVector) -> EngineResult<u64> {
        Ok(self.lock().container(v.0)?.materialize()?.nvals())
    }

    fn vector_set_element(&self, v: RefVector, domain: Domain, value: &[u8], index: u64) -> Info {
        status(self.lock().set_element(v.0, domain, value, index, 0))
    }

    fn vector_extract_element(&self, v: RefVector, domain: Domain, out: &mut [u8], index: u64) -> Info {
        status(self.lock().extract_element(v.0, domain, out, index, 0))
    }

    fn vector_remove_element(&self, v: RefVector, index: u64) -> Info {
        status(self.lock().remove_element(v.0, index, 0))
    }

    fn vector_build(&self, v: RefVector, domain: Domain, indices: &[u64], values: &[u8], dup: RefOp) -> Info {
        let cols = vec![0u64; indices.len()];
        status(self.lock().build(v.0, domain, indices, &cols, values, dup))
    }

    fn vector_clear(&self, v: RefVector) -> Info {
        status(self.lock().clear(v.0))
    }

    fn vector_wait(&self, v: RefVector, _mode: WaitMode) -> Info {
        status(self.lock().container(v.0).and_then(|c| c.materialize()).map(drop))
    }

    fn vector_apply(
        &self,
        out: RefVector,
        mask: RefVector,
        accum: RefOp,
        op: RefOp,
        input: RefVector,
        desc: RefDescriptor,
    ) -> Info {
        let mut state = self.lock();
        status(state.descriptor(desc).and_then(|desc| {
            let desc = Descriptor {
                transpose_first: false,
                transpose_second: false,
                ..desc
            };
            state.apply(out.0, mask.0, accum, op, input.0, desc)
        }))
    }

    fn vector_extract(
        &self,
        out: RefVector,
        mask: RefVector,
        accum: RefOp,
        input: RefVector,
        indices: &IndexList,
        desc: RefDescriptor,
    ) -> Info {
        let mut state = self.lock();
        status(state.descriptor(desc).and_then(|desc| {
            let desc = Descriptor {
                transpose_first: false,
                transpose_second: false,
                ..desc
            };
            state.extract(out.0, mask.0, accum, input.0, indices, &IndexList::All, desc)
        }))
    }

    fn vector_pack(&self, v: RefVector, packed: &mut PackedVector) -> Info {
        if packed.sparsity == Sparsity::Hypersparse {
            return Info::InvalidValue;
        }
        if let Err(info) = packed.validate() {
            return info;
        }
        let mut state = self.lock();
        let size = match state.container(v.0) {
            Ok(c) => c.nrows,
            Err(info) => return info,
        };
        if packed.size != size {
            return Info::DimensionMismatch;
        }
        let mut matrix = to_matrix(packed.take());
        let result = state.pack(v.0, &mut matrix);
        if result.is_err() {
            // hand the buffers back untouched
            *packed = to_vector(matrix);
        }
        status(result)
    }

    fn vector_unpack(&self, v: RefVector, domain: Domain, sparsity: Sparsity) -> EngineResult<PackedVector> {
        if sparsity == Sparsity::Hypersparse {
            return Err(Info::InvalidValue);
        }
        let packed = self
            .lock()
            .unpack(v.0, domain, Format::new(sparsity, Orientation::ByCol))?;
        Ok(to_vector(packed))
    }

    fn matrix_iterator(&self, m: RefMatrix, kind: CursorKind) -> EngineResult<RefIterator> {
        let storage = self.lock().container(m.0)?.materialize()?;
        match (kind, storage.orientation) {
            (CursorKind::Row, Orientation::ByCol) | (CursorKind::Col, Orientation::ByRow) => {
                Err(Info::NotImplemented)
            }
            (CursorKind::VectorEntry, _) => Err(Info::InvalidValue),
            _ => Ok(self.attach(storage)),
        }
    }

    fn vector_iterator(&self, v: RefVector) -> EngineResult<RefIterator> {
        let storage = self.lock().container(v.0)?.materialize()?;
        Ok(self.attach(storage))
    }

    fn iterator_free(&self, _it: &mut RefIterator) {
        self.live_iterators.fetch_sub(1, Ordering::Relaxed);
    }

    fn iterator_kount(&self, it: &RefIterator, _kind: CursorKind) -> u64 {
        it.kount()
    }

    fn iterator_pmax(&self, it: &RefIterator, _kind: CursorKind) -> u64 {
        it.pmax()
    }

    fn iterator_seek(&self, it: &mut RefIterator, kind: CursorKind, target: u64) -> Info {
        if kind.is_nested() {
            it.seek_vector(target)
        } else {
            it.seek_entry(target)
        }
    }

    fn iterator_kseek(&self, it: &mut RefIterator, _kind: CursorKind, k: u64) -> Info {
        it.kseek(k)
    }

    fn iterator_next(&self, it: &mut RefIterator, kind: CursorKind) -> Info {
        if kind.is_nested() {
            it.next_vector()
        } else {
            it.next_entry()
        }
    }

    fn iterator_next_inner(&self, it: &mut RefIterator, kind: CursorKind) -> Info {
        if kind.is_nested() {
            it.next_inner()
        } else {
            Info::NotImplemented
        }
    }

    fn iterator_p(&self, it: &RefIterator, _kind: CursorKind) -> u64 {
        it.p()
    }

    fn iterator_outer(&self, it: &RefIterator, _kind: CursorKind) -> u64 {
        it.outer()
    }

    fn iterator_index(&self, it: &RefIterator, kind: CursorKind) -> (u64, u64) {
        it.index(kind)
    }

    fn iterator_value(&self, it: &RefIterator, _domain: Domain, out: &mut [u8]) {
        out.copy_from_slice(it.value());
    }
}
