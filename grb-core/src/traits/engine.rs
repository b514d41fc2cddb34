//! The foreign-function seam
//!
//! [`Engine`] is the complete surface the binding needs from a GraphBLAS
//! implementation. Values cross it type-erased, as byte slices tagged with a
//! [`Domain`]; picking the per-type native entry point from that tag is the
//! backend's job. Status-only calls return the raw [`Info`]; calls that
//! create something return it in the error position.

use core::ffi::c_void;

use super::cursor::CursorKind;
use super::handle::RawHandle;
use crate::descriptor::Descriptor;
use crate::error::Info;
use crate::format::{Domain, Format, Mode, Orientation, PackedMatrix, PackedVector, Sparsity, WaitMode};
use crate::marshal::IndexList;
use crate::ops::BuiltinOp;

/// Result of an engine call that produces a value
pub type EngineResult<T> = core::result::Result<T, Info>;

/// User-defined unary function: `z = f(x)`
pub type UnaryFn = unsafe extern "C" fn(z: *mut c_void, x: *const c_void);

/// User-defined binary function: `z = f(x, y)`
pub type BinaryFn = unsafe extern "C" fn(z: *mut c_void, x: *const c_void, y: *const c_void);

/// Process-wide engine option
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobalOption {
    /// Worker threads, 0 lets the engine decide
    Threads(i32),
    /// Diagnostic output from the engine
    Burble(bool),
    /// Orientation of newly created matrices
    Orientation(Orientation),
    HyperSwitch(f64),
    BitmapSwitch(f64),
}

/// A GraphBLAS implementation
pub trait Engine {
    type Type: RawHandle;
    type Op: RawHandle;
    type Matrix: RawHandle;
    type Vector: RawHandle;
    type Descriptor: RawHandle;
    /// Iterator state, owned by one cursor
    type Iterator;

    fn name(&self) -> &'static str;

    // lifecycle

    fn init(&self, mode: Mode) -> Info;
    fn finalize(&self) -> Info;
    fn set_global_option(&self, option: GlobalOption) -> Info;

    // types

    /// Handle of a built-in type; `NULL` for user domains
    fn builtin_type(&self, domain: Domain) -> Self::Type;
    fn type_new(&self, size: usize, name: &str) -> EngineResult<Self::Type>;
    fn type_free(&self, ty: Self::Type) -> Info;

    // operators

    fn builtin_op(&self, op: BuiltinOp) -> Self::Op;
    fn unary_op_new(
        &self,
        f: UnaryFn,
        output: Self::Type,
        input: Self::Type,
        name: &str,
    ) -> EngineResult<Self::Op>;
    fn binary_op_new(
        &self,
        f: BinaryFn,
        output: Self::Type,
        left: Self::Type,
        right: Self::Type,
        name: &str,
    ) -> EngineResult<Self::Op>;
    fn op_free(&self, op: Self::Op) -> Info;

    // descriptors

    fn descriptor_new(&self, desc: &Descriptor) -> EngineResult<Self::Descriptor>;
    fn descriptor_free(&self, desc: Self::Descriptor) -> Info;

    // matrices

    fn matrix_new(&self, ty: Self::Type, nrows: u64, ncols: u64) -> EngineResult<Self::Matrix>;
    fn matrix_free(&self, m: Self::Matrix) -> Info;
    fn matrix_dims(&self, m: Self::Matrix) -> EngineResult<(u64, u64)>;
    fn matrix_nvals(&self, m: Self::Matrix) -> EngineResult<u64>;
    fn matrix_format(&self, m: Self::Matrix) -> EngineResult<Format>;
    fn matrix_set_format(&self, m: Self::Matrix, format: Format) -> Info;
    fn matrix_set_element(&self, m: Self::Matrix, domain: Domain, value: &[u8], row: u64, col: u64) -> Info;
    /// `NoValue` when the entry is not present
    fn matrix_extract_element(
        &self,
        m: Self::Matrix,
        domain: Domain,
        out: &mut [u8],
        row: u64,
        col: u64,
    ) -> Info;
    fn matrix_remove_element(&self, m: Self::Matrix, row: u64, col: u64) -> Info;
    fn matrix_build(
        &self,
        m: Self::Matrix,
        domain: Domain,
        rows: &[u64],
        cols: &[u64],
        values: &[u8],
        dup: Self::Op,
    ) -> Info;
    fn matrix_clear(&self, m: Self::Matrix) -> Info;
    fn matrix_wait(&self, m: Self::Matrix, mode: WaitMode) -> Info;
    fn matrix_apply(
        &self,
        out: Self::Matrix,
        mask: Self::Matrix,
        accum: Self::Op,
        op: Self::Op,
        input: Self::Matrix,
        desc: Self::Descriptor,
    ) -> Info;
    #[allow(clippy::too_many_arguments)]
    fn matrix_extract(
        &self,
        out: Self::Matrix,
        mask: Self::Matrix,
        accum: Self::Op,
        input: Self::Matrix,
        rows: &IndexList,
        cols: &IndexList,
        desc: Self::Descriptor,
    ) -> Info;
    /// Move the buffers into `m`; on success they are left zero-length
    fn matrix_pack(&self, m: Self::Matrix, packed: &mut PackedMatrix) -> Info;
    /// Move the storage out of `m` in `format`, leaving it empty
    fn matrix_unpack(&self, m: Self::Matrix, domain: Domain, format: Format) -> EngineResult<PackedMatrix>;

    // vectors

    fn vector_new(&self, ty: Self::Type, size: u64) -> EngineResult<Self::Vector>;
    fn vector_free(&self, v: Self::Vector) -> Info;
    fn vector_size(&self, v: Self::Vector) -> EngineResult<u64>;
    fn vector_nvals(&self, v: Self::Vector) -> EngineResult<u64>;
    fn vector_set_element(&self, v: Self::Vector, domain: Domain, value: &[u8], index: u64) -> Info;
    fn vector_extract_element(&self, v: Self::Vector, domain: Domain, out: &mut [u8], index: u64) -> Info;
    fn vector_remove_element(&self, v: Self::Vector, index: u64) -> Info;
    fn vector_build(
        &self,
        v: Self::Vector,
        domain: Domain,
        indices: &[u64],
        values: &[u8],
        dup: Self::Op,
    ) -> Info;
    fn vector_clear(&self, v: Self::Vector) -> Info;
    fn vector_wait(&self, v: Self::Vector, mode: WaitMode) -> Info;
    fn vector_apply(
        &self,
        out: Self::Vector,
        mask: Self::Vector,
        accum: Self::Op,
        op: Self::Op,
        input: Self::Vector,
        desc: Self::Descriptor,
    ) -> Info;
    fn vector_extract(
        &self,
        out: Self::Vector,
        mask: Self::Vector,
        accum: Self::Op,
        input: Self::Vector,
        indices: &IndexList,
        desc: Self::Descriptor,
    ) -> Info;
    fn vector_pack(&self, v: Self::Vector, packed: &mut PackedVector) -> Info;
    fn vector_unpack(&self, v: Self::Vector, domain: Domain, sparsity: Sparsity) -> EngineResult<PackedVector>;

    // iterators

    /// Attach a row, column or entry iterator to a matrix
    fn matrix_iterator(&self, m: Self::Matrix, kind: CursorKind) -> EngineResult<Self::Iterator>;
    fn vector_iterator(&self, v: Self::Vector) -> EngineResult<Self::Iterator>;
    fn iterator_free(&self, it: &mut Self::Iterator);
    /// Number of outer vectors a row/column iterator can visit
    fn iterator_kount(&self, it: &Self::Iterator, kind: CursorKind) -> u64;
    /// Upper bound of linear positions for entry iterators
    fn iterator_pmax(&self, it: &Self::Iterator, kind: CursorKind) -> u64;
    /// Seek to an outer vector (row/column) or a linear position (entry)
    fn iterator_seek(&self, it: &mut Self::Iterator, kind: CursorKind, target: u64) -> Info;
    /// Seek to the `k`th stored outer vector
    fn iterator_kseek(&self, it: &mut Self::Iterator, kind: CursorKind, k: u64) -> Info;
    /// Next outer vector (row/column) or next entry
    fn iterator_next(&self, it: &mut Self::Iterator, kind: CursorKind) -> Info;
    /// Next entry within the current outer vector
    fn iterator_next_inner(&self, it: &mut Self::Iterator, kind: CursorKind) -> Info;
    /// Current linear position of an entry iterator
    fn iterator_p(&self, it: &Self::Iterator, kind: CursorKind) -> u64;
    /// Row (row iterators) or column (column iterators) the iterator is on,
    /// also defined when that vector holds no entries
    fn iterator_outer(&self, it: &Self::Iterator, kind: CursorKind) -> u64;
    /// `(row, col)` of the current entry, `(index, 0)` for vectors
    fn iterator_index(&self, it: &Self::Iterator, kind: CursorKind) -> (u64, u64);
    fn iterator_value(&self, it: &Self::Iterator, domain: Domain, out: &mut [u8]);
}
