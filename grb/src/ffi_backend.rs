//! SuiteSparse:GraphBLAS engine
//!
//! Binds `libgraphblas` through its C ABI. Built-in type and operator
//! objects are exported by the library as global handles; they are looked
//! up by symbol name at run time instead of declaring every one of them.
//! Buffers handed over by pack are copied into `malloc` memory, which the
//! library frees with its default allocator.

use std::ffi::{c_char, c_int, c_void, CString};
use std::sync::{Mutex, MutexGuard, PoisonError};

use grb_core::format::constants::option;
use grb_core::{
    BinaryFn, BuiltinOp, Complex32, Complex64, CursorKind, Descriptor, Domain, Element, Engine,
    EngineResult, Format, GlobalOption, IndexList, Info, Mode, Orientation, PackedMatrix,
    PackedVector, Sparsity, UnaryFn, WaitMode,
};
use hashbrown::{HashMap, HashSet};
use tracing::{debug, warn};

// ============================================================================
// OPAQUE HANDLES
// ============================================================================

macro_rules! opaque {
    ($($(#[$doc:meta])* $name:ident;)*) => {$(
        $(#[$doc])*
        #[repr(C)]
        pub struct $name {
            _private: [u8; 0],
        }
    )*};
}

opaque! {
    /// `struct GB_Type_opaque`
    TypeOpaque;
    /// Unary and binary operators share one layout
    OpOpaque;
    MatrixOpaque;
    VectorOpaque;
    DescriptorOpaque;
    IteratorOpaque;
}

pub type GrbType = *mut TypeOpaque;
pub type GrbOp = *mut OpOpaque;
pub type GrbMatrix = *mut MatrixOpaque;
pub type GrbVector = *mut VectorOpaque;
pub type GrbDescriptor = *mut DescriptorOpaque;

/// Iterator owned by one cursor
#[derive(Debug)]
pub struct FfiIterator {
    raw: *mut IteratorOpaque,
}

// ============================================================================
// LIBRARY ENTRY POINTS
// ============================================================================

#[cfg(target_os = "macos")]
const RTLD_DEFAULT: *mut c_void = -2isize as *mut c_void;
#[cfg(not(target_os = "macos"))]
const RTLD_DEFAULT: *mut c_void = std::ptr::null_mut();

#[cfg_attr(target_os = "linux", link(name = "dl"))]
extern "C" {
    fn dlsym(handle: *mut c_void, symbol: *const c_char) -> *mut c_void;
}

extern "C" {
    fn malloc(size: usize) -> *mut c_void;
    fn free(ptr: *mut c_void);
}

#[link(name = "graphblas")]
extern "C" {
    static GrB_ALL: *const u64;

    fn GrB_init(mode: c_int) -> c_int;
    fn GrB_finalize() -> c_int;
    fn GxB_Global_Option_set_INT32(field: c_int, value: i32) -> c_int;
    fn GxB_Global_Option_set_FP64(field: c_int, value: f64) -> c_int;
    fn GxB_Global_Option_set_FP64_ARRAY(field: c_int, value: *mut f64) -> c_int;

    fn GxB_Type_new(ty: *mut GrbType, size: usize, name: *const c_char, defn: *const c_char) -> c_int;
    fn GrB_Type_free(ty: *mut GrbType) -> c_int;

    fn GxB_UnaryOp_new(
        op: *mut GrbOp,
        f: UnaryFn,
        ztype: GrbType,
        xtype: GrbType,
        name: *const c_char,
        defn: *const c_char,
    ) -> c_int;
    fn GxB_BinaryOp_new(
        op: *mut GrbOp,
        f: BinaryFn,
        ztype: GrbType,
        xtype: GrbType,
        ytype: GrbType,
        name: *const c_char,
        defn: *const c_char,
    ) -> c_int;
    fn GrB_UnaryOp_free(op: *mut GrbOp) -> c_int;
    fn GrB_BinaryOp_free(op: *mut GrbOp) -> c_int;

    fn GrB_Descriptor_new(desc: *mut GrbDescriptor) -> c_int;
    fn GrB_Descriptor_set(desc: GrbDescriptor, field: c_int, value: c_int) -> c_int;
    fn GrB_Descriptor_free(desc: *mut GrbDescriptor) -> c_int;

    fn GrB_Matrix_new(m: *mut GrbMatrix, ty: GrbType, nrows: u64, ncols: u64) -> c_int;
    fn GrB_Matrix_free(m: *mut GrbMatrix) -> c_int;
    fn GrB_Matrix_nrows(n: *mut u64, m: GrbMatrix) -> c_int;
    fn GrB_Matrix_ncols(n: *mut u64, m: GrbMatrix) -> c_int;
    fn GrB_Matrix_nvals(n: *mut u64, m: GrbMatrix) -> c_int;
    fn GrB_Matrix_clear(m: GrbMatrix) -> c_int;
    fn GrB_Matrix_wait(m: GrbMatrix, mode: c_int) -> c_int;
    fn GrB_Matrix_removeElement(m: GrbMatrix, row: u64, col: u64) -> c_int;
    fn GxB_Matrix_Option_get_INT32(m: GrbMatrix, field: c_int, value: *mut i32) -> c_int;
    fn GxB_Matrix_Option_set_INT32(m: GrbMatrix, field: c_int, value: i32) -> c_int;
    fn GrB_Matrix_apply(
        out: GrbMatrix,
        mask: GrbMatrix,
        accum: GrbOp,
        op: GrbOp,
        input: GrbMatrix,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GrB_Matrix_extract(
        out: GrbMatrix,
        mask: GrbMatrix,
        accum: GrbOp,
        input: GrbMatrix,
        rows: *const u64,
        nrows: u64,
        cols: *const u64,
        ncols: u64,
        desc: GrbDescriptor,
    ) -> c_int;

    fn GrB_Vector_new(v: *mut GrbVector, ty: GrbType, size: u64) -> c_int;
    fn GrB_Vector_free(v: *mut GrbVector) -> c_int;
    fn GrB_Vector_size(n: *mut u64, v: GrbVector) -> c_int;
    fn GrB_Vector_nvals(n: *mut u64, v: GrbVector) -> c_int;
    fn GrB_Vector_clear(v: GrbVector) -> c_int;
    fn GrB_Vector_wait(v: GrbVector, mode: c_int) -> c_int;
    fn GrB_Vector_removeElement(v: GrbVector, index: u64) -> c_int;
    fn GrB_Vector_apply(
        out: GrbVector,
        mask: GrbVector,
        accum: GrbOp,
        op: GrbOp,
        input: GrbVector,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GrB_Vector_extract(
        out: GrbVector,
        mask: GrbVector,
        accum: GrbOp,
        input: GrbVector,
        indices: *const u64,
        n: u64,
        desc: GrbDescriptor,
    ) -> c_int;
}

// pack / unpack
#[link(name = "graphblas")]
extern "C" {
    fn GxB_Matrix_pack_CSR(
        m: GrbMatrix,
        ap: *mut *mut c_void,
        aj: *mut *mut c_void,
        ax: *mut *mut c_void,
        ap_size: u64,
        aj_size: u64,
        ax_size: u64,
        iso: bool,
        jumbled: bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_pack_CSC(
        m: GrbMatrix,
        ap: *mut *mut c_void,
        ai: *mut *mut c_void,
        ax: *mut *mut c_void,
        ap_size: u64,
        ai_size: u64,
        ax_size: u64,
        iso: bool,
        jumbled: bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_pack_HyperCSR(
        m: GrbMatrix,
        ap: *mut *mut c_void,
        ah: *mut *mut c_void,
        aj: *mut *mut c_void,
        ax: *mut *mut c_void,
        ap_size: u64,
        ah_size: u64,
        aj_size: u64,
        ax_size: u64,
        iso: bool,
        nvec: u64,
        jumbled: bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_pack_HyperCSC(
        m: GrbMatrix,
        ap: *mut *mut c_void,
        ah: *mut *mut c_void,
        ai: *mut *mut c_void,
        ax: *mut *mut c_void,
        ap_size: u64,
        ah_size: u64,
        ai_size: u64,
        ax_size: u64,
        iso: bool,
        nvec: u64,
        jumbled: bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_pack_BitmapR(
        m: GrbMatrix,
        ab: *mut *mut c_void,
        ax: *mut *mut c_void,
        ab_size: u64,
        ax_size: u64,
        iso: bool,
        nvals: u64,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_pack_BitmapC(
        m: GrbMatrix,
        ab: *mut *mut c_void,
        ax: *mut *mut c_void,
        ab_size: u64,
        ax_size: u64,
        iso: bool,
        nvals: u64,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_pack_FullR(m: GrbMatrix, ax: *mut *mut c_void, ax_size: u64, iso: bool, desc: GrbDescriptor) -> c_int;
    fn GxB_Matrix_pack_FullC(m: GrbMatrix, ax: *mut *mut c_void, ax_size: u64, iso: bool, desc: GrbDescriptor) -> c_int;

    fn GxB_Matrix_unpack_CSR(
        m: GrbMatrix,
        ap: *mut *mut c_void,
        aj: *mut *mut c_void,
        ax: *mut *mut c_void,
        ap_size: *mut u64,
        aj_size: *mut u64,
        ax_size: *mut u64,
        iso: *mut bool,
        jumbled: *mut bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_unpack_CSC(
        m: GrbMatrix,
        ap: *mut *mut c_void,
        ai: *mut *mut c_void,
        ax: *mut *mut c_void,
        ap_size: *mut u64,
        ai_size: *mut u64,
        ax_size: *mut u64,
        iso: *mut bool,
        jumbled: *mut bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_unpack_HyperCSR(
        m: GrbMatrix,
        ap: *mut *mut c_void,
        ah: *mut *mut c_void,
        aj: *mut *mut c_void,
        ax: *mut *mut c_void,
        ap_size: *mut u64,
        ah_size: *mut u64,
        aj_size: *mut u64,
        ax_size: *mut u64,
        iso: *mut bool,
        nvec: *mut u64,
        jumbled: *mut bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_unpack_HyperCSC(
        m: GrbMatrix,
        ap: *mut *mut c_void,
        ah: *mut *mut c_void,
        ai: *mut *mut c_void,
        ax: *mut *mut c_void,
        ap_size: *mut u64,
        ah_size: *mut u64,
        ai_size: *mut u64,
        ax_size: *mut u64,
        iso: *mut bool,
        nvec: *mut u64,
        jumbled: *mut bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_unpack_BitmapR(
        m: GrbMatrix,
        ab: *mut *mut c_void,
        ax: *mut *mut c_void,
        ab_size: *mut u64,
        ax_size: *mut u64,
        iso: *mut bool,
        nvals: *mut u64,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_unpack_BitmapC(
        m: GrbMatrix,
        ab: *mut *mut c_void,
        ax: *mut *mut c_void,
        ab_size: *mut u64,
        ax_size: *mut u64,
        iso: *mut bool,
        nvals: *mut u64,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_unpack_FullR(
        m: GrbMatrix,
        ax: *mut *mut c_void,
        ax_size: *mut u64,
        iso: *mut bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Matrix_unpack_FullC(
        m: GrbMatrix,
        ax: *mut *mut c_void,
        ax_size: *mut u64,
        iso: *mut bool,
        desc: GrbDescriptor,
    ) -> c_int;

    fn GxB_Vector_pack_CSC(
        v: GrbVector,
        vi: *mut *mut c_void,
        vx: *mut *mut c_void,
        vi_size: u64,
        vx_size: u64,
        iso: bool,
        nvals: u64,
        jumbled: bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Vector_pack_Bitmap(
        v: GrbVector,
        vb: *mut *mut c_void,
        vx: *mut *mut c_void,
        vb_size: u64,
        vx_size: u64,
        iso: bool,
        nvals: u64,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Vector_pack_Full(v: GrbVector, vx: *mut *mut c_void, vx_size: u64, iso: bool, desc: GrbDescriptor) -> c_int;
    fn GxB_Vector_unpack_CSC(
        v: GrbVector,
        vi: *mut *mut c_void,
        vx: *mut *mut c_void,
        vi_size: *mut u64,
        vx_size: *mut u64,
        iso: *mut bool,
        nvals: *mut u64,
        jumbled: *mut bool,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Vector_unpack_Bitmap(
        v: GrbVector,
        vb: *mut *mut c_void,
        vx: *mut *mut c_void,
        vb_size: *mut u64,
        vx_size: *mut u64,
        iso: *mut bool,
        nvals: *mut u64,
        desc: GrbDescriptor,
    ) -> c_int;
    fn GxB_Vector_unpack_Full(
        v: GrbVector,
        vx: *mut *mut c_void,
        vx_size: *mut u64,
        iso: *mut bool,
        desc: GrbDescriptor,
    ) -> c_int;
}

// iterators
#[link(name = "graphblas")]
extern "C" {
    fn GxB_Iterator_new(it: *mut *mut IteratorOpaque) -> c_int;
    fn GxB_Iterator_free(it: *mut *mut IteratorOpaque) -> c_int;
    fn GxB_Iterator_get_UDT(it: *mut IteratorOpaque, value: *mut c_void);

    fn GxB_rowIterator_attach(it: *mut IteratorOpaque, m: GrbMatrix, desc: GrbDescriptor) -> c_int;
    fn GxB_rowIterator_kount(it: *mut IteratorOpaque) -> u64;
    fn GxB_rowIterator_seekRow(it: *mut IteratorOpaque, row: u64) -> c_int;
    fn GxB_rowIterator_kseek(it: *mut IteratorOpaque, k: u64) -> c_int;
    fn GxB_rowIterator_nextRow(it: *mut IteratorOpaque) -> c_int;
    fn GxB_rowIterator_nextCol(it: *mut IteratorOpaque) -> c_int;
    fn GxB_rowIterator_getRowIndex(it: *mut IteratorOpaque) -> u64;
    fn GxB_rowIterator_getColIndex(it: *mut IteratorOpaque) -> u64;

    fn GxB_colIterator_attach(it: *mut IteratorOpaque, m: GrbMatrix, desc: GrbDescriptor) -> c_int;
    fn GxB_colIterator_kount(it: *mut IteratorOpaque) -> u64;
    fn GxB_colIterator_seekCol(it: *mut IteratorOpaque, col: u64) -> c_int;
    fn GxB_colIterator_kseek(it: *mut IteratorOpaque, k: u64) -> c_int;
    fn GxB_colIterator_nextCol(it: *mut IteratorOpaque) -> c_int;
    fn GxB_colIterator_nextRow(it: *mut IteratorOpaque) -> c_int;
    fn GxB_colIterator_getColIndex(it: *mut IteratorOpaque) -> u64;
    fn GxB_colIterator_getRowIndex(it: *mut IteratorOpaque) -> u64;

    fn GxB_Matrix_Iterator_attach(it: *mut IteratorOpaque, m: GrbMatrix, desc: GrbDescriptor) -> c_int;
    fn GxB_Matrix_Iterator_getpmax(it: *mut IteratorOpaque) -> u64;
    fn GxB_Matrix_Iterator_seek(it: *mut IteratorOpaque, p: u64) -> c_int;
    fn GxB_Matrix_Iterator_next(it: *mut IteratorOpaque) -> c_int;
    fn GxB_Matrix_Iterator_getp(it: *mut IteratorOpaque) -> u64;
    fn GxB_Matrix_Iterator_getIndex(it: *mut IteratorOpaque, row: *mut u64, col: *mut u64);

    fn GxB_Vector_Iterator_attach(it: *mut IteratorOpaque, v: GrbVector, desc: GrbDescriptor) -> c_int;
    fn GxB_Vector_Iterator_getpmax(it: *mut IteratorOpaque) -> u64;
    fn GxB_Vector_Iterator_seek(it: *mut IteratorOpaque, p: u64) -> c_int;
    fn GxB_Vector_Iterator_next(it: *mut IteratorOpaque) -> c_int;
    fn GxB_Vector_Iterator_getp(it: *mut IteratorOpaque) -> u64;
    fn GxB_Vector_Iterator_getIndex(it: *mut IteratorOpaque) -> u64;
}

/// Scalars are passed by value, so each built-in domain has its own
/// `setElement` entry point.
macro_rules! set_element_entry_points {
    ($($variant:ident: $ty:ty => $matrix_fn:ident, $vector_fn:ident;)*) => {
        #[link(name = "graphblas")]
        extern "C" {
            $(
                fn $matrix_fn(m: GrbMatrix, x: $ty, row: u64, col: u64) -> c_int;
                fn $vector_fn(v: GrbVector, x: $ty, index: u64) -> c_int;
            )*
            fn GrB_Matrix_setElement_UDT(m: GrbMatrix, x: *const c_void, row: u64, col: u64) -> c_int;
            fn GrB_Vector_setElement_UDT(v: GrbVector, x: *const c_void, index: u64) -> c_int;
        }

        unsafe fn matrix_set_scalar(m: GrbMatrix, domain: Domain, value: &[u8], row: u64, col: u64) -> c_int {
            match domain.canonical() {
                $(Domain::$variant => $matrix_fn(m, <$ty as Element>::read_bytes(value), row, col),)*
                _ => GrB_Matrix_setElement_UDT(m, value.as_ptr().cast(), row, col),
            }
        }

        unsafe fn vector_set_scalar(v: GrbVector, domain: Domain, value: &[u8], index: u64) -> c_int {
            match domain.canonical() {
                $(Domain::$variant => $vector_fn(v, <$ty as Element>::read_bytes(value), index),)*
                _ => GrB_Vector_setElement_UDT(v, value.as_ptr().cast(), index),
            }
        }
    };
}

set_element_entry_points! {
    Bool: bool => GrB_Matrix_setElement_BOOL, GrB_Vector_setElement_BOOL;
    Int8: i8 => GrB_Matrix_setElement_INT8, GrB_Vector_setElement_INT8;
    Int16: i16 => GrB_Matrix_setElement_INT16, GrB_Vector_setElement_INT16;
    Int32: i32 => GrB_Matrix_setElement_INT32, GrB_Vector_setElement_INT32;
    Int64: i64 => GrB_Matrix_setElement_INT64, GrB_Vector_setElement_INT64;
    UInt8: u8 => GrB_Matrix_setElement_UINT8, GrB_Vector_setElement_UINT8;
    UInt16: u16 => GrB_Matrix_setElement_UINT16, GrB_Vector_setElement_UINT16;
    UInt32: u32 => GrB_Matrix_setElement_UINT32, GrB_Vector_setElement_UINT32;
    UInt64: u64 => GrB_Matrix_setElement_UINT64, GrB_Vector_setElement_UINT64;
    Float32: f32 => GrB_Matrix_setElement_FP32, GrB_Vector_setElement_FP32;
    Float64: f64 => GrB_Matrix_setElement_FP64, GrB_Vector_setElement_FP64;
    Complex32: Complex32 => GxB_Matrix_setElement_FC32, GxB_Vector_setElement_FC32;
    Complex64: Complex64 => GxB_Matrix_setElement_FC64, GxB_Vector_setElement_FC64;
}

// Entry points whose value argument is a pointer, resolved by name
type MatrixExtractElementFn = unsafe extern "C" fn(*mut c_void, GrbMatrix, u64, u64) -> c_int;
type VectorExtractElementFn = unsafe extern "C" fn(*mut c_void, GrbVector, u64) -> c_int;
type MatrixBuildFn = unsafe extern "C" fn(GrbMatrix, *const u64, *const u64, *const c_void, u64, GrbOp) -> c_int;
type VectorBuildFn = unsafe extern "C" fn(GrbVector, *const u64, *const c_void, u64, GrbOp) -> c_int;

fn prefix(domain: Domain) -> &'static str {
    match domain.canonical() {
        Domain::Complex32 | Domain::Complex64 => "GxB",
        _ => "GrB",
    }
}

fn info(code: c_int) -> Info {
    Info::from_code(code)
}

fn into_result<T>(code: c_int, value: T) -> EngineResult<T> {
    match info(code) {
        Info::Success => Ok(value),
        err => Err(err),
    }
}

// ============================================================================
// HOST BUFFERS
// ============================================================================

/// A copy of a host buffer in `malloc` memory
///
/// Pack transfers ownership to the library, which nulls the pointer on
/// success. Anything still held on drop is freed here.
struct CBuffer {
    ptr: *mut c_void,
    bytes: u64,
}

impl CBuffer {
    fn copy_of<T: Copy>(data: &[T]) -> EngineResult<Self> {
        let bytes = std::mem::size_of_val(data);
        // zero-length buffers still need a valid pointer
        let ptr = unsafe { malloc(bytes.max(1)) };
        if ptr.is_null() {
            return Err(Info::OutOfMemory);
        }
        unsafe { std::ptr::copy_nonoverlapping(data.as_ptr().cast::<u8>(), ptr.cast::<u8>(), bytes) };
        Ok(Self {
            ptr,
            bytes: bytes as u64,
        })
    }
}

impl Drop for CBuffer {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { free(self.ptr) };
        }
    }
}

/// Copy `count` values out of a library buffer and free it
unsafe fn take_buffer<T: Copy>(ptr: *mut c_void, count: usize) -> Vec<T> {
    if ptr.is_null() {
        return Vec::new();
    }
    let out = std::slice::from_raw_parts(ptr.cast::<T>(), count).to_vec();
    free(ptr);
    out
}

/// Copy an unpacked value array, expanding iso-valued storage
unsafe fn take_values(ptr: *mut c_void, iso: bool, count: usize, size: usize) -> Vec<u8> {
    if !iso {
        return take_buffer(ptr, count * size);
    }
    let one: Vec<u8> = take_buffer(ptr, size);
    if one.is_empty() {
        return Vec::new();
    }
    one.repeat(count)
}

// ============================================================================
// ENGINE
// ============================================================================

/// SuiteSparse:GraphBLAS through `libgraphblas`
#[derive(Debug, Default)]
pub struct SuiteSparse {
    symbols: Mutex<HashMap<String, usize>>,
    unary_ops: Mutex<HashSet<usize>>,
}

impl SuiteSparse {
    pub fn new() -> Self {
        Self::default()
    }

    fn symbols(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.symbols.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Address of an exported symbol
    fn lookup(&self, name: &str) -> EngineResult<*mut c_void> {
        if let Some(addr) = self.symbols().get(name) {
            return Ok(*addr as *mut c_void);
        }
        let symbol = CString::new(name).map_err(|_| Info::InvalidValue)?;
        let addr = unsafe { dlsym(RTLD_DEFAULT, symbol.as_ptr()) };
        if addr.is_null() {
            debug!(symbol = name, "symbol not exported");
            return Err(Info::NotImplemented);
        }
        self.symbols().insert(name.to_owned(), addr as usize);
        Ok(addr)
    }

    /// Value of an exported global handle such as `GrB_INT32`
    fn global_handle<T>(&self, name: &str) -> EngineResult<*mut T> {
        let addr = self.lookup(name)?;
        Ok(unsafe { *(addr as *const *mut T) })
    }

    fn entry_point<F: Copy>(&self, name: &str) -> EngineResult<F> {
        let addr = self.lookup(name)?;
        debug_assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<*mut c_void>());
        Ok(unsafe { std::mem::transmute_copy::<*mut c_void, F>(&addr) })
    }

    fn matrix_dims_raw(&self, m: GrbMatrix) -> EngineResult<(u64, u64)> {
        let mut nrows = 0;
        let mut ncols = 0;
        into_result(unsafe { GrB_Matrix_nrows(&mut nrows, m) }, ())?;
        into_result(unsafe { GrB_Matrix_ncols(&mut ncols, m) }, (nrows, ncols))
    }
}

/// Split an index list into the pointer and length the library takes
fn index_args(list: &IndexList) -> (*const u64, u64) {
    match list {
        // the length is ignored for GrB_ALL
        IndexList::All => (unsafe { GrB_ALL }, 0),
        IndexList::List(indices) => (indices.as_ptr(), indices.len() as u64),
    }
}

impl Engine for SuiteSparse {
    type Type = GrbType;
    type Op = GrbOp;
    type Matrix = GrbMatrix;
    type Vector = GrbVector;
    type Descriptor = GrbDescriptor;
    type Iterator = FfiIterator;

    fn name(&self) -> &'static str {
        "SuiteSparse:GraphBLAS"
    }

    fn init(&self, mode: Mode) -> Info {
        info(unsafe { GrB_init(mode.code()) })
    }

    fn finalize(&self) -> Info {
        self.symbols().clear();
        info(unsafe { GrB_finalize() })
    }

    fn set_global_option(&self, opt: GlobalOption) -> Info {
        let code = unsafe {
            match opt {
                GlobalOption::Threads(n) => GxB_Global_Option_set_INT32(option::NTHREADS, n),
                GlobalOption::Burble(on) => GxB_Global_Option_set_INT32(option::BURBLE, i32::from(on)),
                GlobalOption::Orientation(o) => GxB_Global_Option_set_INT32(option::FORMAT, o.code()),
                GlobalOption::HyperSwitch(h) => GxB_Global_Option_set_FP64(option::HYPER_SWITCH, h),
                GlobalOption::BitmapSwitch(b) => {
                    // one switch per size class
                    let mut switches = [b; 8];
                    GxB_Global_Option_set_FP64_ARRAY(option::BITMAP_SWITCH, switches.as_mut_ptr())
                }
            }
        };
        info(code)
    }

    fn builtin_type(&self, domain: Domain) -> GrbType {
        domain
            .type_symbol()
            .and_then(|name| self.global_handle(name).ok())
            .unwrap_or(std::ptr::null_mut())
    }

    fn type_new(&self, size: usize, name: &str) -> EngineResult<GrbType> {
        let cname = CString::new(name).map_err(|_| Info::InvalidValue)?;
        let mut ty = std::ptr::null_mut();
        let code = unsafe { GxB_Type_new(&mut ty, size, cname.as_ptr(), std::ptr::null()) };
        into_result(code, ty)
    }

    fn type_free(&self, mut ty: GrbType) -> Info {
        info(unsafe { GrB_Type_free(&mut ty) })
    }

    fn builtin_op(&self, op: BuiltinOp) -> GrbOp {
        let symbol = op.symbol();
        self.global_handle(&symbol).unwrap_or_else(|err| {
            warn!(%symbol, %err, "built-in operator not found");
            std::ptr::null_mut()
        })
    }

    fn unary_op_new(&self, f: UnaryFn, output: GrbType, input: GrbType, name: &str) -> EngineResult<GrbOp> {
        let cname = CString::new(name).map_err(|_| Info::InvalidValue)?;
        let mut op = std::ptr::null_mut();
        let code = unsafe { GxB_UnaryOp_new(&mut op, f, output, input, cname.as_ptr(), std::ptr::null()) };
        let op = into_result(code, op)?;
        self.unary_ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op as usize);
        Ok(op)
    }

    fn binary_op_new(
        &self,
        f: BinaryFn,
        output: GrbType,
        left: GrbType,
        right: GrbType,
        name: &str,
    ) -> EngineResult<GrbOp> {
        let cname = CString::new(name).map_err(|_| Info::InvalidValue)?;
        let mut op = std::ptr::null_mut();
        let code = unsafe {
            GxB_BinaryOp_new(&mut op, f, output, left, right, cname.as_ptr(), std::ptr::null())
        };
        into_result(code, op)
    }

    fn op_free(&self, mut op: GrbOp) -> Info {
        let unary = self
            .unary_ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(op as usize));
        let code = unsafe {
            if unary {
                GrB_UnaryOp_free(&mut op)
            } else {
                GrB_BinaryOp_free(&mut op)
            }
        };
        info(code)
    }

    fn descriptor_new(&self, desc: &Descriptor) -> EngineResult<GrbDescriptor> {
        use grb_core::format::constants::descriptor as field;

        let mut d = std::ptr::null_mut();
        into_result(unsafe { GrB_Descriptor_new(&mut d) }, ())?;
        let mut settings = Vec::new();
        if desc.replace {
            settings.push((field::OUTP, field::REPLACE));
        }
        if desc.mask.code() != field::DEFAULT {
            settings.push((field::MASK, desc.mask.code()));
        }
        if desc.transpose_first {
            settings.push((field::INP0, field::TRAN));
        }
        if desc.transpose_second {
            settings.push((field::INP1, field::TRAN));
        }
        for (f, value) in settings {
            let code = unsafe { GrB_Descriptor_set(d, f, value) };
            if let Err(err) = into_result(code, ()) {
                unsafe { GrB_Descriptor_free(&mut d) };
                return Err(err);
            }
        }
        Ok(d)
    }

    fn descriptor_free(&self, mut desc: GrbDescriptor) -> Info {
        info(unsafe { GrB_Descriptor_free(&mut desc) })
    }

    fn matrix_new(&self, ty: GrbType, nrows: u64, ncols: u64) -> EngineResult<GrbMatrix> {
        let mut m = std::ptr::null_mut();
        into_result(unsafe { GrB_Matrix_new(&mut m, ty, nrows, ncols) }, ())?;
        Ok(m)
    }

    fn matrix_free(&self, mut m: GrbMatrix) -> Info {
        info(unsafe { GrB_Matrix_free(&mut m) })
    }

    fn matrix_dims(&self, m: GrbMatrix) -> EngineResult<(u64, u64)> {
        self.matrix_dims_raw(m)
    }

    fn matrix_nvals(&self, m: GrbMatrix) -> EngineResult<u64> {
        let mut n = 0;
        into_result(unsafe { GrB_Matrix_nvals(&mut n, m) }, ())?;
        Ok(n)
    }

    fn matrix_format(&self, m: GrbMatrix) -> EngineResult<Format> {
        let mut status = 0;
        let mut orientation = 0;
        into_result(unsafe { GxB_Matrix_Option_get_INT32(m, option::SPARSITY_STATUS, &mut status) }, ())?;
        into_result(unsafe { GxB_Matrix_Option_get_INT32(m, option::FORMAT, &mut orientation) }, ())?;
        let sparsity = Sparsity::from_status(status).ok_or(Info::InvalidObject)?;
        let orientation = if orientation == Orientation::ByCol.code() {
            Orientation::ByCol
        } else {
            Orientation::ByRow
        };
        Ok(Format::new(sparsity, orientation))
    }

    fn matrix_set_format(&self, m: GrbMatrix, format: Format) -> Info {
        let code = unsafe {
            GxB_Matrix_Option_set_INT32(m, option::SPARSITY_CONTROL, format.sparsity.control_bits())
        };
        if code != 0 {
            return info(code);
        }
        info(unsafe { GxB_Matrix_Option_set_INT32(m, option::FORMAT, format.orientation.code()) })
    }

    fn matrix_set_element(&self, m: GrbMatrix, domain: Domain, value: &[u8], row: u64, col: u64) -> Info {
        info(unsafe { matrix_set_scalar(m, domain, value, row, col) })
    }

    fn matrix_extract_element(&self, m: GrbMatrix, domain: Domain, out: &mut [u8], row: u64, col: u64) -> Info {
        let name = format!("{}_Matrix_extractElement_{}", prefix(domain), domain.symbol_suffix());
        match self.entry_point::<MatrixExtractElementFn>(&name) {
            Ok(f) => info(unsafe { f(out.as_mut_ptr().cast(), m, row, col) }),
            Err(err) => err,
        }
    }

    fn matrix_remove_element(&self, m: GrbMatrix, row: u64, col: u64) -> Info {
        info(unsafe { GrB_Matrix_removeElement(m, row, col) })
    }

    fn matrix_build(
        &self,
        m: GrbMatrix,
        domain: Domain,
        rows: &[u64],
        cols: &[u64],
        values: &[u8],
        dup: GrbOp,
    ) -> Info {
        if rows.len() != cols.len() {
            return Info::InvalidValue;
        }
        let name = format!("{}_Matrix_build_{}", prefix(domain), domain.symbol_suffix());
        match self.entry_point::<MatrixBuildFn>(&name) {
            Ok(f) => info(unsafe {
                f(m, rows.as_ptr(), cols.as_ptr(), values.as_ptr().cast(), rows.len() as u64, dup)
            }),
            Err(err) => err,
        }
    }

    fn matrix_clear(&self, m: GrbMatrix) -> Info {
        info(unsafe { GrB_Matrix_clear(m) })
    }

    fn matrix_wait(&self, m: GrbMatrix, mode: WaitMode) -> Info {
        info(unsafe { GrB_Matrix_wait(m, mode.code()) })
    }

    fn matrix_apply(
        &self,
        out: GrbMatrix,
        mask: GrbMatrix,
        accum: GrbOp,
        op: GrbOp,
        input: GrbMatrix,
        desc: GrbDescriptor,
    ) -> Info {
        info(unsafe { GrB_Matrix_apply(out, mask, accum, op, input, desc) })
    }

    fn matrix_extract(
        &self,
        out: GrbMatrix,
        mask: GrbMatrix,
        accum: GrbOp,
        input: GrbMatrix,
        rows: &IndexList,
        cols: &IndexList,
        desc: GrbDescriptor,
    ) -> Info {
        let (rows, nrows) = index_args(rows);
        let (cols, ncols) = index_args(cols);
        info(unsafe { GrB_Matrix_extract(out, mask, accum, input, rows, nrows, cols, ncols, desc) })
    }

    fn matrix_pack(&self, m: GrbMatrix, packed: &mut PackedMatrix) -> Info {
        if let Err(info) = packed.validate() {
            return info;
        }
        match pack_matrix(m, packed) {
            Ok(()) => {
                // the library owns copies now
                packed.take();
                Info::Success
            }
            Err(err) => err,
        }
    }

    fn matrix_unpack(&self, m: GrbMatrix, domain: Domain, format: Format) -> EngineResult<PackedMatrix> {
        let (nrows, ncols) = self.matrix_dims_raw(m)?;
        let value_size = unsafe { matrix_type_size(m)? };
        unsafe { unpack_matrix(m, domain, value_size, format, nrows, ncols) }
    }

    fn vector_new(&self, ty: GrbType, size: u64) -> EngineResult<GrbVector> {
        let mut v = std::ptr::null_mut();
        into_result(unsafe { GrB_Vector_new(&mut v, ty, size) }, ())?;
        Ok(v)
    }

    fn vector_free(&self, mut v: GrbVector) -> Info {
        info(unsafe { GrB_Vector_free(&mut v) })
    }

    fn vector_size(&self, v: GrbVector) -> EngineResult<u64> {
        let mut n = 0;
        into_result(unsafe { GrB_Vector_size(&mut n, v) }, ())?;
        Ok(n)
    }

    fn vector_nvals(&self, v: GrbVector) -> EngineResult<u64> {
        let mut n = 0;
        into_result(unsafe { GrB_Vector_nvals(&mut n, v) }, ())?;
        Ok(n)
    }

    fn vector_set_element(&self, v: GrbVector, domain: Domain, value: &[u8], index: u64) -> Info {
        info(unsafe { vector_set_scalar(v, domain, value, index) })
    }

    fn vector_extract_element(&self, v: GrbVector, domain: Domain, out: &mut [u8], index: u64) -> Info {
        let name = format!("{}_Vector_extractElement_{}", prefix(domain), domain.symbol_suffix());
        match self.entry_point::<VectorExtractElementFn>(&name) {
            Ok(f) => info(unsafe { f(out.as_mut_ptr().cast(), v, index) }),
            Err(err) => err,
        }
    }

    fn vector_remove_element(&self, v: GrbVector, index: u64) -> Info {
        info(unsafe { GrB_Vector_removeElement(v, index) })
    }

    fn vector_build(&self, v: GrbVector, domain: Domain, indices: &[u64], values: &[u8], dup: GrbOp) -> Info {
        let name = format!("{}_Vector_build_{}", prefix(domain), domain.symbol_suffix());
        match self.entry_point::<VectorBuildFn>(&name) {
            Ok(f) => info(unsafe { f(v, indices.as_ptr(), values.as_ptr().cast(), indices.len() as u64, dup) }),
            Err(err) => err,
        }
    }

    fn vector_clear(&self, v: GrbVector) -> Info {
        info(unsafe { GrB_Vector_clear(v) })
    }

    fn vector_wait(&self, v: GrbVector, mode: WaitMode) -> Info {
        info(unsafe { GrB_Vector_wait(v, mode.code()) })
    }

    fn vector_apply(
        &self,
        out: GrbVector,
        mask: GrbVector,
        accum: GrbOp,
        op: GrbOp,
        input: GrbVector,
        desc: GrbDescriptor,
    ) -> Info {
        info(unsafe { GrB_Vector_apply(out, mask, accum, op, input, desc) })
    }

    fn vector_extract(
        &self,
        out: GrbVector,
        mask: GrbVector,
        accum: GrbOp,
        input: GrbVector,
        indices: &IndexList,
        desc: GrbDescriptor,
    ) -> Info {
        let (indices, n) = index_args(indices);
        info(unsafe { GrB_Vector_extract(out, mask, accum, input, indices, n, desc) })
    }

    fn vector_pack(&self, v: GrbVector, packed: &mut PackedVector) -> Info {
        if let Err(info) = packed.validate() {
            return info;
        }
        match pack_vector(v, packed) {
            Ok(()) => {
                packed.take();
                Info::Success
            }
            Err(err) => err,
        }
    }

    fn vector_unpack(&self, v: GrbVector, domain: Domain, sparsity: Sparsity) -> EngineResult<PackedVector> {
        let size = self.vector_size(v)?;
        let value_size = unsafe { vector_type_size(v)? };
        unsafe { unpack_vector(v, domain, value_size, sparsity, size) }
    }

    fn matrix_iterator(&self, m: GrbMatrix, kind: CursorKind) -> EngineResult<FfiIterator> {
        let mut raw = std::ptr::null_mut();
        into_result(unsafe { GxB_Iterator_new(&mut raw) }, ())?;
        let code = unsafe {
            match kind {
                CursorKind::Row => GxB_rowIterator_attach(raw, m, std::ptr::null_mut()),
                CursorKind::Col => GxB_colIterator_attach(raw, m, std::ptr::null_mut()),
                CursorKind::MatrixEntry => GxB_Matrix_Iterator_attach(raw, m, std::ptr::null_mut()),
                CursorKind::VectorEntry => Info::InvalidValue.code(),
            }
        };
        if let Err(err) = into_result(code, ()) {
            unsafe { GxB_Iterator_free(&mut raw) };
            return Err(err);
        }
        Ok(FfiIterator { raw })
    }

    fn vector_iterator(&self, v: GrbVector) -> EngineResult<FfiIterator> {
        let mut raw = std::ptr::null_mut();
        into_result(unsafe { GxB_Iterator_new(&mut raw) }, ())?;
        let code = unsafe { GxB_Vector_Iterator_attach(raw, v, std::ptr::null_mut()) };
        if let Err(err) = into_result(code, ()) {
            unsafe { GxB_Iterator_free(&mut raw) };
            return Err(err);
        }
        Ok(FfiIterator { raw })
    }

    fn iterator_free(&self, it: &mut FfiIterator) {
        if !it.raw.is_null() {
            unsafe { GxB_Iterator_free(&mut it.raw) };
        }
    }

    fn iterator_kount(&self, it: &FfiIterator, kind: CursorKind) -> u64 {
        unsafe {
            match kind {
                CursorKind::Row => GxB_rowIterator_kount(it.raw),
                CursorKind::Col => GxB_colIterator_kount(it.raw),
                CursorKind::MatrixEntry | CursorKind::VectorEntry => 0,
            }
        }
    }

    fn iterator_pmax(&self, it: &FfiIterator, kind: CursorKind) -> u64 {
        unsafe {
            match kind {
                CursorKind::MatrixEntry => GxB_Matrix_Iterator_getpmax(it.raw),
                CursorKind::VectorEntry => GxB_Vector_Iterator_getpmax(it.raw),
                CursorKind::Row | CursorKind::Col => 0,
            }
        }
    }

    fn iterator_seek(&self, it: &mut FfiIterator, kind: CursorKind, target: u64) -> Info {
        info(unsafe {
            match kind {
                CursorKind::Row => GxB_rowIterator_seekRow(it.raw, target),
                CursorKind::Col => GxB_colIterator_seekCol(it.raw, target),
                CursorKind::MatrixEntry => GxB_Matrix_Iterator_seek(it.raw, target),
                CursorKind::VectorEntry => GxB_Vector_Iterator_seek(it.raw, target),
            }
        })
    }

    fn iterator_kseek(&self, it: &mut FfiIterator, kind: CursorKind, k: u64) -> Info {
        match kind {
            CursorKind::Row => info(unsafe { GxB_rowIterator_kseek(it.raw, k) }),
            CursorKind::Col => info(unsafe { GxB_colIterator_kseek(it.raw, k) }),
            CursorKind::MatrixEntry | CursorKind::VectorEntry => Info::InvalidValue,
        }
    }

    fn iterator_next(&self, it: &mut FfiIterator, kind: CursorKind) -> Info {
        info(unsafe {
            match kind {
                CursorKind::Row => GxB_rowIterator_nextRow(it.raw),
                CursorKind::Col => GxB_colIterator_nextCol(it.raw),
                CursorKind::MatrixEntry => GxB_Matrix_Iterator_next(it.raw),
                CursorKind::VectorEntry => GxB_Vector_Iterator_next(it.raw),
            }
        })
    }

    fn iterator_next_inner(&self, it: &mut FfiIterator, kind: CursorKind) -> Info {
        match kind {
            CursorKind::Row => info(unsafe { GxB_rowIterator_nextCol(it.raw) }),
            CursorKind::Col => info(unsafe { GxB_colIterator_nextRow(it.raw) }),
            CursorKind::MatrixEntry | CursorKind::VectorEntry => Info::InvalidValue,
        }
    }

    fn iterator_p(&self, it: &FfiIterator, kind: CursorKind) -> u64 {
        unsafe {
            match kind {
                CursorKind::MatrixEntry => GxB_Matrix_Iterator_getp(it.raw),
                CursorKind::VectorEntry => GxB_Vector_Iterator_getp(it.raw),
                CursorKind::Row | CursorKind::Col => 0,
            }
        }
    }

    fn iterator_outer(&self, it: &FfiIterator, kind: CursorKind) -> u64 {
        unsafe {
            match kind {
                CursorKind::Row => GxB_rowIterator_getRowIndex(it.raw),
                CursorKind::Col => GxB_colIterator_getColIndex(it.raw),
                CursorKind::MatrixEntry | CursorKind::VectorEntry => 0,
            }
        }
    }

    fn iterator_index(&self, it: &FfiIterator, kind: CursorKind) -> (u64, u64) {
        unsafe {
            match kind {
                CursorKind::Row => (GxB_rowIterator_getRowIndex(it.raw), GxB_rowIterator_getColIndex(it.raw)),
                CursorKind::Col => (GxB_colIterator_getRowIndex(it.raw), GxB_colIterator_getColIndex(it.raw)),
                CursorKind::MatrixEntry => {
                    let (mut row, mut col) = (0, 0);
                    GxB_Matrix_Iterator_getIndex(it.raw, &mut row, &mut col);
                    (row, col)
                }
                CursorKind::VectorEntry => (GxB_Vector_Iterator_getIndex(it.raw), 0),
            }
        }
    }

    fn iterator_value(&self, it: &FfiIterator, _domain: Domain, out: &mut [u8]) {
        // copies the container type's size; `out` is sized by the cursor
        unsafe { GxB_Iterator_get_UDT(it.raw, out.as_mut_ptr().cast()) };
    }
}

// ============================================================================
// PACK / UNPACK
// ============================================================================

#[link(name = "graphblas")]
extern "C" {
    fn GxB_Matrix_type(ty: *mut GrbType, m: GrbMatrix) -> c_int;
    fn GxB_Vector_type(ty: *mut GrbType, v: GrbVector) -> c_int;
    fn GxB_Type_size(size: *mut usize, ty: GrbType) -> c_int;
}

/// Size in bytes of an element type
unsafe fn type_size(ty: GrbType) -> EngineResult<usize> {
    let mut size = 0;
    into_result(GxB_Type_size(&mut size, ty), size)
}

unsafe fn matrix_type_size(m: GrbMatrix) -> EngineResult<usize> {
    let mut ty = std::ptr::null_mut();
    into_result(GxB_Matrix_type(&mut ty, m), ())?;
    type_size(ty)
}

unsafe fn vector_type_size(v: GrbVector) -> EngineResult<usize> {
    let mut ty = std::ptr::null_mut();
    into_result(GxB_Vector_type(&mut ty, v), ())?;
    type_size(ty)
}

fn pack_matrix(m: GrbMatrix, packed: &PackedMatrix) -> Result<(), Info> {
    let mut ax = CBuffer::copy_of(&packed.values)?;
    let null = std::ptr::null_mut();
    let code = match packed.format.sparsity {
        Sparsity::Sparse => {
            let mut ap = CBuffer::copy_of(&packed.pointers)?;
            let mut ai = CBuffer::copy_of(&packed.indices)?;
            let (ap_size, ai_size, ax_size) = (ap.bytes, ai.bytes, ax.bytes);
            unsafe {
                match packed.format.orientation {
                    Orientation::ByRow => GxB_Matrix_pack_CSR(
                        m, &mut ap.ptr, &mut ai.ptr, &mut ax.ptr, ap_size, ai_size, ax_size, false,
                        packed.jumbled, null,
                    ),
                    Orientation::ByCol => GxB_Matrix_pack_CSC(
                        m, &mut ap.ptr, &mut ai.ptr, &mut ax.ptr, ap_size, ai_size, ax_size, false,
                        packed.jumbled, null,
                    ),
                }
            }
        }
        Sparsity::Hypersparse => {
            let mut ap = CBuffer::copy_of(&packed.pointers)?;
            let mut ah = CBuffer::copy_of(&packed.hyper)?;
            let mut ai = CBuffer::copy_of(&packed.indices)?;
            let nvec = packed.hyper.len() as u64;
            let (ap_size, ah_size, ai_size, ax_size) = (ap.bytes, ah.bytes, ai.bytes, ax.bytes);
            unsafe {
                match packed.format.orientation {
                    Orientation::ByRow => GxB_Matrix_pack_HyperCSR(
                        m, &mut ap.ptr, &mut ah.ptr, &mut ai.ptr, &mut ax.ptr, ap_size, ah_size, ai_size,
                        ax_size, false, nvec, packed.jumbled, null,
                    ),
                    Orientation::ByCol => GxB_Matrix_pack_HyperCSC(
                        m, &mut ap.ptr, &mut ah.ptr, &mut ai.ptr, &mut ax.ptr, ap_size, ah_size, ai_size,
                        ax_size, false, nvec, packed.jumbled, null,
                    ),
                }
            }
        }
        Sparsity::Bitmap => {
            let mut ab = CBuffer::copy_of(&packed.bitmap)?;
            let nvals = packed.nvals();
            let (ab_size, ax_size) = (ab.bytes, ax.bytes);
            unsafe {
                match packed.format.orientation {
                    Orientation::ByRow => {
                        GxB_Matrix_pack_BitmapR(m, &mut ab.ptr, &mut ax.ptr, ab_size, ax_size, false, nvals, null)
                    }
                    Orientation::ByCol => {
                        GxB_Matrix_pack_BitmapC(m, &mut ab.ptr, &mut ax.ptr, ab_size, ax_size, false, nvals, null)
                    }
                }
            }
        }
        Sparsity::Full => {
            let ax_size = ax.bytes;
            unsafe {
                match packed.format.orientation {
                    Orientation::ByRow => GxB_Matrix_pack_FullR(m, &mut ax.ptr, ax_size, false, null),
                    Orientation::ByCol => GxB_Matrix_pack_FullC(m, &mut ax.ptr, ax_size, false, null),
                }
            }
        }
    };
    into_result(code, ())
}

unsafe fn unpack_matrix(
    m: GrbMatrix,
    domain: Domain,
    value_size: usize,
    format: Format,
    nrows: u64,
    ncols: u64,
) -> EngineResult<PackedMatrix> {
    let null = std::ptr::null_mut();
    let (mut ap, mut ah, mut ai, mut ab, mut ax) = (null, null, null, null, null);
    let (mut ap_size, mut ah_size, mut ai_size, mut ab_size, mut ax_size) = (0, 0, 0, 0, 0);
    let mut iso = false;
    let mut jumbled = false;
    let mut nvec = 0;
    let mut nvals = 0;
    let (nmajor, nminor) = match format.orientation {
        Orientation::ByRow => (nrows, ncols),
        Orientation::ByCol => (ncols, nrows),
    };

    let code = match (format.sparsity, format.orientation) {
        (Sparsity::Sparse, Orientation::ByRow) => GxB_Matrix_unpack_CSR(
            m, &mut ap, &mut ai, &mut ax, &mut ap_size, &mut ai_size, &mut ax_size, &mut iso, &mut jumbled,
            null,
        ),
        (Sparsity::Sparse, Orientation::ByCol) => GxB_Matrix_unpack_CSC(
            m, &mut ap, &mut ai, &mut ax, &mut ap_size, &mut ai_size, &mut ax_size, &mut iso, &mut jumbled,
            null,
        ),
        (Sparsity::Hypersparse, Orientation::ByRow) => GxB_Matrix_unpack_HyperCSR(
            m, &mut ap, &mut ah, &mut ai, &mut ax, &mut ap_size, &mut ah_size, &mut ai_size, &mut ax_size,
            &mut iso, &mut nvec, &mut jumbled, null,
        ),
        (Sparsity::Hypersparse, Orientation::ByCol) => GxB_Matrix_unpack_HyperCSC(
            m, &mut ap, &mut ah, &mut ai, &mut ax, &mut ap_size, &mut ah_size, &mut ai_size, &mut ax_size,
            &mut iso, &mut nvec, &mut jumbled, null,
        ),
        (Sparsity::Bitmap, Orientation::ByRow) => GxB_Matrix_unpack_BitmapR(
            m, &mut ab, &mut ax, &mut ab_size, &mut ax_size, &mut iso, &mut nvals, null,
        ),
        (Sparsity::Bitmap, Orientation::ByCol) => GxB_Matrix_unpack_BitmapC(
            m, &mut ab, &mut ax, &mut ab_size, &mut ax_size, &mut iso, &mut nvals, null,
        ),
        (Sparsity::Full, Orientation::ByRow) => GxB_Matrix_unpack_FullR(m, &mut ax, &mut ax_size, &mut iso, null),
        (Sparsity::Full, Orientation::ByCol) => GxB_Matrix_unpack_FullC(m, &mut ax, &mut ax_size, &mut iso, null),
    };
    into_result(code, ())?;

    let dense = (nmajor * nminor) as usize;
    let mut packed = PackedMatrix {
        format,
        nrows,
        ncols,
        pointers: Vec::new(),
        hyper: Vec::new(),
        indices: Vec::new(),
        bitmap: Vec::new(),
        values: Vec::new(),
        domain,
        value_size,
        jumbled,
    };
    match format.sparsity {
        Sparsity::Sparse | Sparsity::Hypersparse => {
            let nvec = if format.sparsity == Sparsity::Sparse {
                nmajor as usize
            } else {
                nvec as usize
            };
            packed.pointers = take_buffer(ap, nvec + 1);
            packed.hyper = take_buffer(ah, if ah.is_null() { 0 } else { nvec });
            let nnz = packed.pointers.last().copied().unwrap_or(0) as usize;
            packed.indices = take_buffer(ai, nnz);
            packed.values = take_values(ax, iso, nnz, value_size);
        }
        Sparsity::Bitmap => {
            packed.bitmap = take_buffer(ab, dense);
            packed.values = take_values(ax, iso, dense, value_size);
        }
        Sparsity::Full => {
            packed.values = take_values(ax, iso, dense, value_size);
        }
    }
    Ok(packed)
}

fn pack_vector(v: GrbVector, packed: &PackedVector) -> Result<(), Info> {
    let mut vx = CBuffer::copy_of(&packed.values)?;
    let null = std::ptr::null_mut();
    let nvals = packed.nvals();
    let code = match packed.sparsity {
        Sparsity::Sparse => {
            let mut vi = CBuffer::copy_of(&packed.indices)?;
            let (vi_size, vx_size) = (vi.bytes, vx.bytes);
            unsafe {
                GxB_Vector_pack_CSC(v, &mut vi.ptr, &mut vx.ptr, vi_size, vx_size, false, nvals, packed.jumbled, null)
            }
        }
        Sparsity::Bitmap => {
            let mut vb = CBuffer::copy_of(&packed.bitmap)?;
            let (vb_size, vx_size) = (vb.bytes, vx.bytes);
            unsafe { GxB_Vector_pack_Bitmap(v, &mut vb.ptr, &mut vx.ptr, vb_size, vx_size, false, nvals, null) }
        }
        Sparsity::Full => {
            let vx_size = vx.bytes;
            unsafe { GxB_Vector_pack_Full(v, &mut vx.ptr, vx_size, false, null) }
        }
        Sparsity::Hypersparse => return Err(Info::InvalidValue),
    };
    into_result(code, ())
}

unsafe fn unpack_vector(
    v: GrbVector,
    domain: Domain,
    value_size: usize,
    sparsity: Sparsity,
    size: u64,
) -> EngineResult<PackedVector> {
    let null = std::ptr::null_mut();
    let (mut vi, mut vb, mut vx) = (null, null, null);
    let (mut vi_size, mut vb_size, mut vx_size) = (0, 0, 0);
    let mut iso = false;
    let mut jumbled = false;
    let mut nvals = 0;
    let code = match sparsity {
        Sparsity::Sparse => GxB_Vector_unpack_CSC(
            v, &mut vi, &mut vx, &mut vi_size, &mut vx_size, &mut iso, &mut nvals, &mut jumbled, null,
        ),
        Sparsity::Bitmap => {
            GxB_Vector_unpack_Bitmap(v, &mut vb, &mut vx, &mut vb_size, &mut vx_size, &mut iso, &mut nvals, null)
        }
        Sparsity::Full => GxB_Vector_unpack_Full(v, &mut vx, &mut vx_size, &mut iso, null),
        Sparsity::Hypersparse => return Err(Info::InvalidValue),
    };
    into_result(code, ())?;

    let mut packed = PackedVector {
        sparsity,
        size,
        indices: Vec::new(),
        bitmap: Vec::new(),
        values: Vec::new(),
        domain,
        value_size,
        jumbled,
    };
    match sparsity {
        Sparsity::Sparse => {
            packed.indices = take_buffer(vi, nvals as usize);
            packed.values = take_values(vx, iso, nvals as usize, value_size);
        }
        Sparsity::Bitmap => {
            packed.bitmap = take_buffer(vb, size as usize);
            packed.values = take_values(vx, iso, size as usize, value_size);
        }
        _ => packed.values = take_values(vx, iso, size as usize, value_size),
    }
    Ok(packed)
}
