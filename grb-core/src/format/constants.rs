//! Engine enumeration values used across the foreign-function boundary

/// Largest index the engine accepts (`GrB_INDEX_MAX`)
pub const INDEX_MAX: u64 = (1u64 << 60) - 1;

/// Global and per-object option fields (`GxB_Option_Field`)
pub mod option {
    pub const HYPER_SWITCH: i32 = 7000;
    pub const BITMAP_SWITCH: i32 = 7001;
    pub const FORMAT: i32 = 7002;
    pub const SPARSITY_STATUS: i32 = 7034;
    pub const SPARSITY_CONTROL: i32 = 7036;
    pub const NTHREADS: i32 = 7086;
    pub const BURBLE: i32 = 7019;
}

/// Orientation values for `GxB_FORMAT`
pub mod orientation {
    pub const BY_ROW: i32 = 0;
    pub const BY_COL: i32 = 1;
}

/// Sparsity control bits for `GxB_SPARSITY_CONTROL`
pub mod sparsity {
    pub const HYPERSPARSE: i32 = 1;
    pub const SPARSE: i32 = 2;
    pub const BITMAP: i32 = 4;
    pub const FULL: i32 = 8;
}

/// `GrB_Mode` values passed to `GrB_init`
pub mod mode {
    pub const NONBLOCKING: i32 = 0;
    pub const BLOCKING: i32 = 1;
}

/// `GrB_WaitMode` values
pub mod wait {
    pub const COMPLETE: i32 = 0;
    pub const MATERIALIZE: i32 = 1;
}

/// Descriptor fields and values (`GrB_Desc_Field`, `GrB_Desc_Value`)
pub mod descriptor {
    pub const OUTP: i32 = 0;
    pub const MASK: i32 = 1;
    pub const INP0: i32 = 2;
    pub const INP1: i32 = 3;

    pub const DEFAULT: i32 = 0;
    pub const REPLACE: i32 = 1;
    pub const COMP: i32 = 2;
    pub const STRUCTURE: i32 = 4;
    pub const TRAN: i32 = 3;
}
