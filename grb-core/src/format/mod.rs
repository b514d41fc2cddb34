//! Element domains and storage layouts understood by the engine
//!
//! Pure data definitions: the binding never implements these layouts, it
//! only names them when asking the engine to convert, pack, or unpack.

pub mod constants;
pub mod domain;
#[cfg(feature = "alloc")]
pub mod packed;

pub use constants::INDEX_MAX;
pub use domain::{Complex32, Complex64, Domain, NativeWidth};
#[cfg(feature = "alloc")]
pub use packed::{PackedMatrix, PackedVector};

/// Sparsity structure of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sparsity {
    /// Compressed pointers plus indices (CSR/CSC)
    Sparse,
    /// Sparse with a list of non-empty vectors
    Hypersparse,
    /// Dense value array plus presence bitmap
    Bitmap,
    /// Dense value array, every entry present
    Full,
}

impl Sparsity {
    /// `GxB_SPARSITY_CONTROL` bit for this layout
    pub const fn control_bits(self) -> i32 {
        match self {
            Sparsity::Hypersparse => constants::sparsity::HYPERSPARSE,
            Sparsity::Sparse => constants::sparsity::SPARSE,
            Sparsity::Bitmap => constants::sparsity::BITMAP,
            Sparsity::Full => constants::sparsity::FULL,
        }
    }

    /// Decode a single `GxB_SPARSITY_STATUS` value
    pub const fn from_status(bits: i32) -> Option<Self> {
        match bits {
            constants::sparsity::HYPERSPARSE => Some(Sparsity::Hypersparse),
            constants::sparsity::SPARSE => Some(Sparsity::Sparse),
            constants::sparsity::BITMAP => Some(Sparsity::Bitmap),
            constants::sparsity::FULL => Some(Sparsity::Full),
            _ => None,
        }
    }
}

/// Storage orientation of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    ByRow,
    ByCol,
}

impl Orientation {
    pub const fn code(self) -> i32 {
        match self {
            Orientation::ByRow => constants::orientation::BY_ROW,
            Orientation::ByCol => constants::orientation::BY_COL,
        }
    }
}

/// Complete storage layout: sparsity plus orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Format {
    pub sparsity: Sparsity,
    pub orientation: Orientation,
}

impl Format {
    pub const CSR: Format = Format::new(Sparsity::Sparse, Orientation::ByRow);
    pub const CSC: Format = Format::new(Sparsity::Sparse, Orientation::ByCol);
    pub const HYPER_CSR: Format = Format::new(Sparsity::Hypersparse, Orientation::ByRow);
    pub const HYPER_CSC: Format = Format::new(Sparsity::Hypersparse, Orientation::ByCol);
    pub const BITMAP_R: Format = Format::new(Sparsity::Bitmap, Orientation::ByRow);
    pub const BITMAP_C: Format = Format::new(Sparsity::Bitmap, Orientation::ByCol);
    pub const FULL_R: Format = Format::new(Sparsity::Full, Orientation::ByRow);
    pub const FULL_C: Format = Format::new(Sparsity::Full, Orientation::ByCol);

    pub const fn new(sparsity: Sparsity, orientation: Orientation) -> Self {
        Self {
            sparsity,
            orientation,
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::CSR
    }
}

impl core::fmt::Display for Format {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match (self.sparsity, self.orientation) {
            (Sparsity::Sparse, Orientation::ByRow) => "CSR",
            (Sparsity::Sparse, Orientation::ByCol) => "CSC",
            (Sparsity::Hypersparse, Orientation::ByRow) => "HyperCSR",
            (Sparsity::Hypersparse, Orientation::ByCol) => "HyperCSC",
            (Sparsity::Bitmap, Orientation::ByRow) => "BitmapR",
            (Sparsity::Bitmap, Orientation::ByCol) => "BitmapC",
            (Sparsity::Full, Orientation::ByRow) => "FullR",
            (Sparsity::Full, Orientation::ByCol) => "FullC",
        };
        write!(f, "{name}")
    }
}

/// Execution mode passed to engine initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    #[default]
    NonBlocking,
    Blocking,
}

impl Mode {
    pub const fn code(self) -> i32 {
        match self {
            Mode::NonBlocking => constants::mode::NONBLOCKING,
            Mode::Blocking => constants::mode::BLOCKING,
        }
    }
}

/// Completion requested from a container `wait`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WaitMode {
    /// Pending work finished, results may still be shared lazily
    Complete,
    /// Pending work finished and storage fully materialized
    #[default]
    Materialize,
}

impl WaitMode {
    pub const fn code(self) -> i32 {
        match self {
            WaitMode::Complete => constants::wait::COMPLETE,
            WaitMode::Materialize => constants::wait::MATERIALIZE,
        }
    }
}
