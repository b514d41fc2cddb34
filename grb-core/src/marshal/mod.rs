//! Argument marshaling for engine calls
//!
//! Pure helpers that turn host-side arguments into the shapes the engine
//! expects. None of them touch the engine.

#[cfg(feature = "alloc")]
mod index;
mod triple;

#[cfg(feature = "alloc")]
pub use index::{to_index_list, validate_indices, IndexList};
pub use triple::{flatten_optional, flatten_optional_triple};

/// Host-side index selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Select<'a, I> {
    /// Every index of the dimension (`GrB_ALL`)
    All,
    List(&'a [I]),
}

impl<'a, I> Select<'a, I> {
    pub const fn is_all(&self) -> bool {
        matches!(self, Select::All)
    }
}

impl<'a, I> From<&'a [I]> for Select<'a, I> {
    fn from(list: &'a [I]) -> Self {
        Select::List(list)
    }
}

impl<'a, I, const N: usize> From<&'a [I; N]> for Select<'a, I> {
    fn from(list: &'a [I; N]) -> Self {
        Select::List(list)
    }
}

#[cfg(feature = "alloc")]
impl<'a, I> From<&'a alloc::vec::Vec<I>> for Select<'a, I> {
    fn from(list: &'a alloc::vec::Vec<I>) -> Self {
        Select::List(list)
    }
}
