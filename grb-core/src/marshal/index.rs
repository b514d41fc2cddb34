//! Index list conversion

use alloc::vec::Vec;

use super::Select;
use crate::error::{GrbError, Result};
use crate::format::constants::INDEX_MAX;

/// Engine-side index list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexList {
    /// Passed to the engine as `GrB_ALL`, never materialized
    All,
    List(Vec<u64>),
}

impl IndexList {
    pub const fn is_all(&self) -> bool {
        matches!(self, IndexList::All)
    }

    /// Number of selected indices in a dimension of size `dim`
    pub fn len_in(&self, dim: u64) -> u64 {
        match self {
            IndexList::All => dim,
            IndexList::List(list) => list.len() as u64,
        }
    }

    /// The `k`th selected index
    pub fn get(&self, k: u64) -> Option<u64> {
        match self {
            IndexList::All => Some(k),
            IndexList::List(list) => usize::try_from(k).ok().and_then(|k| list.get(k).copied()),
        }
    }
}

fn convert<I: Copy + TryInto<u64>>(index: I) -> Result<u64> {
    match index.try_into() {
        Ok(i) if i <= INDEX_MAX => Ok(i),
        _ => Err(GrbError::InvalidIndex),
    }
}

/// Check every index without converting any of them
pub fn validate_indices<I: Copy + TryInto<u64>>(list: &[I]) -> Result<()> {
    list.iter().try_for_each(|i| convert(*i).map(|_| ()))
}

/// Convert a host selection into an engine index list
///
/// Negative (or otherwise unrepresentable) indices are rejected with
/// `InvalidIndex` before anything is converted.
pub fn to_index_list<I: Copy + TryInto<u64>>(select: Select<'_, I>) -> Result<IndexList> {
    let list = match select {
        Select::All => return Ok(IndexList::All),
        Select::List(list) => list,
    };
    validate_indices(list)?;

    let mut out = Vec::with_capacity(list.len());
    for index in list {
        out.push(convert(*index)?);
    }
    Ok(IndexList::List(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_converts_signed_and_unsigned() {
        let rows: &[i32] = &[3, 0, 7];
        assert_eq!(
            to_index_list(Select::List(rows)),
            Ok(IndexList::List(vec![3, 0, 7]))
        );
        assert_eq!(
            to_index_list(Select::from(&[5usize, 1])),
            Ok(IndexList::List(vec![5, 1]))
        );
    }

    #[test]
    fn test_rejects_negative_indices() {
        assert_eq!(
            to_index_list(Select::from(&[1i64, -2, 3])),
            Err(GrbError::InvalidIndex)
        );
        assert_eq!(validate_indices(&[0i8, -1]), Err(GrbError::InvalidIndex));
    }

    #[test]
    fn test_rejects_all_sentinel_as_index() {
        assert_eq!(
            to_index_list(Select::from(&[u64::MAX])),
            Err(GrbError::InvalidIndex)
        );
    }

    #[test]
    fn test_all_passes_through() {
        let list = to_index_list::<i32>(Select::All);
        assert_eq!(list, Ok(IndexList::All));
        let list = IndexList::All;
        assert_eq!(list.len_in(9), 9);
        assert_eq!(list.get(4), Some(4));
    }

    #[test]
    fn test_empty_list_is_not_all() {
        let list = to_index_list::<u32>(Select::List(&[]));
        assert_eq!(list, Ok(IndexList::List(Vec::new())));
    }
}
