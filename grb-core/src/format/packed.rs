//! Host-side buffers exchanged with the engine by pack and unpack
//!
//! Packing moves the buffers into a container without copying; afterwards
//! the descriptor's buffers are empty so the host can see it no longer owns
//! them. Unpacking hands a freshly filled descriptor back to the host.

use alloc::vec;
use alloc::vec::Vec;

use super::{Domain, Format, Orientation, Sparsity};
use crate::error::{GrbError, Info, Result};
use crate::traits::element::Element;

/// Encode typed values into the engine's type-erased layout
pub fn encode_values<T: Element>(values: &[T]) -> Vec<u8> {
    let size = T::size_bytes();
    let mut out = vec![0u8; values.len() * size];
    for (chunk, value) in out.chunks_exact_mut(size).zip(values) {
        value.write_bytes(chunk);
    }
    out
}

/// Decode a type-erased value buffer
pub fn decode_values<T: Element>(bytes: &[u8]) -> Vec<T> {
    bytes.chunks_exact(T::size_bytes()).map(T::read_bytes).collect()
}

fn check_domain<T: Element>(domain: Domain, value_size: usize) -> Result<()> {
    if T::DOMAIN.canonical() != domain.canonical() || T::size_bytes() != value_size {
        return Err(GrbError::DomainMismatch);
    }
    Ok(())
}

fn check_pointers(pointers: &[u64], nvec: usize, nnz: usize) -> core::result::Result<(), Info> {
    if pointers.len() != nvec + 1 || pointers[0] != 0 {
        return Err(Info::InvalidValue);
    }
    if pointers.windows(2).any(|w| w[0] > w[1]) {
        return Err(Info::InvalidValue);
    }
    if pointers[nvec] as usize != nnz {
        return Err(Info::InvalidValue);
    }
    Ok(())
}

/// Indices strictly increase inside each `pointers` range
fn check_sorted(pointers: &[u64], indices: &[u64]) -> core::result::Result<(), Info> {
    for w in pointers.windows(2) {
        let vector = &indices[w[0] as usize..w[1] as usize];
        if vector.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Info::InvalidObject);
        }
    }
    Ok(())
}

/// Matrix storage handed across a pack/unpack
#[derive(Debug, Clone, PartialEq)]
pub struct PackedMatrix {
    pub format: Format,
    pub nrows: u64,
    pub ncols: u64,
    /// Vector start offsets (`Ap`), sparse and hypersparse only
    pub pointers: Vec<u64>,
    /// Non-empty vector ids (`Ah`), hypersparse only
    pub hyper: Vec<u64>,
    /// Minor indices (`Ai`), sparse and hypersparse only
    pub indices: Vec<u64>,
    /// Presence flags (`Ab`), bitmap only
    pub bitmap: Vec<i8>,
    /// Type-erased values (`Ax`)
    pub values: Vec<u8>,
    pub domain: Domain,
    pub value_size: usize,
    /// Minor indices within a vector may be unsorted
    pub jumbled: bool,
}

impl PackedMatrix {
    fn empty<T: Element>(format: Format, nrows: u64, ncols: u64) -> Self {
        Self {
            format,
            nrows,
            ncols,
            pointers: Vec::new(),
            hyper: Vec::new(),
            indices: Vec::new(),
            bitmap: Vec::new(),
            values: Vec::new(),
            domain: T::DOMAIN,
            value_size: T::size_bytes(),
            jumbled: false,
        }
    }

    /// Compressed sparse rows or columns
    pub fn sparse<T: Element>(
        orientation: Orientation,
        nrows: u64,
        ncols: u64,
        pointers: Vec<u64>,
        indices: Vec<u64>,
        values: &[T],
    ) -> Self {
        Self {
            pointers,
            indices,
            values: encode_values(values),
            ..Self::empty::<T>(Format::new(Sparsity::Sparse, orientation), nrows, ncols)
        }
    }

    /// Compressed sparse rows
    pub fn csr<T: Element>(nrows: u64, ncols: u64, pointers: Vec<u64>, indices: Vec<u64>, values: &[T]) -> Self {
        Self::sparse(Orientation::ByRow, nrows, ncols, pointers, indices, values)
    }

    pub fn csc<T: Element>(nrows: u64, ncols: u64, pointers: Vec<u64>, indices: Vec<u64>, values: &[T]) -> Self {
        Self::sparse(Orientation::ByCol, nrows, ncols, pointers, indices, values)
    }

    /// Compressed storage listing only the non-empty vectors
    pub fn hypersparse<T: Element>(
        orientation: Orientation,
        nrows: u64,
        ncols: u64,
        pointers: Vec<u64>,
        hyper: Vec<u64>,
        indices: Vec<u64>,
        values: &[T],
    ) -> Self {
        Self {
            pointers,
            hyper,
            indices,
            values: encode_values(values),
            ..Self::empty::<T>(Format::new(Sparsity::Hypersparse, orientation), nrows, ncols)
        }
    }

    /// Dense values plus a presence flag per position
    pub fn bitmap<T: Element>(
        orientation: Orientation,
        nrows: u64,
        ncols: u64,
        bitmap: Vec<i8>,
        values: &[T],
    ) -> Self {
        Self {
            bitmap,
            values: encode_values(values),
            ..Self::empty::<T>(Format::new(Sparsity::Bitmap, orientation), nrows, ncols)
        }
    }

    /// Dense values, every position present
    pub fn full<T: Element>(orientation: Orientation, nrows: u64, ncols: u64, values: &[T]) -> Self {
        Self {
            values: encode_values(values),
            ..Self::empty::<T>(Format::new(Sparsity::Full, orientation), nrows, ncols)
        }
    }

    /// Number of vectors along the storage orientation
    pub const fn nmajor(&self) -> u64 {
        match self.format.orientation {
            Orientation::ByRow => self.nrows,
            Orientation::ByCol => self.ncols,
        }
    }

    pub const fn nminor(&self) -> u64 {
        match self.format.orientation {
            Orientation::ByRow => self.ncols,
            Orientation::ByCol => self.nrows,
        }
    }

    /// Number of value slots held in `values`
    pub fn value_count(&self) -> usize {
        if self.value_size == 0 {
            0
        } else {
            self.values.len() / self.value_size
        }
    }

    /// Number of entries actually present
    pub fn nvals(&self) -> u64 {
        match self.format.sparsity {
            Sparsity::Sparse | Sparsity::Hypersparse => self.indices.len() as u64,
            Sparsity::Bitmap => self.bitmap.iter().filter(|b| **b != 0).count() as u64,
            Sparsity::Full => self.nrows * self.ncols,
        }
    }

    /// Decode the value buffer as `T`
    pub fn values<T: Element>(&self) -> Result<Vec<T>> {
        check_domain::<T>(self.domain, self.value_size)?;
        Ok(decode_values(&self.values))
    }

    /// True once every buffer has been handed over
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
            && self.hyper.is_empty()
            && self.indices.is_empty()
            && self.bitmap.is_empty()
            && self.values.is_empty()
    }

    /// Move the buffers out, leaving zero-length buffers behind
    pub fn take(&mut self) -> PackedMatrix {
        PackedMatrix {
            pointers: core::mem::take(&mut self.pointers),
            hyper: core::mem::take(&mut self.hyper),
            indices: core::mem::take(&mut self.indices),
            bitmap: core::mem::take(&mut self.bitmap),
            values: core::mem::take(&mut self.values),
            ..self.clone()
        }
    }

    /// Check that buffer lengths agree with the format and dimensions
    ///
    /// Unless the descriptor is marked jumbled, the indices of every vector
    /// must be sorted without duplicates; otherwise it is an invalid object.
    pub fn validate(&self) -> core::result::Result<(), Info> {
        let nmajor = self.nmajor();
        let nminor = self.nminor();
        let dense = || {
            nmajor
                .checked_mul(nminor)
                .and_then(|n| usize::try_from(n).ok())
                .ok_or(Info::InvalidValue)
        };

        let expected = match self.format.sparsity {
            Sparsity::Sparse => {
                let nvec = usize::try_from(nmajor).map_err(|_| Info::InvalidValue)?;
                check_pointers(&self.pointers, nvec, self.indices.len())?;
                self.indices.len()
            }
            Sparsity::Hypersparse => {
                check_pointers(&self.pointers, self.hyper.len(), self.indices.len())?;
                if self.hyper.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(Info::InvalidValue);
                }
                if self.hyper.last().is_some_and(|h| *h >= nmajor) {
                    return Err(Info::InvalidIndex);
                }
                self.indices.len()
            }
            Sparsity::Bitmap => {
                let dense = dense()?;
                if self.bitmap.len() != dense {
                    return Err(Info::InvalidValue);
                }
                dense
            }
            Sparsity::Full => dense()?,
        };

        if self.indices.iter().any(|i| *i >= nminor) {
            return Err(Info::InvalidIndex);
        }
        if !self.jumbled && !self.indices.is_empty() {
            check_sorted(&self.pointers, &self.indices)?;
        }
        if self.values.len() != expected * self.value_size {
            return Err(Info::InvalidValue);
        }
        Ok(())
    }
}

/// Vector storage handed across a pack/unpack
#[derive(Debug, Clone, PartialEq)]
pub struct PackedVector {
    /// `Sparse`, `Bitmap` or `Full`
    pub sparsity: Sparsity,
    pub size: u64,
    /// Entry indices, sparse only
    pub indices: Vec<u64>,
    /// Presence flags, bitmap only
    pub bitmap: Vec<i8>,
    pub values: Vec<u8>,
    pub domain: Domain,
    pub value_size: usize,
    pub jumbled: bool,
}

impl PackedVector {
    fn empty<T: Element>(sparsity: Sparsity, size: u64) -> Self {
        Self {
            sparsity,
            size,
            indices: Vec::new(),
            bitmap: Vec::new(),
            values: Vec::new(),
            domain: T::DOMAIN,
            value_size: T::size_bytes(),
            jumbled: false,
        }
    }

    pub fn sparse<T: Element>(size: u64, indices: Vec<u64>, values: &[T]) -> Self {
        Self {
            indices,
            values: encode_values(values),
            ..Self::empty::<T>(Sparsity::Sparse, size)
        }
    }

    pub fn bitmap<T: Element>(size: u64, bitmap: Vec<i8>, values: &[T]) -> Self {
        Self {
            bitmap,
            values: encode_values(values),
            ..Self::empty::<T>(Sparsity::Bitmap, size)
        }
    }

    pub fn full<T: Element>(values: &[T]) -> Self {
        Self {
            values: encode_values(values),
            ..Self::empty::<T>(Sparsity::Full, values.len() as u64)
        }
    }

    pub fn nvals(&self) -> u64 {
        match self.sparsity {
            Sparsity::Sparse | Sparsity::Hypersparse => self.indices.len() as u64,
            Sparsity::Bitmap => self.bitmap.iter().filter(|b| **b != 0).count() as u64,
            Sparsity::Full => self.size,
        }
    }

    pub fn values<T: Element>(&self) -> Result<Vec<T>> {
        check_domain::<T>(self.domain, self.value_size)?;
        Ok(decode_values(&self.values))
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.bitmap.is_empty() && self.values.is_empty()
    }

    /// Move the buffers out, leaving zero-length buffers behind
    pub fn take(&mut self) -> PackedVector {
        PackedVector {
            indices: core::mem::take(&mut self.indices),
            bitmap: core::mem::take(&mut self.bitmap),
            values: core::mem::take(&mut self.values),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> core::result::Result<(), Info> {
        let size = usize::try_from(self.size).map_err(|_| Info::InvalidValue)?;
        let expected = match self.sparsity {
            Sparsity::Sparse => {
                if self.indices.iter().any(|i| *i >= self.size) {
                    return Err(Info::InvalidIndex);
                }
                if !self.jumbled && self.indices.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(Info::InvalidObject);
                }
                self.indices.len()
            }
            Sparsity::Bitmap => {
                if self.bitmap.len() != size {
                    return Err(Info::InvalidValue);
                }
                size
            }
            Sparsity::Full => size,
            Sparsity::Hypersparse => return Err(Info::InvalidValue),
        };
        if self.values.len() != expected * self.value_size {
            return Err(Info::InvalidValue);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_csr() -> PackedMatrix {
        // [1 . 2]
        // [. . .]
        // [. 3 .]
        PackedMatrix::sparse(
            Orientation::ByRow,
            3,
            3,
            vec![0, 2, 2, 3],
            vec![0, 2, 1],
            &[1i32, 2, 3],
        )
    }

    #[test]
    fn test_sparse_validates() {
        let packed = sample_csr();
        assert_eq!(packed.validate(), Ok(()));
        assert_eq!(packed.nvals(), 3);
        assert_eq!(packed.values::<i32>(), Ok(vec![1, 2, 3]));
        assert_eq!(packed.values::<u32>(), Err(GrbError::DomainMismatch));
    }

    #[test]
    fn test_sparse_rejects_bad_layout() {
        let mut packed = sample_csr();
        packed.pointers = vec![0, 2, 1, 3];
        assert_eq!(packed.validate(), Err(Info::InvalidValue));

        let mut packed = sample_csr();
        packed.indices[1] = 3;
        assert_eq!(packed.validate(), Err(Info::InvalidIndex));

        let mut packed = sample_csr();
        packed.values.pop();
        assert_eq!(packed.validate(), Err(Info::InvalidValue));
    }

    #[test]
    fn test_unsorted_vectors_need_the_jumbled_flag() {
        let mut packed = sample_csr();
        packed.indices = vec![2, 0, 1];
        assert_eq!(packed.validate(), Err(Info::InvalidObject));
        packed.jumbled = true;
        assert_eq!(packed.validate(), Ok(()));

        let mut packed = sample_csr();
        packed.indices = vec![1, 1, 1];
        packed.jumbled = true;
        assert_eq!(packed.validate(), Ok(()));
        packed.jumbled = false;
        assert_eq!(packed.validate(), Err(Info::InvalidObject));

        // order only matters inside a vector
        let mut packed = sample_csr();
        packed.indices = vec![0, 2, 0];
        assert_eq!(packed.validate(), Ok(()));

        let mut v = PackedVector::sparse(10, vec![4, 1], &[5u8, 6]);
        assert_eq!(v.validate(), Err(Info::InvalidObject));
        v.jumbled = true;
        assert_eq!(v.validate(), Ok(()));
    }

    #[test]
    fn test_huge_sparse_shapes_validate() {
        let packed = PackedMatrix::hypersparse(
            Orientation::ByRow,
            1 << 62,
            1 << 62,
            vec![0, 1],
            vec![1 << 61],
            vec![7],
            &[1u8],
        );
        assert_eq!(packed.validate(), Ok(()));

        let mut full = PackedMatrix::full(Orientation::ByRow, 1 << 62, 1 << 62, &[1u8]);
        assert_eq!(full.validate(), Err(Info::InvalidValue));
        full.format.sparsity = Sparsity::Bitmap;
        assert_eq!(full.validate(), Err(Info::InvalidValue));
    }

    #[test]
    fn test_hypersparse_and_bitmap() {
        let hyper = PackedMatrix::hypersparse(
            Orientation::ByCol,
            4,
            100,
            vec![0, 1, 3],
            vec![7, 42],
            vec![3, 0, 1],
            &[1.0f64, 2.0, 3.0],
        );
        assert_eq!(hyper.validate(), Ok(()));
        assert_eq!(hyper.nmajor(), 100);

        let bitmap = PackedMatrix::bitmap(
            Orientation::ByRow,
            2,
            2,
            vec![1, 0, 0, 1],
            &[true, false, false, true],
        );
        assert_eq!(bitmap.validate(), Ok(()));
        assert_eq!(bitmap.nvals(), 2);
    }

    #[test]
    fn test_encoded_values_are_native_bytes() {
        let bytes = encode_values(&[1i16, -2, 300]);
        let expected: Vec<u8> = [1i16, -2, 300].iter().flat_map(|v| v.to_ne_bytes()).collect();
        assert_eq!(bytes, expected);
        assert!(encode_values::<f64>(&[]).is_empty());
    }

    #[test]
    fn test_take_leaves_zero_length_buffers() {
        let mut packed = sample_csr();
        let moved = packed.take();
        assert!(packed.is_empty());
        assert_eq!(packed.nrows, 3);
        assert_eq!(moved.values::<i32>(), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn test_vector_layouts() {
        let v = PackedVector::sparse(10, vec![1, 9], &[5u8, 6]);
        assert_eq!(v.validate(), Ok(()));
        let v = PackedVector::sparse(10, vec![1, 10], &[5u8, 6]);
        assert_eq!(v.validate(), Err(Info::InvalidIndex));
        let v = PackedVector::full(&[1i64, 2, 3]);
        assert_eq!(v.nvals(), 3);
        assert_eq!(v.validate(), Ok(()));
    }
}
