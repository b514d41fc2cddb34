//! Materialized container storage for the reference engine
//!
//! One [`Storage`] value holds a matrix (or a vector, as an `n x 1` by-column
//! matrix) in one of the four layouts. Conversions always go through the
//! entry map, which is slow but keeps every layout trivially consistent.

use std::collections::BTreeMap;

use grb_core::{Format, Info, Orientation, PackedMatrix, Sparsity};

/// Largest dense layout or pointer array the reference engine allocates
const DENSE_LIMIT: u64 = 1 << 28;

/// Stored entries keyed by `(row, col)`
pub(crate) type Entries = BTreeMap<(u64, u64), Vec<u8>>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Layout {
    Sparse { p: Vec<u64> },
    Hyper { h: Vec<u64>, p: Vec<u64> },
    Bitmap { b: Vec<i8> },
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Storage {
    pub nrows: u64,
    pub ncols: u64,
    pub orientation: Orientation,
    pub layout: Layout,
    /// Minor indices, sparse and hypersparse only
    pub i: Vec<u64>,
    pub x: Vec<u8>,
    pub size: usize,
}

fn dense_len(nrows: u64, ncols: u64) -> Result<usize, Info> {
    match nrows.checked_mul(ncols) {
        Some(n) if n <= DENSE_LIMIT => Ok(n as usize),
        _ => Err(Info::OutOfMemory),
    }
}

impl Storage {
    pub fn empty(nrows: u64, ncols: u64, format: Format, size: usize) -> Result<Self, Info> {
        Self::from_entries(nrows, ncols, format, size, &Entries::new())
    }

    pub fn nmajor(&self) -> u64 {
        match self.orientation {
            Orientation::ByRow => self.nrows,
            Orientation::ByCol => self.ncols,
        }
    }

    pub fn nminor(&self) -> u64 {
        match self.orientation {
            Orientation::ByRow => self.ncols,
            Orientation::ByCol => self.nrows,
        }
    }

    pub fn format(&self) -> Format {
        let sparsity = match self.layout {
            Layout::Sparse { .. } => Sparsity::Sparse,
            Layout::Hyper { .. } => Sparsity::Hypersparse,
            Layout::Bitmap { .. } => Sparsity::Bitmap,
            Layout::Full => Sparsity::Full,
        };
        Format::new(sparsity, self.orientation)
    }

    /// `(row, col)` of a `(major, minor)` pair
    pub fn to_rc(&self, major: u64, minor: u64) -> (u64, u64) {
        match self.orientation {
            Orientation::ByRow => (major, minor),
            Orientation::ByCol => (minor, major),
        }
    }

    fn to_mm(&self, row: u64, col: u64) -> (u64, u64) {
        match self.orientation {
            Orientation::ByRow => (row, col),
            Orientation::ByCol => (col, row),
        }
    }

    pub fn nvals(&self) -> u64 {
        match &self.layout {
            Layout::Sparse { .. } | Layout::Hyper { .. } => self.i.len() as u64,
            Layout::Bitmap { b } => b.iter().filter(|v| **v != 0).count() as u64,
            Layout::Full => self.nrows * self.ncols,
        }
    }

    pub fn value(&self, p: u64) -> &[u8] {
        let start = p as usize * self.size;
        &self.x[start..start + self.size]
    }

    /// Range of positions holding outer vector `k`
    ///
    /// `k` is a major index, except for hypersparse where it indexes `h`.
    pub fn vector_range(&self, k: u64) -> (u64, u64) {
        match &self.layout {
            Layout::Sparse { p } | Layout::Hyper { p, .. } => (p[k as usize], p[k as usize + 1]),
            Layout::Bitmap { .. } | Layout::Full => {
                let start = k * self.nminor();
                (start, start + self.nminor())
            }
        }
    }

    /// Number of outer vectors an iterator can visit
    pub fn kount(&self) -> u64 {
        match &self.layout {
            Layout::Hyper { h, .. } => h.len() as u64,
            _ => self.nmajor(),
        }
    }

    /// Major index of outer vector `k`
    pub fn major_of(&self, k: u64) -> u64 {
        match &self.layout {
            Layout::Hyper { h, .. } => h[k as usize],
            _ => k,
        }
    }

    /// Minor index of the entry at position `p` within outer vector `k`
    pub fn minor_of(&self, k: u64, p: u64) -> u64 {
        match &self.layout {
            Layout::Sparse { .. } | Layout::Hyper { .. } => self.i[p as usize],
            Layout::Bitmap { .. } | Layout::Full => p - k * self.nminor(),
        }
    }

    /// Whether linear position `p` holds an entry (dense layouts)
    pub fn present(&self, p: u64) -> bool {
        match &self.layout {
            Layout::Bitmap { b } => b[p as usize] != 0,
            _ => true,
        }
    }

    /// Upper bound of linear positions
    pub fn pmax(&self) -> u64 {
        match &self.layout {
            Layout::Sparse { .. } | Layout::Hyper { .. } => self.i.len() as u64,
            Layout::Bitmap { .. } | Layout::Full => self.nrows * self.ncols,
        }
    }

    /// Outer vector holding compressed position `p`
    pub fn vector_of(&self, p: u64) -> u64 {
        match &self.layout {
            Layout::Sparse { p: ptr } | Layout::Hyper { p: ptr, .. } => {
                // last k with ptr[k] <= p
                (ptr.partition_point(|start| *start <= p) - 1) as u64
            }
            Layout::Bitmap { .. } | Layout::Full => p / self.nminor().max(1),
        }
    }

    pub fn get(&self, row: u64, col: u64) -> Option<&[u8]> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        let (major, minor) = self.to_mm(row, col);
        match &self.layout {
            Layout::Sparse { p } => {
                let (start, end) = (p[major as usize] as usize, p[major as usize + 1] as usize);
                let found = self.i[start..end].binary_search(&minor).ok()?;
                Some(self.value((start + found) as u64))
            }
            Layout::Hyper { h, p } => {
                let k = h.binary_search(&major).ok()?;
                let (start, end) = (p[k] as usize, p[k + 1] as usize);
                let found = self.i[start..end].binary_search(&minor).ok()?;
                Some(self.value((start + found) as u64))
            }
            Layout::Bitmap { .. } | Layout::Full => {
                let q = major * self.nminor() + minor;
                self.present(q).then(|| self.value(q))
            }
        }
    }

    pub fn for_each(&self, mut f: impl FnMut(u64, u64, &[u8])) {
        for k in 0..self.kount() {
            let major = self.major_of(k);
            let (start, end) = self.vector_range(k);
            for q in start..end {
                if self.present(q) {
                    let (row, col) = self.to_rc(major, self.minor_of(k, q));
                    f(row, col, self.value(q));
                }
            }
        }
    }

    pub fn entries(&self) -> Entries {
        let mut entries = Entries::new();
        self.for_each(|row, col, value| {
            entries.insert((row, col), value.to_vec());
        });
        entries
    }

    /// Lay out `entries` in `format`
    ///
    /// A full layout that would have holes is stored as bitmap instead, and a
    /// sparse layout with more outer vectors than a pointer array can hold is
    /// stored as hypersparse.
    pub fn from_entries(
        nrows: u64,
        ncols: u64,
        format: Format,
        size: usize,
        entries: &Entries,
    ) -> Result<Self, Info> {
        let mut storage = Storage {
            nrows,
            ncols,
            orientation: format.orientation,
            layout: Layout::Full,
            i: Vec::new(),
            x: Vec::new(),
            size,
        };

        // (major, minor, value) in storage order
        let mut ordered: Vec<(u64, u64, &[u8])> = entries
            .iter()
            .map(|((row, col), value)| {
                let (major, minor) = storage.to_mm(*row, *col);
                (major, minor, value.as_slice())
            })
            .collect();
        if format.orientation == Orientation::ByCol {
            ordered.sort_unstable_by_key(|(major, minor, _)| (*major, *minor));
        }

        let mut sparsity = format.sparsity;
        if sparsity == Sparsity::Full && ordered.len() as u64 != nrows.saturating_mul(ncols) {
            sparsity = Sparsity::Bitmap;
        }
        if sparsity == Sparsity::Sparse && storage.nmajor() > DENSE_LIMIT {
            sparsity = Sparsity::Hypersparse;
        }

        match sparsity {
            Sparsity::Sparse => {
                let nmajor = storage.nmajor() as usize;
                let mut p = vec![0u64; nmajor + 1];
                for (major, _, _) in &ordered {
                    p[*major as usize + 1] += 1;
                }
                for k in 0..nmajor {
                    p[k + 1] += p[k];
                }
                storage.fill_compressed(&ordered);
                storage.layout = Layout::Sparse { p };
            }
            Sparsity::Hypersparse => {
                let mut h: Vec<u64> = Vec::new();
                let mut p = vec![0u64];
                for (n, (major, _, _)) in ordered.iter().enumerate() {
                    if h.last() != Some(major) {
                        h.push(*major);
                        p.push(n as u64);
                    }
                    if let Some(last) = p.last_mut() {
                        *last = n as u64 + 1;
                    }
                }
                storage.fill_compressed(&ordered);
                storage.layout = Layout::Hyper { h, p };
            }
            Sparsity::Bitmap | Sparsity::Full => {
                let n = dense_len(nrows, ncols)?;
                let nminor = storage.nminor();
                let mut b = vec![0i8; n];
                storage.x = vec![0u8; n * size];
                for (major, minor, value) in &ordered {
                    let q = (major * nminor + minor) as usize;
                    b[q] = 1;
                    storage.x[q * size..(q + 1) * size].copy_from_slice(value);
                }
                storage.layout = if sparsity == Sparsity::Full {
                    Layout::Full
                } else {
                    Layout::Bitmap { b }
                };
            }
        }
        Ok(storage)
    }

    fn fill_compressed(&mut self, ordered: &[(u64, u64, &[u8])]) {
        self.i = ordered.iter().map(|(_, minor, _)| *minor).collect();
        self.x = Vec::with_capacity(ordered.len() * self.size);
        for (_, _, value) in ordered {
            self.x.extend_from_slice(value);
        }
    }

    pub fn convert(&self, format: Format) -> Result<Self, Info> {
        if self.format() == format {
            return Ok(self.clone());
        }
        Self::from_entries(self.nrows, self.ncols, format, self.size, &self.entries())
    }

    /// Take over a validated pack descriptor's buffers
    pub fn from_packed(packed: PackedMatrix) -> Result<Self, Info> {
        packed.validate()?;
        let layout = match packed.format.sparsity {
            Sparsity::Sparse => Layout::Sparse { p: packed.pointers },
            Sparsity::Hypersparse => Layout::Hyper {
                h: packed.hyper,
                p: packed.pointers,
            },
            Sparsity::Bitmap => Layout::Bitmap { b: packed.bitmap },
            Sparsity::Full => Layout::Full,
        };
        let storage = Storage {
            nrows: packed.nrows,
            ncols: packed.ncols,
            orientation: packed.format.orientation,
            layout,
            i: packed.indices,
            x: packed.values,
            size: packed.value_size,
        };
        if packed.jumbled {
            // lookups binary-search within a vector
            return Self::from_entries(
                storage.nrows,
                storage.ncols,
                storage.format(),
                storage.size,
                &storage.entries(),
            );
        }
        Ok(storage)
    }

    /// Hand the buffers back in `format`
    ///
    /// Fails with `InvalidValue` when a full layout is requested for a
    /// container with missing entries.
    pub fn into_packed(self, format: Format, domain: grb_core::Domain) -> Result<PackedMatrix, Info> {
        let storage = self.convert(format)?;
        if storage.format() != format {
            return Err(Info::InvalidValue);
        }
        let mut packed = PackedMatrix {
            format,
            nrows: storage.nrows,
            ncols: storage.ncols,
            pointers: Vec::new(),
            hyper: Vec::new(),
            indices: storage.i,
            bitmap: Vec::new(),
            values: storage.x,
            domain,
            value_size: storage.size,
            jumbled: false,
        };
        match storage.layout {
            Layout::Sparse { p } => packed.pointers = p,
            Layout::Hyper { h, p } => {
                packed.hyper = h;
                packed.pointers = p;
            }
            Layout::Bitmap { b } => packed.bitmap = b,
            Layout::Full => {}
        }
        Ok(packed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(list: &[(u64, u64, i32)]) -> Entries {
        list.iter()
            .map(|(r, c, v)| ((*r, *c), v.to_ne_bytes().to_vec()))
            .collect()
    }

    fn sample() -> Entries {
        entries(&[(0, 1, 10), (0, 3, 11), (2, 0, 12), (3, 3, 13)])
    }

    #[test]
    fn test_every_layout_holds_the_same_entries() {
        for sparsity in [Sparsity::Sparse, Sparsity::Hypersparse, Sparsity::Bitmap, Sparsity::Full] {
            for orientation in [Orientation::ByRow, Orientation::ByCol] {
                let format = Format::new(sparsity, orientation);
                let storage = Storage::from_entries(4, 4, format, 4, &sample()).unwrap();
                assert_eq!(storage.entries(), sample(), "{format}");
                assert_eq!(storage.nvals(), 4);
                assert_eq!(storage.get(2, 0), Some(&12i32.to_ne_bytes()[..]));
                assert_eq!(storage.get(1, 1), None);
            }
        }
    }

    #[test]
    fn test_full_with_holes_falls_back_to_bitmap() {
        let storage = Storage::from_entries(4, 4, Format::FULL_R, 4, &sample()).unwrap();
        assert_eq!(storage.format(), Format::BITMAP_R);
        assert_eq!(storage.clone().into_packed(Format::FULL_R, grb_core::Domain::Int32), Err(Info::InvalidValue));
    }

    #[test]
    fn test_hypersparse_lists_only_non_empty_vectors() {
        let storage = Storage::from_entries(4, 4, Format::HYPER_CSR, 4, &sample()).unwrap();
        match &storage.layout {
            Layout::Hyper { h, p } => {
                assert_eq!(h, &vec![0, 2, 3]);
                assert_eq!(p, &vec![0, 2, 3, 4]);
            }
            other => panic!("unexpected layout {other:?}"),
        }
        assert_eq!(storage.kount(), 3);
        assert_eq!(storage.vector_of(2), 1);
    }

    #[test]
    fn test_pack_round_trip() {
        let storage = Storage::from_entries(4, 4, Format::CSC, 4, &sample()).unwrap();
        let packed = storage.clone().into_packed(Format::CSC, grb_core::Domain::Int32).unwrap();
        assert_eq!(packed.pointers, vec![0, 1, 2, 2, 4]);
        let back = Storage::from_packed(packed).unwrap();
        assert_eq!(back, storage);
    }

    #[test]
    fn test_huge_sparse_layout_is_stored_hypersparse() {
        let storage = Storage::empty(1 << 40, 4, Format::CSR, 4).unwrap();
        assert_eq!(storage.format(), Format::HYPER_CSR);
        assert_eq!(storage.kount(), 0);

        let far = entries(&[(1 << 39, 2, 7)]);
        let storage = Storage::from_entries(1 << 40, 4, Format::CSR, 4, &far).unwrap();
        assert_eq!(storage.get(1 << 39, 2), Some(&7i32.to_ne_bytes()[..]));
        assert_eq!(storage.kount(), 1);

        // the minor dimension may be huge too
        let wide = Storage::from_entries(4, 1 << 40, Format::CSR, 4, &entries(&[(3, 1 << 39, 1)]));
        assert_eq!(wide.unwrap().format(), Format::CSR);
    }

    #[test]
    fn test_dense_limit() {
        let err = Storage::empty(1 << 20, 1 << 20, Format::BITMAP_R, 1);
        assert_eq!(err, Err(Info::OutOfMemory));
    }
}
