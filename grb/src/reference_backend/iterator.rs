//! Iterator state machine for the reference engine
//!
//! Mirrors the engine iterator contract: row/column iterators walk outer
//! vectors and the entries inside them, entry iterators walk a linear
//! position in `[0, pmax)`. Movement reports `Success`, `NoValue` (outer
//! vector without entries, or end of the current vector) or `Exhausted`.

use std::sync::Arc;

use grb_core::{CursorKind, Info};

use super::storage::Storage;

#[derive(Debug)]
pub struct RefIterator {
    pub(crate) storage: Arc<Storage>,
    /// Outer vector ordinal (hypersparse: index into the hyperlist)
    k: u64,
    /// Current position
    p: u64,
    /// End of the current outer vector
    pend: u64,
}

impl RefIterator {
    pub(crate) fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            k: 0,
            p: 0,
            pend: 0,
        }
    }

    pub(crate) fn kount(&self) -> u64 {
        self.storage.kount()
    }

    pub(crate) fn pmax(&self) -> u64 {
        self.storage.pmax()
    }

    /// First present position at or after `p`, before `end`
    fn skip_absent(&self, mut p: u64, end: u64) -> u64 {
        while p < end && !self.storage.present(p) {
            p += 1;
        }
        p
    }

    /// Position on the `k`th outer vector
    pub(crate) fn kseek(&mut self, k: u64) -> Info {
        if k >= self.kount() {
            self.k = self.kount();
            return Info::Exhausted;
        }
        let (start, end) = self.storage.vector_range(k);
        self.k = k;
        self.pend = end;
        self.p = self.skip_absent(start, end);
        if self.p >= self.pend {
            Info::NoValue
        } else {
            Info::Success
        }
    }

    /// Position on outer vector `major`, or the next stored one
    pub(crate) fn seek_vector(&mut self, major: u64) -> Info {
        match &self.storage.layout {
            super::storage::Layout::Hyper { h, .. } => {
                let k = h.partition_point(|v| *v < major) as u64;
                self.kseek(k)
            }
            _ => self.kseek(major),
        }
    }

    pub(crate) fn next_vector(&mut self) -> Info {
        self.kseek(self.k + 1)
    }

    /// Next entry inside the current outer vector
    pub(crate) fn next_inner(&mut self) -> Info {
        if self.p >= self.pend {
            return Info::NoValue;
        }
        self.p = self.skip_absent(self.p + 1, self.pend);
        if self.p >= self.pend {
            Info::NoValue
        } else {
            Info::Success
        }
    }

    /// Linear seek: land on the entry at or after `p`
    pub(crate) fn seek_entry(&mut self, p: u64) -> Info {
        let pmax = self.pmax();
        let p = self.skip_absent(p, pmax);
        if p >= pmax {
            self.p = pmax;
            return Info::Exhausted;
        }
        self.p = p;
        self.k = self.storage.vector_of(p);
        Info::Success
    }

    pub(crate) fn next_entry(&mut self) -> Info {
        if self.p >= self.pmax() {
            return Info::Exhausted;
        }
        self.seek_entry(self.p + 1)
    }

    pub(crate) fn p(&self) -> u64 {
        self.p
    }

    /// Major index of the current outer vector
    pub(crate) fn outer(&self) -> u64 {
        self.storage.major_of(self.k)
    }

    /// `(row, col)` of the current entry
    pub(crate) fn index(&self, kind: CursorKind) -> (u64, u64) {
        let major = self.storage.major_of(self.k);
        let minor = self.storage.minor_of(self.k, self.p);
        match kind {
            CursorKind::VectorEntry => (minor, 0),
            _ => self.storage.to_rc(major, minor),
        }
    }

    pub(crate) fn value(&self) -> &[u8] {
        self.storage.value(self.p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference_backend::storage::Entries;
    use grb_core::Format;

    fn storage(format: Format) -> Arc<Storage> {
        let entries: Entries = [(0u64, 1u64), (0, 3), (2, 0), (3, 3)]
            .iter()
            .map(|rc| (*rc, vec![1u8]))
            .collect();
        Arc::new(Storage::from_entries(4, 4, format, 1, &entries).unwrap())
    }

    fn walk_rows(it: &mut RefIterator) -> Vec<(u64, u64)> {
        let mut seen = Vec::new();
        let mut info = it.kseek(0);
        while info != Info::Exhausted {
            if info == Info::Success {
                loop {
                    seen.push(it.index(CursorKind::Row));
                    if it.next_inner() != Info::Success {
                        break;
                    }
                }
            }
            info = it.next_vector();
        }
        seen
    }

    #[test]
    fn test_row_walk_matches_across_layouts() {
        let expected = vec![(0, 1), (0, 3), (2, 0), (3, 3)];
        for format in [Format::CSR, Format::HYPER_CSR, Format::BITMAP_R] {
            let mut it = RefIterator::new(storage(format));
            assert_eq!(walk_rows(&mut it), expected, "{format}");
        }
    }

    #[test]
    fn test_empty_row_reports_no_value() {
        let mut it = RefIterator::new(storage(Format::CSR));
        assert_eq!(it.seek_vector(1), Info::NoValue);
        assert_eq!(it.outer(), 1);
        assert_eq!(it.seek_vector(4), Info::Exhausted);
    }

    #[test]
    fn test_hypersparse_seek_skips_to_next_stored_row() {
        let mut it = RefIterator::new(storage(Format::HYPER_CSR));
        assert_eq!(it.seek_vector(1), Info::Success);
        assert_eq!(it.index(CursorKind::Row), (2, 0));
    }

    #[test]
    fn test_bitmap_entry_seek_lands_on_next_entry() {
        let mut it = RefIterator::new(storage(Format::BITMAP_R));
        assert_eq!(it.pmax(), 16);
        assert_eq!(it.seek_entry(4), Info::Success);
        assert_eq!(it.p(), 8);
        assert_eq!(it.index(CursorKind::MatrixEntry), (2, 0));
        assert_eq!(it.seek_entry(16), Info::Exhausted);
        assert_eq!(it.next_entry(), Info::Exhausted);
    }
}
