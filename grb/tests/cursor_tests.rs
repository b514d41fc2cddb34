//! Cursor traversal against the reference engine
//!
//! Matrices are filled from seeded random tuples and walked in every
//! traversal order; each walk must visit exactly the stored entries.

#![cfg(feature = "reference")]

use std::collections::BTreeMap;

use grb::{Context, CursorState, EngineConfig, Format, GrbError, Outcome, ReferenceEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn context() -> Context<ReferenceEngine> {
    Context::init(ReferenceEngine::new(), EngineConfig::default()).expect("engine init")
}

fn random_entries(seed: u64, nrows: u64, ncols: u64, count: usize) -> BTreeMap<(u64, u64), i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut entries = BTreeMap::new();
    while entries.len() < count {
        let row = rng.gen_range(0..nrows);
        let col = rng.gen_range(0..ncols);
        entries.insert((row, col), rng.gen_range(-1000..1000));
    }
    entries
}

fn tuples(entries: &BTreeMap<(u64, u64), i64>) -> (Vec<u64>, Vec<u64>, Vec<i64>) {
    let rows = entries.keys().map(|(r, _)| *r).collect();
    let cols = entries.keys().map(|(_, c)| *c).collect();
    let vals = entries.values().copied().collect();
    (rows, cols, vals)
}

#[test]
fn test_row_cursor_visits_every_entry_in_row_order() {
    let ctx = context();
    let expected = random_entries(7, 40, 30, 200);
    let (rows, cols, vals) = tuples(&expected);
    let mut m = ctx.matrix::<i64>(40, 30).unwrap();
    m.build_unique(&rows, &cols, &vals).unwrap();

    let seen: Vec<_> = m.row_cursor().unwrap().entries().collect();
    let expected: Vec<_> = expected.into_iter().collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_col_cursor_visits_every_entry_in_col_order() {
    let ctx = context();
    let expected = random_entries(11, 25, 50, 150);
    let (rows, cols, vals) = tuples(&expected);
    let mut m = ctx.matrix::<i64>(25, 50).unwrap();
    m.build_unique(&rows, &cols, &vals).unwrap();
    m.set_format(Format::CSC).unwrap();

    let seen: Vec<_> = m.col_cursor().unwrap().entries().collect();
    let mut by_col: Vec<_> = expected.into_iter().collect();
    by_col.sort_by_key(|((row, col), _)| (*col, *row));
    assert_eq!(seen, by_col);
}

#[test]
fn test_entry_cursor_agrees_across_formats() {
    let ctx = context();
    let expected = random_entries(3, 16, 16, 60);
    let (rows, cols, vals) = tuples(&expected);

    for format in [Format::CSR, Format::CSC, Format::HYPER_CSR, Format::HYPER_CSC, Format::BITMAP_R] {
        let mut m = ctx.matrix::<i64>(16, 16).unwrap();
        m.build_unique(&rows, &cols, &vals).unwrap();
        m.set_format(format).unwrap();
        assert_eq!(m.format().unwrap(), format);

        let seen: BTreeMap<_, _> = m.entry_cursor().unwrap().entries().collect();
        assert_eq!(seen, expected, "{format}");
    }
}

#[test]
fn test_vector_cursor_visits_every_entry() {
    let ctx = context();
    let mut rng = StdRng::seed_from_u64(21);
    let mut expected = BTreeMap::new();
    while expected.len() < 50 {
        expected.insert(rng.gen_range(0..500u64), rng.gen::<f64>());
    }
    let indices: Vec<u64> = expected.keys().copied().collect();
    let values: Vec<f64> = expected.values().copied().collect();
    let mut v = ctx.vector::<f64>(500).unwrap();
    v.build_unique(&indices, &values).unwrap();

    let seen: BTreeMap<_, _> = v.cursor().unwrap().entries().collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_seek_past_the_end_is_terminal() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(4, 4).unwrap();
    m.build_unique(&[0, 3], &[1, 2], &[5, 6]).unwrap();

    let mut cursor = m.row_cursor().unwrap();
    assert_eq!(cursor.seek_row(4), Outcome::Exhausted);
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.seek_row(0), Outcome::Exhausted);
    assert_eq!(cursor.next_row(), Outcome::Exhausted);
    assert_eq!(cursor.entries().count(), 0);
}

#[test]
fn test_empty_row_reports_no_value() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(3, 3).unwrap();
    m.build_unique(&[0, 0, 2], &[0, 2, 1], &[1, 2, 3]).unwrap();

    let mut cursor = m.row_cursor().unwrap();
    assert_eq!(cursor.seek_row(1), Outcome::NoValue);
    assert_eq!(cursor.state(), CursorState::AtEmpty);
    assert_eq!(cursor.row(), Some(1));
    assert_eq!(cursor.col(), None);

    assert_eq!(cursor.next_row(), Outcome::Success);
    assert_eq!(cursor.position(), Some((2, 1)));
    assert_eq!(cursor.get(), 3);
    assert!(!cursor.next_col_in_row());
    assert_eq!(cursor.next_row(), Outcome::Exhausted);
}

#[test]
fn test_walk_reports_empty_rows_by_index() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(4, 3).unwrap();
    m.build_unique(&[0, 0, 3], &[0, 2, 1], &[1, 2, 3]).unwrap();

    let mut cursor = m.row_cursor().unwrap();
    assert_eq!(cursor.row(), None);
    assert_eq!(cursor.seek_row(0), Outcome::Success);
    assert!(cursor.next_col_in_row());
    assert!(!cursor.next_col_in_row());
    // end of the row keeps the row
    assert_eq!(cursor.row(), Some(0));

    assert_eq!(cursor.next_row(), Outcome::NoValue);
    assert_eq!(cursor.state(), CursorState::AtEmpty);
    assert_eq!(cursor.row(), Some(1));
    assert_eq!(cursor.next_row(), Outcome::NoValue);
    assert_eq!(cursor.row(), Some(2));
    assert_eq!(cursor.next_row(), Outcome::Success);
    assert_eq!(cursor.position(), Some((3, 1)));
    assert_eq!(cursor.next_row(), Outcome::Exhausted);
    assert_eq!(cursor.row(), None);
}

#[test]
fn test_entries_start_at_the_current_entry() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(3, 3).unwrap();
    m.build_unique(&[0, 1, 1, 2], &[1, 0, 2, 1], &[1, 2, 3, 4]).unwrap();

    let mut cursor = m.row_cursor().unwrap();
    assert_eq!(cursor.seek_row(1), Outcome::Success);
    assert_eq!(cursor.position(), Some((1, 0)));
    let rest: Vec<_> = cursor.entries().collect();
    assert_eq!(rest, vec![((1, 0), 2), ((1, 2), 3), ((2, 1), 4)]);

    let mut cursor = m.entry_cursor().unwrap();
    assert_eq!(cursor.seek(2), Outcome::Success);
    assert_eq!(cursor.entries().count(), 2);

    let mut cursor = m.row_cursor().unwrap();
    assert_eq!(cursor.seek_by_rank(2), Outcome::Success);
    let rest: Vec<_> = cursor.entries().collect();
    assert_eq!(rest, vec![((2, 1), 4)]);
}

#[test]
fn test_entries_from_an_empty_row_skip_ahead() {
    let ctx = context();
    let mut m = ctx.matrix::<u8>(3, 2).unwrap();
    m.build_unique(&[0, 2], &[1, 0], &[5, 6]).unwrap();

    let mut cursor = m.row_cursor().unwrap();
    assert_eq!(cursor.seek_row(1), Outcome::NoValue);
    let rest: Vec<_> = cursor.entries().collect();
    assert_eq!(rest, vec![((2, 0), 6)]);
}

#[test]
fn test_col_seek_past_the_end_is_terminal() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(3, 3).unwrap();
    m.build_unique(&[0, 2], &[0, 1], &[1, 2]).unwrap();
    m.set_format(Format::CSC).unwrap();

    let mut cursor = m.col_cursor().unwrap();
    assert_eq!(cursor.kount(), 3);
    assert_eq!(cursor.seek_col(2), Outcome::NoValue);
    assert_eq!(cursor.col(), Some(2));
    assert_eq!(cursor.seek_col(3), Outcome::Exhausted);
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.col(), None);
    assert_eq!(cursor.seek_col(0), Outcome::Exhausted);
    assert_eq!(cursor.next_col(), Outcome::Exhausted);
    assert!(!cursor.next_row_in_col());
}

#[test]
fn test_nested_row_walk() {
    let ctx = context();
    let mut m = ctx.matrix::<u8>(2, 5).unwrap();
    m.build_unique(&[0, 0, 0, 1], &[0, 2, 4, 3], &[1, 2, 3, 4]).unwrap();

    let mut cursor = m.row_cursor().unwrap();
    assert_eq!(cursor.kount(), 2);
    assert_eq!(cursor.seek_row(0), Outcome::Success);
    let mut cols = vec![cursor.col().unwrap()];
    while cursor.next_col_in_row() {
        cols.push(cursor.col().unwrap());
    }
    assert_eq!(cols, vec![0, 2, 4]);
    assert_eq!(cursor.state(), CursorState::AtEmpty);
}

#[test]
fn test_seek_by_rank_on_hypersparse_rows() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(1000, 10).unwrap();
    m.build_unique(&[3, 500, 999], &[1, 2, 3], &[10, 20, 30]).unwrap();
    m.set_format(Format::HYPER_CSR).unwrap();

    let mut cursor = m.row_cursor().unwrap();
    assert_eq!(cursor.kount(), 3);
    assert_eq!(cursor.seek_by_rank(1), Outcome::Success);
    assert_eq!(cursor.row(), Some(500));
    assert_eq!(cursor.get(), 20);
    // a row that is not stored lands on the next stored one
    assert_eq!(cursor.seek_row(501), Outcome::Success);
    assert_eq!(cursor.row(), Some(999));
    assert_eq!(cursor.seek_by_rank(3), Outcome::Exhausted);
}

#[test]
fn test_bitmap_entry_cursor_positions() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(4, 4).unwrap();
    m.build_unique(&[0, 2], &[1, 0], &[7, 8]).unwrap();
    m.set_format(Format::BITMAP_R).unwrap();

    let mut cursor = m.entry_cursor().unwrap();
    assert_eq!(cursor.pmax(), 16);
    assert_eq!(cursor.seek(2), Outcome::Success);
    assert_eq!(cursor.p(), 8);
    assert_eq!(cursor.index(), Some((2, 0)));
    assert_eq!(cursor.next(), Outcome::Exhausted);
}

#[test]
fn test_cursor_orientation_must_match_storage() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(2, 2).unwrap();
    m.set_format(Format::CSC).unwrap();
    assert!(matches!(m.row_cursor(), Err(GrbError::NotImplemented)));
    assert!(m.col_cursor().is_ok());
}

#[test]
fn test_cursors_release_engine_iterators() {
    let ctx = context();
    let m = ctx.matrix::<i32>(2, 2).unwrap();
    {
        let _rows = m.row_cursor().unwrap();
        let _entries = m.entry_cursor().unwrap();
        assert_eq!(ctx.engine().live_iterators(), 2);
    }
    assert_eq!(ctx.engine().live_iterators(), 0);
}

#[test]
#[should_panic(expected = "cursor is not positioned at an entry")]
fn test_get_before_seek_panics() {
    let ctx = context();
    let m = ctx.matrix::<i32>(2, 2).unwrap();
    let cursor = m.row_cursor().unwrap();
    let _ = cursor.get();
}
