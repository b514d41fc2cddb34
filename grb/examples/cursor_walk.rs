//! Build a random matrix and walk it with each cursor kind
//!
//! Run with: RUST_LOG=grb=debug cargo run --example cursor_walk [config.json]

use std::time::Instant;

use grb::{ops, Context, EngineConfig, Format, Outcome, ReferenceEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    println!("Engine config:\n{}", config.to_json_string()?);

    let ctx = Context::init(ReferenceEngine::new(), config)?;

    let (nrows, ncols, tuples) = (2000u64, 500u64, 20_000usize);
    let mut rng = StdRng::seed_from_u64(2024);
    let rows: Vec<u64> = (0..tuples).map(|_| rng.gen_range(0..nrows)).collect();
    let cols: Vec<u64> = (0..tuples).map(|_| rng.gen_range(0..ncols)).collect();
    let vals: Vec<f32> = (0..tuples).map(|_| rng.gen_range(0.0..1.0)).collect();

    println!("\nBuilding {nrows} x {ncols} matrix from {tuples} tuples...");
    let start = Instant::now();
    let mut m = ctx.matrix::<f32>(nrows, ncols)?;
    m.build(&rows, &cols, &vals, ctx.operator(ops::max::<f32>()))?;
    println!(
        "Built in {:.3}ms, {} entries stored as {}",
        start.elapsed().as_secs_f64() * 1000.0,
        m.nvals()?,
        m.format()?
    );

    // Row walk: heaviest row
    let start = Instant::now();
    let mut cursor = m.row_cursor()?;
    let mut best = (0u64, 0.0f32);
    let mut outcome = cursor.seek_row(0);
    while outcome != Outcome::Exhausted {
        if outcome == Outcome::Success {
            let row = cursor.row().unwrap_or_default();
            let mut sum = cursor.get();
            while cursor.next_col_in_row() {
                sum += cursor.get();
            }
            if sum > best.1 {
                best = (row, sum);
            }
        }
        outcome = cursor.next_row();
    }
    drop(cursor);
    println!(
        "\nRow cursor: heaviest row {} (sum {:.3}) in {:.3}ms",
        best.0,
        best.1,
        start.elapsed().as_secs_f64() * 1000.0
    );

    // Column walk needs by-column storage
    m.set_format(Format::CSC)?;
    let start = Instant::now();
    let cursor = m.col_cursor()?;
    let occupied = cursor.kount();
    let visited = cursor.entries().count();
    println!(
        "Col cursor: {visited} entries across {occupied} columns in {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    for format in [Format::HYPER_CSR, Format::BITMAP_R] {
        m.set_format(format)?;
        let start = Instant::now();
        let cursor = m.entry_cursor()?;
        let pmax = cursor.pmax();
        let max = cursor.entries().map(|(_, v)| v).fold(f32::MIN, f32::max);
        println!(
            "Entry cursor over {format}: pmax {pmax}, max value {max:.3} in {:.3}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
    }

    let mut v = ctx.vector::<i64>(ncols)?;
    v.build_unique(&[3, 17, 250], &[30, 170, 2500])?;
    let mut cursor = v.cursor()?;
    println!("\nVector cursor:");
    let mut outcome = cursor.seek(0);
    while outcome == Outcome::Success {
        if let Some(index) = cursor.index() {
            println!("   v[{index}] = {}", cursor.get());
        }
        outcome = cursor.next();
    }

    Ok(())
}
