//! Operator resolution: distinct symbols, aliases and native widths

#![cfg(feature = "reference")]

use std::collections::{BTreeMap, HashSet};

use grb::ops::{self, OpKind};
use grb::{
    Complex64, Context, Domain, EngineConfig, HasRaw, NativeWidth, OpFamily, RawHandle,
    ReferenceEngine,
};

fn context() -> Context<ReferenceEngine> {
    Context::init(ReferenceEngine::new(), EngineConfig::default()).expect("engine init")
}

#[test]
fn test_typed_variants_are_distinct() {
    assert_ne!(ops::plus::<i32>(), ops::plus::<i64>());
    assert_ne!(ops::plus::<i32>(), ops::times::<i32>());
    assert_eq!(ops::plus::<i32>().symbol(), "GrB_PLUS_INT32");
    assert_eq!(ops::plus::<f64>().symbol(), "GrB_PLUS_FP64");
    assert_eq!(ops::plus::<Complex64>().symbol(), "GxB_PLUS_FC64");
    assert_eq!(ops::sqrt::<f32>().symbol(), "GxB_SQRT_FP32");
    assert_eq!(ops::ignore_dup().symbol(), "GxB_IGNORE_DUP");
}

#[test]
fn test_output_domains_follow_family_rules() {
    assert_eq!(ops::plus::<u16>().output(), Some(Domain::UInt16));
    assert_eq!(ops::eq::<f32>().output(), Some(Domain::Bool));
    assert_eq!(ops::creal::<Complex64>().output(), Some(Domain::Float64));
    assert_eq!(ops::cmplx::<f64>().output(), Some(Domain::Complex64));
    assert_eq!(ops::ignore_dup().output(), None);
    assert_eq!(ops::row_index::<i64>().kind(), OpKind::IndexUnary);
}

#[test]
fn test_native_width_resolves_to_fixed_width() {
    let wide = OpFamily::Plus.resolve_for(Domain::NativeInt, NativeWidth::W64);
    assert_eq!(wide, OpFamily::Plus.resolve(Domain::Int64));
    let narrow = OpFamily::Plus.resolve_for(Domain::NativeUInt, NativeWidth::W32);
    assert_eq!(narrow.symbol(), "GrB_PLUS_UINT32");

    #[cfg(target_pointer_width = "64")]
    assert_eq!(ops::plus::<isize>(), ops::plus::<i64>());
    #[cfg(target_pointer_width = "32")]
    assert_eq!(ops::plus::<isize>(), ops::plus::<i32>());
}

#[test]
fn test_bool_logical_aliases() {
    assert_ne!(ops::lnot::<bool>(), ops::lnot_bool());
    assert_eq!(ops::lnot::<bool>().symbol(), "GxB_LNOT_BOOL");
    assert_eq!(ops::lnot_bool().symbol(), "GrB_LNOT");
    assert_eq!(ops::lor_bool().symbol(), "GrB_LOR");

    let ctx = context();
    let mut input = ctx.vector::<bool>(4).unwrap();
    input.build_unique(&[0, 1, 3], &[true, false, true]).unwrap();

    let mut typed = ctx.vector::<bool>(4).unwrap();
    typed.apply(None, None, ctx.operator(ops::lnot::<bool>()), &input, None).unwrap();
    let mut alias = ctx.vector::<bool>(4).unwrap();
    alias.apply(None, None, ctx.operator(ops::lnot_bool()), &input, None).unwrap();

    let typed: Vec<_> = typed.cursor().unwrap().entries().collect();
    let alias: Vec<_> = alias.cursor().unwrap().entries().collect();
    assert_eq!(typed, vec![(0, false), (1, true), (3, false)]);
    assert_eq!(typed, alias);
}

#[test]
fn test_engine_handles_are_interned() {
    let ctx = context();
    let a = ctx.operator(ops::plus::<i32>());
    let b = ctx.operator(ops::plus::<i32>());
    let c = ctx.operator(ops::plus::<i64>());
    assert_eq!(a.raw(), b.raw());
    assert_ne!(a.raw(), c.raw());
    assert_eq!(a.builtin(), ops::plus::<i32>());
    assert_eq!(a.output(), Some(Domain::Int32));
}

#[test]
fn test_every_catalog_op_gets_its_own_handle() {
    let ctx = context();
    let catalog = ops::catalog();
    let first: BTreeMap<_, _> = catalog
        .iter()
        .map(|op| (*op, ctx.operator(*op).raw()))
        .collect();

    assert!(first.len() > OpFamily::ALL.len());
    assert!(first.values().all(|handle| !handle.is_null()));
    let distinct: HashSet<_> = first.values().copied().collect();
    assert_eq!(distinct.len(), first.len());

    // resolving again hands back the interned handle
    for op in catalog.iter().rev() {
        assert_eq!(ctx.operator(*op).raw(), first[op], "{}", op.symbol());
    }
}

#[test]
fn test_bool_arithmetic_maps_to_logic() {
    let ctx = context();
    let mut m = ctx.matrix::<bool>(1, 3).unwrap();
    // duplicates at column 0 and 1 fold with PLUS, which is OR on bool
    m.build(
        &[0, 0, 0, 0, 0],
        &[0, 0, 1, 1, 2],
        &[true, false, false, false, true],
        ctx.operator(ops::plus::<bool>()),
    )
    .unwrap();
    assert_eq!(m.get(0, 0).unwrap(), Some(true));
    assert_eq!(m.get(0, 1).unwrap(), Some(false));
    assert_eq!(m.get(0, 2).unwrap(), Some(true));
}
