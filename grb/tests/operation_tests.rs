//! Element access, build, apply and extract through typed containers

#![cfg(feature = "reference")]

use std::ffi::c_void;

use grb::{
    ops, Context, Descriptor, EngineConfig, Format, GrbError, MaskMode, ReferenceEngine, Select,
};

fn context() -> Context<ReferenceEngine> {
    Context::init(ReferenceEngine::new(), EngineConfig::default()).expect("engine init")
}

unsafe extern "C" fn square_i32(z: *mut c_void, x: *const c_void) {
    let x = (x as *const i32).read_unaligned();
    (z as *mut i32).write_unaligned(x * x);
}

unsafe extern "C" fn saturating_add_u8(z: *mut c_void, x: *const c_void, y: *const c_void) {
    let x = (x as *const u8).read_unaligned();
    let y = (y as *const u8).read_unaligned();
    (z as *mut u8).write_unaligned(x.saturating_add(y));
}

#[test]
fn test_missing_element_is_none() {
    let ctx = context();
    let mut m = ctx.matrix::<f64>(3, 3).unwrap();
    assert_eq!(m.get(1, 2).unwrap(), None);

    m.set_element(1, 2, 0.25).unwrap();
    assert_eq!(m.get(1, 2).unwrap(), Some(0.25));
    assert_eq!(m.nvals().unwrap(), 1);

    m.remove_element(1, 2).unwrap();
    assert_eq!(m.get(1, 2).unwrap(), None);
    assert_eq!(m.nvals().unwrap(), 0);
}

#[test]
fn test_out_of_range_access_is_an_api_error() {
    let ctx = context();
    let mut v = ctx.vector::<i32>(4).unwrap();
    assert_eq!(v.set_element(4, 1), Err(GrbError::InvalidIndex));
    assert_eq!(v.get(9), Err(GrbError::InvalidIndex));
}

#[test]
fn test_build_combines_duplicates() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(2, 2).unwrap();
    m.build(&[0, 0, 1, 0], &[1, 1, 0, 1], &[2, 3, 4, 5], ctx.operator(ops::times::<i32>()))
        .unwrap();
    assert_eq!(m.get(0, 1).unwrap(), Some(30));
    assert_eq!(m.get(1, 0).unwrap(), Some(4));
    assert_eq!(m.nvals().unwrap(), 2);
}

#[test]
fn test_build_rules() {
    let ctx = context();

    let mut unique = ctx.vector::<i64>(5).unwrap();
    assert_eq!(unique.build_unique(&[1, 1], &[7, 8]), Err(GrbError::InvalidValue));

    let mut last = ctx.vector::<i64>(5).unwrap();
    last.build(&[1, 1, 1], &[7, 8, 9], ctx.operator(ops::ignore_dup())).unwrap();
    assert_eq!(last.get(1).unwrap(), Some(9));

    // a second build into a non-empty container is refused
    assert_eq!(
        last.build(&[2], &[1], ctx.operator(ops::plus::<i64>())),
        Err(GrbError::OutputNotEmpty)
    );

    let mut short = ctx.vector::<i64>(5).unwrap();
    assert_eq!(short.build_unique(&[0, 1], &[1]), Err(GrbError::InvalidValue));
    assert_eq!(short.build_unique(&[5], &[1]), Err(GrbError::InvalidIndex));
}

#[test]
fn test_user_unary_op_lifecycle() {
    let ctx = context();
    let before = ctx.engine().live_objects();

    let mut square = ctx.unary_op::<i32, i32>(square_i32, "square_i32").unwrap();
    assert_eq!(square.name(), "square_i32");
    assert_eq!(square.inputs().len(), 1);
    assert_eq!(ctx.engine().live_objects(), before + 1);

    {
        let mut input = ctx.vector::<i32>(3).unwrap();
        input.build_unique(&[0, 2], &[-3, 4]).unwrap();
        let mut out = ctx.vector::<i32>(3).unwrap();
        out.apply(None, None, &square, &input, None).unwrap();
        assert_eq!(out.get(0).unwrap(), Some(9));
        assert_eq!(out.get(1).unwrap(), None);
        assert_eq!(out.get(2).unwrap(), Some(16));
    }

    square.release().unwrap();
    assert!(square.is_released());
    assert_eq!(ctx.engine().live_objects(), before);
}

#[test]
fn test_user_binary_op_as_accumulator() {
    let ctx = context();
    let mut add = ctx.binary_op::<u8, u8, u8>(saturating_add_u8, "sat_add").unwrap();

    let mut input = ctx.vector::<u8>(2).unwrap();
    input.build_unique(&[0, 1], &[200, 5]).unwrap();
    let mut out = ctx.vector::<u8>(2).unwrap();
    out.set_element(0, 100).unwrap();
    out.apply(None, Some((&add).into()), ctx.operator(ops::identity::<u8>()), &input, None)
        .unwrap();
    assert_eq!(out.get(0).unwrap(), Some(255));
    assert_eq!(out.get(1).unwrap(), Some(5));

    drop(out);
    drop(input);
    add.release().unwrap();
}

#[test]
fn test_apply_with_transposed_input() {
    let ctx = context();
    let mut a = ctx.matrix::<i32>(2, 3).unwrap();
    a.build_unique(&[0, 1], &[2, 0], &[5, 6]).unwrap();

    let desc = ctx.descriptor(&Descriptor::new().with_transpose_first()).unwrap();
    let mut t = ctx.matrix::<i32>(3, 2).unwrap();
    t.apply(None, None, ctx.operator(ops::ainv::<i32>()), &a, Some(&desc)).unwrap();
    assert_eq!(t.get(2, 0).unwrap(), Some(-5));
    assert_eq!(t.get(0, 1).unwrap(), Some(-6));

    // without the transpose the shapes disagree
    let mut wrong = ctx.matrix::<i32>(3, 2).unwrap();
    assert_eq!(
        wrong.apply(None, None, ctx.operator(ops::ainv::<i32>()), &a, None),
        Err(GrbError::DimensionMismatch)
    );
}

#[test]
fn test_apply_through_complemented_structural_mask() {
    let ctx = context();
    let mut input = ctx.vector::<i32>(4).unwrap();
    input.build_unique(&[0, 1, 2, 3], &[1, 2, 3, 4]).unwrap();
    let mut mask = ctx.vector::<bool>(4).unwrap();
    mask.build_unique(&[1, 3], &[false, false]).unwrap();

    let desc = ctx
        .descriptor(&Descriptor::new().with_mask(MaskMode::StructureComplement).with_replace())
        .unwrap();
    let mut out = ctx.vector::<i32>(4).unwrap();
    out.set_element(1, 99).unwrap();
    out.apply(Some(mask.mask()), None, ctx.operator(ops::identity::<i32>()), &input, Some(&desc))
        .unwrap();

    let entries: Vec<_> = out.cursor().unwrap().entries().collect();
    assert_eq!(entries, vec![(0, 1), (2, 3)]);
}

#[test]
fn test_apply_positional_operator() {
    let ctx = context();
    let mut a = ctx.matrix::<f64>(3, 3).unwrap();
    a.build_unique(&[0, 2], &[1, 2], &[0.5, 1.5]).unwrap();
    let mut rows = ctx.matrix::<i64>(3, 3).unwrap();
    rows.apply(None, None, ctx.operator(ops::position_i::<i64>()), &a, None)
        .unwrap();
    assert_eq!(rows.get(0, 1).unwrap(), Some(0));
    assert_eq!(rows.get(2, 2).unwrap(), Some(2));
}

#[test]
fn test_extract_rows_and_all_columns() {
    let ctx = context();
    let mut a = ctx.matrix::<i32>(3, 2).unwrap();
    a.build_unique(&[0, 1, 2], &[0, 1, 0], &[10, 20, 30]).unwrap();

    let mut out = ctx.matrix::<i32>(2, 2).unwrap();
    out.extract(None, None, &a, Select::from(&[2i32, 0]), Select::<u64>::All, None)
        .unwrap();
    assert_eq!(out.get(0, 0).unwrap(), Some(30));
    assert_eq!(out.get(1, 0).unwrap(), Some(10));
    assert_eq!(out.nvals().unwrap(), 2);

    let mut bad = ctx.matrix::<i32>(1, 2).unwrap();
    assert_eq!(
        bad.extract(None, None, &a, Select::from(&[-1i32]), Select::<u64>::All, None),
        Err(GrbError::InvalidIndex)
    );
}

#[test]
fn test_vector_extract_with_duplicate_indices() {
    let ctx = context();
    let mut v = ctx.vector::<u32>(5).unwrap();
    v.build_unique(&[1, 4], &[11, 44]).unwrap();
    let mut out = ctx.vector::<u32>(3).unwrap();
    out.extract(None, None, &v, Select::from(&[4usize, 1, 4]), None).unwrap();
    let entries: Vec<_> = out.cursor().unwrap().entries().collect();
    assert_eq!(entries, vec![(0, 44), (1, 11), (2, 44)]);
}

#[test]
fn test_objects_are_freed_with_their_wrappers() {
    let ctx = context();
    let before = ctx.engine().live_objects();
    {
        let _m = ctx.matrix::<i8>(2, 2).unwrap();
        let _v = ctx.vector::<i8>(2).unwrap();
        let _d = ctx.descriptor(&Descriptor::new().with_replace()).unwrap();
        assert_eq!(ctx.engine().live_objects(), before + 3);
    }
    assert_eq!(ctx.engine().live_objects(), before);
}

#[test]
fn test_huge_dimensions_start_empty() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(1 << 40, 4).unwrap();
    assert_eq!(m.dims(), (1 << 40, 4));
    assert_eq!(m.nvals().unwrap(), 0);

    m.set_element((1 << 40) - 1, 3, 12).unwrap();
    assert_eq!(m.get((1 << 40) - 1, 3).unwrap(), Some(12));
    assert_eq!(m.get(0, 0).unwrap(), None);
    assert_eq!(m.nvals().unwrap(), 1);

    let mut v = ctx.vector::<u8>(1 << 40).unwrap();
    v.set_element(1 << 39, 1).unwrap();
    assert_eq!(v.nvals().unwrap(), 1);
}

#[test]
#[should_panic(expected = "GraphBLAS execution error")]
fn test_execution_errors_panic() {
    let ctx = context();
    let mut huge = ctx.matrix::<u8>(1 << 20, 1 << 20).unwrap();
    // a dense layout of this shape cannot be allocated
    let _ = huge.set_format(Format::BITMAP_R);
}
