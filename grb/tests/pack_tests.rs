//! Moving storage in and out of containers without copying through tuples

#![cfg(feature = "reference")]

use grb::{
    Context, EngineConfig, Format, GrbError, Orientation, PackedMatrix, PackedVector,
    ReferenceEngine, Sparsity,
};

fn context() -> Context<ReferenceEngine> {
    Context::init(ReferenceEngine::new(), EngineConfig::default()).expect("engine init")
}

// 3 x 4
// [ 1 . 2 . ]
// [ . . . . ]
// [ . 3 . 4 ]
fn csr_sample() -> PackedMatrix {
    PackedMatrix::csr::<i32>(3, 4, vec![0, 2, 2, 4], vec![0, 2, 1, 3], &[1, 2, 3, 4])
}

#[test]
fn test_pack_csr_hands_over_buffers() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(3, 4).unwrap();
    let mut packed = csr_sample();
    m.pack(&mut packed).unwrap();

    assert!(packed.is_empty());
    assert_eq!(m.nvals().unwrap(), 4);
    assert_eq!(m.format().unwrap(), Format::CSR);
    assert_eq!(m.get(0, 2).unwrap(), Some(2));
    assert_eq!(m.get(2, 1).unwrap(), Some(3));
    assert_eq!(m.get(1, 1).unwrap(), None);
}

#[test]
fn test_unpack_leaves_matrix_empty() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(3, 4).unwrap();
    m.pack(&mut csr_sample()).unwrap();

    let out = m.unpack(Format::CSR).unwrap();
    assert_eq!(out, csr_sample());
    assert_eq!(m.nvals().unwrap(), 0);
    assert_eq!(m.dims(), (3, 4));
}

#[test]
fn test_unpack_converts_between_layouts() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(3, 4).unwrap();
    m.pack(&mut csr_sample()).unwrap();

    let csc = m.unpack(Format::CSC).unwrap();
    assert_eq!(csc.pointers, vec![0, 1, 2, 3, 4]);
    assert_eq!(csc.indices, vec![0, 2, 0, 2]);
    assert_eq!(csc.values::<i32>().unwrap(), vec![1, 3, 2, 4]);

    let mut csc = csc;
    m.pack(&mut csc).unwrap();
    let hyper = m.unpack(Format::HYPER_CSR).unwrap();
    assert_eq!(hyper.hyper, vec![0, 2]);
    assert_eq!(hyper.pointers, vec![0, 2, 4]);
    assert_eq!(hyper.nvals(), 4);

    let mut hyper = hyper;
    m.pack(&mut hyper).unwrap();
    let bitmap = m.unpack(Format::BITMAP_R).unwrap();
    assert_eq!(bitmap.bitmap, vec![1, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1]);
    assert_eq!(bitmap.nvals(), 4);
}

#[test]
fn test_full_round_trip() {
    let ctx = context();
    let mut m = ctx.matrix::<f64>(2, 2).unwrap();
    let mut packed = PackedMatrix::full(Orientation::ByCol, 2, 2, &[1.0, 2.0, 3.0, 4.0]);
    m.pack(&mut packed).unwrap();
    assert!(packed.is_empty());

    // column-major: (1, 0) holds the second value
    assert_eq!(m.get(1, 0).unwrap(), Some(2.0));
    assert_eq!(m.get(0, 1).unwrap(), Some(3.0));

    let by_row = m.unpack(Format::FULL_R).unwrap();
    assert_eq!(by_row.values::<f64>().unwrap(), vec![1.0, 3.0, 2.0, 4.0]);
}

#[test]
fn test_full_unpack_requires_every_entry() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(3, 4).unwrap();
    m.pack(&mut csr_sample()).unwrap();
    assert!(matches!(m.unpack(Format::FULL_R), Err(GrbError::InvalidValue)));
    // a failed unpack leaves the contents in place
    assert_eq!(m.nvals().unwrap(), 4);
}

#[test]
fn test_pack_rejects_mismatched_buffers() {
    let ctx = context();

    let mut wrong_domain = ctx.matrix::<i64>(3, 4).unwrap();
    let mut packed = csr_sample();
    assert_eq!(wrong_domain.pack(&mut packed), Err(GrbError::DomainMismatch));
    assert_eq!(packed, csr_sample());

    let mut wrong_shape = ctx.matrix::<i32>(4, 3).unwrap();
    assert_eq!(wrong_shape.pack(&mut packed), Err(GrbError::DimensionMismatch));
    assert!(!packed.is_empty());

    let mut m = ctx.matrix::<i32>(3, 4).unwrap();
    let mut bad_index = PackedMatrix::csr::<i32>(3, 4, vec![0, 1, 1, 1], vec![4], &[9]);
    assert_eq!(m.pack(&mut bad_index), Err(GrbError::InvalidIndex));

    let mut short_pointers = PackedMatrix::csr::<i32>(3, 4, vec![0, 1], vec![0], &[9]);
    assert_eq!(m.pack(&mut short_pointers), Err(GrbError::InvalidValue));
}

#[test]
fn test_jumbled_buffers_are_sorted_on_pack() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(3, 4).unwrap();
    let mut packed = PackedMatrix::csr::<i32>(3, 4, vec![0, 2, 2, 4], vec![2, 0, 3, 1], &[2, 1, 4, 3]);
    packed.jumbled = true;
    m.pack(&mut packed).unwrap();

    assert_eq!(m.unpack(Format::CSR).unwrap(), csr_sample());
}

#[test]
#[should_panic(expected = "GraphBLAS execution error")]
fn test_unsorted_buffers_are_an_invalid_object() {
    let ctx = context();
    let mut m = ctx.matrix::<i32>(3, 4).unwrap();
    let mut packed = PackedMatrix::csr::<i32>(3, 4, vec![0, 2, 2, 4], vec![2, 0, 1, 3], &[2, 1, 3, 4]);
    let _ = m.pack(&mut packed);
}

#[test]
fn test_vector_pack_round_trip() {
    let ctx = context();
    let mut v = ctx.vector::<u16>(6).unwrap();
    let mut packed = PackedVector::sparse::<u16>(6, vec![1, 4], &[10, 40]);
    v.pack(&mut packed).unwrap();
    assert!(packed.is_empty());
    assert_eq!(v.get(4).unwrap(), Some(40));

    let bitmap = v.unpack(Sparsity::Bitmap).unwrap();
    assert_eq!(bitmap.bitmap, vec![0, 1, 0, 0, 1, 0]);
    assert_eq!(bitmap.nvals(), 2);
    assert_eq!(v.nvals().unwrap(), 0);

    let mut full = PackedVector::full::<u16>(&[5, 6, 7, 8, 9, 10]);
    v.pack(&mut full).unwrap();
    let sparse = v.unpack(Sparsity::Sparse).unwrap();
    assert_eq!(sparse.indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(sparse.values::<u16>().unwrap(), vec![5, 6, 7, 8, 9, 10]);
}

#[test]
fn test_vector_rejects_hypersparse() {
    let ctx = context();
    let mut v = ctx.vector::<u16>(6).unwrap();
    assert!(matches!(v.unpack(Sparsity::Hypersparse), Err(GrbError::InvalidValue)));
}

#[test]
fn test_packed_values_check_their_domain() {
    let packed = csr_sample();
    assert_eq!(packed.values::<i32>().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(packed.values::<f32>(), Err(GrbError::DomainMismatch));
    assert_eq!(packed.format.sparsity, Sparsity::Sparse);
}
