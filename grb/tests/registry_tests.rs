//! Type registry behavior through a context

#![cfg(feature = "reference")]

use grb::{
    user_element, Context, Domain, Engine, EngineConfig, FieldKind, GrbError, Info,
    ReferenceEngine, UserDomain,
};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct Point {
    x: f32,
    y: f32,
}

user_element!(Point, "point");

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct Edge {
    weight: f64,
    hops: u32,
    _pad: u32,
}

user_element!(Edge, "edge");

fn context() -> Context<ReferenceEngine> {
    Context::init(ReferenceEngine::new(), EngineConfig::default()).expect("engine init")
}

#[test]
fn test_builtin_domains_are_preloaded() {
    let ctx = context();
    for domain in Domain::BUILTIN {
        assert!(ctx.registry().contains(domain), "{domain}");
    }
    assert_eq!(ctx.registry().len(), Domain::BUILTIN.len());

    let handles: std::collections::HashSet<_> =
        Domain::BUILTIN.iter().map(|d| ctx.type_handle(*d).unwrap()).collect();
    assert_eq!(handles.len(), Domain::BUILTIN.len());
}

#[test]
fn test_native_width_domains_share_fixed_width_handles() {
    let ctx = context();
    assert_eq!(
        ctx.type_handle(Domain::NativeInt),
        ctx.type_handle(Domain::NativeInt.canonical())
    );
    assert_eq!(
        ctx.type_handle(Domain::NativeUInt),
        ctx.type_handle(Domain::NativeUInt.canonical())
    );

    let mut m = ctx.matrix::<usize>(2, 2).unwrap();
    m.set_element(1, 1, usize::MAX).unwrap();
    assert_eq!(m.get(1, 1).unwrap(), Some(usize::MAX));
}

#[test]
fn test_user_domain_round_trip() {
    let ctx = context();
    let handle = ctx.register::<Point>().unwrap();
    assert_eq!(ctx.registry().resolve_domain(handle), Some(Domain::User("point")));
    assert_eq!(ctx.register::<Point>(), Err(GrbError::AlreadySet));

    let mut m = ctx.matrix::<Point>(3, 3).unwrap();
    m.set_element(2, 0, Point { x: 1.5, y: -2.0 }).unwrap();
    assert_eq!(m.get(2, 0).unwrap(), Some(Point { x: 1.5, y: -2.0 }));
    assert_eq!(m.get(0, 0).unwrap(), None);

    let entries: Vec<_> = m.entry_cursor().unwrap().entries().collect();
    assert_eq!(entries, vec![((2, 0), Point { x: 1.5, y: -2.0 })]);
}

#[test]
fn test_unregistered_user_domain_is_rejected() {
    let ctx = context();
    assert!(matches!(ctx.vector::<Edge>(4), Err(GrbError::UninitializedObject)));
    ctx.register::<Edge>().unwrap();
    let mut v = ctx.vector::<Edge>(4).unwrap();
    let edge = Edge { weight: 0.5, hops: 3, _pad: 0 };
    v.set_element(3, edge).unwrap();
    assert_eq!(v.get(3).unwrap(), Some(edge));
}

#[test]
fn test_release_then_reregister() {
    let ctx = context();
    ctx.register::<Point>().unwrap();
    {
        let _m = ctx.matrix::<Point>(1, 1).unwrap();
    }
    ctx.release_type(Domain::User("point")).unwrap();
    assert!(!ctx.registry().contains(Domain::User("point")));
    assert!(matches!(ctx.matrix::<Point>(1, 1), Err(GrbError::UninitializedObject)));
    assert_eq!(ctx.release_type(Domain::User("point")), Err(GrbError::UninitializedObject));

    ctx.register::<Point>().unwrap();
    assert!(ctx.registry().contains(Domain::User("point")));
}

#[test]
fn test_failed_release_keeps_the_mapping() {
    let ctx = context();
    let handle = ctx.register::<Point>().unwrap();
    // free the type behind the registry's back
    assert_eq!(ctx.engine().type_free(handle), Info::Success);

    let point = Domain::User("point");
    assert_eq!(ctx.release_type(point), Err(GrbError::UninitializedObject));
    assert_eq!(ctx.type_handle(point), Some(handle));
    assert_eq!(ctx.registry().resolve_domain(handle), Some(point));
    assert_eq!(ctx.register::<Point>(), Err(GrbError::AlreadySet));
}

#[test]
fn test_domains_with_references_are_rejected() {
    let ctx = context();
    let with_pointer = UserDomain::with_fields("node", vec![FieldKind::Scalar(8), FieldKind::Reference]);
    assert_eq!(ctx.register_type(&with_pointer), Err(GrbError::InvalidValue));
    assert!(!ctx.registry().contains(Domain::User("node")));

    let empty = UserDomain::new("nothing", 0);
    assert_eq!(ctx.register_type(&empty), Err(GrbError::InvalidValue));
}

#[test]
fn test_builtin_elements_cannot_be_registered() {
    let ctx = context();
    assert_eq!(ctx.register::<i32>(), Err(GrbError::AlreadySet));
}

#[test]
#[should_panic(expected = "cannot release built-in domain")]
fn test_releasing_builtin_panics() {
    let ctx = context();
    let _ = ctx.release_type(Domain::Int32);
}
