//! Opaque engine handles

/// A raw engine handle
///
/// Handles are plain copyable identifiers (pointers for the native engine,
/// table ids for the reference engine). Ownership is tracked by the wrappers
/// that hold them, never by the handle itself.
pub trait RawHandle: Copy + Eq + core::hash::Hash + core::fmt::Debug {
    /// The engine's null/default handle
    const NULL: Self;

    #[inline]
    fn is_null(self) -> bool {
        self == Self::NULL
    }
}

/// A wrapper that owns or borrows a raw handle
pub trait HasRaw {
    type Raw: RawHandle;

    fn raw(&self) -> Self::Raw;
}

impl RawHandle for u64 {
    const NULL: Self = 0;
}

impl<T> RawHandle for *mut T {
    const NULL: Self = core::ptr::null_mut();
}
