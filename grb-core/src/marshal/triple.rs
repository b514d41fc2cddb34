//! Optional mask / accumulator / descriptor flattening

use crate::traits::handle::{HasRaw, RawHandle};

/// Raw handle of an optional argument, or the engine's null handle
#[inline]
pub fn flatten_optional<H: HasRaw>(handle: Option<&H>) -> H::Raw {
    handle.map_or(H::Raw::NULL, HasRaw::raw)
}

/// Flatten the optional trailing arguments most operations take
#[inline]
pub fn flatten_optional_triple<M, A, D>(
    mask: Option<&M>,
    accum: Option<&A>,
    desc: Option<&D>,
) -> (M::Raw, A::Raw, D::Raw)
where
    M: HasRaw,
    A: HasRaw,
    D: HasRaw,
{
    (
        flatten_optional(mask),
        flatten_optional(accum),
        flatten_optional(desc),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Id(u32);

    impl RawHandle for Id {
        const NULL: Self = Id(0);
    }

    struct Held(Id);

    impl HasRaw for Held {
        type Raw = Id;

        fn raw(&self) -> Id {
            self.0
        }
    }

    #[test]
    fn test_absent_maps_to_null() {
        let (m, a, d) = flatten_optional_triple::<Held, Held, Held>(None, None, None);
        assert!(m.is_null() && a.is_null() && d.is_null());
    }

    #[test]
    fn test_present_forwards_unchanged() {
        let mask = Held(Id(3));
        let desc = Held(Id(9));
        let (m, a, d) = flatten_optional_triple(Some(&mask), None::<&Held>, Some(&desc));
        assert_eq!((m, a, d), (Id(3), Id(0), Id(9)));
    }
}
