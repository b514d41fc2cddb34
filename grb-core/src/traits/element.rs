//! Element type constraints for container values
//!
//! [`Element`] binds a Rust type to its [`Domain`] at compile time and knows
//! how to move a value across the type-erased engine boundary. The marker
//! traits below it describe the domain classes operator families accept,
//! so requesting an operator outside its class is a compile error.

use crate::format::{Complex32, Complex64, Domain};

mod sealed {
    pub trait Sealed {}
}

/// Trait for types that can be stored as container elements
pub trait Element: Copy + PartialEq + core::fmt::Debug + Send + Sync + 'static {
    /// Domain tag of this type
    const DOMAIN: Domain;

    /// Size in bytes of one value in engine memory
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Decode a value from engine bytes
    ///
    /// `bytes` must hold at least [`Element::size_bytes`] bytes.
    fn read_bytes(bytes: &[u8]) -> Self;

    /// Encode a value into engine bytes
    fn write_bytes(self, out: &mut [u8]);
}

/// Built-in element types (every domain except user domains)
pub trait Builtin: Element + sealed::Sealed {}

/// Built-in types with a total order: everything but complex
pub trait Real: Builtin + PartialOrd {}

/// Signed and unsigned integers, including `isize`/`usize`
pub trait Integer: Real {}

/// `f32` and `f64`
pub trait Float: Real + Floating {}

/// Floating point and complex: the transcendental domain class
pub trait Floating: Builtin {}

/// Complex element types
pub trait ComplexElement: Floating {
    /// Type of the real and imaginary parts
    type Component: Float;
}

/// Integer types usable as positional operator outputs
pub trait PositionalIndex: Integer {}

macro_rules! impl_pod_element {
    ($($ty:ty => $domain:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Builtin for $ty {}

            impl Element for $ty {
                const DOMAIN: Domain = Domain::$domain;

                #[inline]
                fn read_bytes(bytes: &[u8]) -> Self {
                    bytemuck::pod_read_unaligned(&bytes[..core::mem::size_of::<Self>()])
                }

                #[inline]
                fn write_bytes(self, out: &mut [u8]) {
                    out[..core::mem::size_of::<Self>()].copy_from_slice(bytemuck::bytes_of(&self));
                }
            }
        )*
    };
}

impl_pod_element! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => NativeInt,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    usize => NativeUInt,
    f32 => Float32,
    f64 => Float64,
    Complex32 => Complex32,
    Complex64 => Complex64,
}

// bool is not Pod: any byte other than 0 and 1 would be an invalid bool
impl sealed::Sealed for bool {}
impl Builtin for bool {}

impl Element for bool {
    const DOMAIN: Domain = Domain::Bool;

    #[inline]
    fn read_bytes(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    #[inline]
    fn write_bytes(self, out: &mut [u8]) {
        out[0] = self as u8;
    }
}

impl Real for bool {}

macro_rules! impl_markers {
    ($trait:ident for $($ty:ty),*) => {
        $(impl $trait for $ty {})*
    };
}

impl_markers!(Real for i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
impl_markers!(Integer for i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_markers!(Float for f32, f64);
impl_markers!(Floating for f32, f64, Complex32, Complex64);
impl_markers!(PositionalIndex for i32, i64, isize);

impl ComplexElement for Complex32 {
    type Component = f32;
}

impl ComplexElement for Complex64 {
    type Component = f64;
}

/// Declare a `bytemuck::Pod` type as a user-domain element
///
/// The type must still be registered with the context's type registry
/// before containers of it can be created.
///
/// ```
/// #[repr(C)]
/// #[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// struct Point {
///     x: f32,
///     y: f32,
/// }
///
/// grb_core::user_element!(Point, "point");
/// ```
#[macro_export]
macro_rules! user_element {
    ($ty:ty, $name:expr) => {
        impl $crate::Element for $ty {
            const DOMAIN: $crate::Domain = $crate::Domain::User($name);

            fn read_bytes(bytes: &[u8]) -> Self {
                $crate::__private::bytemuck::pod_read_unaligned(
                    &bytes[..::core::mem::size_of::<Self>()],
                )
            }

            fn write_bytes(self, out: &mut [u8]) {
                out[..::core::mem::size_of::<Self>()]
                    .copy_from_slice($crate::__private::bytemuck::bytes_of(&self));
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T: Element>(value: T) -> T {
        let mut buf = [0u8; 16];
        value.write_bytes(&mut buf);
        T::read_bytes(&buf)
    }

    #[test]
    fn test_domains() {
        assert_eq!(<i32 as Element>::DOMAIN, Domain::Int32);
        assert_eq!(<isize as Element>::DOMAIN, Domain::NativeInt);
        assert_eq!(<usize as Element>::DOMAIN.canonical().size_bytes(), Some(core::mem::size_of::<usize>()));
        assert_eq!(<Complex64 as Element>::DOMAIN, Domain::Complex64);
    }

    #[test]
    fn test_byte_encoding() {
        assert_eq!(round_trip(-7i16), -7);
        assert_eq!(round_trip(2.5f64), 2.5);
        assert!(round_trip(true));
        assert!(!round_trip(false));
        assert_eq!(round_trip(Complex32::new(1.0, -2.0)), Complex32::new(1.0, -2.0));
    }

    #[test]
    fn test_bool_decodes_any_nonzero_byte() {
        assert!(bool::read_bytes(&[7]));
        assert_eq!(bool::size_bytes(), 1);
    }
}
