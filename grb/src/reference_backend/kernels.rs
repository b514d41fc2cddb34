//! Scalar kernels for the reference engine's built-in operators
//!
//! Only a small subset of operator families is evaluated here; anything
//! else resolves but reports `NotImplemented` when used.

use std::ffi::c_void;

use grb_core::{BinaryFn, BuiltinOp, Complex32, Complex64, Domain, Element, Info, OpFamily, UnaryFn};

pub(crate) type UnaryKernel = fn(&[u8], &mut [u8]);
pub(crate) type PositionKernel = fn(u64, u64, &mut [u8]);
pub(crate) type BinaryKernel = fn(&[u8], &[u8], &mut [u8]);

/// How an apply evaluates one entry
#[derive(Clone, Copy)]
pub(crate) enum Unary {
    Value(UnaryKernel),
    Position(PositionKernel),
    User(UnaryFn),
}

#[derive(Clone, Copy)]
pub(crate) enum Binary {
    Value(BinaryKernel),
    User(BinaryFn),
}

impl Unary {
    pub fn eval(&self, row: u64, col: u64, x: &[u8], z: &mut [u8]) {
        match self {
            Unary::Value(f) => f(x, z),
            Unary::Position(f) => f(row, col, z),
            Unary::User(f) => {
                // SAFETY: both buffers are sized for the operator's registered types
                unsafe { f(z.as_mut_ptr().cast::<c_void>(), x.as_ptr().cast::<c_void>()) }
            }
        }
    }
}

impl Binary {
    pub fn eval(&self, x: &[u8], y: &[u8], z: &mut [u8]) {
        match self {
            Binary::Value(f) => f(x, y, z),
            Binary::User(f) => {
                // SAFETY: buffers are sized for the operator's registered types
                unsafe {
                    f(
                        z.as_mut_ptr().cast::<c_void>(),
                        x.as_ptr().cast::<c_void>(),
                        y.as_ptr().cast::<c_void>(),
                    )
                }
            }
        }
    }
}

trait Num: Element + PartialOrd {
    const ZERO: Self;
    const ONE: Self;
    fn plus(self, y: Self) -> Self;
    fn minus(self, y: Self) -> Self;
    fn times(self, y: Self) -> Self;
    fn neg(self) -> Self;
    fn abs(self) -> Self;
}

macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl Num for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;
            fn plus(self, y: Self) -> Self { self.wrapping_add(y) }
            fn minus(self, y: Self) -> Self { self.wrapping_sub(y) }
            fn times(self, y: Self) -> Self { self.wrapping_mul(y) }
            fn neg(self) -> Self { self.wrapping_neg() }
            fn abs(self) -> Self { self.wrapping_abs() }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl Num for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;
            fn plus(self, y: Self) -> Self { self.wrapping_add(y) }
            fn minus(self, y: Self) -> Self { self.wrapping_sub(y) }
            fn times(self, y: Self) -> Self { self.wrapping_mul(y) }
            fn neg(self) -> Self { self.wrapping_neg() }
            fn abs(self) -> Self { self }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl Num for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            fn plus(self, y: Self) -> Self { self + y }
            fn minus(self, y: Self) -> Self { self - y }
            fn times(self, y: Self) -> Self { self * y }
            fn neg(self) -> Self { -self }
            fn abs(self) -> Self { <$t>::abs(self) }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);
impl_float!(f32, f64);

fn copy(x: &[u8], z: &mut [u8]) {
    z.copy_from_slice(&x[..z.len()]);
}

fn ainv<T: Num>(x: &[u8], z: &mut [u8]) {
    T::read_bytes(x).neg().write_bytes(z)
}

fn abs<T: Num>(x: &[u8], z: &mut [u8]) {
    T::read_bytes(x).abs().write_bytes(z)
}

fn one<T: Num>(_: &[u8], z: &mut [u8]) {
    T::ONE.write_bytes(z)
}

fn lnot<T: Num>(x: &[u8], z: &mut [u8]) {
    let v = if T::read_bytes(x) == T::ZERO { T::ONE } else { T::ZERO };
    v.write_bytes(z)
}

fn minv_f32(x: &[u8], z: &mut [u8]) {
    (1.0 / f32::read_bytes(x)).write_bytes(z)
}

fn minv_f64(x: &[u8], z: &mut [u8]) {
    (1.0 / f64::read_bytes(x)).write_bytes(z)
}

fn bnot<T: Element + core::ops::Not<Output = T>>(x: &[u8], z: &mut [u8]) {
    (!T::read_bytes(x)).write_bytes(z)
}

fn bool_not(x: &[u8], z: &mut [u8]) {
    (!bool::read_bytes(x)).write_bytes(z)
}

fn bool_one(_: &[u8], z: &mut [u8]) {
    true.write_bytes(z)
}

fn complex_one_32(_: &[u8], z: &mut [u8]) {
    Complex32::new(1.0, 0.0).write_bytes(z)
}

fn complex_one_64(_: &[u8], z: &mut [u8]) {
    Complex64::new(1.0, 0.0).write_bytes(z)
}

macro_rules! position {
    ($i:ident, $j:ident => $($name:ident: $t:ty = $e:expr;)*) => {$(
        fn $name($i: u64, $j: u64, z: &mut [u8]) {
            let _ = ($i, $j);
            ($e as $t).write_bytes(z)
        }
    )*};
}

position! { i, j =>
    pos_i_32: i32 = i;
    pos_i1_32: i32 = i + 1;
    pos_j_32: i32 = j;
    pos_j1_32: i32 = j + 1;
    pos_i_64: i64 = i;
    pos_i1_64: i64 = i + 1;
    pos_j_64: i64 = j;
    pos_j1_64: i64 = j + 1;
}

/// Pick `$f::<T>` for a numeric (non-bool, non-complex) domain
macro_rules! numeric {
    ($domain:expr, $f:ident as $ty:ty) => {
        match $domain {
            Domain::Int8 => Some($f::<i8> as $ty),
            Domain::Int16 => Some($f::<i16> as $ty),
            Domain::Int32 => Some($f::<i32> as $ty),
            Domain::Int64 => Some($f::<i64> as $ty),
            Domain::UInt8 => Some($f::<u8> as $ty),
            Domain::UInt16 => Some($f::<u16> as $ty),
            Domain::UInt32 => Some($f::<u32> as $ty),
            Domain::UInt64 => Some($f::<u64> as $ty),
            Domain::Float32 => Some($f::<f32> as $ty),
            Domain::Float64 => Some($f::<f64> as $ty),
            _ => None,
        }
    };
}

macro_rules! integer {
    ($domain:expr, $f:ident as $ty:ty) => {
        match $domain {
            Domain::Int8 => Some($f::<i8> as $ty),
            Domain::Int16 => Some($f::<i16> as $ty),
            Domain::Int32 => Some($f::<i32> as $ty),
            Domain::Int64 => Some($f::<i64> as $ty),
            Domain::UInt8 => Some($f::<u8> as $ty),
            Domain::UInt16 => Some($f::<u16> as $ty),
            Domain::UInt32 => Some($f::<u32> as $ty),
            Domain::UInt64 => Some($f::<u64> as $ty),
            _ => None,
        }
    };
}

/// Kernel for a built-in unary operator
pub(crate) fn unary(op: BuiltinOp) -> Result<Unary, Info> {
    let domain = op.domain.ok_or(Info::NotImplemented)?;
    let value: Option<UnaryKernel> = match (op.family, domain) {
        (OpFamily::Identity, _) => Some(copy),
        (OpFamily::Ainv, Domain::Bool) => Some(copy),
        (OpFamily::Ainv, d) => numeric!(d, ainv as UnaryKernel),
        (OpFamily::Abs, Domain::Bool) => Some(copy),
        (OpFamily::Abs, d) => numeric!(d, abs as UnaryKernel),
        (OpFamily::One, Domain::Bool) => Some(bool_one),
        (OpFamily::One, Domain::Complex32) => Some(complex_one_32),
        (OpFamily::One, Domain::Complex64) => Some(complex_one_64),
        (OpFamily::One, d) => numeric!(d, one as UnaryKernel),
        (OpFamily::Lnot | OpFamily::LnotBool, Domain::Bool) => Some(bool_not),
        (OpFamily::Lnot, d) => numeric!(d, lnot as UnaryKernel),
        (OpFamily::Minv, Domain::Float32) => Some(minv_f32),
        (OpFamily::Minv, Domain::Float64) => Some(minv_f64),
        (OpFamily::Bnot, d) => integer!(d, bnot as UnaryKernel),
        _ => None,
    };
    if let Some(f) = value {
        return Ok(Unary::Value(f));
    }

    let wide = domain == Domain::Int64;
    let position: Option<PositionKernel> = match (op.family, wide) {
        (OpFamily::PositionI, false) => Some(pos_i_32),
        (OpFamily::PositionI1, false) => Some(pos_i1_32),
        (OpFamily::PositionJ, false) => Some(pos_j_32),
        (OpFamily::PositionJ1, false) => Some(pos_j1_32),
        (OpFamily::PositionI, true) => Some(pos_i_64),
        (OpFamily::PositionI1, true) => Some(pos_i1_64),
        (OpFamily::PositionJ, true) => Some(pos_j_64),
        (OpFamily::PositionJ1, true) => Some(pos_j1_64),
        _ => None,
    };
    position.map(Unary::Position).ok_or(Info::NotImplemented)
}

fn first(x: &[u8], _: &[u8], z: &mut [u8]) {
    copy(x, z)
}

fn second(_: &[u8], y: &[u8], z: &mut [u8]) {
    copy(y, z)
}

fn pair<T: Num>(_: &[u8], _: &[u8], z: &mut [u8]) {
    T::ONE.write_bytes(z)
}

fn bool_pair(_: &[u8], _: &[u8], z: &mut [u8]) {
    true.write_bytes(z)
}

macro_rules! binary_num {
    ($($name:ident($x:ident, $y:ident) -> $out:ty = $e:expr;)*) => {$(
        fn $name<T: Num>(x: &[u8], y: &[u8], z: &mut [u8]) {
            let ($x, $y) = (T::read_bytes(x), T::read_bytes(y));
            let v: $out = $e;
            v.write_bytes(z)
        }
    )*};
}

binary_num! {
    plus(x, y) -> T = x.plus(y);
    minus(x, y) -> T = x.minus(y);
    times(x, y) -> T = x.times(y);
    min(x, y) -> T = if y < x { y } else { x };
    max(x, y) -> T = if y > x { y } else { x };
    eq(x, y) -> bool = x == y;
    ne(x, y) -> bool = x != y;
    gt(x, y) -> bool = x > y;
    lt(x, y) -> bool = x < y;
    ge(x, y) -> bool = x >= y;
    le(x, y) -> bool = x <= y;
    lor(x, y) -> T = if x != T::ZERO || y != T::ZERO { T::ONE } else { T::ZERO };
    land(x, y) -> T = if x != T::ZERO && y != T::ZERO { T::ONE } else { T::ZERO };
    lxor(x, y) -> T = if (x != T::ZERO) != (y != T::ZERO) { T::ONE } else { T::ZERO };
}

macro_rules! binary_bool {
    ($($name:ident($x:ident, $y:ident) = $e:expr;)*) => {$(
        fn $name(x: &[u8], y: &[u8], z: &mut [u8]) {
            let ($x, $y) = (bool::read_bytes(x), bool::read_bytes(y));
            let v: bool = $e;
            v.write_bytes(z)
        }
    )*};
}

binary_bool! {
    bool_or(x, y) = x || y;
    bool_and(x, y) = x && y;
    bool_xor(x, y) = x != y;
    bool_xnor(x, y) = x == y;
    bool_gt(x, y) = x & !y;
    bool_lt(x, y) = !x & y;
    bool_ge(x, y) = x | !y;
    bool_le(x, y) = !x | y;
}

/// Kernel for a built-in binary operator
pub(crate) fn binary(op: BuiltinOp) -> Result<Binary, Info> {
    let kernel: Option<BinaryKernel> = match (op.family, op.domain) {
        (OpFamily::IgnoreDup, None) => Some(second),
        (OpFamily::First, Some(_)) => Some(first),
        (OpFamily::Second | OpFamily::Any, Some(_)) => Some(second),
        (OpFamily::LorBool, _) => Some(bool_or),
        (OpFamily::LandBool, _) => Some(bool_and),
        (OpFamily::LxorBool, _) => Some(bool_xor),
        (OpFamily::LxnorBool, _) => Some(bool_xnor),
        (family, Some(Domain::Bool)) => match family {
            OpFamily::Pair => Some(bool_pair),
            OpFamily::Plus | OpFamily::Lor | OpFamily::Max => Some(bool_or),
            OpFamily::Times | OpFamily::Land | OpFamily::Min => Some(bool_and),
            OpFamily::Minus | OpFamily::Lxor | OpFamily::Ne => Some(bool_xor),
            OpFamily::Eq => Some(bool_xnor),
            OpFamily::Gt => Some(bool_gt),
            OpFamily::Lt => Some(bool_lt),
            OpFamily::Ge => Some(bool_ge),
            OpFamily::Le => Some(bool_le),
            _ => None,
        },
        (family, Some(d)) => match family {
            OpFamily::Pair => numeric!(d, pair as BinaryKernel),
            OpFamily::Plus => numeric!(d, plus as BinaryKernel),
            OpFamily::Minus => numeric!(d, minus as BinaryKernel),
            OpFamily::Times => numeric!(d, times as BinaryKernel),
            OpFamily::Min => numeric!(d, min as BinaryKernel),
            OpFamily::Max => numeric!(d, max as BinaryKernel),
            OpFamily::Eq => numeric!(d, eq as BinaryKernel),
            OpFamily::Ne => numeric!(d, ne as BinaryKernel),
            OpFamily::Gt => numeric!(d, gt as BinaryKernel),
            OpFamily::Lt => numeric!(d, lt as BinaryKernel),
            OpFamily::Ge => numeric!(d, ge as BinaryKernel),
            OpFamily::Le => numeric!(d, le as BinaryKernel),
            OpFamily::Lor => numeric!(d, lor as BinaryKernel),
            OpFamily::Land => numeric!(d, land as BinaryKernel),
            OpFamily::Lxor => numeric!(d, lxor as BinaryKernel),
            _ => None,
        },
        _ => None,
    };
    kernel.map(Binary::Value).ok_or(Info::NotImplemented)
}
