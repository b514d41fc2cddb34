//! Typed entry points, one per operator family

use super::{BuiltinOp, OpFamily};
use crate::traits::element::{
    Builtin, ComplexElement, Float, Floating, Integer, PositionalIndex, Real,
};

macro_rules! typed_ops {
    ($($(#[$doc:meta])* $name:ident<$bound:ident> => $family:ident;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name<T: $bound>() -> BuiltinOp {
                OpFamily::$family.resolve(T::DOMAIN)
            }
        )*
    };
}

macro_rules! untyped_ops {
    ($($(#[$doc:meta])* $name:ident => $family:ident;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name() -> BuiltinOp {
                OpFamily::$family.untyped()
            }
        )*
    };
}

typed_ops! {
    /// `z = x`
    identity<Builtin> => Identity;
    /// `z = -x`
    ainv<Builtin> => Ainv;
    /// `z = 1/x`
    minv<Builtin> => Minv;
    /// `z = 1`
    one<Builtin> => One;
    abs<Real> => Abs;
    /// `z = !(x != 0)`, see [`lnot_bool`] for the `bool` alias
    lnot<Real> => Lnot;
    bnot<Integer> => Bnot;

    sqrt<Floating> => Sqrt;
    log<Floating> => Log;
    exp<Floating> => Exp;
    log2<Floating> => Log2;
    log10<Floating> => Log10;
    log1p<Floating> => Log1p;
    expm1<Floating> => Expm1;
    exp2<Floating> => Exp2;
    sin<Floating> => Sin;
    cos<Floating> => Cos;
    tan<Floating> => Tan;
    asin<Floating> => Asin;
    acos<Floating> => Acos;
    atan<Floating> => Atan;
    sinh<Floating> => Sinh;
    cosh<Floating> => Cosh;
    tanh<Floating> => Tanh;
    asinh<Floating> => Asinh;
    acosh<Floating> => Acosh;
    atanh<Floating> => Atanh;
    signum<Floating> => Signum;
    ceil<Floating> => Ceil;
    floor<Floating> => Floor;
    round<Floating> => Round;
    trunc<Floating> => Trunc;
    cbrt<Float> => Cbrt;
    lgamma<Float> => Lgamma;
    tgamma<Float> => Tgamma;
    erf<Float> => Erf;
    erfc<Float> => Erfc;
    /// Mantissa of `frexp(x)`
    frexpx<Float> => Frexpx;
    /// Exponent of `frexp(x)`
    frexpe<Float> => Frexpe;
    is_inf<Floating> => IsInf;
    is_nan<Floating> => IsNan;
    is_finite<Floating> => IsFinite;

    /// Real part, output is the component type
    creal<ComplexElement> => Creal;
    /// Imaginary part, output is the component type
    cimag<ComplexElement> => Cimag;
    /// Argument, output is the component type
    carg<ComplexElement> => Carg;
    /// Magnitude, output is the component type
    cabs<ComplexElement> => Cabs;
    conj<ComplexElement> => Conj;

    /// `z = i`, row index of the entry
    position_i<PositionalIndex> => PositionI;
    /// `z = i + 1`
    position_i1<PositionalIndex> => PositionI1;
    /// `z = j`, column index of the entry
    position_j<PositionalIndex> => PositionJ;
    /// `z = j + 1`
    position_j1<PositionalIndex> => PositionJ1;

    first<Builtin> => First;
    second<Builtin> => Second;
    /// `z = x` or `z = y`, whichever the engine finds cheaper
    any<Builtin> => Any;
    /// `z = 1`
    pair<Builtin> => Pair;
    plus<Builtin> => Plus;
    minus<Builtin> => Minus;
    /// `z = y - x`
    rminus<Builtin> => Rminus;
    times<Builtin> => Times;
    div<Builtin> => Div;
    /// `z = y / x`
    rdiv<Builtin> => Rdiv;
    pow<Builtin> => Pow;
    /// `z = (x == y)` in the input type
    iseq<Builtin> => Iseq;
    isne<Builtin> => Isne;
    min<Real> => Min;
    max<Real> => Max;
    isgt<Real> => Isgt;
    islt<Real> => Islt;
    isge<Real> => Isge;
    isle<Real> => Isle;
    eq<Builtin> => Eq;
    ne<Builtin> => Ne;
    gt<Real> => Gt;
    lt<Real> => Lt;
    ge<Real> => Ge;
    le<Real> => Le;
    lor<Real> => Lor;
    land<Real> => Land;
    lxor<Real> => Lxor;
    bor<Integer> => Bor;
    band<Integer> => Band;
    bxor<Integer> => Bxor;
    bxnor<Integer> => Bxnor;
    /// Bit `y` of `x`
    bget<Integer> => Bget;
    bset<Integer> => Bset;
    bclr<Integer> => Bclr;
    /// `x` shifted by an `int8` amount
    bshift<Integer> => Bshift;
    atan2<Float> => Atan2;
    hypot<Float> => Hypot;
    fmod<Float> => Fmod;
    remainder<Float> => Remainder;
    copysign<Float> => Copysign;
    ldexp<Float> => Ldexp;
    /// Complex number from real and imaginary parts
    cmplx<Float> => Cmplx;

    first_i<PositionalIndex> => FirstI;
    first_i1<PositionalIndex> => FirstI1;
    first_j<PositionalIndex> => FirstJ;
    first_j1<PositionalIndex> => FirstJ1;
    second_i<PositionalIndex> => SecondI;
    second_i1<PositionalIndex> => SecondI1;
    second_j<PositionalIndex> => SecondJ;
    second_j1<PositionalIndex> => SecondJ1;

    /// `z = i + thunk`
    row_index<PositionalIndex> => RowIndex;
    /// `z = j + thunk`
    col_index<PositionalIndex> => ColIndex;
    /// `z = j - (i + thunk)`
    diag_index<PositionalIndex> => DiagIndex;
    value_eq<Builtin> => ValueEq;
    value_ne<Builtin> => ValueNe;
    value_lt<Real> => ValueLt;
    value_le<Real> => ValueLe;
    value_gt<Real> => ValueGt;
    value_ge<Real> => ValueGe;
}

untyped_ops! {
    /// `GrB_LNOT`: behaves as `lnot::<bool>()`
    lnot_bool => LnotBool;
    /// `GrB_LOR`: behaves as `lor::<bool>()`
    lor_bool => LorBool;
    /// `GrB_LAND`: behaves as `land::<bool>()`
    land_bool => LandBool;
    /// `GrB_LXOR`: behaves as `lxor::<bool>()`
    lxor_bool => LxorBool;
    lxnor_bool => LxnorBool;
    /// Build-time duplicate operator: the last duplicate wins
    ignore_dup => IgnoreDup;
    tril => Tril;
    triu => Triu;
    diag => Diag;
    offdiag => Offdiag;
    col_le => ColLe;
    col_gt => ColGt;
    row_le => RowLe;
    row_gt => RowGt;
}

/// Typecast from `X` to `Z`
///
/// The engine typecasts operator inputs implicitly, so every `cast::<Z, _>`
/// is the identity over `Z`.
#[inline]
pub fn cast<Z: Builtin, X: Builtin>() -> BuiltinOp {
    identity::<Z>()
}
