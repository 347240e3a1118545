//! Elementary arithmetic backends, one per precision kind.
//!
//! A backend owns the limb layout of its kind and supplies five primitives
//! (`add`, `sub`, `mul`, `div`, `sqrt`) plus conversion from `f64` and decimal
//! stringification. Every primitive is a pure function of its inputs: no backend
//! keeps scratch state between calls, so values can move freely across threads.
//!
//! - [`NativeBackend`]: `f64`.
//! - [`DdBackend`]: double-double on top of `twofloat`.
//! - [`DqBackend`], [`QxBackend`]: MPFR floats (via `rug`) at 212 and 113 bits.
//!
//! Undefined operations (division by zero, square root of a negative number) are
//! not reported; they produce whatever the kernel produces, usually NaN or ±inf.

use std::fmt::Debug;

use rug::Float;
use twofloat::TwoFloat;

use super::kind::PrecisionKind;

/// Working precision used to print a double-double exactly enough for 32 digits.
const DD_TEXT_PRECISION: u32 = 128;

/// The capability set every precision kind has to provide.
pub trait Backend: 'static {
    /// Backend-private limb storage. Not a valid `f64` bit pattern in general.
    type Limbs: Clone + Debug + Send + Sync;

    const KIND: PrecisionKind;

    fn zero() -> Self::Limbs;
    fn from_f64(d: f64) -> Self::Limbs;

    fn add(a: &Self::Limbs, b: &Self::Limbs) -> Self::Limbs;
    fn sub(a: &Self::Limbs, b: &Self::Limbs) -> Self::Limbs;
    fn mul(a: &Self::Limbs, b: &Self::Limbs) -> Self::Limbs;
    fn div(a: &Self::Limbs, b: &Self::Limbs) -> Self::Limbs;
    fn sqrt(a: &Self::Limbs) -> Self::Limbs;

    /// Decimal text with `digits` significant digits.
    fn stringify(a: &Self::Limbs, digits: usize) -> String;

    /// The most significant limb as an `f64`. Lossy for every kind except double.
    fn leading_limb(a: &Self::Limbs) -> f64;
}

/// Native binary64 arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl Backend for NativeBackend {
    type Limbs = f64;

    const KIND: PrecisionKind = PrecisionKind::Double;

    fn zero() -> f64 {
        0.0
    }
    fn from_f64(d: f64) -> f64 {
        d
    }
    fn add(a: &f64, b: &f64) -> f64 {
        a + b
    }
    fn sub(a: &f64, b: &f64) -> f64 {
        a - b
    }
    fn mul(a: &f64, b: &f64) -> f64 {
        a * b
    }
    fn div(a: &f64, b: &f64) -> f64 {
        a / b
    }
    fn sqrt(a: &f64) -> f64 {
        a.sqrt()
    }
    fn stringify(a: &f64, digits: usize) -> String {
        format!("{:.*e}", digits.saturating_sub(1), a)
    }
    fn leading_limb(a: &f64) -> f64 {
        *a
    }
}

/// Double-double arithmetic: an unevaluated sum `hi + lo` of two `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DdBackend;

impl Backend for DdBackend {
    type Limbs = TwoFloat;

    const KIND: PrecisionKind = PrecisionKind::Dd;

    fn zero() -> TwoFloat {
        TwoFloat::from(0.0)
    }
    fn from_f64(d: f64) -> TwoFloat {
        TwoFloat::from(d)
    }
    fn add(a: &TwoFloat, b: &TwoFloat) -> TwoFloat {
        *a + *b
    }
    fn sub(a: &TwoFloat, b: &TwoFloat) -> TwoFloat {
        *a - *b
    }
    fn mul(a: &TwoFloat, b: &TwoFloat) -> TwoFloat {
        *a * *b
    }
    fn div(a: &TwoFloat, b: &TwoFloat) -> TwoFloat {
        *a / *b
    }
    fn sqrt(a: &TwoFloat) -> TwoFloat {
        // Karp's scheme: one Newton step from the hardware root of the leading limb.
        let hi = a.hi();
        if hi == 0.0 || !hi.is_finite() {
            return TwoFloat::from(hi.sqrt());
        }
        let s = TwoFloat::from(hi.sqrt());
        s + (*a - s * s) / (TwoFloat::from(2.0) * s)
    }
    fn stringify(a: &TwoFloat, digits: usize) -> String {
        let mut wide = Float::with_val(DD_TEXT_PRECISION, a.hi());
        wide += a.lo();
        wide.to_string_radix(10, Some(digits))
    }
    fn leading_limb(a: &TwoFloat) -> f64 {
        a.hi()
    }
}

macro_rules! mpfr_backend {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            const PREC: u32 = $kind.mantissa_bits();
        }

        impl Backend for $name {
            type Limbs = Float;

            const KIND: PrecisionKind = $kind;

            fn zero() -> Float {
                Float::new(Self::PREC)
            }
            fn from_f64(d: f64) -> Float {
                Float::with_val(Self::PREC, d)
            }
            fn add(a: &Float, b: &Float) -> Float {
                Float::with_val(Self::PREC, a + b)
            }
            fn sub(a: &Float, b: &Float) -> Float {
                Float::with_val(Self::PREC, a - b)
            }
            fn mul(a: &Float, b: &Float) -> Float {
                Float::with_val(Self::PREC, a * b)
            }
            fn div(a: &Float, b: &Float) -> Float {
                Float::with_val(Self::PREC, a / b)
            }
            fn sqrt(a: &Float) -> Float {
                Float::with_val(Self::PREC, a.sqrt_ref())
            }
            fn stringify(a: &Float, digits: usize) -> String {
                a.to_string_radix(10, Some(digits))
            }
            fn leading_limb(a: &Float) -> f64 {
                a.to_f64()
            }
        }
    };
}

mpfr_backend!(
    /// Quad-double class arithmetic (~64 digits) on a 212-bit MPFR float.
    DqBackend,
    PrecisionKind::Dq
);

mpfr_backend!(
    /// Extended-quad arithmetic (~33 digits) on a 113-bit MPFR float.
    QxBackend,
    PrecisionKind::Qx
);
