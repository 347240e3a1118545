//! Precision-abstracted scalar numbers.
//!
//! [`Scalar<B>`] wraps the limb storage of one [`Backend`] and gives it ordinary
//! value semantics: the arithmetic operators build fresh values and never touch
//! their operands, compound assignment replaces the left operand, and every value
//! can be narrowed back to `f64` through the backend's decimal text.
//!
//! The solver and the linear-algebra substrate are written against the [`Real`]
//! capability trait, so the same code runs at every precision:
//!
//! ```rust
//! use precision_cg::scalar::{Dd, Real};
//! let third = Dd::from_f64(1.0) / Dd::from_f64(3.0);
//! assert!((third.to_f64() - 1.0 / 3.0).abs() < 1e-15);
//! ```

pub mod backend;
pub mod kind;

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

pub use backend::{Backend, DdBackend, DqBackend, NativeBackend, QxBackend};
pub use kind::PrecisionKind;

/// Below this magnitude comparisons switch from relative to absolute.
pub const NEAR_ZERO_FLOOR: f64 = 1e-15;

/// Scalar capabilities required by the CG solver and the sparse substrate.
pub trait Real:
    Clone
    + Default
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + Zero
    + One
    + Sum
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + for<'a> Div<&'a Self, Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    const KIND: PrecisionKind;

    fn from_f64(d: f64) -> Self;
    fn sqrt(&self) -> Self;
    fn abs(&self) -> Self;
    fn is_finite(&self) -> bool;
    /// Narrow to `f64` through the kind's canonical decimal text.
    fn to_f64(&self) -> f64;
    fn to_text(&self, digits: usize) -> String;
}

/// A value of precision kind `B::KIND`.
pub struct Scalar<B: Backend> {
    limbs: B::Limbs,
}

pub type Double = Scalar<NativeBackend>;
pub type Dd = Scalar<DdBackend>;
pub type Dq = Scalar<DqBackend>;
pub type Qx = Scalar<QxBackend>;

impl<B: Backend> Scalar<B> {
    pub const KIND: PrecisionKind = B::KIND;

    pub fn from_limbs(limbs: B::Limbs) -> Self {
        Scalar { limbs }
    }

    pub fn limbs(&self) -> &B::Limbs {
        &self.limbs
    }

    pub fn from_f64(d: f64) -> Self {
        Self::from_limbs(B::from_f64(d))
    }

    pub fn sqrt(&self) -> Self {
        Self::from_limbs(B::sqrt(&self.limbs))
    }

    pub fn abs(&self) -> Self {
        if self.leading() < 0.0 {
            Self::from_limbs(B::sub(&B::zero(), &self.limbs))
        } else {
            self.clone()
        }
    }

    pub fn is_finite(&self) -> bool {
        self.leading().is_finite()
    }

    pub fn is_nan(&self) -> bool {
        self.leading().is_nan()
    }

    /// Narrow to `f64`.
    ///
    /// The limb layout is not an IEEE double, so the value is printed at
    /// `KIND.text_digits()` significant digits and parsed back. If the text does not
    /// parse, the leading limb is returned instead, losing everything below it.
    pub fn to_f64(&self) -> f64 {
        let text = B::stringify(&self.limbs, B::KIND.text_digits());
        text.trim().parse::<f64>().unwrap_or_else(|_| self.leading())
    }

    pub fn to_text(&self, digits: usize) -> String {
        B::stringify(&self.limbs, digits)
    }

    fn leading(&self) -> f64 {
        B::leading_limb(&self.limbs)
    }
}

impl<B: Backend> Real for Scalar<B> {
    const KIND: PrecisionKind = B::KIND;

    fn from_f64(d: f64) -> Self {
        Scalar::from_f64(d)
    }
    fn sqrt(&self) -> Self {
        Scalar::sqrt(self)
    }
    fn abs(&self) -> Self {
        Scalar::abs(self)
    }
    fn is_finite(&self) -> bool {
        Scalar::is_finite(self)
    }
    fn to_f64(&self) -> f64 {
        Scalar::to_f64(self)
    }
    fn to_text(&self, digits: usize) -> String {
        Scalar::to_text(self, digits)
    }
}

impl<B: Backend> Clone for Scalar<B> {
    fn clone(&self) -> Self {
        Scalar { limbs: self.limbs.clone() }
    }
}

impl<B: Backend> Default for Scalar<B> {
    fn default() -> Self {
        Self::from_limbs(B::zero())
    }
}

impl<B: Backend> From<f64> for Scalar<B> {
    fn from(d: f64) -> Self {
        Self::from_f64(d)
    }
}

impl<B: Backend> fmt::Display for Scalar<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(B::KIND.text_digits());
        f.write_str(&self.to_text(digits))
    }
}

impl<B: Backend> fmt::Debug for Scalar<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", B::KIND.label(), self.to_text(B::KIND.text_digits()))
    }
}

macro_rules! impl_binary_op {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident) => {
        impl<B: Backend> $Op for Scalar<B> {
            type Output = Scalar<B>;
            fn $op(self, rhs: Scalar<B>) -> Scalar<B> {
                Scalar::from_limbs(B::$op(&self.limbs, &rhs.limbs))
            }
        }

        impl<'a, B: Backend> $Op<&'a Scalar<B>> for Scalar<B> {
            type Output = Scalar<B>;
            fn $op(self, rhs: &'a Scalar<B>) -> Scalar<B> {
                Scalar::from_limbs(B::$op(&self.limbs, &rhs.limbs))
            }
        }

        impl<'a, 'b, B: Backend> $Op<&'b Scalar<B>> for &'a Scalar<B> {
            type Output = Scalar<B>;
            fn $op(self, rhs: &'b Scalar<B>) -> Scalar<B> {
                Scalar::from_limbs(B::$op(&self.limbs, &rhs.limbs))
            }
        }

        impl<B: Backend> $OpAssign for Scalar<B> {
            fn $op_assign(&mut self, rhs: Scalar<B>) {
                self.limbs = B::$op(&self.limbs, &rhs.limbs);
            }
        }

        impl<'a, B: Backend> $OpAssign<&'a Scalar<B>> for Scalar<B> {
            fn $op_assign(&mut self, rhs: &'a Scalar<B>) {
                self.limbs = B::$op(&self.limbs, &rhs.limbs);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign);
impl_binary_op!(Sub, sub, SubAssign, sub_assign);
impl_binary_op!(Mul, mul, MulAssign, mul_assign);
impl_binary_op!(Div, div, DivAssign, div_assign);

impl<B: Backend> Neg for Scalar<B> {
    type Output = Scalar<B>;
    fn neg(self) -> Scalar<B> {
        Scalar::from_limbs(B::sub(&B::zero(), &self.limbs))
    }
}

impl<B: Backend> Zero for Scalar<B> {
    fn zero() -> Self {
        Self::default()
    }
    fn is_zero(&self) -> bool {
        self.leading() == 0.0
    }
}

impl<B: Backend> One for Scalar<B> {
    fn one() -> Self {
        Self::from_f64(1.0)
    }
}

impl<B: Backend> Sum for Scalar<B> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, v| acc + v)
    }
}

/// Tolerance-based equality.
///
/// Reordered evaluation at high precision leaves last-bit differences, so values
/// are equal when `|a-b| / max(|a|,|b|) < KIND.epsilon()`. When both magnitudes are
/// below [`NEAR_ZERO_FLOOR`] the test becomes `|a-b| < NEAR_ZERO_FLOOR`.
impl<B: Backend> PartialEq for Scalar<B> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.leading(), other.leading());
        if a.is_nan() || b.is_nan() {
            return false;
        }
        if a.is_infinite() || b.is_infinite() {
            return a == b;
        }
        let diff = B::leading_limb(&B::sub(&self.limbs, &other.limbs)).abs();
        let scale = a.abs().max(b.abs());
        if scale < NEAR_ZERO_FLOOR {
            return diff < NEAR_ZERO_FLOOR;
        }
        diff / scale < B::KIND.epsilon()
    }
}

/// Ordering consistent with the tolerance-based equality: values that compare
/// equal are `Equal`, otherwise the sign of `other - self` decides.
impl<B: Backend> PartialOrd for Scalar<B> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        if self == other {
            return Some(Ordering::Equal);
        }
        let gap = B::leading_limb(&B::sub(&other.limbs, &self.limbs));
        if gap > 0.0 {
            Some(Ordering::Less)
        } else {
            Some(Ordering::Greater)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        assert!(Qx::default().is_zero());
        assert_eq!(Dd::default().to_f64(), 0.0);
    }

    #[test]
    fn operators_leave_operands_untouched() {
        let a = Dq::from_f64(1.5);
        let b = Dq::from_f64(0.25);
        let c = &a + &b;
        assert_eq!(a.to_f64(), 1.5);
        assert_eq!(b.to_f64(), 0.25);
        assert_eq!(c.to_f64(), 1.75);
    }

    #[test]
    fn compound_assignment_replaces_left_operand() {
        let mut a = Qx::from_f64(3.0);
        a -= Qx::from_f64(1.0);
        a *= &Qx::from_f64(4.0);
        a /= Qx::from_f64(2.0);
        a += Qx::from_f64(0.5);
        assert_eq!(a.to_f64(), 4.5);
    }

    #[test]
    fn near_zero_values_compare_absolutely() {
        let tiny = Dd::from_f64(1e-17);
        let tinier = Dd::from_f64(-1e-18);
        assert_eq!(tiny, tinier);
        assert_ne!(Dd::from_f64(1e-14), Dd::zero());
    }

    #[test]
    fn nan_is_unordered() {
        let nan = Qx::from_f64(-1.0).sqrt();
        assert!(nan.is_nan());
        assert_ne!(nan, nan.clone());
        assert_eq!(nan.partial_cmp(&Qx::one()), None);
    }

    #[test]
    fn ordering_follows_sign_of_difference() {
        let a = Dq::from_f64(1.0);
        let b = Dq::from_f64(2.0);
        assert!(a < b);
        assert!(b > a);
        assert!(a <= a.clone());
        assert_eq!(-a.clone(), Dq::from_f64(-1.0));
        assert_eq!((-a).abs(), Dq::one());
    }

    #[test]
    fn display_honours_requested_precision() {
        let third = Double::from_f64(1.0) / Double::from_f64(3.0);
        assert_eq!(format!("{:.3}", third), "3.33e-1");
    }
}
