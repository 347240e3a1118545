//! Vector operations over `Vec<T>` for any [`Real`] scalar.
//!
//! This module provides the inner product, norm and the handful of BLAS-1 style
//! updates the CG solver needs. Every routine is sequential and allocates only its
//! output, so a solve owns all of its temporaries.
//!
//! # Usage
//! The inner product follows the unit-struct convention of the solvers: `let ip = ();`
//! then `ip.dot(&x, &y)`.

use crate::core::traits::InnerProduct;
use crate::scalar::Real;

/// Implements inner product and norm for vectors of any precision kind.
impl<T: Real> InnerProduct<Vec<T>> for () {
    type Scalar = T;
    /// Computes the dot product of two vectors: `x^T y`.
    fn dot(&self, x: &Vec<T>, y: &Vec<T>) -> T {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        x.iter()
            .zip(y.iter())
            .fold(T::zero(), |acc, (xi, yi)| acc + xi.clone() * yi)
    }
    /// Computes the Euclidean norm of a vector: `||x||_2`.
    fn norm(&self, x: &Vec<T>) -> T {
        self.dot(x, x).sqrt()
    }
}

/// Returns `a - b`.
pub fn sub<T: Real>(a: &[T], b: &[T]) -> Vec<T> {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");
    a.iter().zip(b).map(|(ai, bi)| ai.clone() - bi).collect()
}

/// In place `y ← y + alpha * x`.
pub fn axpy<T: Real>(alpha: &T, x: &[T], y: &mut [T]) {
    assert_eq!(x.len(), y.len(), "Vectors must have the same length");
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha.clone() * xi;
    }
}

/// In place `y ← y - alpha * x`.
pub fn axmy<T: Real>(alpha: &T, x: &[T], y: &mut [T]) {
    assert_eq!(x.len(), y.len(), "Vectors must have the same length");
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi -= alpha.clone() * xi;
    }
}

/// In place `y ← x + beta * y`.
pub fn xpby<T: Real>(x: &[T], beta: &T, y: &mut [T]) {
    assert_eq!(x.len(), y.len(), "Vectors must have the same length");
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi = xi.clone() + beta.clone() * &*yi;
    }
}

/// Converts every entry to `f64` through the scalar's narrowing rule.
pub fn to_f64_vec<T: Real>(x: &[T]) -> Vec<f64> {
    x.iter().map(Real::to_f64).collect()
}

/// Lifts an `f64` slice into precision `T`.
pub fn from_f64_slice<T: Real>(x: &[f64]) -> Vec<T> {
    x.iter().map(|&v| T::from_f64(v)).collect()
}
