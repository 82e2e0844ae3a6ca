//! Elementwise helpers shared by the multipliers and the harness.

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{dimension_error, Result};
use crate::matrix::{Element, Matrix};

/// Elementwise `a + b`.
///
/// # Errors
///
/// Returns a dimension error unless both operands have the same shape.
pub fn add<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    if a.shape() != b.shape() {
        return Err(dimension_error("add", a.shape(), b.shape()));
    }
    Ok(Matrix::from_array(add_views(a.view(), b.view())))
}

/// Elementwise `a - b`.
///
/// # Errors
///
/// Returns a dimension error unless both operands have the same shape.
pub fn subtract<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    if a.shape() != b.shape() {
        return Err(dimension_error("subtract", a.shape(), b.shape()));
    }
    Ok(Matrix::from_array(sub_views(a.view(), b.view())))
}

/// Sum of two equally shaped views into a freshly allocated array.
///
/// Callers guarantee matching shapes; ndarray panics otherwise.
pub(crate) fn add_views<T: Element>(a: ArrayView2<'_, T>, b: ArrayView2<'_, T>) -> Array2<T> {
    Zip::from(&a).and(&b).map_collect(|&x, &y| x + y)
}

/// Difference of two equally shaped views into a freshly allocated array.
pub(crate) fn sub_views<T: Element>(a: ArrayView2<'_, T>, b: ArrayView2<'_, T>) -> Array2<T> {
    Zip::from(&a).and(&b).map_collect(|&x, &y| x - y)
}

/// Tolerance-based equality used as the correctness oracle.
///
/// Differently shaped operands are simply not equal. Otherwise every pair
/// must either be identical or differ by strictly less than `tolerance`,
/// which keeps the comparison reflexive even for a zero tolerance.
pub fn approximately_equal<T: Element>(a: &Matrix<T>, b: &Matrix<T>, tolerance: T) -> bool {
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return false;
    }
    Zip::from(a.view())
        .and(b.view())
        .all(|&x, &y| x == y || (x - y).abs() < tolerance)
}

/// Largest absolute elementwise difference, or `None` on shape mismatch.
///
/// A NaN anywhere in either operand propagates into the result.
pub fn max_abs_diff<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Option<T> {
    if a.shape() != b.shape() {
        return None;
    }
    let mut worst = T::zero();
    for (&x, &y) in a.as_array().iter().zip(b.as_array().iter()) {
        let diff = (x - y).abs();
        if diff.is_nan() {
            return Some(diff);
        }
        if diff > worst {
            worst = diff;
        }
    }
    Some(worst)
}
