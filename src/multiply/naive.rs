use ndarray::{ArrayView2, ArrayViewMut2};

use super::{check_inner_dims, Algorithm, Multiplier};
use crate::error::Result;
use crate::matrix::{Element, Matrix};

/// Direct triple loop in i-k-j order; the correctness oracle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl<T: Element> Multiplier<T> for Naive {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Naive
    }

    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        naive_multiply(a, b)
    }
}

/// Computes `a * b` with the i-k-j triple loop.
///
/// `a[i][k]` is loaded once per `(i, k)` pair and the innermost loop walks
/// one row of `b` and one row of the output with unit stride.
///
/// # Errors
///
/// Returns a dimension error when `a.cols() != b.rows()`.
pub fn naive_multiply<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    check_inner_dims("naive multiply", a, b)?;
    let mut c = Matrix::zeros(a.rows(), b.cols()).into_array();
    accumulate(a.view(), b.view(), c.view_mut());
    Ok(Matrix::from_array(c))
}

/// `c += a * b` over views, shapes already checked by the caller.
///
/// Also serves as the leaf kernel of the Strassen recursion.
pub(crate) fn accumulate<T: Element>(
    a: ArrayView2<'_, T>,
    b: ArrayView2<'_, T>,
    mut c: ArrayViewMut2<'_, T>,
) {
    let (m, p) = a.dim();
    let n = b.ncols();

    for i in 0..m {
        for k in 0..p {
            let aik = a[[i, k]];
            for j in 0..n {
                c[[i, j]] += aik * b[[k, j]];
            }
        }
    }
}
