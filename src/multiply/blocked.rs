//! Cache-blocked multiplication.
//!
//! The iteration space `m x p x n` is cut into cubes of extent
//! `block_size` along each axis. Blocks are visited in (row, inner, column)
//! order and each block runs the same i-k-j accumulation as the naive
//! kernel, so the result contains exactly the same products, only summed in
//! a different order. Block upper bounds are clamped to the matrix extent,
//! which handles dimensions that are not a multiple of the block size.

use std::cmp::min;

use super::{check_inner_dims, Algorithm, Multiplier};
use crate::error::{MatmulError, Result};
use crate::matrix::{Element, Matrix};
use crate::DEFAULT_BLOCK_SIZE;

/// Tiled triple loop over `block_size`-wide cubes.
#[derive(Debug, Clone, Copy)]
pub struct Blocked {
    block_size: usize,
}

impl Blocked {
    /// # Errors
    ///
    /// Returns [`MatmulError::InvalidBlockSize`] if `block_size` is zero.
    pub fn new(block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(MatmulError::InvalidBlockSize(block_size));
        }
        Ok(Blocked { block_size })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl Default for Blocked {
    fn default() -> Self {
        Blocked {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl<T: Element> Multiplier<T> for Blocked {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Blocked
    }

    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        blocked_multiply(a, b, self.block_size)
    }
}

/// Computes `a * b` tile by tile with tiles of extent `block_size`.
///
/// # Errors
///
/// Returns [`MatmulError::InvalidBlockSize`] for a zero block size and a
/// dimension error when `a.cols() != b.rows()`.
pub fn blocked_multiply<T: Element>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    block_size: usize,
) -> Result<Matrix<T>> {
    if block_size == 0 {
        return Err(MatmulError::InvalidBlockSize(block_size));
    }
    check_inner_dims("blocked multiply", a, b)?;

    let (m, p) = a.shape();
    let n = b.cols();
    let a = a.as_array();
    let b = b.as_array();
    let mut c = Matrix::zeros(m, n).into_array();

    for ii in (0..m).step_by(block_size) {
        let i_end = min(ii + block_size, m);
        for kk in (0..p).step_by(block_size) {
            let k_end = min(kk + block_size, p);
            for jj in (0..n).step_by(block_size) {
                let j_end = min(jj + block_size, n);

                for i in ii..i_end {
                    for k in kk..k_end {
                        let aik = a[[i, k]];
                        for j in jj..j_end {
                            c[[i, j]] += aik * b[[k, j]];
                        }
                    }
                }
            }
        }
    }

    Ok(Matrix::from_array(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiply::naive_multiply;
    use crate::ops::approximately_equal;

    fn ramp(rows: usize, cols: usize) -> Matrix {
        let data = (0..rows * cols).map(|v| (v % 7) as f64 - 3.0).collect();
        Matrix::from_shape_vec(rows, cols, data).unwrap()
    }

    #[test]
    fn test_rejects_zero_block_size() {
        assert_eq!(
            Blocked::new(0).unwrap_err(),
            MatmulError::InvalidBlockSize(0)
        );
        let a = ramp(2, 2);
        assert!(blocked_multiply(&a, &a, 0).is_err());
    }

    #[test]
    fn test_uneven_block_boundaries() {
        let a = ramp(7, 5);
        let b = ramp(5, 9);
        let expected = naive_multiply(&a, &b).unwrap();
        for block_size in [1, 2, 3, 4, 6, 64] {
            let c = blocked_multiply(&a, &b, block_size).unwrap();
            assert!(
                approximately_equal(&c, &expected, 1e-9),
                "block size {block_size} diverged from naive"
            );
        }
    }

    #[test]
    fn test_default_block_size() {
        assert_eq!(Blocked::default().block_size(), DEFAULT_BLOCK_SIZE);
    }
}
