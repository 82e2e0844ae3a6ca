//! Dense row-major matrix used by every multiplier.
//!
//! [`Matrix`] wraps an [`ndarray::Array2`] so that rectangularity is
//! guaranteed by construction and quadrant extraction can hand out
//! zero-copy views into a single backing buffer.

use std::fmt;
use std::ops::{AddAssign, Index, SubAssign};

use ndarray::{Array2, ArrayView2};
use num::Float;

use crate::error::{MatmulError, Result};

/// Scalar types the multipliers accept.
///
/// Any IEEE float with in-place accumulation qualifies, so `f32` and `f64`
/// both work out of the box.
pub trait Element: Float + AddAssign + SubAssign + fmt::Debug + fmt::Display + 'static {}

impl<T> Element for T where T: Float + AddAssign + SubAssign + fmt::Debug + fmt::Display + 'static {}

/// A rectangular matrix of floating-point values stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T = f64> {
    data: Array2<T>,
}

impl<T: Element> Matrix<T> {
    /// Creates a `rows x cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Creates the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        Matrix {
            data: Array2::eye(n),
        }
    }

    /// Builds a matrix from a list of rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatmulError::EmptyMatrix`] when there are no rows or the
    /// first row is empty, and [`MatmulError::RaggedRows`] when any row
    /// length differs from the first.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let expected = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(MatmulError::EmptyMatrix),
        };

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(MatmulError::RaggedRows {
                row,
                expected,
                found,
            });
        }

        let n_rows = rows.len();
        let flat: Vec<T> = rows.into_iter().flatten().collect();
        Self::from_shape_vec(n_rows, expected, flat)
    }

    /// Builds a matrix from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MatmulError::ShapeError`] if `data.len() != rows * cols`.
    pub fn from_shape_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let len = data.len();
        Array2::from_shape_vec((rows, cols), data)
            .map(|data| Matrix { data })
            .map_err(|_| MatmulError::ShapeError { rows, cols, len })
    }

    /// Wraps an existing two-dimensional array.
    pub fn from_array(data: Array2<T>) -> Self {
        Matrix { data }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Borrowed view over the whole matrix.
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array2<T> {
        &self.data
    }

    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    /// Copies the matrix back out as a list of rows.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data.rows().into_iter().map(|row| row.to_vec()).collect()
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &T {
        &self.data[index]
    }
}

/// Prints one row per line with tab-separated values.
impl<T: Element> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.rows() {
            for value in row.iter() {
                write!(f, "{value}\t")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
