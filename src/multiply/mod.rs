//! The three multiplication strategies under comparison.
//!
//! [`Naive`] is the reference every other result is validated against.
//! [`Blocked`] performs the same multiply-accumulates reordered into cache
//! tiles, and [`Strassen`] trades one of eight block products for extra
//! additions at each level of recursion.

pub mod blocked;
pub mod naive;
pub mod strassen;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{config_error, dimension_error, MatmulError, Result};
use crate::matrix::{Element, Matrix};

pub use blocked::{blocked_multiply, Blocked};
pub use naive::{naive_multiply, Naive};
pub use strassen::{strassen_multiply, Padding, Strassen};

/// Identifies a multiplication strategy in records and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Naive,
    Blocked,
    Strassen,
}

impl Algorithm {
    /// Every algorithm, in benchmark order.
    pub const ALL: [Algorithm; 3] = [Algorithm::Naive, Algorithm::Blocked, Algorithm::Strassen];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Blocked => "blocked",
            Algorithm::Strassen => "strassen",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = MatmulError;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == s)
            .ok_or_else(|| config_error(format!("unknown algorithm '{s}'")))
    }
}

/// A matrix multiplication strategy.
pub trait Multiplier<T: Element> {
    /// Which strategy this is.
    fn algorithm(&self) -> Algorithm;

    /// Computes `a * b` into a freshly allocated matrix.
    ///
    /// # Errors
    ///
    /// Returns a dimension error when `a.cols() != b.rows()`.
    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>>;
}

/// Rejects operands whose inner dimensions disagree.
pub(crate) fn check_inner_dims<T: Element>(
    operation: &'static str,
    a: &Matrix<T>,
    b: &Matrix<T>,
) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(dimension_error(operation, a.shape(), b.shape()));
    }
    Ok(())
}
