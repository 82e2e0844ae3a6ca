//! Error types for matbench operations.
//!
//! Every multiplication reports precondition violations through
//! [`MatmulError`] instead of panicking, so the harness and the binary can
//! decide what a failure means for the run.

use thiserror::Error;

use crate::multiply::Algorithm;

/// Errors that can occur while building, combining or benchmarking matrices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatmulError {
    /// Operand shapes are incompatible for the requested operation.
    #[error(
        "Dimension error in {operation}: left operand is {}x{}, right operand is {}x{}",
        .left.0, .left.1, .right.0, .right.1
    )]
    DimensionError {
        /// Name of the operation that rejected its operands.
        operation: &'static str,
        /// (rows, cols) of the left operand.
        left: (usize, usize),
        /// (rows, cols) of the right operand.
        right: (usize, usize),
    },

    /// A row-list matrix had rows of different lengths.
    #[error("Ragged matrix: row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        /// Index of the first offending row.
        row: usize,
        /// Column count of row 0.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },

    /// A matrix was built from no rows or no columns.
    #[error("Empty matrix: at least one row and one column are required")]
    EmptyMatrix,

    /// A flat buffer did not hold `rows * cols` elements.
    #[error("Shape error: {rows}x{cols} matrix needs {} elements, got {len}", .rows * .cols)]
    ShapeError { rows: usize, cols: usize, len: usize },

    /// Blocked multiplication needs a block extent of at least one.
    #[error("Invalid block size: {0} (must be at least 1)")]
    InvalidBlockSize(usize),

    /// A benchmark parameter is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A multiplier disagreed with the naive reference beyond tolerance.
    #[error(
        "Validation failed for {algorithm} at n={size}: max abs diff {max_abs_diff:e} exceeds tolerance {tolerance:e}"
    )]
    ValidationFailure {
        size: usize,
        algorithm: Algorithm,
        max_abs_diff: f64,
        tolerance: f64,
    },
}

/// Result type alias for matbench operations.
pub type Result<T> = std::result::Result<T, MatmulError>;

/// Creates a dimension error for `operation` from the two operand shapes.
pub fn dimension_error(
    operation: &'static str,
    left: (usize, usize),
    right: (usize, usize),
) -> MatmulError {
    MatmulError::DimensionError {
        operation,
        left,
        right,
    }
}

/// Creates a configuration error.
pub fn config_error(message: impl Into<String>) -> MatmulError {
    MatmulError::InvalidConfig {
        message: message.into(),
    }
}
