//! Dense matrix multiplication, three ways.
//!
//! `matbench` implements a direct i-k-j triple loop, a cache-blocked
//! variant and Strassen's seven-product recursion, plus a harness that
//! times all three over a sweep of sizes and validates every result
//! against the naive product.
//!
//! ```
//! use matbench::{blocked_multiply, naive_multiply, strassen_multiply, approximately_equal, Matrix};
//!
//! let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
//! let b = Matrix::from_rows(vec![vec![1.0, 0.0, 2.0, 1.0], vec![0.0, 1.0, 1.0, 3.0]]).unwrap();
//!
//! let reference = naive_multiply(&a, &b).unwrap();
//! assert_eq!(reference.shape(), (3, 4));
//! assert!(approximately_equal(&blocked_multiply(&a, &b, 2).unwrap(), &reference, 1e-9));
//! assert!(approximately_equal(&strassen_multiply(&a, &b).unwrap(), &reference, 1e-9));
//! ```

pub mod config;
pub mod error;
pub mod harness;
pub mod matrix;
pub mod measure;
pub mod multiply;
pub mod ops;
pub mod report;
pub mod source;

pub use config::{BenchmarkConfig, CliOptions};
pub use error::{MatmulError, Result};
pub use harness::{BenchmarkRecord, BenchmarkReport, CaseOutcome, Harness, ValidationFailure};
pub use matrix::{Element, Matrix};
pub use multiply::{
    blocked_multiply, naive_multiply, strassen_multiply, Algorithm, Blocked, Multiplier, Naive,
    Padding, Strassen,
};
pub use ops::{add, approximately_equal, max_abs_diff, subtract};

/// Tile extent used by the blocked multiplier unless configured otherwise.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Per-element tolerance the harness accepts between an algorithm and the
/// naive reference.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
