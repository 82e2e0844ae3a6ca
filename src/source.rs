//! Input matrix generation for the benchmark harness.

use ndarray::Array2;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::matrix::{Element, Matrix};

/// Supplies the operands the harness multiplies.
pub trait MatrixSource<T: Element> {
    /// Produces a fresh `rows x cols` matrix.
    fn generate(&mut self, rows: usize, cols: usize) -> Matrix<T>;
}

/// Uniform values in `[0, 1)` drawn from a [`StdRng`].
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Deterministic source: the same seed always yields the same matrices.
    pub fn seeded(seed: u64) -> Self {
        RandomSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        RandomSource {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is given, OS entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl<T> MatrixSource<T> for RandomSource
where
    T: Element,
    StandardUniform: Distribution<T>,
{
    fn generate(&mut self, rows: usize, cols: usize) -> Matrix<T> {
        let rng = &mut self.rng;
        Matrix::from_array(Array2::from_shape_simple_fn((rows, cols), || rng.random()))
    }
}
