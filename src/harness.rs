//! Benchmark driver.
//!
//! For every configured size the harness generates two square operands,
//! computes the naive product as ground truth, then for each algorithm in
//! [`Algorithm::ALL`] order:
//!
//! 1. times `repeats` calls and keeps the mean,
//! 2. validates the last timed result against the reference,
//! 3. runs one extra, untimed call under the memory probe.
//!
//! A validation failure is recorded as a [`CaseOutcome::Rejected`] and the
//! run moves on, unless [`BenchmarkConfig::fail_fast`] asks for the whole
//! run to stop.

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::config::BenchmarkConfig;
use crate::error::{MatmulError, Result};
use crate::matrix::Matrix;
use crate::measure::{MemoryProbe, Timer};
use crate::multiply::{Algorithm, Blocked, Multiplier, Naive, Strassen};
use crate::ops::{approximately_equal, max_abs_diff};
use crate::source::MatrixSource;

/// One measured (size, algorithm) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Matrix size `n` of the `n x n` operands.
    pub n: usize,
    pub algorithm: Algorithm,
    /// Mean wall-clock time per call in milliseconds.
    pub time_ms: f64,
    /// Peak heap usage of a single call in kilobytes.
    pub mem_kb: f64,
}

/// A combination whose output drifted from the naive reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub n: usize,
    pub algorithm: Algorithm,
    /// `None` when the result shape did not even match.
    pub max_abs_diff: Option<f64>,
    pub tolerance: f64,
}

impl From<&ValidationFailure> for MatmulError {
    fn from(failure: &ValidationFailure) -> Self {
        MatmulError::ValidationFailure {
            size: failure.n,
            algorithm: failure.algorithm,
            max_abs_diff: failure.max_abs_diff.unwrap_or(f64::INFINITY),
            tolerance: failure.tolerance,
        }
    }
}

/// Result of benchmarking one (size, algorithm) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Recorded(BenchmarkRecord),
    Rejected(ValidationFailure),
}

/// Everything a finished run produced, in generation order.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub started_at: DateTime<Local>,
    pub outcomes: Vec<CaseOutcome>,
}

impl BenchmarkReport {
    /// Successful measurements, sizes outer and algorithms inner.
    pub fn records(&self) -> Vec<BenchmarkRecord> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                CaseOutcome::Recorded(record) => Some(record.clone()),
                CaseOutcome::Rejected(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<&ValidationFailure> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                CaseOutcome::Rejected(failure) => Some(failure),
                CaseOutcome::Recorded(_) => None,
            })
            .collect()
    }

    /// `true` when no combination failed validation.
    pub fn is_clean(&self) -> bool {
        self.failures().is_empty()
    }
}

/// Runs the configured sweep against pluggable collaborators.
pub struct Harness<S, Tm, P> {
    config: BenchmarkConfig,
    source: S,
    timer: Tm,
    probe: P,
}

impl<S, Tm, P> Harness<S, Tm, P>
where
    S: MatrixSource<f64>,
    Tm: Timer,
    P: MemoryProbe,
{
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: BenchmarkConfig, source: S, timer: Tm, probe: P) -> Result<Self> {
        config.validate()?;
        Ok(Harness {
            config,
            source,
            timer,
            probe,
        })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Benchmarks every size against every algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`MatmulError::ValidationFailure`] on the first mismatch when
    /// `fail_fast` is set, and propagates multiplier errors.
    pub fn run(&mut self) -> Result<BenchmarkReport> {
        let started_at = Local::now();
        let multipliers = self.multipliers()?;
        let mut outcomes = Vec::with_capacity(self.config.sizes.len() * multipliers.len());

        for n in self.config.sizes.clone() {
            let a = self.source.generate(n, n);
            let b = self.source.generate(n, n);
            let reference = Naive.multiply(&a, &b)?;

            for multiplier in &multipliers {
                let outcome = self.run_case(n, multiplier.as_ref(), &a, &b, &reference)?;
                if let CaseOutcome::Rejected(failure) = &outcome {
                    if self.config.fail_fast {
                        return Err(failure.into());
                    }
                }
                outcomes.push(outcome);
            }
        }

        Ok(BenchmarkReport {
            started_at,
            outcomes,
        })
    }

    fn multipliers(&self) -> Result<Vec<Box<dyn Multiplier<f64>>>> {
        Algorithm::ALL
            .into_iter()
            .map(|algorithm| -> Result<Box<dyn Multiplier<f64>>> {
                let multiplier: Box<dyn Multiplier<f64>> = match algorithm {
                    Algorithm::Naive => Box::new(Naive),
                    Algorithm::Blocked => Box::new(Blocked::new(self.config.block_size)?),
                    Algorithm::Strassen => Box::new(Strassen::new(
                        self.config.padding,
                        self.config.strassen_leaf_size,
                    )?),
                };
                Ok(multiplier)
            })
            .collect()
    }

    /// One timed call; appends its duration in milliseconds to `samples`.
    fn timed_call(
        &mut self,
        multiplier: &dyn Multiplier<f64>,
        a: &Matrix,
        b: &Matrix,
        samples: &mut Vec<f64>,
    ) -> Result<Matrix> {
        let (result, elapsed) = self.timer.time(|| multiplier.multiply(a, b));
        samples.push(elapsed.as_secs_f64() * 1_000.0);
        result
    }

    fn run_case(
        &mut self,
        n: usize,
        multiplier: &dyn Multiplier<f64>,
        a: &Matrix,
        b: &Matrix,
        reference: &Matrix,
    ) -> Result<CaseOutcome> {
        let algorithm = multiplier.algorithm();

        let mut samples = Vec::with_capacity(self.config.repeats);
        let mut product = self.timed_call(multiplier, a, b, &mut samples)?;
        for _ in 1..self.config.repeats {
            product = self.timed_call(multiplier, a, b, &mut samples)?;
        }
        let time_ms = samples.iter().mean();
        if samples.len() > 1 {
            debug!(
                "n={n}, alg={algorithm}: std dev {:.3}ms over {} calls",
                samples.iter().std_dev(),
                samples.len()
            );
        }

        let tolerance = self.config.tolerance;
        if !approximately_equal(&product, reference, tolerance) {
            let failure = ValidationFailure {
                n,
                algorithm,
                max_abs_diff: max_abs_diff(&product, reference),
                tolerance,
            };
            warn!("{}", MatmulError::from(&failure));
            return Ok(CaseOutcome::Rejected(failure));
        }
        drop(product);

        let (result, peak_bytes) = self.probe.peak_during(|| multiplier.multiply(a, b));
        result?;
        let mem_kb = peak_bytes as f64 / 1024.0;

        info!("n={n}, alg={algorithm}, time={time_ms:.2}ms, mem={mem_kb:.1}KB");
        Ok(CaseOutcome::Recorded(BenchmarkRecord {
            n,
            algorithm,
            time_ms,
            mem_kb,
        }))
    }
}
