//! Benchmark parameters and command-line parsing.

use std::path::PathBuf;

use crate::error::{config_error, Result};
use crate::multiply::Padding;
use crate::{DEFAULT_BLOCK_SIZE, DEFAULT_TOLERANCE};

/// Everything that shapes a benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// Square matrix sizes, benchmarked in this order.
    pub sizes: Vec<usize>,
    /// Timed calls per (size, algorithm); the record keeps their mean.
    pub repeats: usize,
    /// Tile extent for the blocked multiplier.
    pub block_size: usize,
    /// Maximum absolute per-element drift from the naive reference.
    pub tolerance: f64,
    /// Seed for the input generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Subproblem extent at which Strassen hands over to the naive kernel.
    pub strassen_leaf_size: usize,
    pub padding: Padding,
    /// Abort on the first validation failure instead of recording it.
    pub fail_fast: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            sizes: vec![128, 256, 512, 1024],
            repeats: 3,
            block_size: DEFAULT_BLOCK_SIZE,
            tolerance: DEFAULT_TOLERANCE,
            seed: None,
            strassen_leaf_size: 1,
            padding: Padding::Shared,
            fail_fast: false,
        }
    }
}

impl BenchmarkConfig {
    /// Checks every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MatmulError::InvalidConfig`] naming the first bad
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(config_error("at least one matrix size is required"));
        }
        if self.sizes.contains(&0) {
            return Err(config_error("matrix sizes must be at least 1"));
        }
        if self.repeats == 0 {
            return Err(config_error("repeats must be at least 1"));
        }
        if self.block_size == 0 {
            return Err(config_error("block size must be at least 1"));
        }
        if self.strassen_leaf_size == 0 {
            return Err(config_error("strassen leaf size must be at least 1"));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(config_error(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

pub const USAGE: &str = "\
Usage: matbench [OPTIONS]

Options:
  --sizes <N,N,...>        matrix sizes to benchmark [default: 128,256,512,1024]
  --repeats <N>            timed calls per size and algorithm [default: 3]
  --block-size <N>         tile extent of the blocked multiplier [default: 64]
  --tolerance <X>          allowed drift from the naive result [default: 1e-6]
  --seed <N>               seed the input generator
  --leaf-size <N>          Strassen naive cutoff [default: 1]
  --padding <MODE>         shared | per-dimension [default: shared]
  --fail-fast              abort on the first validation failure
  --output <PATH>          CSV destination [default: benchmark_results.csv]
  -h, --help               print this help
";

/// Parsed command line of the `matbench` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub config: BenchmarkConfig,
    pub output: PathBuf,
    pub help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        CliOptions {
            config: BenchmarkConfig::default(),
            output: PathBuf::from("benchmark_results.csv"),
            help: false,
        }
    }
}

impl CliOptions {
    /// Parses arguments, program name excluded.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown flags, missing or
    /// malformed values, and parameters rejected by
    /// [`BenchmarkConfig::validate`].
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut options = CliOptions::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(flag) = args.next() {
            let mut value = || {
                args.next()
                    .ok_or_else(|| config_error(format!("missing value for {flag}")))
            };
            match flag.as_str() {
                "--sizes" => options.config.sizes = parse_list(&value()?)?,
                "--repeats" => options.config.repeats = parse_value("--repeats", &value()?)?,
                "--block-size" => {
                    options.config.block_size = parse_value("--block-size", &value()?)?
                }
                "--tolerance" => {
                    options.config.tolerance = parse_value("--tolerance", &value()?)?
                }
                "--seed" => options.config.seed = Some(parse_value("--seed", &value()?)?),
                "--leaf-size" => {
                    options.config.strassen_leaf_size = parse_value("--leaf-size", &value()?)?
                }
                "--padding" => options.config.padding = parse_padding(&value()?)?,
                "--output" => options.output = PathBuf::from(value()?),
                "--fail-fast" => options.config.fail_fast = true,
                "-h" | "--help" => options.help = true,
                other => return Err(config_error(format!("unknown argument '{other}'"))),
            }
        }

        if !options.help {
            options.config.validate()?;
        }
        Ok(options)
    }
}

fn parse_value<V: std::str::FromStr>(flag: &str, raw: &str) -> Result<V> {
    raw.trim()
        .parse()
        .map_err(|_| config_error(format!("invalid value '{raw}' for {flag}")))
}

fn parse_list(raw: &str) -> Result<Vec<usize>> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_value("--sizes", part))
        .collect()
}

fn parse_padding(raw: &str) -> Result<Padding> {
    match raw {
        "shared" => Ok(Padding::Shared),
        "per-dimension" => Ok(Padding::PerDimension),
        other => Err(config_error(format!(
            "unknown padding '{other}', expected shared or per-dimension"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatmulError;

    #[test]
    fn test_defaults_are_valid() {
        let config = BenchmarkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sizes, vec![128, 256, 512, 1024]);
        assert_eq!(config.repeats, 3);
        assert_eq!(config.block_size, 64);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let cases = [
            BenchmarkConfig {
                sizes: vec![],
                ..Default::default()
            },
            BenchmarkConfig {
                sizes: vec![4, 0],
                ..Default::default()
            },
            BenchmarkConfig {
                repeats: 0,
                ..Default::default()
            },
            BenchmarkConfig {
                block_size: 0,
                ..Default::default()
            },
            BenchmarkConfig {
                strassen_leaf_size: 0,
                ..Default::default()
            },
            BenchmarkConfig {
                tolerance: -1.0,
                ..Default::default()
            },
            BenchmarkConfig {
                tolerance: f64::NAN,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(MatmulError::InvalidConfig { .. })),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_all_flags() {
        let options = CliOptions::parse([
            "--sizes",
            "2, 4,8",
            "--repeats",
            "5",
            "--block-size",
            "16",
            "--tolerance",
            "1e-9",
            "--seed",
            "42",
            "--leaf-size",
            "32",
            "--padding",
            "per-dimension",
            "--fail-fast",
            "--output",
            "out.csv",
        ])
        .unwrap();

        assert_eq!(options.config.sizes, vec![2, 4, 8]);
        assert_eq!(options.config.repeats, 5);
        assert_eq!(options.config.block_size, 16);
        assert_eq!(options.config.tolerance, 1e-9);
        assert_eq!(options.config.seed, Some(42));
        assert_eq!(options.config.strassen_leaf_size, 32);
        assert_eq!(options.config.padding, Padding::PerDimension);
        assert!(options.config.fail_fast);
        assert_eq!(options.output, PathBuf::from("out.csv"));
        assert!(!options.help);
    }

    #[test]
    fn test_parse_empty_gives_defaults() {
        let options = CliOptions::parse(Vec::<String>::new()).unwrap();
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn test_parse_errors() {
        assert!(CliOptions::parse(["--bogus"]).is_err());
        assert!(CliOptions::parse(["--repeats"]).is_err());
        assert!(CliOptions::parse(["--repeats", "many"]).is_err());
        assert!(CliOptions::parse(["--repeats", "0"]).is_err());
        assert!(CliOptions::parse(["--padding", "diagonal"]).is_err());
        assert!(CliOptions::parse(["--sizes", "4,x"]).is_err());
    }

    #[test]
    fn test_help_skips_validation() {
        let options = CliOptions::parse(["--repeats", "0", "--help"]).unwrap();
        assert!(options.help);
    }
}
