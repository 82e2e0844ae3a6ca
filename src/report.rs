//! CSV persistence of benchmark records and plot-ready series.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::harness::BenchmarkRecord;
use crate::multiply::Algorithm;

/// Column header of the persisted results.
pub const CSV_HEADER: [&str; 4] = ["n", "algorithm", "time_ms", "mem_kb"];

/// Errors raised while reading or writing result files.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes `records` as CSV, header first, in the given order.
pub fn write_csv<W: Write>(records: &[BenchmarkRecord], writer: W) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        wtr.write_record(CSV_HEADER)?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes `records` to it.
pub fn save_csv(records: &[BenchmarkRecord], path: impl AsRef<Path>) -> Result<(), ReportError> {
    write_csv(records, File::create(path)?)
}

/// Reads records written by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<BenchmarkRecord>, ReportError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records = rdr
        .deserialize::<BenchmarkRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<BenchmarkRecord>, ReportError> {
    read_csv(File::open(path)?)
}

/// Mean time per size for one algorithm: one line of the comparison plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub algorithm: Algorithm,
    /// `(n, time_ms)` in record order.
    pub points: Vec<(usize, f64)>,
}

/// Groups records by algorithm, in [`Algorithm::ALL`] order, skipping
/// algorithms with no records.
pub fn series_by_algorithm(records: &[BenchmarkRecord]) -> Vec<Series> {
    Algorithm::ALL
        .into_iter()
        .map(|algorithm| Series {
            algorithm,
            points: records
                .iter()
                .filter(|record| record.algorithm == algorithm)
                .map(|record| (record.n, record.time_ms))
                .collect(),
        })
        .filter(|series| !series.points.is_empty())
        .collect()
}

/// Fixed-width table of mean times: one row per size, one column per
/// algorithm. Missing combinations print as `-`.
pub fn render_summary(records: &[BenchmarkRecord]) -> String {
    let mut sizes: Vec<usize> = Vec::new();
    for record in records {
        if !sizes.contains(&record.n) {
            sizes.push(record.n);
        }
    }

    let mut out = String::new();
    let _ = write!(out, "{:>8}", "n");
    for algorithm in Algorithm::ALL {
        let _ = write!(out, " {:>14}", format!("{algorithm} (ms)"));
    }
    out.push('\n');

    for n in sizes {
        let _ = write!(out, "{n:>8}");
        for algorithm in Algorithm::ALL {
            match records
                .iter()
                .find(|record| record.n == n && record.algorithm == algorithm)
            {
                Some(record) => {
                    let _ = write!(out, " {:>14.3}", record.time_ms);
                }
                None => {
                    let _ = write!(out, " {:>14}", "-");
                }
            }
        }
        out.push('\n');
    }
    out
}
