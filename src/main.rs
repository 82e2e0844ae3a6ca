use std::error::Error;
use std::process::ExitCode;

use log::{error, info};

use matbench::config::USAGE;
use matbench::measure::{AllocationProbe, TrackingAllocator, WallClock};
use matbench::report::{render_summary, save_csv};
use matbench::source::RandomSource;
use matbench::{CliOptions, Harness};

#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator::new();

fn run() -> Result<bool, Box<dyn Error>> {
    let options = CliOptions::parse(std::env::args().skip(1))?;
    if options.help {
        print!("{USAGE}");
        return Ok(true);
    }

    let config = options.config;
    info!(
        "sizes={:?}, repeats={}, block_size={}, tolerance={:e}",
        config.sizes, config.repeats, config.block_size, config.tolerance
    );

    let source = RandomSource::new(config.seed);
    let mut harness = Harness::new(config, source, WallClock, AllocationProbe::new(&ALLOCATOR))?;
    let report = harness.run()?;

    let records = report.records();
    save_csv(&records, &options.output)?;
    info!(
        "saved {} records to {} (run started {})",
        records.len(),
        options.output.display(),
        report.started_at.format("%Y-%m-%d %H:%M:%S")
    );

    println!("{}", render_summary(&records));

    for failure in report.failures() {
        error!(
            "{} at n={} failed validation (tolerance {:e})",
            failure.algorithm, failure.n, failure.tolerance
        );
    }
    Ok(report.is_clean())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
