//! ite - image text enhancement CLI
//!
//! Loads an image, runs the enhancement pipeline, saves the result.
//! Exit codes: 0 success, 1 runtime failure, 2 argument error.

mod args;
mod bench;
mod io;

use anyhow::Result;
use args::Args;
use bench::BenchAggregate;
use clap::Parser;
use ite_pipeline::{enhance_with_log, TimingLog};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{debug, info};

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let src = io::load_raster(&args.input)?;
    info!(
        input = %args.input.display(),
        width = src.width(),
        height = src.height(),
        channels = src.channels(),
        "loaded image"
    );

    let options = args.to_options();
    if options.do_colour_pass && src.channels() < 3 {
        info!("input is grayscale; the colour pass will be skipped");
    }

    if args.verbose {
        suggest_parameters(&src);
    }

    for i in 0..args.warmup {
        debug!(run = i + 1, total = args.warmup, "warmup");
        let _ = enhance_with_log(&src, &options, None)?;
    }

    let time_limit = Duration::from_secs(args.time_limit * 60);
    let bench_start = Instant::now();

    let mut aggregate = BenchAggregate::new();
    let mut log = TimingLog::new();
    let mut result = None;
    let mut completed = 0u32;

    for trial in 0..args.trials {
        log.clear();
        let maybe_log = args.time.then_some(&mut log);

        result = Some(enhance_with_log(&src, &options, maybe_log)?);
        completed += 1;

        if args.time {
            aggregate.add_trial(&log);
        }
        debug!(trial = trial + 1, total = args.trials, "trial complete");

        if args.time_limit > 0 && bench_start.elapsed() >= time_limit {
            info!(
                completed,
                limit_min = args.time_limit,
                "time limit reached, stopping early"
            );
            break;
        }
    }

    let result = result.expect("at least one trial ran");
    io::save_raster(&result, &args.output)?;
    info!(output = %args.output.display(), "saved result");

    if args.time && !aggregate.is_empty() {
        print!("{}", aggregate.table(completed));
    }

    Ok(())
}

/// Report the heuristic filter parameters this image would get, so a
/// caller tuning flags by hand has a starting point.
fn suggest_parameters(src: &ite_core::Raster) {
    let Ok(luma) = ite_pipeline::to_luma(src) else {
        return;
    };
    if let Ok(p) = ite_pipeline::AdaptiveGaussianParams::pick(&luma) {
        info!(
            sigma_low = p.sigma_low,
            sigma_high = p.sigma_high,
            edge_thresh = p.edge_thresh,
            "suggested adaptive gaussian parameters"
        );
    }
    if let Ok(window) = ite_pipeline::adaptive_median_max_window(&luma) {
        info!(window, "suggested adaptive median max window");
    }
}
