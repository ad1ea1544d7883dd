//! Command-line argument surface
//!
//! Flags map one-to-one onto [`EnhanceOptions`]; benchmark controls are
//! CLI-only and never reach the pipeline.

use clap::Parser;
use ite_core::Boundary;
use ite_pipeline::{BinarizeMethod, EnhanceOptions};
use std::path::PathBuf;

fn positive_f32(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(format!("must be > 0, got {v}"))
    }
}

fn odd_window(s: &str) -> Result<u32, String> {
    let v: u32 = s.parse().map_err(|_| format!("'{s}' is not an integer"))?;
    if v < 3 {
        Err(format!("must be >= 3, got {v}"))
    } else if v % 2 == 0 {
        Err(format!("must be odd, got {v}"))
    } else {
        Ok(v)
    }
}

/// Image text enhancement: clean up scanned documents for OCR.
#[derive(Parser, Debug)]
#[command(name = "ite", version, about)]
pub struct Args {
    /// Path to the source image
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the processed result
    #[arg(short, long)]
    pub output: PathBuf,

    /// Binarization method: otsu, sauvola or bataineh
    #[arg(long = "binarization", default_value_t = BinarizeMethod::Bataineh)]
    pub binarization: BinarizeMethod,

    /// Straighten tilted text before contrast stretching
    #[arg(long = "do-deskew")]
    pub do_deskew: bool,

    /// Apply a Gaussian blur before binarization
    #[arg(long = "do-gaussian")]
    pub do_gaussian: bool,

    /// Gaussian sigma
    #[arg(long, default_value_t = 1.0, value_parser = positive_f32)]
    pub sigma: f32,

    /// Apply the adaptive Gaussian blend (overrides --do-gaussian)
    #[arg(long = "do-adaptive-gaussian")]
    pub do_adaptive_gaussian: bool,

    /// Adaptive blend low sigma
    #[arg(long = "sigma-low", default_value_t = 0.5, value_parser = positive_f32)]
    pub sigma_low: f32,

    /// Adaptive blend high sigma
    #[arg(long = "sigma-high", default_value_t = 2.0, value_parser = positive_f32)]
    pub sigma_high: f32,

    /// Adaptive blend edge sensitivity
    #[arg(long = "edge-thresh", default_value_t = 30.0)]
    pub edge_thresh: f32,

    /// Apply the median filter
    #[arg(long = "do-median")]
    pub do_median: bool,

    /// Median kernel size (odd)
    #[arg(long = "median-size", default_value_t = 3, value_parser = odd_window)]
    pub median_size: u32,

    /// Median deviation threshold (0 = unconditional)
    #[arg(long = "median-thresh", default_value_t = 0)]
    pub median_thresh: u16,

    /// Apply the adaptive median filter
    #[arg(long = "do-adaptive-median")]
    pub do_adaptive_median: bool,

    /// Adaptive median maximum window (odd, >= 3)
    #[arg(long = "adaptive-median-max", default_value_t = 7, value_parser = odd_window)]
    pub adaptive_median_max: u32,

    /// Sauvola window size
    #[arg(long = "sauvola-window", default_value_t = 15, value_parser = odd_window)]
    pub sauvola_window: u32,

    /// Sauvola sensitivity k
    #[arg(long = "sauvola-k", default_value_t = 0.2, value_parser = positive_f32)]
    pub sauvola_k: f32,

    /// Sauvola threshold offset delta
    #[arg(long = "sauvola-delta", default_value_t = 0.0)]
    pub sauvola_delta: f32,

    /// Remove small specks after binarization
    #[arg(long = "do-despeckle", default_value_t = true)]
    pub do_despeckle: bool,

    /// Maximum pixel size of specks to remove
    #[arg(long = "despeckle-thresh", default_value_t = 0)]
    pub despeckle_thresh: u32,

    /// Label specks with 4-connectivity instead of 8
    #[arg(long = "four-connectivity")]
    pub four_connectivity: bool,

    /// Grow bright regions after despeckling (thins dark text)
    #[arg(long = "do-dilation")]
    pub do_dilation: bool,

    /// Grow dark regions after dilation (bolds dark text)
    #[arg(long = "do-erosion")]
    pub do_erosion: bool,

    /// Structuring-element size for dilation/erosion
    #[arg(long = "kernel-size", default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub kernel_size: u32,

    /// Re-apply original colour to the binarized mask
    #[arg(long = "do-color-pass")]
    pub do_color_pass: bool,

    /// Boundary conditions: 0 = zero (Dirichlet), 1 = replicate (Neumann)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub boundary: u8,

    /// Number of benchmark trials
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub trials: u32,

    /// Warmup runs before the benchmark
    #[arg(long, default_value_t = 0)]
    pub warmup: u32,

    /// Maximum benchmark duration in minutes (0 = unlimited)
    #[arg(long = "time-limit", default_value_t = 0)]
    pub time_limit: u64,

    /// Per-stage logging during execution
    #[arg(short, long)]
    pub verbose: bool,

    /// Collect and print per-stage timings
    #[arg(short = 't', long = "time")]
    pub time: bool,
}

impl Args {
    /// Translate the flag surface into the pipeline option record.
    pub fn to_options(&self) -> EnhanceOptions {
        EnhanceOptions {
            method: self.binarization,
            do_deskew: self.do_deskew,
            do_gaussian_blur: self.do_gaussian,
            sigma: self.sigma,
            do_adaptive_gaussian_blur: self.do_adaptive_gaussian,
            adaptive_sigma_low: self.sigma_low,
            adaptive_sigma_high: self.sigma_high,
            adaptive_edge_thresh: self.edge_thresh,
            do_median_blur: self.do_median,
            median_kernel_size: self.median_size,
            median_threshold: self.median_thresh,
            do_adaptive_median: self.do_adaptive_median,
            adaptive_median_max_window: self.adaptive_median_max,
            sauvola_window_size: self.sauvola_window,
            sauvola_k: self.sauvola_k,
            sauvola_delta: self.sauvola_delta,
            do_despeckle: self.do_despeckle,
            despeckle_threshold: self.despeckle_thresh,
            diagonal_connections: !self.four_connectivity,
            do_dilation: self.do_dilation,
            do_erosion: self.do_erosion,
            kernel_size: self.kernel_size,
            do_colour_pass: self.do_color_pass,
            boundary: Boundary::from_code(self.boundary).unwrap_or_default(),
        }
    }
}
