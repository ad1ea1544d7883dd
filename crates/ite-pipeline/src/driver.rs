//! Pipeline driver
//!
//! Applies the enhancement stages in their fixed order:
//!
//! ```text
//! luma -> [deskew] -> contrast -> [adaptive-gaussian | gaussian]
//!      -> [median] -> [adaptive-median] -> binarize -> [despeckle]
//!      -> [dilation] -> [erosion] -> [colour-pass]
//! ```
//!
//! Stages in brackets are opt-in through the option record. The driver
//! is a pure function of (input raster, options): it owns a working copy
//! and never touches the caller's raster.

use crate::error::{PipelineError, PipelineResult, StageError};
use crate::options::{BinarizeMethod, EnhanceOptions};
use crate::timing::TimingLog;
use ite_binarize::{binarize_bataineh, binarize_otsu, binarize_sauvola};
use ite_color::{colour_pass, contrast_stretch, to_luma};
use ite_core::Raster;
use ite_filter::{adaptive_gaussian_blur, adaptive_median, gaussian_blur, median_blur};
use ite_geometry::{detect_skew, rotate_bilinear};
use ite_morph::{despeckle, dilate, erode, Connectivity};
use std::time::Instant;
use tracing::debug;

/// Run the enhancement pipeline on `src`.
///
/// Returns the enhanced raster: binary black-on-white, or the recoloured
/// original when the colour pass is enabled on colour input.
pub fn enhance(src: &Raster, options: &EnhanceOptions) -> PipelineResult<Raster> {
    enhance_with_log(src, options, None)
}

/// Like [`enhance`], recording per-stage wall-clock timings into `log`
/// when one is supplied. The log never influences stage behaviour.
pub fn enhance_with_log(
    src: &Raster,
    options: &EnhanceOptions,
    mut log: Option<&mut TimingLog>,
) -> PipelineResult<Raster> {
    // The colour pass needs the original pixels (deskewed alongside the
    // working copy when deskew fires). Grayscale input silently disables
    // it.
    let mut colour_keep = if options.do_colour_pass && src.channels() >= 3 {
        Some(src.clone())
    } else {
        None
    };

    let mut work = timed(&mut log, "luma", || Ok(to_luma(src)?))?;

    if options.do_deskew {
        let applied = timed(&mut log, "deskew", || {
            let detection = detect_skew(&work)?;
            if !detection.should_rotate() {
                return Ok(None);
            }
            let mut rotated = rotate_bilinear(&work, -detection.angle, options.boundary)?;
            work.swap(&mut rotated);
            if let Some(colour) = colour_keep.as_mut() {
                let mut rotated = rotate_bilinear(colour, -detection.angle, options.boundary)?;
                colour.swap(&mut rotated);
            }
            Ok(Some(detection.angle))
        })?;
        if let Some(angle) = applied {
            debug!(angle, "deskew rotation applied");
        }
    }

    timed(&mut log, "contrast", || {
        contrast_stretch(&mut work);
        Ok(())
    })?;

    if options.do_adaptive_gaussian_blur {
        timed(&mut log, "adaptive-gaussian", || {
            adaptive_gaussian_blur(
                &mut work,
                options.adaptive_sigma_low,
                options.adaptive_sigma_high,
                options.adaptive_edge_thresh,
                options.boundary,
            );
            Ok(())
        })?;
    } else if options.do_gaussian_blur {
        timed(&mut log, "gaussian", || {
            gaussian_blur(&mut work, options.sigma, options.boundary);
            Ok(())
        })?;
    }

    if options.do_median_blur {
        timed(&mut log, "median", || {
            Ok(median_blur(
                &mut work,
                options.median_kernel_size,
                options.median_threshold,
            )?)
        })?;
    }

    if options.do_adaptive_median {
        timed(&mut log, "adaptive-median", || {
            Ok(adaptive_median(&mut work, options.adaptive_median_max_window)?)
        })?;
    }

    timed(&mut log, "binarize", || {
        match options.method {
            BinarizeMethod::Otsu => binarize_otsu(&mut work)?,
            BinarizeMethod::Sauvola => binarize_sauvola(
                &mut work,
                options.sauvola_window_size,
                options.sauvola_k,
                options.sauvola_delta,
            )?,
            BinarizeMethod::Bataineh => binarize_bataineh(&mut work)?,
        }
        Ok(())
    })?;

    if options.do_despeckle {
        timed(&mut log, "despeckle", || {
            Ok(despeckle(
                &mut work,
                options.despeckle_threshold,
                Connectivity::from_diagonal_flag(options.diagonal_connections),
            )?)
        })?;
    }

    if options.do_dilation {
        timed(&mut log, "dilation", || Ok(dilate(&mut work, options.kernel_size)?))?;
    }

    if options.do_erosion {
        timed(&mut log, "erosion", || Ok(erode(&mut work, options.kernel_size)?))?;
    }

    if let Some(mut colour) = colour_keep {
        timed(&mut log, "colour-pass", || Ok(colour_pass(&work, &mut colour)?))?;
        return Ok(colour);
    }

    Ok(work)
}

/// Run one stage, tagging its errors with the stage name and recording
/// its duration.
fn timed<T>(
    log: &mut Option<&mut TimingLog>,
    stage: &'static str,
    f: impl FnOnce() -> Result<T, StageError>,
) -> PipelineResult<T> {
    let start = Instant::now();
    let out = f().map_err(|source| PipelineError::Stage { stage, source })?;
    let elapsed = start.elapsed();
    debug!(stage, elapsed_us = elapsed.as_micros() as u64, "stage done");
    if let Some(l) = log.as_deref_mut() {
        l.record(stage, elapsed);
    }
    Ok(out)
}
