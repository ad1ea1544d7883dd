//! Enhancement options
//!
//! The option record is the sole carrier of pipeline configuration; the
//! driver reads it and nothing else.

use ite_core::Boundary;
use std::fmt;
use std::str::FromStr;

/// Binarization method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinarizeMethod {
    /// Global Otsu threshold with border-polarity detection.
    Otsu,
    /// Sauvola local threshold; parameters come from the option record.
    Sauvola,
    /// Bataineh adaptive-window local threshold.
    #[default]
    Bataineh,
}

impl FromStr for BinarizeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "otsu" => Ok(BinarizeMethod::Otsu),
            "sauvola" => Ok(BinarizeMethod::Sauvola),
            "bataineh" => Ok(BinarizeMethod::Bataineh),
            other => Err(format!(
                "unknown binarization method '{other}' (allowed: otsu, sauvola, bataineh)"
            )),
        }
    }
}

impl fmt::Display for BinarizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinarizeMethod::Otsu => "otsu",
            BinarizeMethod::Sauvola => "sauvola",
            BinarizeMethod::Bataineh => "bataineh",
        };
        f.write_str(name)
    }
}

/// Configuration record for [`enhance`](crate::enhance).
///
/// Grayscale conversion and contrast stretching always run; every other
/// stage is opt-in. Defaults produce a despeckled Bataineh binarization.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceOptions {
    /// Binarization variant.
    pub method: BinarizeMethod,
    /// Straighten tilted text before contrast stretching.
    pub do_deskew: bool,
    /// Apply a simple Gaussian blur before binarization.
    pub do_gaussian_blur: bool,
    /// Sigma for the simple Gaussian blur.
    pub sigma: f32,
    /// Apply the edge-aware adaptive Gaussian blend; overrides the
    /// simple blur.
    pub do_adaptive_gaussian_blur: bool,
    /// Low sigma for the adaptive blend.
    pub adaptive_sigma_low: f32,
    /// High sigma for the adaptive blend.
    pub adaptive_sigma_high: f32,
    /// Edge threshold for the adaptive blend.
    pub adaptive_edge_thresh: f32,
    /// Apply the simple median filter.
    pub do_median_blur: bool,
    /// Kernel side for the simple median filter (odd).
    pub median_kernel_size: u32,
    /// Deviation threshold for the simple median filter (0 =
    /// unconditional median).
    pub median_threshold: u16,
    /// Apply the adaptive median filter.
    pub do_adaptive_median: bool,
    /// Maximum adaptive-median window (odd, >= 3).
    pub adaptive_median_max_window: u32,
    /// Sauvola window side (odd, >= 3).
    pub sauvola_window_size: u32,
    /// Sauvola sensitivity parameter k.
    pub sauvola_k: f32,
    /// Sauvola threshold offset delta.
    pub sauvola_delta: f32,
    /// Remove small components after binarization.
    pub do_despeckle: bool,
    /// Components below this pixel count are removed (0 disables).
    pub despeckle_threshold: u32,
    /// 8-connectivity for component labelling (false = 4-connectivity).
    pub diagonal_connections: bool,
    /// Apply dilation after despeckling.
    pub do_dilation: bool,
    /// Apply erosion after dilation.
    pub do_erosion: bool,
    /// Structuring-element side for dilation and erosion.
    pub kernel_size: u32,
    /// Compose the binary mask onto the original colour image at the
    /// end. Silently disabled for grayscale input.
    pub do_colour_pass: bool,
    /// Boundary policy for the blur stages and the deskew rotation.
    pub boundary: Boundary,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            method: BinarizeMethod::Bataineh,
            do_deskew: false,
            do_gaussian_blur: false,
            sigma: 1.0,
            do_adaptive_gaussian_blur: false,
            adaptive_sigma_low: 0.5,
            adaptive_sigma_high: 2.0,
            adaptive_edge_thresh: 30.0,
            do_median_blur: false,
            median_kernel_size: 3,
            median_threshold: 0,
            do_adaptive_median: false,
            adaptive_median_max_window: 7,
            sauvola_window_size: 15,
            sauvola_k: 0.2,
            sauvola_delta: 0.0,
            do_despeckle: true,
            despeckle_threshold: 0,
            diagonal_connections: true,
            do_dilation: false,
            do_erosion: false,
            kernel_size: 5,
            do_colour_pass: false,
            boundary: Boundary::Replicate,
        }
    }
}

impl EnhanceOptions {
    /// Fresh options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the binarization method.
    pub fn with_method(mut self, method: BinarizeMethod) -> Self {
        self.method = method;
        self
    }

    /// Enable deskewing.
    pub fn with_deskew(mut self, on: bool) -> Self {
        self.do_deskew = on;
        self
    }

    /// Enable despeckling with the given component-size threshold.
    pub fn with_despeckle(mut self, threshold: u32) -> Self {
        self.do_despeckle = true;
        self.despeckle_threshold = threshold;
        self
    }

    /// Enable the final colour pass.
    pub fn with_colour_pass(mut self, on: bool) -> Self {
        self.do_colour_pass = on;
        self
    }
}
