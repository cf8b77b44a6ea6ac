//! Calibration inputs supplied by the control surface each frame.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{LenticularError, LenticularResult};

/// Stripe direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Orientation {
    /// Stripes run top to bottom and repeat along x.
    #[default]
    Vertical,
    /// Stripes run left to right and repeat along y.
    Horizontal,
}

impl Orientation {
    /// Stripe direction for a viewport: landscape gets horizontal stripes.
    pub fn for_viewport(width: f64, height: f64) -> Self {
        if width > height {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// Upper-case name used in labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "VERTICAL",
            Self::Horizontal => "HORIZONTAL",
        }
    }
}

/// How the stripe pattern is colored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorMode {
    /// Opaque white stripes.
    #[default]
    #[serde(alias = "BW")]
    Mono,
    /// Stripes recolored with the configured tint (green by default).
    #[serde(alias = "GREEN")]
    Tinted,
    /// Every stripe split into red, green and blue thirds.
    #[serde(alias = "RGB")]
    RgbSubpixel,
}

/// Target aspect ratio for placing stereo media.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    /// Use the aspect of one half of the side-by-side frame.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// 16:9.
    #[serde(rename = "16:9")]
    Wide16x9,
    /// 4:3.
    #[serde(rename = "4:3")]
    Classic4x3,
    /// 21:9.
    #[serde(rename = "21:9")]
    Ultrawide21x9,
    /// 1:1.
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// Fixed width/height ratio, or `None` for [`AspectRatio::Auto`].
    pub fn fixed(self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Wide16x9 => Some(16.0 / 9.0),
            Self::Classic4x3 => Some(4.0 / 3.0),
            Self::Ultrawide21x9 => Some(21.0 / 9.0),
            Self::Square => Some(1.0),
        }
    }

    /// Resolve against the natural aspect of the media.
    pub fn resolve(self, natural: f64) -> f64 {
        self.fixed().unwrap_or(natural)
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = LenticularError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto" => Ok(Self::Auto),
            "16:9" => Ok(Self::Wide16x9),
            "4:3" => Ok(Self::Classic4x3),
            "21:9" => Ok(Self::Ultrawide21x9),
            "1:1" => Ok(Self::Square),
            other => Err(LenticularError::validation(format!(
                "unknown aspect ratio '{other}' (expected auto, 16:9, 4:3, 21:9 or 1:1)"
            ))),
        }
    }
}

/// Known display pixel densities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DevicePreset {
    /// Samsung Galaxy S22 Ultra.
    GalaxyS22Ultra,
    /// Apple iPhone 14.
    IPhone14,
    /// Generic 326 ppi panel.
    Standard,
}

impl DevicePreset {
    /// Physical pixels per inch.
    pub fn ppi(self) -> f64 {
        match self {
            Self::GalaxyS22Ultra => 506.0,
            Self::IPhone14 => 460.0,
            Self::Standard => 326.0,
        }
    }
}

/// Calibration parameters, immutable for the duration of one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalibrationParameters {
    /// Lens pitch in lines per inch.
    pub lpi: f64,
    /// Fractional-lens phase shift in `[-1, 1]`.
    pub offset_phase: f64,
    /// Stripe width as a fraction of one lens pitch, in `(0, 1]`.
    pub stripe_thickness: f64,
    /// Stripe direction.
    pub orientation: Orientation,
    /// Stripe coloring.
    pub color_mode: ColorMode,
    /// Display pixel density assumed for the pitch calculation.
    pub base_ppi: f64,
}

impl Default for CalibrationParameters {
    fn default() -> Self {
        Self {
            lpi: 260.0,
            offset_phase: 0.0,
            stripe_thickness: 0.5,
            orientation: Orientation::Vertical,
            color_mode: ColorMode::Mono,
            base_ppi: 500.0,
        }
    }
}

impl CalibrationParameters {
    /// Parse parameters from JSON. Missing keys take their defaults.
    pub fn from_json_str(s: &str) -> LenticularResult<Self> {
        serde_json::from_str(s).map_err(|e| LenticularError::serde(e.to_string()))
    }

    /// Read and parse a JSON parameter file.
    pub fn from_path(path: &Path) -> LenticularResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read parameters '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Return `true` when a mask can be derived (`lpi > 0` and `base_ppi > 0`).
    pub fn has_valid_pitch(&self) -> bool {
        self.lpi.is_finite() && self.lpi > 0.0 && self.base_ppi.is_finite() && self.base_ppi > 0.0
    }

    /// Strict range check for parameters coming from outside the frame loop.
    pub fn validate(&self) -> LenticularResult<()> {
        if !(self.lpi.is_finite() && self.lpi > 0.0) {
            return Err(LenticularError::invalid_parameter(format!(
                "lpi must be > 0, got {}",
                self.lpi
            )));
        }
        if !(self.base_ppi.is_finite() && self.base_ppi > 0.0) {
            return Err(LenticularError::invalid_parameter(format!(
                "basePpi must be > 0, got {}",
                self.base_ppi
            )));
        }
        if !(-1.0..=1.0).contains(&self.offset_phase) {
            return Err(LenticularError::invalid_parameter(format!(
                "offsetPhase must be within [-1, 1], got {}",
                self.offset_phase
            )));
        }
        if !(self.stripe_thickness > 0.0 && self.stripe_thickness <= 1.0) {
            return Err(LenticularError::invalid_parameter(format!(
                "stripeThickness must be within (0, 1], got {}",
                self.stripe_thickness
            )));
        }
        Ok(())
    }

    /// Output pixels per lens at the given device pixel density.
    pub fn pixels_per_lens(&self, pixel_density: f64) -> f64 {
        (self.base_ppi * pixel_density) / self.lpi
    }

    /// Short overlay label, e.g. `LPI 260.000 • VERTICAL`.
    ///
    /// Precision mode shows four decimals instead of three.
    pub fn status_label(&self, precision: bool) -> String {
        let decimals = if precision { 4 } else { 3 };
        format!(
            "LPI {:.*} • {}",
            decimals,
            self.lpi,
            self.orientation.as_str()
        )
    }
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
