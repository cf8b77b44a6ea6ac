use crate::foundation::core::{OutputGeometry, Rect, Rgba8Premul};
use crate::foundation::error::LenticularResult;
use crate::mask::fingerprint::{MaskFingerprint, fingerprint_mask};
use crate::model::{CalibrationParameters, ColorMode, Orientation};
use crate::render::composite::CompositeMode;
use crate::render::surface::RasterSurface;

/// Narrowest stripe ever drawn, in output pixels.
pub const MIN_STRIPE_WIDTH: f64 = 0.1;

/// Upper bound on stripes per mask.
///
/// Pitches so fine that a mask would need more stripes than this are skipped like invalid
/// input, even though every parameter is individually valid. This bounds the band list handed
/// to the rasterizer; at that density every stripe is far below one pixel anyway.
pub const MAX_STRIPES: usize = 1 << 20;

static WHOLE_STRIPE: [(f64, f64, Rgba8Premul); 1] = [(0.0, 3.0, Rgba8Premul::WHITE)];

// Thirds of the stripe width, in source order along the repeat axis.
static SUBPIXEL_THIRDS: [(f64, f64, Rgba8Premul); 3] = [
    (0.0, 1.0, Rgba8Premul::RED),
    (1.0, 2.0, Rgba8Premul::GREEN),
    (2.0, 3.0, Rgba8Premul::BLUE),
];

/// Pure stripe geometry for one set of calibration inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripeLayout {
    /// Output pixels per physical lens.
    pub pixels_per_lens: f64,
    /// `offset_phase * pixels_per_lens`.
    pub phase_shift_px: f64,
    /// Width of one stripe, never below [`MIN_STRIPE_WIDTH`].
    pub stripe_width: f64,
    /// Number of stripes drawn: `ceil(dim / pixels_per_lens) + 2`.
    pub stripe_count: usize,
    /// Stripe direction.
    pub orientation: Orientation,
    /// Output length along the stripe direction (the orthogonal span of every stripe).
    pub span: f64,
    /// Whether each stripe is split into red, green and blue thirds.
    pub subpixel: bool,
}

/// One painted rectangle of the mask.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripeBand {
    /// Covered area in output pixels.
    pub rect: Rect,
    /// Opaque fill color.
    pub color: Rgba8Premul,
}

impl StripeLayout {
    /// Derive the stripe layout, or `None` when the inputs cannot describe a mask.
    pub fn compute(params: &CalibrationParameters, geometry: OutputGeometry) -> Option<Self> {
        if !params.has_valid_pitch() || !geometry.is_drawable() {
            return None;
        }
        let pixels_per_lens = params.pixels_per_lens(geometry.pixel_density);
        if !(pixels_per_lens.is_finite() && pixels_per_lens > 0.0) {
            return None;
        }

        let (dim, span) = match params.orientation {
            Orientation::Vertical => (f64::from(geometry.width), f64::from(geometry.height)),
            Orientation::Horizontal => (f64::from(geometry.height), f64::from(geometry.width)),
        };
        let count = (dim / pixels_per_lens).ceil() + 2.0;
        if !count.is_finite() || count > MAX_STRIPES as f64 {
            return None;
        }

        let phase_shift_px = params.offset_phase * pixels_per_lens;
        let stripe_width = (pixels_per_lens * params.stripe_thickness).max(MIN_STRIPE_WIDTH);
        if !phase_shift_px.is_finite() || !stripe_width.is_finite() {
            return None;
        }

        Some(Self {
            pixels_per_lens,
            phase_shift_px,
            stripe_width,
            stripe_count: count as usize,
            orientation: params.orientation,
            span,
            subpixel: params.color_mode == ColorMode::RgbSubpixel,
        })
    }

    /// Leading edge of every stripe along the repeat axis, in drawing order.
    ///
    /// Stripe `i` (from `-1`) starts at `i * pitch - (phase_shift mod pitch)`; the remainder
    /// keeps the sign of the phase so negative offsets shift the other way.
    pub fn positions(&self) -> impl Iterator<Item = f64> + '_ {
        let shift = self.phase_shift_px % self.pixels_per_lens;
        // Stops at `i = count - 2`; stripe `count - 1` would always start at or past the far edge.
        (0..self.stripe_count).map(move |k| (k as f64 - 1.0) * self.pixels_per_lens - shift)
    }

    /// Every rectangle painted into the mask.
    pub fn bands(&self) -> impl Iterator<Item = StripeBand> + '_ {
        let parts: &'static [(f64, f64, Rgba8Premul)] = if self.subpixel {
            &SUBPIXEL_THIRDS
        } else {
            &WHOLE_STRIPE
        };
        let third = self.stripe_width / 3.0;
        self.positions().flat_map(move |pos| {
            parts.iter().map(move |&(a, b, color)| StripeBand {
                rect: self.band_rect(pos + a * third, pos + b * third),
                color,
            })
        })
    }

    fn band_rect(&self, from: f64, to: f64) -> Rect {
        match self.orientation {
            Orientation::Vertical => Rect::new(from, 0.0, to, self.span),
            Orientation::Horizontal => Rect::new(0.0, from, self.span, to),
        }
    }
}

/// Result of one [`MaskGenerator::generate`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskOutcome {
    /// Inputs changed; the mask was cleared and redrawn.
    Regenerated,
    /// Inputs unchanged; the cached mask is current.
    Reused,
    /// Inputs invalid; whatever mask existed before is left untouched.
    Skipped,
}

/// Counters for mask cache behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaskStats {
    /// Full redraws.
    pub regenerations: u64,
    /// Cache hits.
    pub reuses: u64,
    /// Calls ignored because of invalid inputs.
    pub skips: u64,
}

#[derive(Debug)]
struct MaskCache {
    key: Option<MaskFingerprint>,
    surface: RasterSurface,
}

/// Builds the striped interlacing mask and memoizes it by input fingerprint.
///
/// The mask is opaque inside stripes (white, or red/green/blue thirds in subpixel mode) and
/// transparent elsewhere. Tinting for the calibration view happens in the compositor.
#[derive(Debug, Default)]
pub struct MaskGenerator {
    cache: Option<MaskCache>,
    stats: MaskStats,
}

impl MaskGenerator {
    /// Create a generator with no mask yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the mask current for `params` at `geometry`.
    ///
    /// Never fails: invalid inputs leave the previous mask (or none) in place.
    pub fn generate(
        &mut self,
        params: &CalibrationParameters,
        geometry: OutputGeometry,
    ) -> MaskOutcome {
        let Some(layout) = StripeLayout::compute(params, geometry) else {
            self.stats.skips += 1;
            tracing::trace!(?params, ?geometry, "mask inputs invalid, keeping previous mask");
            return MaskOutcome::Skipped;
        };

        let key = fingerprint_mask(params, geometry);
        if let Some(cache) = &self.cache
            && cache.key == Some(key)
        {
            self.stats.reuses += 1;
            return MaskOutcome::Reused;
        }

        let cache = match self.cache.take() {
            Some(mut cache) => match cache.surface.resize(geometry.width, geometry.height) {
                Ok(_) => cache,
                Err(err) => {
                    tracing::warn!(%err, "mask surface resize failed");
                    self.cache = Some(cache);
                    self.stats.skips += 1;
                    return MaskOutcome::Skipped;
                }
            },
            None => match RasterSurface::new(geometry.width, geometry.height) {
                Ok(surface) => MaskCache { key: None, surface },
                Err(err) => {
                    tracing::warn!(%err, "mask surface allocation failed");
                    self.stats.skips += 1;
                    return MaskOutcome::Skipped;
                }
            },
        };
        let cache = self.cache.insert(cache);

        let surface = &mut cache.surface;
        surface.clear();
        surface.set_composite_mode(CompositeMode::SourceOver);
        if let Err(err) = surface.fill_rects(layout.bands().map(|band| (band.rect, band.color))) {
            tracing::warn!(%err, "mask rasterization failed");
            cache.key = None;
            self.stats.skips += 1;
            return MaskOutcome::Skipped;
        }
        cache.key = Some(key);

        self.stats.regenerations += 1;
        tracing::debug!(
            width = geometry.width,
            height = geometry.height,
            pixels_per_lens = layout.pixels_per_lens,
            stripes = layout.stripe_count,
            "regenerated interlacing mask"
        );
        MaskOutcome::Regenerated
    }

    /// The current mask, if one was ever generated.
    pub fn mask(&self) -> Option<&RasterSurface> {
        self.cache.as_ref().map(|c| &c.surface)
    }

    /// Resize the backing surface and force the next call to regenerate.
    pub fn resize(&mut self, width: u32, height: u32) -> LenticularResult<()> {
        if let Some(cache) = &mut self.cache {
            cache.surface.resize(width, height)?;
            cache.surface.clear();
        }
        self.invalidate();
        Ok(())
    }

    /// Forget the cached fingerprint so the next call redraws.
    pub fn invalidate(&mut self) {
        if let Some(cache) = &mut self.cache {
            cache.key = None;
        }
    }

    /// Cache counters.
    pub fn stats(&self) -> MaskStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/generator.rs"]
mod tests;
