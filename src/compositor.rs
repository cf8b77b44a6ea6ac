//! Combines the interlacing mask with the calibration pattern or the stereo views.

use crate::config::CompositorOpts;
use crate::foundation::core::{OutputGeometry, Rect, Rgba8Premul};
use crate::foundation::error::{LenticularError, LenticularResult};
use crate::mask::generator::{MaskGenerator, MaskOutcome, MaskStats};
use crate::model::{AspectRatio, CalibrationParameters, ColorMode};
use crate::render::composite::CompositeMode;
use crate::render::surface::RasterSurface;
use crate::stereo::source::StereoMediaSource;
use crate::stereo::splitter::{Placement, StereoSplitter};

/// What one compose call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Composed {
    /// Mask cache result for this frame.
    pub mask: MaskOutcome,
    /// Stereo placement, `None` for calibration frames.
    pub placement: Option<Placement>,
}

/// Owns the mask generator, the per-eye view buffers and a scratch surface.
#[derive(Debug)]
pub struct Compositor {
    masks: MaskGenerator,
    splitter: StereoSplitter,
    scratch: RasterSurface,
    opts: CompositorOpts,
}

impl Compositor {
    /// Allocate working surfaces for a `width x height` output.
    pub fn new(width: u32, height: u32, opts: CompositorOpts) -> LenticularResult<Self> {
        Ok(Self {
            masks: MaskGenerator::new(),
            splitter: StereoSplitter::new(width, height)?,
            scratch: RasterSurface::new(width, height)?,
            opts,
        })
    }

    /// Resize every working surface and force the mask to regenerate.
    pub fn resize(&mut self, width: u32, height: u32) -> LenticularResult<()> {
        self.masks.resize(width, height)?;
        self.splitter.resize(width, height)?;
        self.scratch.resize(width, height)?;
        Ok(())
    }

    /// Current colors.
    pub fn opts(&self) -> CompositorOpts {
        self.opts
    }

    /// Replace the colors used from the next frame on.
    pub fn set_opts(&mut self, opts: CompositorOpts) {
        self.opts = opts;
    }

    /// The mask generator.
    pub fn masks(&self) -> &MaskGenerator {
        &self.masks
    }

    /// Mask cache counters.
    pub fn mask_stats(&self) -> MaskStats {
        self.masks.stats()
    }

    /// The per-eye view buffers from the latest stereo frame.
    pub fn splitter(&self) -> &StereoSplitter {
        &self.splitter
    }

    /// Paint the calibration pattern into `out`.
    ///
    /// `out` is filled with the background, then the stripes are drawn in the mode's color.
    /// Subpixel masks carry their own colors and are drawn as-is.
    pub fn compose_calibration(
        &mut self,
        params: &CalibrationParameters,
        geometry: OutputGeometry,
        out: &mut RasterSurface,
    ) -> LenticularResult<Composed> {
        self.check_output(geometry, out)?;

        let mask = self.masks.generate(params, geometry);
        out.set_composite_mode(CompositeMode::SourceOver);
        out.fill(self.opts.background_rgba);

        let Some(mask_surface) = self.masks.mask() else {
            return Ok(Composed {
                mask,
                placement: None,
            });
        };

        match params.color_mode {
            ColorMode::RgbSubpixel => out.draw_surface(mask_surface)?,
            ColorMode::Mono | ColorMode::Tinted => {
                let color = if params.color_mode == ColorMode::Tinted {
                    self.opts.tint_rgba
                } else {
                    self.opts.mono_rgba
                };
                recolor(&mut self.scratch, mask_surface, color)?;
                out.draw_surface(&self.scratch)?;
            }
        }

        Ok(Composed {
            mask,
            placement: None,
        })
    }

    /// Paint one stereo frame into `out`.
    ///
    /// The right view is the base layer; the left view shows through wherever the mask has
    /// alpha. On error `out` is left as it was.
    pub fn compose_stereo(
        &mut self,
        params: &CalibrationParameters,
        geometry: OutputGeometry,
        source: &dyn StereoMediaSource,
        area: Rect,
        aspect: AspectRatio,
        out: &mut RasterSurface,
    ) -> LenticularResult<Composed> {
        self.check_output(geometry, out)?;

        let placement = self.splitter.split(source, area, aspect)?;
        let mask = self.masks.generate(params, geometry);

        self.scratch.set_composite_mode(CompositeMode::SourceOver);
        self.scratch.clear();
        if let Some(mask_surface) = self.masks.mask() {
            self.scratch.draw_surface(self.splitter.left())?;
            self.scratch.set_composite_mode(CompositeMode::DestinationIn);
            self.scratch.draw_surface(mask_surface)?;
            self.scratch.set_composite_mode(CompositeMode::SourceOver);
        }

        out.set_composite_mode(CompositeMode::SourceOver);
        out.fill(self.opts.background_rgba);
        out.draw_surface(self.splitter.right())?;
        out.draw_surface(&self.scratch)?;

        Ok(Composed {
            mask,
            placement: Some(placement),
        })
    }

    fn check_output(&self, geometry: OutputGeometry, out: &RasterSurface) -> LenticularResult<()> {
        if !geometry.is_drawable() {
            return Err(LenticularError::degenerate_geometry(format!(
                "output {}x{} has no pixels",
                geometry.width, geometry.height
            )));
        }
        if out.width() != geometry.width
            || out.height() != geometry.height
            || self.scratch.width() != geometry.width
            || self.scratch.height() != geometry.height
        {
            return Err(LenticularError::draw(format!(
                "surfaces are {}x{} (output) and {}x{} (scratch), geometry is {}x{}",
                out.width(),
                out.height(),
                self.scratch.width(),
                self.scratch.height(),
                geometry.width,
                geometry.height
            )));
        }
        Ok(())
    }
}

// Keep the mask's alpha and replace its color.
fn recolor(
    scratch: &mut RasterSurface,
    mask: &RasterSurface,
    color: Rgba8Premul,
) -> LenticularResult<()> {
    let bounds = Rect::new(0.0, 0.0, f64::from(scratch.width()), f64::from(scratch.height()));
    scratch.set_composite_mode(CompositeMode::SourceOver);
    scratch.clear();
    scratch.draw_surface(mask)?;
    scratch.set_composite_mode(CompositeMode::SourceIn);
    scratch.fill_rect(bounds, color)?;
    scratch.set_composite_mode(CompositeMode::SourceOver);
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
