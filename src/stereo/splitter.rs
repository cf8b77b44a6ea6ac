use crate::foundation::core::{Rect, Rgba8Premul};
use crate::foundation::error::{LenticularError, LenticularResult};
use crate::model::AspectRatio;
use crate::render::composite::CompositeMode;
use crate::render::surface::{ImagePaint, RasterSurface};
use crate::stereo::source::StereoMediaSource;

/// Where one eye's image lands in the output, and which source halves feed it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Letterboxed destination rectangle in output pixels.
    pub rect: Rect,
    /// Width of one eye's half of the source frame.
    pub split_width: f64,
    /// Aspect ratio used for the fit (after any override).
    pub media_aspect: f64,
}

impl Placement {
    /// Source rectangle of the left-eye half.
    pub fn left_source(&self, source_height: f64) -> Rect {
        Rect::new(0.0, 0.0, self.split_width, source_height)
    }

    /// Source rectangle of the right-eye half.
    pub fn right_source(&self, source_height: f64) -> Rect {
        Rect::new(self.split_width, 0.0, 2.0 * self.split_width, source_height)
    }
}

/// Fit `media_aspect` inside `area`, centered on the free axis.
///
/// Wider media fits the width and is centered vertically; otherwise it fits the height and
/// is centered horizontally.
pub fn letterbox(media_aspect: f64, area: Rect) -> LenticularResult<Rect> {
    let (aw, ah) = (area.width(), area.height());
    if !(aw.is_finite() && ah.is_finite() && aw > 0.0 && ah > 0.0) {
        return Err(LenticularError::degenerate_geometry(format!(
            "available area {aw}x{ah} is empty"
        )));
    }
    if !(media_aspect.is_finite() && media_aspect > 0.0) {
        return Err(LenticularError::degenerate_geometry(format!(
            "media aspect {media_aspect} is not positive"
        )));
    }

    let area_aspect = aw / ah;
    let rect = if media_aspect > area_aspect {
        let dh = aw / media_aspect;
        Rect::from_origin_size((area.x0, area.y0 + (ah - dh) / 2.0), (aw, dh))
    } else {
        let dw = ah * media_aspect;
        Rect::from_origin_size((area.x0 + (aw - dw) / 2.0, area.y0), (dw, ah))
    };

    let finite = [rect.x0, rect.y0, rect.x1, rect.y1]
        .iter()
        .all(|v| v.is_finite());
    if !finite || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Err(LenticularError::degenerate_geometry(format!(
            "letterbox produced {rect:?}"
        )));
    }
    Ok(rect)
}

/// Compute the placement of a side-by-side source inside `area`.
pub fn place(
    source_width: u32,
    source_height: u32,
    area: Rect,
    aspect: AspectRatio,
) -> LenticularResult<Placement> {
    let split_width = f64::from(source_width) / 2.0;
    let natural = split_width / f64::from(source_height);
    let media_aspect = aspect.resolve(natural);
    let rect = letterbox(media_aspect, area)?;
    Ok(Placement {
        rect,
        split_width,
        media_aspect,
    })
}

/// Renders the two halves of a side-by-side frame into per-eye view buffers.
#[derive(Debug)]
pub struct StereoSplitter {
    left: RasterSurface,
    right: RasterSurface,
}

impl StereoSplitter {
    /// Allocate both view buffers at the output size.
    pub fn new(width: u32, height: u32) -> LenticularResult<Self> {
        Ok(Self {
            left: RasterSurface::new(width, height)?,
            right: RasterSurface::new(width, height)?,
        })
    }

    /// Resize both view buffers.
    pub fn resize(&mut self, width: u32, height: u32) -> LenticularResult<()> {
        self.left.resize(width, height)?;
        self.right.resize(width, height)?;
        Ok(())
    }

    /// Fill both buffers black and draw each eye's half, letterboxed into `area`.
    ///
    /// Both buffers are fully overwritten, so nothing from an earlier frame survives.
    pub fn split(
        &mut self,
        source: &dyn StereoMediaSource,
        area: Rect,
        aspect: AspectRatio,
    ) -> LenticularResult<Placement> {
        let frame = source
            .frame()
            .filter(|_| source.ready_for_draw())
            .ok_or_else(|| LenticularError::source_not_ready("no decoded frame to split"))?;

        let placement = place(frame.width, frame.height, area, aspect)?;
        let sh = f64::from(frame.height);
        let paint = ImagePaint::from_view(frame)?;

        for (view, src_rect) in [
            (&mut self.left, placement.left_source(sh)),
            (&mut self.right, placement.right_source(sh)),
        ] {
            view.set_composite_mode(CompositeMode::SourceOver);
            view.fill(Rgba8Premul::BLACK);
            view.draw_image_region(&paint, src_rect, placement.rect)?;
        }
        Ok(placement)
    }

    /// Left-eye view buffer.
    pub fn left(&self) -> &RasterSurface {
        &self.left
    }

    /// Right-eye view buffer.
    pub fn right(&self) -> &RasterSurface {
        &self.right
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stereo/splitter.rs"]
mod tests;
