use std::sync::Arc;

use crate::foundation::core::{Rect, Rgba8Premul};
use crate::foundation::error::{LenticularError, LenticularResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::composite::{CompositeMode, composite_in_place};

/// Borrowed premultiplied RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` premultiplied bytes.
    pub data: &'a [u8],
}

impl<'a> ImageView<'a> {
    /// Wrap a byte slice, checking its length against the dimensions.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> LenticularResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(LenticularError::draw(format!(
                "image view expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

/// An image uploaded once as a nearest-neighbor `vello_cpu` paint.
#[derive(Clone)]
pub struct ImagePaint {
    paint: vello_cpu::Image,
    width: u32,
    height: u32,
}

impl ImagePaint {
    /// Copy `view` into a pixmap-backed paint.
    pub fn from_view(view: ImageView<'_>) -> LenticularResult<Self> {
        let (w, h) = dims_u16(view.width, view.height)?;
        let pixels = view
            .data
            .chunks_exact(4)
            .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
            .collect();
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler {
                    quality: vello_cpu::peniko::ImageQuality::Low,
                    ..vello_cpu::peniko::ImageSampler::default()
                },
            },
            width: view.width,
            height: view.height,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl std::fmt::Debug for ImagePaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePaint")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// A reusable CPU pixel buffer in premultiplied RGBA8, backed by a `vello_cpu` pixmap.
///
/// Shapes and images are rasterized by `vello_cpu` into a transparent layer, which is then
/// composited onto the surface with the current [`CompositeMode`]. Source-in and
/// destination-in therefore clear whatever the layer leaves transparent. Image paints are
/// sampled nearest-neighbor so stripe registration stays pixel-exact.
pub struct RasterSurface {
    pixmap: vello_cpu::Pixmap,
    layer: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    mode: CompositeMode,
}

impl RasterSurface {
    /// Allocate a transparent surface. Zero-sized surfaces are valid and paint nothing.
    pub fn new(width: u32, height: u32) -> LenticularResult<Self> {
        let (w, h) = dims_u16(width, height)?;
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(w, h),
            layer: None,
            ctx: None,
            mode: CompositeMode::SourceOver,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Mutable premultiplied RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    /// Borrow the pixels as an [`ImageView`].
    pub fn as_view(&self) -> ImageView<'_> {
        ImageView {
            width: self.width(),
            height: self.height(),
            data: self.data(),
        }
    }

    /// Read one pixel, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = ((y as usize) * (self.width() as usize) + (x as usize)) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    /// Current composite operator.
    pub fn composite_mode(&self) -> CompositeMode {
        self.mode
    }

    /// Set the composite operator used by subsequent paint calls.
    pub fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.mode = mode;
    }

    /// Resize to `width x height`, clearing the contents when the size changes.
    ///
    /// Returns `true` when a reallocation happened.
    pub fn resize(&mut self, width: u32, height: u32) -> LenticularResult<bool> {
        if self.width() == width && self.height() == height {
            return Ok(false);
        }
        let (w, h) = dims_u16(width, height)?;
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.layer = None;
        self.ctx = None;
        Ok(true)
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// Overwrite every pixel with `color`, ignoring the composite mode.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Paint one axis-aligned rectangle. See [`RasterSurface::fill_rects`].
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8Premul) -> LenticularResult<()> {
        self.fill_rects(std::iter::once((rect, color)))
    }

    /// Rasterize a batch of rectangles into one layer and composite it once.
    ///
    /// Fractional edges are antialiased by `vello_cpu`. Non-finite or empty rectangles are
    /// dropped.
    pub fn fill_rects(
        &mut self,
        rects: impl IntoIterator<Item = (Rect, Rgba8Premul)>,
    ) -> LenticularResult<()> {
        self.paint_layer(|ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            for (rect, color) in rects {
                let rect = rect.abs();
                if !is_finite_rect(rect) || rect.width() <= 0.0 || rect.height() <= 0.0 {
                    continue;
                }
                let [r, g, b, a] = color.to_straight_array();
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_rect(&rect_to_cpu(rect));
            }
        })
    }

    /// Composite an equal-sized surface at the origin.
    pub fn draw_surface(&mut self, src: &RasterSurface) -> LenticularResult<()> {
        if src.width() != self.width() || src.height() != self.height() {
            return Err(LenticularError::draw(format!(
                "draw_surface size mismatch: {}x{} onto {}x{}",
                src.width(),
                src.height(),
                self.width(),
                self.height()
            )));
        }
        composite_in_place(self.mode, self.pixmap.data_as_u8_slice_mut(), src.data())
    }

    /// Draw `src_rect` of `image` scaled into `dst_rect`.
    ///
    /// The paint transform maps the source sub-rectangle onto `dst_rect`, and only `dst_rect`
    /// is filled, so nothing outside the sub-rectangle is sampled.
    pub fn draw_image_region(
        &mut self,
        image: &ImagePaint,
        src_rect: Rect,
        dst_rect: Rect,
    ) -> LenticularResult<()> {
        if !is_finite_rect(src_rect) || !is_finite_rect(dst_rect) {
            return Err(LenticularError::draw("draw_image_region: non-finite rect"));
        }
        if src_rect.width() <= 0.0 || src_rect.height() <= 0.0 {
            return Err(LenticularError::draw("draw_image_region: empty source rect"));
        }
        if src_rect.x0 < 0.0
            || src_rect.y0 < 0.0
            || src_rect.x1 > f64::from(image.width)
            || src_rect.y1 > f64::from(image.height)
        {
            return Err(LenticularError::draw(format!(
                "draw_image_region: source rect {src_rect:?} outside {}x{} image",
                image.width, image.height
            )));
        }
        if dst_rect.width() <= 0.0 || dst_rect.height() <= 0.0 {
            return Ok(());
        }

        let sx = dst_rect.width() / src_rect.width();
        let sy = dst_rect.height() / src_rect.height();
        let paint_transform = vello_cpu::kurbo::Affine::new([
            sx,
            0.0,
            0.0,
            sy,
            dst_rect.x0 - src_rect.x0 * sx,
            dst_rect.y0 - src_rect.y0 * sy,
        ]);

        self.paint_layer(|ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(paint_transform);
            ctx.set_paint(image.paint.clone());
            ctx.fill_rect(&rect_to_cpu(dst_rect));
        })
    }

    /// Copy out as a straight-alpha [`image::RgbaImage`] for presentation or export.
    pub fn to_rgba_image(&self) -> LenticularResult<image::RgbaImage> {
        let mut bytes = self.data().to_vec();
        unpremultiply_rgba8_in_place(&mut bytes);
        image::RgbaImage::from_raw(self.width(), self.height(), bytes)
            .ok_or_else(|| LenticularError::draw("surface byte length does not match its size"))
    }

    // Render `draw` into the transparent layer, then composite the layer with `self.mode`.
    fn paint_layer(
        &mut self,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> LenticularResult<()> {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        if w == 0 || h == 0 {
            return Ok(());
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        let mut layer = match self.layer.take() {
            Some(layer) if layer.width() == w && layer.height() == h => layer,
            _ => vello_cpu::Pixmap::new(w, h),
        };

        ctx.reset();
        layer.data_as_u8_slice_mut().fill(0);
        draw(&mut ctx);
        ctx.flush();
        ctx.render_to_pixmap(&mut layer);

        let out = composite_in_place(
            self.mode,
            self.pixmap.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
        );
        self.ctx = Some(ctx);
        self.layer = Some(layer);
        out
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("mode", &self.mode)
            .finish()
    }
}

fn dims_u16(width: u32, height: u32) -> LenticularResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LenticularError::draw(format!("surface width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LenticularError::draw(format!("surface height {height} exceeds u16")))?;
    Ok((w, h))
}

fn byte_len(width: u32, height: u32) -> LenticularResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LenticularError::draw(format!("surface size overflow: {width}x{height}")))
}

fn is_finite_rect(r: Rect) -> bool {
    r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
