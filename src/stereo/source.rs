//! Side-by-side media the compositor can sample.
//!
//! Loading and decoding belong to the caller; the engine only polls readiness and reads
//! whatever frame is current.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{LenticularError, LenticularResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::render::surface::ImageView;

/// A side-by-side stereo frame provider (still image or video).
pub trait StereoMediaSource {
    /// Width of the full side-by-side frame in pixels.
    fn source_width(&self) -> u32;

    /// Height of the full side-by-side frame in pixels.
    fn source_height(&self) -> u32;

    /// `true` once a frame with non-zero dimensions is decoded and can be sampled.
    fn ready_for_draw(&self) -> bool;

    /// Current frame pixels, premultiplied RGBA8. `None` while not ready.
    fn frame(&self) -> Option<ImageView<'_>>;
}

/// A decoded still image.
#[derive(Clone, Debug)]
pub struct StillImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl StillImage {
    /// Decode encoded image bytes (PNG, JPEG, ...) and premultiply.
    pub fn decode(bytes: &[u8]) -> LenticularResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);

        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Read and decode an image file.
    pub fn open(path: &Path) -> LenticularResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    /// Wrap already premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> LenticularResult<Self> {
        ImageView::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }
}

impl StereoMediaSource for StillImage {
    fn source_width(&self) -> u32 {
        self.width
    }

    fn source_height(&self) -> u32 {
        self.height
    }

    fn ready_for_draw(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn frame(&self) -> Option<ImageView<'_>> {
        if !self.ready_for_draw() {
            return None;
        }
        Some(ImageView {
            width: self.width,
            height: self.height,
            data: &self.rgba8_premul,
        })
    }
}

#[derive(Clone, Debug)]
struct DecodedFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Latest decoded video frame, fed by an external decoder.
///
/// The slot is not ready until the first frame with non-zero dimensions arrives, and goes
/// back to not ready when cleared (source detached or seeking).
#[derive(Clone, Debug, Default)]
pub struct VideoFrameSlot {
    current: Option<DecodedFrame>,
    frames_received: u64,
}

impl VideoFrameSlot {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame with premultiplied RGBA8 pixels.
    pub fn push_premul_rgba8(
        &mut self,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> LenticularResult<()> {
        ImageView::new(width, height, &data)?;
        self.current = Some(DecodedFrame {
            width,
            height,
            data,
        });
        self.frames_received += 1;
        Ok(())
    }

    /// Replace the current frame with straight-alpha RGBA8 pixels.
    pub fn push_rgba8(&mut self, width: u32, height: u32, mut data: Vec<u8>) -> LenticularResult<()> {
        if !data.len().is_multiple_of(4) {
            return Err(LenticularError::draw("rgba8 frame length must be a multiple of 4"));
        }
        premultiply_rgba8_in_place(&mut data);
        self.push_premul_rgba8(width, height, data)
    }

    /// Drop the current frame.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Total frames pushed since creation.
    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }
}

impl StereoMediaSource for VideoFrameSlot {
    fn source_width(&self) -> u32 {
        self.current.as_ref().map_or(0, |f| f.width)
    }

    fn source_height(&self) -> u32 {
        self.current.as_ref().map_or(0, |f| f.height)
    }

    fn ready_for_draw(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|f| f.width > 0 && f.height > 0)
    }

    fn frame(&self) -> Option<ImageView<'_>> {
        self.current
            .as_ref()
            .filter(|f| f.width > 0 && f.height > 0)
            .map(|f| ImageView {
                width: f.width,
                height: f.height,
                data: &f.data,
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stereo/source.rs"]
mod tests;
