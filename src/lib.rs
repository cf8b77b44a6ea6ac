//! Lenticular lens calibration core.
//!
//! Derives a striped interlacing mask from lens pitch, phase and display density, and
//! composites either a calibration pattern or the two halves of a side-by-side stereo frame
//! through it:
//!
//! - Describe the lens with [`CalibrationParameters`]
//! - Create a [`FrameLoop`] for an [`OutputGeometry`]
//! - Call [`FrameLoop::tick`] once per display refresh and present [`FrameLoop::output`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Engine options.
pub mod config;
/// Mask plus views into the final frame.
pub mod compositor;
/// Per-refresh driver.
pub mod frame_loop;
/// Interlacing mask generation.
pub mod mask;
/// Calibration inputs.
pub mod model;
/// CPU raster surfaces.
pub mod render;
/// Side-by-side stereo media.
pub mod stereo;

pub use crate::foundation::core::{Insets, OutputGeometry, Rect, Rgba8Premul, Size};
pub use crate::foundation::error::{LenticularError, LenticularResult};

pub use crate::compositor::{Composed, Compositor};
pub use crate::config::{CompositorOpts, FrameLoopOpts};
pub use crate::frame_loop::{FrameInput, FrameLoop, FrameMode, FrameStats, TickOutcome};
pub use crate::mask::fingerprint::{MaskFingerprint, fingerprint_mask};
pub use crate::mask::generator::{
    MAX_STRIPES, MIN_STRIPE_WIDTH, MaskGenerator, MaskOutcome, MaskStats, StripeBand,
    StripeLayout,
};
pub use crate::model::{AspectRatio, CalibrationParameters, ColorMode, DevicePreset, Orientation};
pub use crate::render::composite::CompositeMode;
pub use crate::render::surface::{ImagePaint, ImageView, RasterSurface};
pub use crate::stereo::source::{StereoMediaSource, StillImage, VideoFrameSlot};
pub use crate::stereo::splitter::{Placement, StereoSplitter, letterbox, place};
