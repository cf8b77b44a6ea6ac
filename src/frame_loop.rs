//! Externally ticked render loop: picks a compositing path per frame and survives bad frames.

use crate::compositor::{Composed, Compositor};
use crate::config::FrameLoopOpts;
use crate::foundation::core::OutputGeometry;
use crate::foundation::error::{LenticularError, LenticularResult};
use crate::mask::generator::MaskOutcome;
use crate::model::CalibrationParameters;
use crate::render::surface::RasterSurface;
use crate::stereo::source::StereoMediaSource;

/// Which compositing path a tick takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameMode {
    /// Tinted or subpixel stripe pattern.
    Calibration,
    /// Left and right views interlaced through the mask.
    StereoPlayback,
}

impl FrameMode {
    /// Stereo only when media is attached, decoded and playing.
    pub fn select(media_present: bool, media_ready: bool, is_playing: bool) -> Self {
        if media_present && media_ready && is_playing {
            Self::StereoPlayback
        } else {
            Self::Calibration
        }
    }
}

/// Per-tick inputs from the external collaborators.
#[derive(Clone, Copy)]
pub struct FrameInput<'a> {
    /// Current calibration values.
    pub params: &'a CalibrationParameters,
    /// Attached side-by-side media, if any.
    pub media: Option<&'a dyn StereoMediaSource>,
    /// Playback intent.
    pub is_playing: bool,
}

impl<'a> FrameInput<'a> {
    /// Input with no media attached.
    pub fn calibration(params: &'a CalibrationParameters) -> Self {
        Self {
            params,
            media: None,
            is_playing: false,
        }
    }

    /// Input with `media` attached.
    pub fn stereo(
        params: &'a CalibrationParameters,
        media: &'a dyn StereoMediaSource,
        is_playing: bool,
    ) -> Self {
        Self {
            params,
            media: Some(media),
            is_playing,
        }
    }
}

impl std::fmt::Debug for FrameInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameInput")
            .field("params", self.params)
            .field("media_present", &self.media.is_some())
            .field("is_playing", &self.is_playing)
            .finish()
    }
}

/// Result of one [`FrameLoop::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// The output holds a freshly painted frame.
    Rendered {
        /// Path taken.
        mode: FrameMode,
        /// Mask cache result.
        mask: MaskOutcome,
    },
    /// The frame was skipped; the output still holds the previous frame.
    Skipped {
        /// Path attempted.
        mode: FrameMode,
        /// Why.
        reason: String,
    },
    /// A drawing failure aborted the frame; the next tick starts fresh.
    Failed {
        /// Path attempted.
        mode: FrameMode,
        /// Why.
        reason: String,
    },
}

impl TickOutcome {
    /// Return `true` for [`TickOutcome::Rendered`].
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// Counters accumulated over the loop's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Calls to [`FrameLoop::tick`].
    pub ticks: u64,
    /// Frames rendered on the calibration path.
    pub calibration_frames: u64,
    /// Frames rendered on the stereo path.
    pub stereo_frames: u64,
    /// Frames skipped because of invalid inputs or geometry.
    pub skipped_frames: u64,
    /// Frames aborted by a drawing failure.
    pub failed_frames: u64,
    /// Full mask redraws.
    pub mask_regenerations: u64,
}

/// Owns the output surface and drives the [`Compositor`] once per display refresh.
#[derive(Debug)]
pub struct FrameLoop {
    geometry: OutputGeometry,
    output: RasterSurface,
    compositor: Compositor,
    opts: FrameLoopOpts,
    stats: FrameStats,
}

impl FrameLoop {
    /// Allocate every surface for `geometry`.
    pub fn new(geometry: OutputGeometry, opts: FrameLoopOpts) -> LenticularResult<Self> {
        Ok(Self {
            geometry,
            output: RasterSurface::new(geometry.width, geometry.height)?,
            compositor: Compositor::new(geometry.width, geometry.height, opts.compositor)?,
            opts,
            stats: FrameStats::default(),
        })
    }

    /// Current output geometry.
    pub fn geometry(&self) -> OutputGeometry {
        self.geometry
    }

    /// Current options.
    pub fn opts(&self) -> FrameLoopOpts {
        self.opts
    }

    /// Replace the options used from the next tick on.
    pub fn set_opts(&mut self, opts: FrameLoopOpts) {
        self.opts = opts;
        self.compositor.set_opts(opts.compositor);
    }

    /// Resize every surface and invalidate the mask so the next tick regenerates it.
    pub fn resize(&mut self, geometry: OutputGeometry) -> LenticularResult<()> {
        self.output.resize(geometry.width, geometry.height)?;
        self.compositor.resize(geometry.width, geometry.height)?;
        self.geometry = geometry;
        tracing::debug!(
            width = geometry.width,
            height = geometry.height,
            pixel_density = geometry.pixel_density,
            "resized frame loop surfaces"
        );
        Ok(())
    }

    /// Render one frame.
    ///
    /// Never fails: errors are logged, counted and reported in the outcome.
    #[tracing::instrument(skip_all, fields(tick = self.stats.ticks))]
    pub fn tick(&mut self, input: &FrameInput<'_>) -> TickOutcome {
        self.stats.ticks += 1;

        let media_ready = input.media.is_some_and(|m| m.ready_for_draw());
        let selected = FrameMode::select(input.media.is_some(), media_ready, input.is_playing);

        let (mode, result) = match (selected, input.media) {
            (FrameMode::StereoPlayback, Some(media)) => match self.compose_stereo(input, media) {
                Err(err @ LenticularError::SourceNotReady(_)) => {
                    tracing::debug!(%err, "media not ready, falling back to calibration");
                    (FrameMode::Calibration, self.compose_calibration(input))
                }
                other => (FrameMode::StereoPlayback, other),
            },
            _ => (FrameMode::Calibration, self.compose_calibration(input)),
        };
        self.stats.mask_regenerations = self.compositor.mask_stats().regenerations;

        match result {
            Ok(composed) => {
                match mode {
                    FrameMode::Calibration => self.stats.calibration_frames += 1,
                    FrameMode::StereoPlayback => self.stats.stereo_frames += 1,
                }
                TickOutcome::Rendered {
                    mode,
                    mask: composed.mask,
                }
            }
            Err(err) if err.is_frame_skip() => {
                self.stats.skipped_frames += 1;
                tracing::debug!(%err, ?mode, "frame skipped");
                TickOutcome::Skipped {
                    mode,
                    reason: err.to_string(),
                }
            }
            Err(err) => {
                self.stats.failed_frames += 1;
                tracing::warn!(%err, ?mode, "frame failed");
                TickOutcome::Failed {
                    mode,
                    reason: err.to_string(),
                }
            }
        }
    }

    /// The most recently painted frame.
    pub fn output(&self) -> &RasterSurface {
        &self.output
    }

    /// The compositor and its working surfaces.
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Loop counters.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn compose_calibration(&mut self, input: &FrameInput<'_>) -> LenticularResult<Composed> {
        self.compositor
            .compose_calibration(input.params, self.geometry, &mut self.output)
    }

    fn compose_stereo(
        &mut self,
        input: &FrameInput<'_>,
        media: &dyn StereoMediaSource,
    ) -> LenticularResult<Composed> {
        let area = self.opts.reserved.apply(self.geometry.bounds());
        self.compositor.compose_stereo(
            input.params,
            self.geometry,
            media,
            area,
            self.opts.aspect_ratio,
            &mut self.output,
        )
    }
}

#[cfg(test)]
#[path = "../tests/unit/frame_loop.rs"]
mod tests;
