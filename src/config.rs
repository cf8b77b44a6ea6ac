//! Engine options and their environment overrides.

use crate::foundation::core::{Insets, Rgba8Premul};
use crate::model::AspectRatio;

/// Colors used by the compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositorOpts {
    /// Stripe color in `TINTED` mode.
    pub tint_rgba: Rgba8Premul,
    /// Stripe color in `MONO` mode.
    pub mono_rgba: Rgba8Premul,
    /// Fill behind the pattern and around letterboxed media.
    pub background_rgba: Rgba8Premul,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            tint_rgba: Rgba8Premul::GREEN,
            mono_rgba: Rgba8Premul::WHITE,
            background_rgba: Rgba8Premul::BLACK,
        }
    }
}

/// Options for a [`crate::FrameLoop`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameLoopOpts {
    /// Compositor colors.
    pub compositor: CompositorOpts,
    /// Target aspect for stereo media.
    pub aspect_ratio: AspectRatio,
    /// Output margins kept free of stereo media (in output pixels).
    pub reserved: Insets,
}

impl FrameLoopOpts {
    /// Defaults with `LENTICULAR_TINT` and `LENTICULAR_ASPECT` applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();

        if let Some(v) = lookup("LENTICULAR_TINT") {
            match Rgba8Premul::parse_hex(&v) {
                Ok(c) => opts.compositor.tint_rgba = c,
                Err(err) => tracing::warn!(%err, "ignoring LENTICULAR_TINT"),
            }
        }
        if let Some(v) = lookup("LENTICULAR_ASPECT") {
            match v.parse::<AspectRatio>() {
                Ok(a) => opts.aspect_ratio = a,
                Err(err) => tracing::warn!(%err, "ignoring LENTICULAR_ASPECT"),
            }
        }
        opts
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
