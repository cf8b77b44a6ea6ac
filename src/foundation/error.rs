/// Convenience result type used across the engine.
pub type LenticularResult<T> = Result<T, LenticularError>;

/// Error taxonomy for mask generation, splitting and compositing.
///
/// None of these are fatal to the frame loop: each tick converts them into a logged,
/// counted outcome and the next tick starts from fully overwritten buffers.
#[derive(thiserror::Error, Debug)]
pub enum LenticularError {
    /// Non-positive or non-finite calibration or geometry input.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Media source exists but has no decoded frame to sample.
    #[error("source not ready: {0}")]
    SourceNotReady(String),

    /// Computed placement rectangle is NaN, infinite or empty.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Lower-level raster failure (buffer mismatch, out-of-range region).
    #[error("draw error: {0}")]
    Draw(String),

    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing parameters.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LenticularError {
    /// Build a [`LenticularError::InvalidParameter`] value.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`LenticularError::SourceNotReady`] value.
    pub fn source_not_ready(msg: impl Into<String>) -> Self {
        Self::SourceNotReady(msg.into())
    }

    /// Build a [`LenticularError::DegenerateGeometry`] value.
    pub fn degenerate_geometry(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    /// Build a [`LenticularError::Draw`] value.
    pub fn draw(msg: impl Into<String>) -> Self {
        Self::Draw(msg.into())
    }

    /// Build a [`LenticularError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LenticularError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` when the frame should be skipped quietly rather than reported.
    pub fn is_frame_skip(&self) -> bool {
        matches!(
            self,
            Self::DegenerateGeometry(_) | Self::SourceNotReady(_) | Self::InvalidParameter(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
