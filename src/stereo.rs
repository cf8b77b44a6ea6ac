/// Media sources the core reads frames from.
pub mod source;
/// Letterboxed per-eye view buffers.
pub mod splitter;
