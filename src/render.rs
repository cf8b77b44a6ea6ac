pub(crate) mod composite;
/// Owned premultiplied RGBA8 surface and borrowed image views.
pub mod surface;
