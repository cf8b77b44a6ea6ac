use crate::foundation::error::{LenticularError, LenticularResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff operator applied when painting onto a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompositeMode {
    /// Paint atop the existing pixels using the source alpha.
    #[default]
    SourceOver,
    /// Keep the source color only where the destination has alpha.
    SourceIn,
    /// Keep the destination only where the source has alpha.
    DestinationIn,
}

pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

pub fn source_in(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    scale(src, dst[3])
}

pub fn destination_in(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    scale(dst, src[3])
}

/// Composite two equal-sized premultiplied RGBA8 buffers pixel by pixel.
pub fn composite_in_place(mode: CompositeMode, dst: &mut [u8], src: &[u8]) -> LenticularResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LenticularError::draw(
            "composite_in_place expects equal-length rgba8 buffers",
        ));
    }
    match mode {
        CompositeMode::SourceOver => {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                if s[3] == 0 {
                    continue;
                }
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        }
        CompositeMode::SourceIn => {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                let out = source_in([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        }
        CompositeMode::DestinationIn => {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                if s[3] == 255 {
                    continue;
                }
                let out = destination_in([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        }
    }
    Ok(())
}

fn scale(px: PremulRgba8, w: u8) -> PremulRgba8 {
    let w = u16::from(w);
    [
        mul_div255_u8(u16::from(px[0]), w),
        mul_div255_u8(u16::from(px[1]), w),
        mul_div255_u8(u16::from(px[2]), w),
        mul_div255_u8(u16::from(px[3]), w),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
