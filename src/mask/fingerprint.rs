use crate::foundation::core::OutputGeometry;
use crate::model::{CalibrationParameters, ColorMode, Orientation};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x4c45_4e54_4943_554c;

/// Stable fingerprint of every input that shapes the interlacing mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaskFingerprint {
    /// High 64 bits of the 128-bit digest.
    pub hi: u64,
    /// Low 64 bits of the 128-bit digest.
    pub lo: u64,
}

/// Fingerprint `(width, height, density, lpi, offset, thickness, orientation, color, ppi)`.
///
/// Floats are hashed by bit pattern, so any change at all (even `0.0` to `-0.0`) forces a
/// regeneration.
pub fn fingerprint_mask(params: &CalibrationParameters, geometry: OutputGeometry) -> MaskFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(geometry.width);
    h.write_u32(geometry.height);
    h.write_f64(geometry.pixel_density);
    h.write_f64(params.lpi);
    h.write_f64(params.offset_phase);
    h.write_f64(params.stripe_thickness);
    h.write_u8(match params.orientation {
        Orientation::Vertical => 0,
        Orientation::Horizontal => 1,
    });
    h.write_u8(match params.color_mode {
        ColorMode::Mono => 0,
        ColorMode::Tinted => 1,
        ColorMode::RgbSubpixel => 2,
    });
    h.write_f64(params.base_ppi);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn finish(self) -> MaskFingerprint {
        let v = self.inner.digest128();
        MaskFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/fingerprint.rs"]
mod tests;
