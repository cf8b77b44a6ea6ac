use crate::foundation::error::{LenticularError, LenticularResult};

pub use kurbo::{Rect, Size};

/// Output raster dimensions in device pixels.
///
/// `width` and `height` are already multiplied by `pixel_density`; the density is kept so
/// lens pitch (physical inches) can be converted into output pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputGeometry {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// Device pixels per logical pixel.
    pub pixel_density: f64,
}

impl OutputGeometry {
    /// Create a geometry from device-pixel dimensions.
    pub fn new(width: u32, height: u32, pixel_density: f64) -> Self {
        Self {
            width,
            height,
            pixel_density: sanitize_density(pixel_density),
        }
    }

    /// Derive device-pixel dimensions from a logical viewport size.
    ///
    /// Each axis is `max(1, floor(logical * density))`.
    pub fn from_logical(logical_width: f64, logical_height: f64, pixel_density: f64) -> Self {
        let density = sanitize_density(pixel_density);
        let scale = |v: f64| -> u32 {
            let px = (v * density).floor();
            if px.is_finite() && px >= 1.0 {
                px.min(f64::from(u32::MAX)) as u32
            } else {
                1
            }
        };
        Self {
            width: scale(logical_width),
            height: scale(logical_height),
            pixel_density: density,
        }
    }

    /// Return `true` when both axes are non-zero.
    pub fn is_drawable(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Number of pixels covered.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Full output area as a rectangle.
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

fn sanitize_density(d: f64) -> f64 {
    if d.is_finite() && d > 0.0 { d } else { 1.0 }
}

/// Margins reserved by an external UI, in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Insets {
    /// Reserved band at the top edge.
    pub top: f64,
    /// Reserved band at the bottom edge.
    pub bottom: f64,
    /// Reserved band at the left edge.
    pub left: f64,
    /// Reserved band at the right edge.
    pub right: f64,
}

impl Insets {
    /// No reserved margins.
    pub const ZERO: Self = Self {
        top: 0.0,
        bottom: 0.0,
        left: 0.0,
        right: 0.0,
    };

    /// Shrink `area` by these margins. The result may be empty or inverted.
    pub fn apply(self, area: Rect) -> Rect {
        Rect::new(
            area.x0 + self.left,
            area.y0 + self.top,
            area.x1 - self.right,
            area.y1 - self.bottom,
        )
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque pure red.
    pub const RED: Self = Self::opaque(255, 0, 0);
    /// Opaque pure green.
    pub const GREEN: Self = Self::opaque(0, 255, 0);
    /// Opaque pure blue.
    pub const BLUE: Self = Self::opaque(0, 0, 255);

    /// Opaque color from straight channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional) as straight alpha.
    pub fn parse_hex(s: &str) -> LenticularResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LenticularError::validation(format!(
                "expected #rrggbb or #rrggbbaa color, got '{s}'"
            )));
        }
        let byte = |i: usize| -> LenticularResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| LenticularError::validation(format!("color '{s}': {e}")))
        };
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::from_straight_rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// Channels as a byte array in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channels with alpha divided back out, as paint APIs expect.
    pub fn to_straight_array(self) -> [u8; 4] {
        let mut px = self.to_array();
        crate::foundation::math::unpremultiply_rgba8_in_place(&mut px);
        px
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
