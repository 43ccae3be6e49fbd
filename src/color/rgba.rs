use crate::color::named::named_color;
use crate::foundation::error::{VizError, VizResult};

/// Straight (non-premultiplied) color with `r,g,b` in `[0, 255]` and alpha in `[0, 1]`.
///
/// This is the shape legends expose (`{ r: 95, g: 70, b: 144, a: 1 }`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> VizResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| VizError::validation(format!("invalid hex color '{s}'")))?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(VizError::validation(format!("invalid hex color '{s}'")));
        }

        let nibble = |i: usize| -> VizResult<u8> {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| VizError::validation(format!("invalid hex color '{s}'")))
        };
        let byte = |i: usize| -> VizResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| VizError::validation(format!("invalid hex color '{s}'")))
        };

        let (r, g, b, a) = match hex.len() {
            3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
            4 => (nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
            6 => (byte(0)?, byte(2)?, byte(4)?, 255),
            8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
            _ => return Err(VizError::validation(format!("invalid hex color '{s}'"))),
        };
        Ok(Self::new(
            f64::from(r),
            f64::from(g),
            f64::from(b),
            f64::from(a) / 255.0,
        ))
    }

    /// Resolve a CSS color keyword (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        named_color(name).and_then(|hex| Self::from_hex(hex).ok())
    }

    /// Channels scaled into `[0, 1]`, the representation used by shaders.
    pub fn to_unit(self) -> [f64; 4] {
        [self.r / 255.0, self.g / 255.0, self.b / 255.0, self.a]
    }

    pub fn from_unit(v: [f64; 4]) -> Self {
        Self::new(v[0] * 255.0, v[1] * 255.0, v[2] * 255.0, v[3])
    }

    pub fn has_nan(self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan() || self.a.is_nan()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/rgba.rs"]
mod tests;
