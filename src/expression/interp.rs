//! The single interpolation law shared by host lookup tables, host numeric
//! ramps and generated shader code.
//!
//! Stop `i` of `n` sits at `i / (n - 1)`. The curve is the fold
//! `blend_i = mix(stop_i, blend_{i+1}, clamp((x - i/(n-1)) / (1/(n-1)), 0, 1))`
//! evaluated from the last stop backwards; the GLSL text is emitted from the
//! same fold.

use crate::color::cielab::{Lab, cielab_to_srgb, rgba_to_cielab};
use crate::color::rgba::Rgba;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::math::{clamp, glsl_fixed, mix};

/// Number of entries of every ramp lookup table.
pub const LOOKUP_TABLE_SIZE: usize = 256;
const MAX_BYTE_VALUE: f64 = 255.0;

pub(crate) trait Stop: Copy {
    fn mix(a: Self, b: Self, t: f64) -> Self;
}

impl Stop for f64 {
    fn mix(a: Self, b: Self, t: f64) -> Self {
        mix(a, b, t)
    }
}

impl Stop for [f64; 4] {
    fn mix(a: Self, b: Self, t: f64) -> Self {
        [
            mix(a[0], b[0], t),
            mix(a[1], b[1], t),
            mix(a[2], b[2], t),
            mix(a[3], b[3], t),
        ]
    }
}

/// Weight of segment `index` for a curve of `len` stops.
fn segment_weight(index: usize, len: usize, x: f64) -> f64 {
    let last = (len - 1) as f64;
    let min = index as f64 / last;
    let width = 1.0 / last;
    clamp((x - min) / width, 0.0, 1.0)
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PiecewiseLinear<T> {
    stops: Vec<T>,
}

impl<T: Stop> PiecewiseLinear<T> {
    pub(crate) fn new(stops: Vec<T>) -> VizResult<Self> {
        if stops.is_empty() {
            return Err(VizError::validation(
                "an interpolation curve needs at least one stop",
            ));
        }
        Ok(Self { stops })
    }

    pub(crate) fn eval(&self, x: f64) -> T {
        let n = self.stops.len();
        let mut acc = self.stops[n - 1];
        for i in (0..n - 1).rev() {
            acc = T::mix(self.stops[i], acc, segment_weight(i, n, x));
        }
        acc
    }
}

/// GLSL text of the same fold; `stops` are already GLSL expressions.
pub(crate) fn glsl_blend(stops: &[String], x: &str) -> String {
    let n = stops.len();
    let Some(last) = stops.last() else {
        return "0.".to_owned();
    };
    let mut acc = last.clone();
    for i in (0..n - 1).rev() {
        let last_idx = (n - 1) as f64;
        let min = glsl_fixed(i as f64 / last_idx);
        let width = glsl_fixed(1.0 / last_idx);
        acc = format!(
            "mix({}, {acc}, clamp(({x} - {min})/{width}, 0., 1.))",
            stops[i]
        );
    }
    acc
}

/// GLSL literal of one CIELAB stop.
pub(crate) fn glsl_lab(lab: Lab) -> String {
    format!(
        "vec4({}, {}, {}, {})",
        glsl_fixed(lab.l),
        glsl_fixed(lab.a),
        glsl_fixed(lab.b),
        glsl_fixed(lab.alpha)
    )
}

/// Precomputed 256-entry sampling of a ramp curve.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupTable {
    /// RGBA bytes; alpha is stored as `round(a * 255)`.
    Color(Vec<[u8; 4]>),
    Number(Vec<f32>),
}

impl LookupTable {
    pub fn len(&self) -> usize {
        match self {
            Self::Color(px) => px.len(),
            Self::Number(px) => px.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Color stored at `index`, alpha mapped back into `[0, 1]`.
    pub fn color_at(&self, index: usize) -> Option<Rgba> {
        match self {
            Self::Color(px) => px.get(index).map(|p| {
                Rgba::new(
                    f64::from(p[0]),
                    f64::from(p[1]),
                    f64::from(p[2]),
                    f64::from(p[3]) / MAX_BYTE_VALUE,
                )
            }),
            Self::Number(_) => None,
        }
    }

    pub fn number_at(&self, index: usize) -> Option<f64> {
        match self {
            Self::Number(px) => px.get(index).map(|v| f64::from(*v)),
            Self::Color(_) => None,
        }
    }
}

fn to_byte(c: f64) -> u8 {
    (c * MAX_BYTE_VALUE).round().clamp(0.0, MAX_BYTE_VALUE) as u8
}

/// CIELAB curve through `colors`, the one sampled by both the table and the shader.
pub(crate) fn color_curve(colors: &[Rgba]) -> VizResult<PiecewiseLinear<[f64; 4]>> {
    PiecewiseLinear::new(colors.iter().map(|c| rgba_to_cielab(*c).to_array()).collect())
}

pub(crate) fn compute_color_ramp_texture(colors: &[Rgba]) -> VizResult<LookupTable> {
    let curve = color_curve(colors)?;
    let last = (LOOKUP_TABLE_SIZE - 1) as f64;
    let pixels = (0..LOOKUP_TABLE_SIZE)
        .map(|i| {
            let rgba = cielab_to_srgb(Lab::from_array(curve.eval(i as f64 / last)));
            [
                to_byte(rgba[0]),
                to_byte(rgba[1]),
                to_byte(rgba[2]),
                to_byte(rgba[3]),
            ]
        })
        .collect();
    Ok(LookupTable::Color(pixels))
}

pub(crate) fn compute_numeric_ramp_texture(values: &[f64]) -> VizResult<LookupTable> {
    let curve = PiecewiseLinear::new(values.to_vec())?;
    let last = (LOOKUP_TABLE_SIZE - 1) as f64;
    Ok(LookupTable::Number(
        (0..LOOKUP_TABLE_SIZE)
            .map(|i| curve.eval(i as f64 / last) as f32)
            .collect(),
    ))
}

/// Table slot for a normalized position; `None` means "no value".
pub(crate) fn color_value_index(m: f64) -> Option<usize> {
    if m.is_nan() || m == f64::NEG_INFINITY {
        return Some(0);
    }
    if m == f64::INFINITY || m > 1.0 {
        return Some(LOOKUP_TABLE_SIZE - 1);
    }
    let slot = (m * MAX_BYTE_VALUE).round();
    if slot < 0.0 { None } else { Some(slot as usize) }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/interp.rs"]
mod tests;
