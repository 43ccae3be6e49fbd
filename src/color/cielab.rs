//! sRGB <-> CIELAB conversion (D65 white point) and perceptual interpolation.
//!
//! Host-side twin of [`CIELAB_GLSL`]; both use the same constants so the lookup
//! table and the generated shader agree.

use crate::color::rgba::Rgba;
use crate::foundation::math::mix;

/// CIELAB color with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
    pub alpha: f64,
}

impl Lab {
    pub fn to_array(self) -> [f64; 4] {
        [self.l, self.a, self.b, self.alpha]
    }

    pub fn from_array(v: [f64; 4]) -> Self {
        Self {
            l: v[0],
            a: v[1],
            b: v[2],
            alpha: v[3],
        }
    }
}

const WHITE_D65: [f64; 3] = [0.95047, 1.0, 1.08883];
const EPSILON: f64 = 0.008856;
const KAPPA_SLOPE: f64 = 7.787;
const OFFSET: f64 = 16.0 / 116.0;

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA_SLOPE * t + OFFSET
    }
}

fn lab_f_inv(t: f64) -> f64 {
    let t3 = t * t * t;
    if t3 > EPSILON {
        t3
    } else {
        (t - OFFSET) / KAPPA_SLOPE
    }
}

/// Convert unit-range sRGBA (`[0, 1]` channels) to CIELAB.
pub fn srgb_to_cielab(rgba: [f64; 4]) -> Lab {
    let r = srgb_to_linear(rgba[0]);
    let g = srgb_to_linear(rgba[1]);
    let b = srgb_to_linear(rgba[2]);

    let x = (0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b) / WHITE_D65[0];
    let y = (0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b) / WHITE_D65[1];
    let z = (0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b) / WHITE_D65[2];

    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
        alpha: rgba[3],
    }
}

/// Convert CIELAB back to unit-range sRGBA, clamped into `[0, 1]`.
pub fn cielab_to_srgb(lab: Lab) -> [f64; 4] {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    let x = lab_f_inv(fx) * WHITE_D65[0];
    let y = lab_f_inv(fy) * WHITE_D65[1];
    let z = lab_f_inv(fz) * WHITE_D65[2];

    let r = 3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z;
    let g = -0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z;
    let b = 0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z;

    [
        linear_to_srgb(r).clamp(0.0, 1.0),
        linear_to_srgb(g).clamp(0.0, 1.0),
        linear_to_srgb(b).clamp(0.0, 1.0),
        lab.alpha,
    ]
}

pub fn rgba_to_cielab(c: Rgba) -> Lab {
    srgb_to_cielab(c.to_unit())
}

/// Linear interpolation in CIELAB space; alpha is interpolated linearly too.
pub fn interpolate_rgba_in_cielab(from: [f64; 4], to: [f64; 4], m: f64) -> [f64; 4] {
    let a = srgb_to_cielab(from);
    let b = srgb_to_cielab(to);
    cielab_to_srgb(Lab {
        l: mix(a.l, b.l, m),
        a: mix(a.a, b.a, m),
        b: mix(a.b, b.b, m),
        alpha: mix(a.alpha, b.alpha, m),
    })
}

/// GLSL helpers mirroring [`cielab_to_srgb`]; guarded so several ramps can include it.
pub const CIELAB_GLSL: &str = r#"
#ifndef CIELAB_HELPERS
#define CIELAB_HELPERS
float labFInv(float t) {
    float t3 = t * t * t;
    return t3 > 0.008856 ? t3 : (t - 16.0 / 116.0) / 7.787;
}
float linearToSRGB(float c) {
    return c <= 0.0031308 ? 12.92 * c : 1.055 * pow(c, 1.0 / 2.4) - 0.055;
}
vec4 cielabToSRGBA(vec4 lab) {
    float fy = (lab.x + 16.0) / 116.0;
    float fx = lab.y / 500.0 + fy;
    float fz = fy - lab.z / 200.0;
    vec3 xyz = vec3(labFInv(fx) * 0.95047, labFInv(fy), labFInv(fz) * 1.08883);
    vec3 lin = mat3(
        3.2404542, -0.9692660, 0.0556434,
        -1.5371385, 1.8760108, -0.2040259,
        -0.4985314, 0.0415560, 1.0572252) * xyz;
    vec3 rgb = vec3(linearToSRGB(lin.r), linearToSRGB(lin.g), linearToSRGB(lin.b));
    return vec4(clamp(rgb, 0.0, 1.0), lab.w);
}
#endif
"#;

#[cfg(test)]
#[path = "../../tests/unit/color/cielab.rs"]
mod tests;
