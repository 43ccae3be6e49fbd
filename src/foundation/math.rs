/// GLSL `clamp` semantics: NaN inputs stay NaN.
#[inline]
pub(crate) fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// GLSL `mix`.
#[inline]
pub(crate) fn mix(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Float literal accepted by GLSL ES (always carries a decimal point).
pub(crate) fn glsl_float(v: f64) -> String {
    if v.is_nan() {
        return "(0./0.)".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "(1./0.)" } else { "(-1./0.)" }.to_owned();
    }
    let s = format!("{v:?}");
    if s.contains('.') || s.contains('e') {
        s
    } else {
        format!("{s}.")
    }
}

/// Fixed 20-digit float literal, used for palette stops.
pub(crate) fn glsl_fixed(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.20}")
    } else {
        glsl_float(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
