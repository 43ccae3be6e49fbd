use super::*;

fn close(a: [f64; 4], b: [f64; 4], tol: f64) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tol)
}

#[test]
fn white_and_black_have_reference_lightness() {
    let white = srgb_to_cielab([1.0, 1.0, 1.0, 1.0]);
    assert!((white.l - 100.0).abs() < 1e-3);
    assert!(white.a.abs() < 1e-2);
    assert!(white.b.abs() < 1e-2);

    let black = srgb_to_cielab([0.0, 0.0, 0.0, 1.0]);
    assert!(black.l.abs() < 1e-9);
}

#[test]
fn srgb_lab_round_trip() {
    for c in [
        [0.2, 0.4, 0.6, 1.0],
        [1.0, 0.0, 0.0, 0.5],
        [0.0, 1.0, 0.0, 0.0],
        [0.95, 0.91, 0.61, 1.0],
        [0.01, 0.02, 0.03, 1.0],
    ] {
        let back = cielab_to_srgb(srgb_to_cielab(c));
        assert!(close(back, c, 1e-4), "{c:?} -> {back:?}");
    }
}

#[test]
fn interpolation_endpoints_match_inputs() {
    let a = [1.0, 0.0, 0.0, 1.0];
    let b = [0.0, 0.0, 1.0, 0.0];
    assert!(close(interpolate_rgba_in_cielab(a, b, 0.0), a, 1e-4));
    assert!(close(interpolate_rgba_in_cielab(a, b, 1.0), b, 1e-4));
    let mid = interpolate_rgba_in_cielab(a, b, 0.5);
    assert!((mid[3] - 0.5).abs() < 1e-12);
}

#[test]
fn glsl_helper_is_guarded() {
    assert!(CIELAB_GLSL.contains("#ifndef CIELAB_HELPERS"));
    assert!(CIELAB_GLSL.contains("vec4 cielabToSRGBA(vec4 lab)"));
}
