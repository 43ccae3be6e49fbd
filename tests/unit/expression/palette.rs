use super::*;
use crate::color::palettes::{PRISM, SUNSET};

fn gray() -> Rgba {
    Rgba::from_name("gray").unwrap()
}

fn hexes(hex: &[&str]) -> Vec<Rgba> {
    hex.iter().map(|h| Rgba::from_hex(h).unwrap()).collect()
}

#[test]
fn avoid_showing_interpolation_truncates_and_appends() {
    let c = hexes(&["#000000", "#111111", "#222222", "#333333"]);
    let out = avoid_showing_interpolation(2, &c, gray());
    assert_eq!(out, vec![c[0], c[1], gray()]);
    // Nothing to substitute when the list ends at or before the cutoff.
    assert_eq!(avoid_showing_interpolation(4, &c, gray()), c);
}

#[test]
fn literal_colors_with_property_input_are_used_verbatim() {
    let c = hexes(&["#ff0000", "#00ff00"]);
    let source = ColorSource::Literal(c.clone());
    let out = colors_for_ramp(InputRole::Property, &source, Some(5), gray()).unwrap();
    assert_eq!(out, c);
}

#[test]
fn literal_colors_fewer_categories_substitute_cutoff_color() {
    let c = hexes(&["#ff0000", "#00ff00", "#0000ff"]);
    let source = ColorSource::Literal(c.clone());
    let out = colors_for_ramp(InputRole::Buckets, &source, Some(2), gray()).unwrap();
    assert_eq!(out, vec![c[0], c[1], c[2]]);

    let out = colors_for_ramp(InputRole::Top, &source, Some(1), gray()).unwrap();
    assert_eq!(out, vec![c[0], c[1]]);
}

#[test]
fn literal_colors_more_categories_append_others() {
    let c = hexes(&["#ff0000", "#00ff00"]);
    let source = ColorSource::Literal(c.clone());
    let out = colors_for_ramp(InputRole::Buckets, &source, Some(4), gray()).unwrap();
    assert_eq!(out, vec![c[0], c[1], gray()]);
}

#[test]
fn literal_colors_equal_count_append_then_truncate() {
    let c = hexes(&["#ff0000", "#00ff00", "#0000ff"]);
    let source = ColorSource::Literal(c.clone());
    let out = colors_for_ramp(InputRole::Buckets, &source, Some(3), gray()).unwrap();
    assert_eq!(out, vec![c[0], c[1], c[2], gray()]);
}

#[test]
fn literal_colors_classifier_short_circuits_when_fewer() {
    let c = hexes(&["#ff0000", "#00ff00", "#0000ff"]);
    let source = ColorSource::Literal(c.clone());
    let out = colors_for_ramp(InputRole::Classifier, &source, Some(2), gray()).unwrap();
    assert_eq!(out, c);
}

#[test]
fn numeric_input_keeps_literal_colors() {
    let c = hexes(&["#ff0000", "#0000ff"]);
    let out = colors_for_ramp(InputRole::Generic, &ColorSource::Literal(c.clone()), None, gray())
        .unwrap();
    assert_eq!(out, c);
}

#[test]
fn named_qualitative_default_drops_neutral() {
    let source = ColorSource::Named(&PRISM);
    let out = colors_for_ramp(InputRole::Property, &source, Some(3), gray()).unwrap();
    assert_eq!(out, hexes(&["#5F4690", "#1D6996", "#38A6A5"]));
}

#[test]
fn named_qualitative_top_ends_with_neutral() {
    let source = ColorSource::Named(&PRISM);
    let out = colors_for_ramp(InputRole::Top, &source, Some(3), gray()).unwrap();
    assert_eq!(out, hexes(&["#5F4690", "#1D6996", "#38A6A5", "#666666"]));
}

#[test]
fn named_qualitative_buckets_use_slot_n_as_others() {
    let source = ColorSource::Named(&PRISM);
    let out = colors_for_ramp(InputRole::Buckets, &source, Some(2), gray()).unwrap();
    assert_eq!(out, hexes(&["#5F4690", "#1D6996", "#666666"]));
}

#[test]
fn named_quantitative_buckets_append_default_others() {
    let source = ColorSource::Named(&SUNSET);
    let out = colors_for_ramp(InputRole::Buckets, &source, Some(3), gray()).unwrap();
    assert_eq!(out, hexes(&["#f3e79b", "#eb7f86", "#5c53a5"]).into_iter().chain([gray()]).collect::<Vec<_>>());
}

#[test]
fn named_quantitative_numeric_input_uses_longest() {
    let out = colors_for_ramp(InputRole::Generic, &ColorSource::Named(&SUNSET), None, gray())
        .unwrap();
    assert_eq!(out.len(), 7);
}
