use std::collections::BTreeMap;

use super::*;
use crate::expression::image_list::DecodedImage;
use crate::feature::{EmptyFeature, PropertyValue};
use crate::metadata::PropertyMeta;
use crate::uniforms::InMemoryUniforms;

fn meta() -> Arc<Metadata> {
    let mut props = BTreeMap::new();
    props.insert(
        "price".to_owned(),
        PropertyMeta::number(0.0, 100.0).with_sample((0..=100).map(f64::from).collect()),
    );
    props.insert(
        "kind".to_owned(),
        PropertyMeta::category(["car", "bike", "bus"]),
    );
    Arc::new(Metadata::new(props, "id"))
}

fn feature(pairs: &[(&str, PropertyValue)]) -> BTreeMap<String, PropertyValue> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

fn num(v: f64) -> PropertyValue {
    PropertyValue::Number(v)
}

fn text(s: &str) -> PropertyValue {
    PropertyValue::Text(s.to_owned())
}

fn bound(src: &str) -> (ExprArena, NodeId) {
    let mut arena = ExprArena::new();
    let root = arena.parse(src).unwrap();
    arena.bind_metadata(root, meta()).unwrap();
    (arena, root)
}

fn eval(src: &str, f: &dyn Feature) -> Value {
    let (arena, root) = bound(src);
    arena.eval(root, f).unwrap()
}

#[test]
fn literals_evaluate_to_themselves() {
    assert_eq!(eval("3", &EmptyFeature), Value::Number(3.0));
    assert_eq!(
        eval("#ff0000", &EmptyFeature),
        Value::Color(Rgba::new(255.0, 0.0, 0.0, 1.0))
    );
    assert_eq!(
        eval("rgba(0, 128, 255, 0.5)", &EmptyFeature),
        Value::Color(Rgba::new(0.0, 128.0, 255.0, 0.5))
    );
}

#[test]
fn category_literal_resolves_dataset_id() {
    let meta = meta();
    let car = meta.categories().id("car").unwrap();
    assert_eq!(eval("'car'", &EmptyFeature), Value::Category(car));
    assert_eq!(eval("'plane'", &EmptyFeature), Value::Null);
}

#[test]
fn missing_properties_read_as_nan_or_null() {
    assert!(eval("$price", &EmptyFeature).as_f64().is_nan());
    assert_eq!(eval("$kind", &EmptyFeature), Value::Null);
    assert_eq!(eval("$kind", &feature(&[("kind", text("plane"))])), Value::Null);
}

#[test]
fn binding_happens_once_per_node() {
    let mut arena = ExprArena::new();
    let root = arena.parse("$price + 1").unwrap();
    let m = meta();
    arena.bind_metadata(root, Arc::clone(&m)).unwrap();
    let err = arena.bind_metadata(root, m).unwrap_err();
    assert!(matches!(err, VizError::Validation(_)), "{err}");
}

#[test]
fn roots_of_one_arena_share_one_metadata_snapshot() {
    let mut arena = ExprArena::new();
    let a = arena.parse("$price").unwrap();
    let b = arena.parse("$price * 2").unwrap();
    arena.bind_metadata(a, meta()).unwrap();
    let err = arena.bind_metadata(b, meta()).unwrap_err();
    assert!(matches!(err, VizError::Validation(_)), "{err}");
}

#[test]
fn eval_requires_binding() {
    let mut arena = ExprArena::new();
    let root = arena.parse("1 + 2").unwrap();
    assert!(arena.eval(root, &EmptyFeature).is_err());
    assert_eq!(arena.output_type(root), None);
}

#[test]
fn output_type_is_fixed_after_binding() {
    let (arena, root) = bound("$price + 1");
    assert_eq!(arena.output_type(root), Some(ValueType::Number));
    let (arena, root) = bound("#fff * 0.5");
    assert_eq!(arena.output_type(root), Some(ValueType::Color));
    let (arena, root) = bound("buckets($kind, ['car'])");
    assert_eq!(arena.output_type(root), Some(ValueType::Category));
}

#[test]
fn operand_type_mismatch_is_a_type_error() {
    let mut arena = ExprArena::new();
    let root = arena.parse("$price + $kind").unwrap();
    let err = arena.bind_metadata(root, meta()).unwrap_err();
    assert!(matches!(err, VizError::Type(_)), "{err}");

    let mut arena = ExprArena::new();
    let root = arena.parse("sqrt($kind)").unwrap();
    let err = arena.bind_metadata(root, meta()).unwrap_err();
    assert!(matches!(err, VizError::Type(_)), "{err}");
}

#[test]
fn unknown_property_fails_binding() {
    let mut arena = ExprArena::new();
    let root = arena.parse("$nope * 2").unwrap();
    assert!(arena.bind_metadata(root, meta()).is_err());
}

#[test]
fn linear_defaults_to_metadata_range() {
    let v = eval("linear($price)", &feature(&[("price", num(25.0))]));
    assert_eq!(v, Value::Number(0.25));
    let v = eval("linear($price, 10, 20)", &feature(&[("price", num(15.0))]));
    assert_eq!(v, Value::Number(0.5));

    let mut arena = ExprArena::new();
    let root = arena.parse("linear($price * 2)").unwrap();
    let err = arena.bind_metadata(root, meta()).unwrap_err();
    assert!(matches!(err, VizError::Validation(_)), "{err}");
}

#[test]
fn numeric_buckets_use_strict_upper_bounds() {
    let (arena, root) = bound("buckets($price, [10, 20])");
    let at = |v: f64| arena.eval(root, &feature(&[("price", num(v))])).unwrap();
    assert_eq!(at(5.0), Value::Number(0.0));
    assert_eq!(at(10.0), Value::Number(1.0));
    assert_eq!(at(19.9), Value::Number(1.0));
    assert_eq!(at(30.0), Value::Number(2.0));
    assert_eq!(at(f64::NAN), Value::Number(2.0));
}

#[test]
fn categorical_buckets_match_by_id() {
    let (arena, root) = bound("buckets($kind, ['car', 'bus'])");
    let at = |s: &str| arena.eval(root, &feature(&[("kind", text(s))])).unwrap();
    assert_eq!(at("car"), Value::Number(0.0));
    assert_eq!(at("bus"), Value::Number(1.0));
    assert_eq!(at("bike"), Value::Number(2.0));
    assert_eq!(at("plane"), Value::Number(2.0));
}

#[test]
fn buckets_list_must_match_input_type() {
    let mut arena = ExprArena::new();
    let root = arena.parse("buckets($price, ['car'])").unwrap();
    let err = arena.bind_metadata(root, meta()).unwrap_err();
    assert!(matches!(err, VizError::Type(_)), "{err}");
}

#[test]
fn top_keeps_most_frequent_categories() {
    let m = meta();
    let (arena, root) = bound("top($kind, 2)");
    let at = |s: &str| arena.eval(root, &feature(&[("kind", text(s))])).unwrap();
    assert_eq!(at("car"), Value::Category(m.categories().id("car").unwrap()));
    assert_eq!(at("bike"), Value::Category(m.categories().id("bike").unwrap()));
    assert_eq!(at("bus"), Value::Null);
}

#[test]
fn top_validates_arguments_at_construction() {
    let mut arena = ExprArena::new();
    let n = arena.number(3.0);
    assert!(matches!(arena.top(n, 2.0), Err(VizError::Type(_))));
    let p = arena.property("kind");
    assert!(matches!(arena.top(p, 0.0), Err(VizError::Validation(_))));
    assert!(matches!(arena.top(p, 1.5), Err(VizError::Validation(_))));
}

#[test]
fn classifier_requires_a_property_input() {
    let mut arena = ExprArena::new();
    let root = arena.parse("globalQuantiles($price * 2, 3)").unwrap();
    let err = arena.bind_metadata(root, meta()).unwrap_err();
    assert!(matches!(err, VizError::Type(_)), "{err}");
}

#[test]
fn classifier_evaluates_normalized_class() {
    let (arena, root) = bound("globalEqIntervals($price, 5)");
    let at = |v: f64| arena.eval(root, &feature(&[("price", num(v))])).unwrap();
    assert_eq!(at(0.0), Value::Number(0.0));
    assert_eq!(at(20.0), Value::Number(0.0));
    assert_eq!(at(50.0), Value::Number(0.5));
    assert_eq!(at(99.0), Value::Number(1.0));
}

#[test]
fn palettes_have_no_per_feature_value() {
    let mut arena = ExprArena::new();
    let root = arena.parse("prism").unwrap();
    arena.bind_metadata(root, meta()).unwrap();
    assert!(matches!(
        arena.eval(root, &EmptyFeature),
        Err(VizError::Type(_))
    ));
}

#[test]
fn comparisons_yield_one_or_zero() {
    let f = feature(&[("price", num(3.0)), ("kind", text("car"))]);
    assert_eq!(eval("$price > 2", &f), Value::Number(1.0));
    assert_eq!(eval("$price > 2 and $price < 3", &f), Value::Number(0.0));
    assert_eq!(eval("$kind == 'car'", &f), Value::Number(1.0));
    assert_eq!(eval("$kind != 'car'", &f), Value::Number(0.0));
}

#[test]
fn now_reads_the_arena_clock() {
    let (mut arena, root) = bound("now() * 2");
    arena.set_time(1.5);
    assert_eq!(arena.eval(root, &EmptyFeature).unwrap(), Value::Number(3.0));
    assert!(arena.is_animated(root).unwrap());
    assert!(!arena.depends_on_feature(root).unwrap());
}

#[test]
fn pre_draw_uploads_clock_and_breakpoints() {
    let (mut arena, root) = bound("ramp(globalEqIntervals($price, 4), [0, 1]) + now()");
    arena.set_time(2.0);
    let mut sink = InMemoryUniforms::new();
    arena.pre_draw(root, &mut sink).unwrap();

    let names: Vec<&str> = sink.floats.keys().map(String::as_str).collect();
    assert_eq!(names.iter().filter(|n| n.starts_with("now")).count(), 1);
    assert_eq!(names.iter().filter(|n| n.contains("_bp")).count(), 3);
    let bp: Vec<f32> = sink
        .floats
        .iter()
        .filter(|(k, _)| k.contains("_bp"))
        .map(|(_, v)| *v)
        .collect();
    assert_eq!(bp, vec![25.0, 50.0, 75.0]);
}

struct SolidLoader;

impl ImageLoader for SolidLoader {
    fn load(&self, url: &str) -> VizResult<DecodedImage> {
        if url.ends_with(".missing") {
            return Err(VizError::image(format!("{url}: not found")));
        }
        Ok(DecodedImage {
            width: 1,
            height: 1,
            rgba8: vec![255, 0, 0, 255],
        })
    }
}

#[test]
fn images_load_before_first_draw_and_upload_once() {
    let (mut arena, root) = bound("ramp(buckets($kind, ['car']), imageList(['a.png', 'b.png']))");
    let mut sink = InMemoryUniforms::new();
    assert!(arena.pre_draw(root, &mut sink).is_err());

    arena.load_images(root, &SolidLoader).unwrap();
    arena.pre_draw(root, &mut sink).unwrap();
    assert_eq!(sink.uploads, 2);
    arena.pre_draw(root, &mut sink).unwrap();
    assert_eq!(sink.uploads, 2);
    assert_eq!(sink.binds, 2);
}

#[test]
fn image_loading_fails_on_first_error() {
    let (mut arena, root) = bound("ramp(buckets($kind, ['car']), imageList(['a.png', 'b.missing']))");
    let err = arena.load_images(root, &SolidLoader).unwrap_err();
    assert!(matches!(err, VizError::Image(_)), "{err}");
}

#[test]
fn display_uses_canonical_function_form() {
    let mut arena = ExprArena::new();
    let root = arena
        .parse("ramp(buckets($price, [10, 20]), prism, #00f)")
        .unwrap();
    assert_eq!(
        arena.display(root).to_string(),
        "ramp(buckets($price, [10, 20]), prism, rgba(0, 0, 255, 1))"
    );

    let root = arena.parse("-$price + 2 * 3").unwrap();
    assert_eq!(arena.display(root).to_string(), "add(neg($price), mul(2, 3))");

    let root = arena.parse("top($kind, 3) == 'car'").unwrap();
    assert_eq!(arena.display(root).to_string(), "eq(top($kind, 3), 'car')");
}

#[test]
fn display_round_trips_through_the_parser() {
    let mut arena = ExprArena::new();
    for src in [
        "add($price, 1)",
        "globalStandardDev($price, 4, 0.5)",
        "imageList(['a.png', 'b.png'])",
        "linear($price, 0, 10)",
        "ramp(globalQuantiles($price, 5), [1, 10])",
    ] {
        let root = arena.parse(src).unwrap();
        let text = arena.display(root).to_string();
        assert_eq!(text, src);
        let again = arena.parse(&text).unwrap();
        assert_eq!(arena.display(again).to_string(), src);
    }
}
