use super::*;
use crate::expression::shader::attribute_resolver;
use crate::feature::PropertyValue;
use crate::metadata::PropertyMeta;
use crate::uniforms::InMemoryUniforms;

const STYLE: &str = "\
// fill and stroke
color: ramp($kind,
    [red, lime, blue])
width: $price / 10

strokeWidth: 1
";

fn meta() -> Arc<Metadata> {
    let mut props = BTreeMap::new();
    props.insert("price".to_owned(), PropertyMeta::number(0.0, 100.0));
    props.insert(
        "kind".to_owned(),
        PropertyMeta::category(["car", "bike", "bus"]),
    );
    Arc::new(Metadata::new(props, "id"))
}

fn compiled(src: &str) -> Style {
    let mut style = Style::parse(src).unwrap();
    style.compile(meta()).unwrap();
    style
}

#[test]
fn splits_properties_with_comments_and_continuations() {
    let style = Style::parse(STYLE).unwrap();
    assert_eq!(
        style.property_names().collect::<Vec<_>>(),
        ["color", "width", "strokeWidth"]
    );
    let root = style.root("color").unwrap();
    assert!(
        style
            .arena()
            .display(root)
            .to_string()
            .starts_with("ramp($kind, [rgba(255, 0, 0, 1)")
    );
}

#[test]
fn trailing_comments_end_at_the_line() {
    let style = compiled("width: 3 // three\nsize: $price // per unit\n    / 2\n");
    assert_eq!(
        style.property_names().collect::<Vec<_>>(),
        ["width", "size"]
    );
    let feature = BTreeMap::from([("price".to_owned(), PropertyValue::Number(40.0))]);
    assert_eq!(style.eval("width", &feature).unwrap(), Value::Number(3.0));
    assert_eq!(style.eval("size", &feature).unwrap(), Value::Number(20.0));
}

#[test]
fn rejects_duplicates_and_empty_styles() {
    assert!(matches!(
        Style::parse("width: 1\nwidth: 2"),
        Err(VizError::Validation(m)) if m.contains("'width' is defined twice")
    ));
    assert!(matches!(
        Style::parse("// nothing\n\n"),
        Err(VizError::Validation(_))
    ));
    assert!(matches!(
        Style::parse("1 + 2"),
        Err(VizError::Parse { offset: 0, .. })
    ));
}

#[test]
fn parse_errors_point_into_the_whole_style() {
    let src = "size: 2\nwidth: 1 +";
    match Style::parse(src) {
        Err(VizError::Parse { offset, message }) => {
            assert_eq!(offset, src.len());
            assert!(message.starts_with("width: "), "{message}");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn compile_errors_name_the_property() {
    let mut style = Style::parse("width: 1\ncolor: $kind * 2").unwrap();
    match style.compile(meta()) {
        Err(VizError::Type(m)) => assert!(m.starts_with("color: "), "{m}"),
        other => panic!("expected a type error, got {other:?}"),
    }

    let mut style = Style::parse("width: $missing").unwrap();
    assert!(matches!(
        style.compile(meta()),
        Err(VizError::Validation(m)) if m.starts_with("width: ")
    ));
}

#[test]
fn evaluates_each_property() {
    let style = compiled(STYLE);
    let feature = BTreeMap::from([
        ("price".to_owned(), PropertyValue::Number(40.0)),
        ("kind".to_owned(), PropertyValue::Text("car".to_owned())),
    ]);
    assert_eq!(style.eval("width", &feature).unwrap(), Value::Number(4.0));
    assert_eq!(style.eval("strokeWidth", &feature).unwrap(), Value::Number(1.0));
    assert!(matches!(
        style.eval("color", &feature).unwrap(),
        Value::Color(_)
    ));
    assert!(matches!(
        style.eval("opacity", &feature),
        Err(VizError::Validation(_))
    ));
}

#[test]
fn shader_shares_one_preface() {
    let style = compiled(STYLE);
    let out = style.shader(&attribute_resolver).unwrap();
    assert_eq!(out.properties.len(), 3);
    assert_eq!(out.properties["width"], "(prop_price / 10.0)");
    assert_eq!(out.properties["strokeWidth"], "1.0");
    assert!(out.properties["color"].starts_with("cielabToSRGBA("));
    assert_eq!(out.preface.matches("#ifndef CIELAB_HELPERS").count(), 1);

    let single = style.shader_source("color", &attribute_resolver).unwrap();
    assert_eq!(single.inline, out.properties["color"]);
}

#[test]
fn pre_draw_visits_every_property() {
    let style = compiled("a: ramp($price, [#000, #fff])\nb: ramp($kind, prism)\nc: now()");
    let mut sink = InMemoryUniforms::new();
    style.pre_draw(&mut sink).unwrap();
    assert_eq!(sink.uploads, 2);
    assert_eq!(sink.floats.keys().filter(|k| k.starts_with("rampMax")).count(), 2);
    assert_eq!(sink.floats.keys().filter(|k| k.starts_with("now")).count(), 1);
}

#[test]
fn legend_is_read_by_property_name() {
    let style = compiled(STYLE);
    let legend = style.legend("color", &LegendOptions::default()).unwrap();
    assert_eq!(legend.data.len(), 3);
    assert!(matches!(
        style.legend("width", &LegendOptions::default()),
        Err(VizError::Type(_))
    ));
}

#[test]
fn ramp_options_reach_the_arena() {
    let options = RampOptions {
        others_color: "black".to_owned(),
    };
    let style = Style::parse_with("c: ramp(top($kind, 1), [red, blue])", options).unwrap();
    assert_eq!(style.arena().ramp_options().others_color, "black");
}
