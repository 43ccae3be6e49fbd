use super::*;

#[test]
fn equality_returns_numeric_booleans() {
    let one = Value::Number(1.0);
    let two = Value::Number(2.0);
    assert_eq!(
        eval_binary(BinaryOp::Eq, NUMBERS_TO_NUMBER, &one, &one),
        Value::Number(1.0)
    );
    assert_eq!(
        eval_binary(BinaryOp::Eq, NUMBERS_TO_NUMBER, &one, &two),
        Value::Number(0.0)
    );
    assert_eq!(
        eval_binary(BinaryOp::Ne, NUMBERS_TO_NUMBER, &one, &two),
        Value::Number(1.0)
    );
}

#[test]
fn comparisons_follow_ieee_nan_rules() {
    let nan = Value::Number(f64::NAN);
    for op in [BinaryOp::Eq, BinaryOp::Lt, BinaryOp::Le, BinaryOp::Gt, BinaryOp::Ge] {
        assert_eq!(
            eval_binary(op, NUMBERS_TO_NUMBER, &nan, &nan),
            Value::Number(0.0),
            "{op:?}"
        );
    }
    assert_eq!(
        eval_binary(BinaryOp::Ne, NUMBERS_TO_NUMBER, &nan, &nan),
        Value::Number(1.0)
    );
}

#[test]
fn categories_compare_by_id() {
    use crate::foundation::ids::CategoryId;
    let a = Value::Category(CategoryId(3));
    let b = Value::Category(CategoryId(4));
    assert_eq!(
        eval_binary(BinaryOp::Ne, CATEGORIES_TO_NUMBER, &a, &b),
        Value::Number(1.0)
    );
}

#[test]
fn modulo_matches_glsl_floor_semantics() {
    let r = eval_binary(
        BinaryOp::Mod,
        NUMBERS_TO_NUMBER,
        &Value::Number(-1.0),
        &Value::Number(3.0),
    );
    assert_eq!(r, Value::Number(2.0));
}

#[test]
fn logic_ops_are_float_encoded() {
    let t = Value::Number(1.0);
    let f = Value::Number(0.0);
    assert_eq!(
        eval_binary(BinaryOp::And, NUMBERS_TO_NUMBER, &t, &f),
        Value::Number(0.0)
    );
    assert_eq!(
        eval_binary(BinaryOp::Or, NUMBERS_TO_NUMBER, &t, &t),
        Value::Number(1.0)
    );
}

#[test]
fn color_times_number_scales_channels() {
    let c = Value::Color(Rgba::new(200.0, 100.0, 50.0, 1.0));
    let r = eval_binary(
        BinaryOp::Mul,
        NUMBER_AND_COLOR_TO_COLOR,
        &c,
        &Value::Number(0.5),
    );
    let r = r.as_color().unwrap();
    assert!((r.r - 100.0).abs() < 1e-9);
    assert!((r.g - 50.0).abs() < 1e-9);
    assert!((r.a - 0.5).abs() < 1e-9);
}

#[test]
fn signature_resolution_picks_output_type() {
    let (sig, out) =
        resolve_signature(BinaryOp::Mul, Some(ValueType::Color), Some(ValueType::Number)).unwrap();
    assert_eq!(sig, NUMBER_AND_COLOR_TO_COLOR);
    assert_eq!(out, ValueType::Color);

    let (_, out) = resolve_signature(
        BinaryOp::Eq,
        Some(ValueType::Category),
        Some(ValueType::Category),
    )
    .unwrap();
    assert_eq!(out, ValueType::Number);
}

#[test]
fn signature_mismatch_names_offending_operand() {
    let err = resolve_signature(
        BinaryOp::Lt,
        Some(ValueType::Number),
        Some(ValueType::Category),
    )
    .unwrap_err();
    assert!(matches!(err, VizError::Type(_)));
    assert!(err.to_string().contains("'y'"));

    let err = resolve_signature(
        BinaryOp::Add,
        Some(ValueType::Category),
        Some(ValueType::Number),
    )
    .unwrap_err();
    assert!(err.to_string().contains("'x'"));
}

#[test]
fn glsl_templates_encode_booleans_as_floats() {
    assert_eq!((BinaryOp::Ne.spec().glsl)("a", "b"), "(a!=b? 1.:0.)");
    assert_eq!((BinaryOp::Mod.spec().glsl)("a", "b"), "mod(a, b)");
    assert_eq!(BinaryOp::from_name("gte"), Some(BinaryOp::Ge));
}
