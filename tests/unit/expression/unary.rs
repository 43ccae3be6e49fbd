use super::*;

#[test]
fn names_round_trip() {
    for op in ALL {
        assert_eq!(UnaryOp::from_name(op.name()), Some(op));
    }
    assert_eq!(UnaryOp::from_name("nope"), None);
}

#[test]
fn host_matches_glsl_conventions() {
    assert_eq!(UnaryOp::Not.eval(1.0), 0.0);
    assert_eq!(UnaryOp::Not.eval(0.0), 1.0);
    assert_eq!(UnaryOp::Sign.eval(0.0), 0.0);
    assert_eq!(UnaryOp::Sign.eval(-3.0), -1.0);
    assert_eq!(UnaryOp::Floor.eval(-0.5), -1.0);
    assert!(UnaryOp::Sqrt.eval(-1.0).is_nan());
}

#[test]
fn glsl_templates_wrap_operand() {
    assert_eq!(UnaryOp::Neg.glsl("x"), "(-x)");
    assert_eq!(UnaryOp::Abs.glsl("$a"), "abs($a)");
}
