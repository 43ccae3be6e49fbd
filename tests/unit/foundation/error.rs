use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VizError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(VizError::type_error("x").to_string().contains("type error:"));
    assert!(
        VizError::invariant("x")
            .to_string()
            .contains("invariant violated:")
    );
    assert!(
        VizError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(VizError::image("x").to_string().contains("image error:"));
}

#[test]
fn parse_error_reports_offset() {
    let err = VizError::parse(7, "unexpected token");
    assert_eq!(err.to_string(), "parse error at byte 7: unexpected token");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VizError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
