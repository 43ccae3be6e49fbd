use super::*;

#[test]
fn parses_all_hex_lengths() {
    assert_eq!(
        Rgba::from_hex("#f00").unwrap(),
        Rgba::new(255.0, 0.0, 0.0, 1.0)
    );
    assert_eq!(
        Rgba::from_hex("#5F4690").unwrap(),
        Rgba::new(95.0, 70.0, 144.0, 1.0)
    );
    let c = Rgba::from_hex("#00000080").unwrap();
    assert!((c.a - 128.0 / 255.0).abs() < 1e-12);
    assert_eq!(Rgba::from_hex("#0f08").unwrap().a, 136.0 / 255.0);
}

#[test]
fn rejects_malformed_hex() {
    assert!(Rgba::from_hex("ff0000").is_err());
    assert!(Rgba::from_hex("#ff00").is_ok());
    assert!(Rgba::from_hex("#ff000").is_err());
    assert!(Rgba::from_hex("#gg0000").is_err());
}

#[test]
fn named_colors_are_case_insensitive() {
    assert_eq!(Rgba::from_name("Gray"), Rgba::from_name("gray"));
    assert_eq!(
        Rgba::from_name("white").unwrap(),
        Rgba::new(255.0, 255.0, 255.0, 1.0)
    );
    assert!(Rgba::from_name("not-a-color").is_none());
}

#[test]
fn unit_conversion_round_trips() {
    let c = Rgba::new(51.0, 102.0, 204.0, 0.5);
    assert_eq!(Rgba::from_unit(c.to_unit()), c);
}
