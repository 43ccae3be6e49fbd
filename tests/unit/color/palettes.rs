use super::*;

#[test]
fn lookup_is_case_insensitive() {
    assert_eq!(named_palette("PRISM").map(|p| p.name), Some("prism"));
    assert_eq!(named_palette("Sunset").map(|p| p.name), Some("sunset"));
    assert!(named_palette("nope").is_none());
}

#[test]
fn qualitative_sub_palette_keeps_trailing_neutral() {
    let sub = PRISM.sub_palette(3).unwrap().unwrap();
    assert_eq!(sub.len(), 4);
    assert_eq!(sub[0], Rgba::from_hex("#5F4690").unwrap());
    assert_eq!(sub[3], Rgba::from_hex("#666666").unwrap());

    assert!(PRISM.sub_palette(1).unwrap().is_none());
    assert!(PRISM.sub_palette(12).unwrap().is_none());
    assert_eq!(PRISM.longest_sub_palette().unwrap().len(), 12);
}

#[test]
fn quantitative_sub_palettes_by_class_count() {
    assert_eq!(SUNSET.sub_palette(2).unwrap().unwrap().len(), 2);
    assert_eq!(SUNSET.sub_palette(5).unwrap().unwrap().len(), 5);
    assert!(SUNSET.sub_palette(9).unwrap().is_none());
    assert_eq!(SUNSET.sub_palette_or_longest(Some(9)).unwrap().len(), 7);
    assert_eq!(BURG.sub_palette_or_longest(Some(3)).unwrap().len(), 7);
    assert_eq!(EMRLD.sub_palette_or_longest(None).unwrap().len(), 7);
}

#[test]
fn tones() {
    assert!(BOLD.is_qualitative());
    assert!(VIVID.is_qualitative());
    assert_eq!(BURG.tone(), PaletteTone::Quantitative);
}
