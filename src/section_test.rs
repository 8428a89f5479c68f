use super::*;

fn image(w: f64, h: f64) -> ImageRef {
    ImageRef { id: Uuid::new_v4(), src: "blob:test".to_owned(), natural_w: w, natural_h: h }
}

// =============================================================
// SectionKind
// =============================================================

#[test]
fn image_bearing_kinds() {
    assert!(SectionKind::Hero.is_image_bearing());
    assert!(SectionKind::Image.is_image_bearing());
    assert!(!SectionKind::Grid.is_image_bearing());
    assert!(!SectionKind::SizeGuide.is_image_bearing());
    assert!(!SectionKind::AsInfo.is_image_bearing());
    assert!(!SectionKind::Precautions.is_image_bearing());
}

#[test]
fn fixed_kinds_have_distinct_default_heights() {
    assert!(SectionKind::SizeGuide.default_height() > 0.0);
    assert!(SectionKind::AsInfo.default_height() > 0.0);
    assert!(SectionKind::Precautions.default_height() > 0.0);
}

#[test]
fn kind_serde_uses_camel_case() {
    assert_eq!(serde_json::to_string(&SectionKind::SizeGuide).unwrap(), "\"sizeGuide\"");
    assert_eq!(serde_json::to_string(&SectionKind::AsInfo).unwrap(), "\"asInfo\"");
    let kind: SectionKind = serde_json::from_str("\"hero\"").unwrap();
    assert_eq!(kind, SectionKind::Hero);
}

// =============================================================
// Section flags and lifecycle
// =============================================================

#[test]
fn new_section_is_placeholder_with_no_flags() {
    let s = Section::new(SectionKind::Image);
    assert_eq!(s.status, SectionStatus::Placeholder);
    assert!(s.image.is_none());
    assert!(!s.held);
    assert!(!s.selected);
    assert!(!s.flipped);
    assert_eq!(s.filter, FilterPreset::None);
}

#[test]
fn editable_via_global_toggle() {
    let s = Section::new(SectionKind::Image);
    assert!(s.is_editable(true));
    assert!(!s.is_editable(false));
}

#[test]
fn editable_via_force_edit_flag() {
    let mut s = Section::new(SectionKind::Image);
    s.selected = true;
    assert!(s.is_editable(false));
}

#[test]
fn held_section_is_editable_but_not_interactive() {
    let mut s = Section::new(SectionKind::Image);
    s.held = true;
    assert!(s.is_editable(true));
    assert!(!s.is_interactive(true));
}

#[test]
fn processing_section_is_not_interactive() {
    let mut s = Section::new(SectionKind::Image);
    s.status = SectionStatus::Processing;
    assert!(!s.is_interactive(true));
}

#[test]
fn settled_status_follows_image_presence() {
    let mut s = Section::new(SectionKind::Image);
    assert_eq!(s.settled_status(), SectionStatus::Placeholder);
    s.image = Some(image(100.0, 100.0));
    assert_eq!(s.settled_status(), SectionStatus::Populated);
}

// =============================================================
// FilterPreset
// =============================================================

#[test]
fn filter_none_has_no_css() {
    assert!(FilterPreset::None.css().is_none());
}

#[test]
fn filter_presets_have_css_strings() {
    for preset in [
        FilterPreset::Grayscale,
        FilterPreset::Sepia,
        FilterPreset::Warm,
        FilterPreset::Cool,
        FilterPreset::Contrast,
    ] {
        assert!(preset.css().is_some());
    }
}
