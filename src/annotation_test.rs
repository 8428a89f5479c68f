#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> LineAnnotation {
    LineAnnotation::new(Uuid::new_v4(), Point::new(x1, y1), Point::new(x2, y2))
}

// =============================================================
// LineAnnotation geometry
// =============================================================

#[test]
fn new_line_defaults() {
    let l = line(0.0, 0.0, 100.0, 50.0);
    assert_eq!(l.line_type, LineType::Straight);
    assert_eq!(l.line_end, LineEnd::None);
    assert_eq!(l.line_cap, LineCap::Round);
    assert_eq!(l.stroke_width, 2.0);
}

#[test]
fn translate_moves_both_endpoints_identically() {
    let mut l = line(10.0, 20.0, 110.0, 70.0);
    l.translate(5.0, -3.0);
    assert_eq!((l.x1, l.y1), (15.0, 17.0));
    assert_eq!((l.x2, l.y2), (115.0, 67.0));
}

#[test]
fn move_start_leaves_end_untouched() {
    let mut l = line(10.0, 20.0, 110.0, 70.0);
    l.move_start(7.0, 8.0);
    assert_eq!((l.x1, l.y1), (17.0, 28.0));
    assert_eq!((l.x2, l.y2), (110.0, 70.0));
}

#[test]
fn move_end_leaves_start_untouched() {
    let mut l = line(10.0, 20.0, 110.0, 70.0);
    l.move_end(-4.0, 6.0);
    assert_eq!((l.x1, l.y1), (10.0, 20.0));
    assert_eq!((l.x2, l.y2), (106.0, 76.0));
}

#[test]
fn control_point_is_midpoint_lifted_fifty_px() {
    let l = line(0.0, 100.0, 100.0, 100.0);
    let c = l.control_point();
    assert_eq!(c.x, 50.0);
    assert_eq!(c.y, 50.0);
}

#[test]
fn control_point_tracks_endpoints() {
    let mut l = line(0.0, 100.0, 100.0, 100.0);
    l.translate(10.0, 10.0);
    let c = l.control_point();
    assert_eq!(c.x, 60.0);
    assert_eq!(c.y, 60.0);
}

#[test]
fn elbow_waypoints_route_through_horizontal_midpoint() {
    let l = line(0.0, 0.0, 100.0, 80.0);
    let pts = l.elbow_waypoints();
    assert_eq!(pts[0], Point::new(0.0, 0.0));
    assert_eq!(pts[1], Point::new(50.0, 0.0));
    assert_eq!(pts[2], Point::new(50.0, 80.0));
    assert_eq!(pts[3], Point::new(100.0, 80.0));
}

#[test]
fn line_serde_round_trip() {
    let mut l = line(1.0, 2.0, 3.0, 4.0);
    l.line_type = LineType::Curved;
    l.line_end = LineEnd::Arrow;
    let json = serde_json::to_string(&l).unwrap();
    let back: LineAnnotation = serde_json::from_str(&json).unwrap();
    assert_eq!(back, l);
}

#[test]
fn line_type_serde_is_lowercase() {
    assert_eq!(serde_json::to_string(&LineType::Angled).unwrap(), "\"angled\"");
    let t: LineType = serde_json::from_str("\"curved\"").unwrap();
    assert_eq!(t, LineType::Curved);
}

// =============================================================
// TextElement
// =============================================================

#[test]
fn new_text_defaults() {
    let t = TextElement::new(Uuid::new_v4(), 40.0, 12.0, "Sale");
    assert_eq!(t.top, 40.0);
    assert_eq!(t.left, 12.0);
    assert_eq!(t.content, "Sale");
    assert_eq!(t.font_weight, 400);
    assert_eq!(t.text_align, TextAlign::Left);
}

#[test]
fn approx_size_grows_with_content() {
    let section = Uuid::new_v4();
    let short = TextElement::new(section, 0.0, 0.0, "ab").approx_size();
    let long = TextElement::new(section, 0.0, 0.0, "abcdefgh").approx_size();
    assert!(long.0 > short.0);
    assert_eq!(long.1, short.1);
}

#[test]
fn approx_size_never_collapses() {
    let t = TextElement::new(Uuid::new_v4(), 0.0, 0.0, "");
    let (w, h) = t.approx_size();
    assert!(w > 0.0);
    assert!(h > 0.0);
}

#[test]
fn text_serde_round_trip() {
    let t = TextElement::new(Uuid::new_v4(), 5.0, 6.0, "100% cotton");
    let json = serde_json::to_string(&t).unwrap();
    let back: TextElement = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
}
