#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- Point / Rect basics ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn rect_contains_inside_and_edges() {
    let r = Rect::new(10.0, 20.0, 100.0, 50.0);
    assert!(r.contains(Point::new(60.0, 45.0)));
    assert!(r.contains(Point::new(10.0, 20.0)));
    assert!(r.contains(Point::new(110.0, 70.0)));
}

#[test]
fn rect_contains_excludes_outside() {
    let r = Rect::new(10.0, 20.0, 100.0, 50.0);
    assert!(!r.contains(Point::new(9.9, 45.0)));
    assert!(!r.contains(Point::new(60.0, 70.1)));
}

#[test]
fn rect_center() {
    let r = Rect::new(0.0, 0.0, 100.0, 60.0);
    assert_eq!(r.center(), Point::new(50.0, 30.0));
}

#[test]
fn rect_degenerate() {
    assert!(Rect::new(0.0, 0.0, 0.0, 50.0).is_degenerate());
    assert!(Rect::new(0.0, 0.0, 50.0, 0.0).is_degenerate());
    assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
}

// --- PercentRect clamping ---

#[test]
fn percent_rect_in_range_is_untouched() {
    let pct = PercentRect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(pct.clamped(), pct);
}

#[test]
fn percent_rect_oversized_width_is_clamped_to_fit() {
    let pct = PercentRect::new(10.0, 0.0, 150.0, 50.0).clamped();
    assert_eq!(pct.x, 10.0);
    assert_eq!(pct.width, 90.0);
}

#[test]
fn percent_rect_negative_origin_is_clamped_to_zero() {
    let pct = PercentRect::new(-5.0, -10.0, 50.0, 50.0).clamped();
    assert_eq!(pct.x, 0.0);
    assert_eq!(pct.y, 0.0);
}

#[test]
fn percent_rect_clamped_never_exceeds_box() {
    let pct = PercentRect::new(80.0, 90.0, 40.0, 40.0).clamped();
    assert!(pct.x + pct.width <= 100.0);
    assert!(pct.y + pct.height <= 100.0);
}

#[test]
fn percent_rect_empty_after_clamp() {
    let pct = PercentRect::new(100.0, 0.0, 20.0, 50.0).clamped();
    assert!(pct.is_empty());
}

// --- to_pixel_rect ---

#[test]
fn to_pixel_rect_resolves_against_container() {
    let container = Rect::new(0.0, 100.0, 400.0, 200.0);
    let px = to_pixel_rect(container, PercentRect::new(25.0, 50.0, 50.0, 25.0));
    assert_eq!(px, Rect::new(100.0, 200.0, 200.0, 50.0));
}

#[test]
fn to_pixel_rect_tracks_container_offset() {
    let pct = PercentRect::new(0.0, 0.0, 100.0, 100.0);
    let px = to_pixel_rect(Rect::new(30.0, 60.0, 10.0, 10.0), pct);
    assert_eq!(px, Rect::new(30.0, 60.0, 10.0, 10.0));
}

#[test]
fn to_pixel_rect_scales_with_container_size() {
    let pct = PercentRect::new(10.0, 10.0, 20.0, 20.0);
    let small = to_pixel_rect(Rect::new(0.0, 0.0, 100.0, 100.0), pct);
    let large = to_pixel_rect(Rect::new(0.0, 0.0, 200.0, 200.0), pct);
    assert_eq!(large.width, small.width * 2.0);
    assert_eq!(large.x, small.x * 2.0);
}

// --- point_segment_distance ---

#[test]
fn segment_distance_perpendicular_foot() {
    let d = point_segment_distance(Point::new(5.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert!(approx_eq(d, 3.0));
}

#[test]
fn segment_distance_beyond_endpoint_uses_endpoint() {
    let d = point_segment_distance(Point::new(14.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert!(approx_eq(d, 5.0));
}

#[test]
fn segment_distance_degenerate_segment() {
    let d = point_segment_distance(Point::new(3.0, 4.0), Point::new(0.0, 0.0), Point::new(0.0, 0.0));
    assert!(approx_eq(d, 5.0));
}

// --- quadratic_point ---

#[test]
fn quadratic_point_hits_endpoints_at_extremes() {
    let a = Point::new(0.0, 0.0);
    let c = Point::new(50.0, -50.0);
    let b = Point::new(100.0, 0.0);
    assert_eq!(quadratic_point(a, c, b, 0.0), a);
    assert_eq!(quadratic_point(a, c, b, 1.0), b);
}

#[test]
fn quadratic_point_midpoint_pulls_toward_control() {
    let a = Point::new(0.0, 0.0);
    let c = Point::new(50.0, -50.0);
    let b = Point::new(100.0, 0.0);
    let mid = quadratic_point(a, c, b, 0.5);
    assert!(approx_eq(mid.x, 50.0));
    assert!(approx_eq(mid.y, -25.0));
}
