//! Geometry primitives and the percent ↔ pixel conversion boundary.
//!
//! Clothing regions arrive in percentage space (0–100 of their section box)
//! while everything else in the engine works in document pixels. This module
//! is the only place that converts between the two: [`to_pixel_rect`]
//! resolves a [`PercentRect`] against a concrete container [`Rect`], so no
//! other component ever silently assumes a unit.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in screen or document space, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in document space, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `pt` lies inside this rect (edges inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    /// Center point of the rect.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the rect has zero (or negative) area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A rectangle expressed in percentages (0–100) of some container box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PercentRect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Clamp this rect so that `0 ≤ x, y` and `x + width ≤ 100`,
    /// `y + height ≤ 100`. Vision collaborators occasionally return
    /// out-of-range boxes; they are clamped, never trusted.
    #[must_use]
    pub fn clamped(self) -> Self {
        let x = self.x.clamp(0.0, 100.0);
        let y = self.y.clamp(0.0, 100.0);
        let width = self.width.clamp(0.0, 100.0 - x);
        let height = self.height.clamp(0.0, 100.0 - y);
        Self { x, y, width, height }
    }

    /// Whether the rect covers no area at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Resolve a percentage rect against the current rendered box of its
/// container. Percentages are relative to the container's size, not the
/// natural image size, so overlays stay aligned under pan/zoom/resize.
#[must_use]
pub fn to_pixel_rect(container: Rect, pct: PercentRect) -> Rect {
    Rect {
        x: container.x + container.width * pct.x / 100.0,
        y: container.y + container.height * pct.y / 100.0,
        width: container.width * pct.width / 100.0,
        height: container.height * pct.height / 100.0,
    }
}

/// Shortest distance from `pt` to the segment `a`–`b`.
#[must_use]
pub fn point_segment_distance(pt: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return ((pt.x - a.x).powi(2) + (pt.y - a.y).powi(2)).sqrt();
    }
    let t = (((pt.x - a.x) * abx + (pt.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    let px = a.x + t * abx;
    let py = a.y + t * aby;
    ((pt.x - px).powi(2) + (pt.y - py).powi(2)).sqrt()
}

/// Point on the quadratic Bézier `a` → `b` with control `c`, at parameter `t`.
#[must_use]
pub fn quadratic_point(a: Point, c: Point, b: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point {
        x: u * u * a.x + 2.0 * u * t * c.x + t * t * b.x,
        y: u * u * a.y + 2.0 * u * t * c.y + t * t * b.y,
    }
}
