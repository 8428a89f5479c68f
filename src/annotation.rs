//! Line and text annotations attached to sections.
//!
//! Coordinates are section-local CSS pixels: `(0, 0)` is the top-left corner
//! of the owning section's rendered box. Annotations belong to exactly one
//! section and cascade-delete with it.

#[cfg(test)]
#[path = "annotation_test.rs"]
mod annotation_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::CURVE_CONTROL_LIFT_PX;
use crate::geometry::Point;
use crate::section::SectionId;

/// Unique identifier for a line annotation.
pub type LineId = Uuid;

/// Unique identifier for a text element.
pub type TextId = Uuid;

/// Curve family of a line annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    /// Single straight segment between the endpoints.
    Straight,
    /// Quadratic curve; control point 50px above the segment midpoint.
    Curved,
    /// Perpendicular elbow routed through the horizontal midpoint.
    Angled,
}

/// Endpoint decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnd {
    #[default]
    None,
    Arrow,
}

/// Stroke cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// A free-form vector line attached to one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAnnotation {
    pub id: LineId,
    pub section_id: SectionId,
    pub line_type: LineType,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    /// CSS color string.
    pub stroke_color: String,
    pub line_cap: LineCap,
    pub line_end: LineEnd,
}

impl LineAnnotation {
    /// A default-styled straight line between two section-local points.
    #[must_use]
    pub fn new(section_id: SectionId, start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            section_id,
            line_type: LineType::Straight,
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            stroke_width: 2.0,
            stroke_color: "#1F1A17".to_owned(),
            line_cap: LineCap::Round,
            line_end: LineEnd::None,
        }
    }

    #[must_use]
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    #[must_use]
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Move both endpoints by the same delta (whole-line drag).
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x1 += dx;
        self.y1 += dy;
        self.x2 += dx;
        self.y2 += dy;
    }

    /// Move only the start endpoint.
    pub fn move_start(&mut self, dx: f64, dy: f64) {
        self.x1 += dx;
        self.y1 += dy;
    }

    /// Move only the end endpoint.
    pub fn move_end(&mut self, dx: f64, dy: f64) {
        self.x2 += dx;
        self.y2 += dy;
    }

    /// Control point for the [`LineType::Curved`] rendering: the segment
    /// midpoint lifted up by a fixed offset.
    #[must_use]
    pub fn control_point(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0 - CURVE_CONTROL_LIFT_PX)
    }

    /// Waypoints for the [`LineType::Angled`] rendering: perpendicular
    /// segments meeting at the horizontal midpoint between the endpoints.
    #[must_use]
    pub fn elbow_waypoints(&self) -> [Point; 4] {
        let mx = (self.x1 + self.x2) / 2.0;
        [
            Point::new(self.x1, self.y1),
            Point::new(mx, self.y1),
            Point::new(mx, self.y2),
            Point::new(self.x2, self.y2),
        ]
    }
}

/// Horizontal alignment of a text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A free-floating label attached to one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub id: TextId,
    pub section_id: SectionId,
    /// Offset from the section's top edge, in section-local pixels.
    pub top: f64,
    /// Offset from the section's left edge, in section-local pixels.
    pub left: f64,
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    /// CSS color string.
    pub color: String,
    /// CSS font weight (400, 700, ...).
    pub font_weight: u16,
    pub text_align: TextAlign,
}

impl TextElement {
    /// A default-styled text element at a section-local position.
    #[must_use]
    pub fn new(section_id: SectionId, top: f64, left: f64, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            section_id,
            top,
            left,
            content: content.into(),
            font_size: 16.0,
            font_family: "sans-serif".to_owned(),
            color: "#1F1A17".to_owned(),
            font_weight: 400,
            text_align: TextAlign::Left,
        }
    }

    /// Nominal bounding box used for hit-testing. Real text metrics live in
    /// the canvas context; this approximation is good enough for grabbing.
    #[must_use]
    pub fn approx_size(&self) -> (f64, f64) {
        let width = self.content.chars().count() as f64 * self.font_size * 0.6;
        (width.max(self.font_size), self.font_size * 1.2)
    }
}
