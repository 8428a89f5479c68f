//! Hit-testing: what sits under a document-space point.
//!
//! The layering contract mirrors draw order, topmost first: line handles and
//! strokes, then text elements, then (on held sections only) region zones,
//! then section chrome — resize handle, column boundaries, grid cells — and
//! finally the image or fixed-content body. A held section offers only its
//! region zones; everything else on it is locked.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::collections::HashMap;

use crate::annotation::{LineAnnotation, LineId, LineType, TextId};
use crate::consts::{HANDLE_RADIUS_PX, LINE_HIT_STROKE_PX, RESIZE_HANDLE_BAND_PX};
use crate::doc::DocStore;
use crate::geometry::{point_segment_distance, quadratic_point, Point, Rect};
use crate::region::{region_at, ClothingRegion};
use crate::section::SectionId;

/// Which part of a section was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// The transformable image of a hero/image section.
    ImageBody,
    /// The bottom-edge resize handle band.
    ResizeHandle,
    /// A line annotation hotspot.
    Line { id: LineId, handle: LineHandle },
    /// A free-floating text element.
    Text { id: TextId },
    /// A grid cell, by row-major index.
    Cell { index: usize },
    /// The boundary between grid columns `boundary` and `boundary + 1`.
    ColumnBoundary { boundary: usize },
    /// A clothing-region zone on a held section, by cache index.
    Region { index: usize },
    /// Anything else inside the section box.
    SectionBody,
}

/// Which hotspot of a line annotation a pointer event addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineHandle {
    /// The start-endpoint handle; moves only `(x1, y1)`.
    Start,
    /// The end-endpoint handle; moves only `(x2, y2)`.
    End,
    /// The stroke itself; moves both endpoints identically.
    Whole,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub section_id: SectionId,
    pub part: HitPart,
}

/// Test what sits under `pt`. `regions` is the per-section cache of
/// sanitized clothing regions; it is only consulted for held sections.
#[must_use]
pub fn hit_test(
    doc: &DocStore,
    regions: &HashMap<SectionId, Vec<ClothingRegion>>,
    pt: Point,
) -> Option<Hit> {
    let section_id = doc.section_at_point(pt)?;
    let rect = doc.section_rect(&section_id)?;
    let section = doc.section(&section_id)?;

    if section.held {
        let part = regions
            .get(&section_id)
            .and_then(|cached| region_at(cached, rect, pt))
            .map_or(HitPart::SectionBody, |index| HitPart::Region { index });
        return Some(Hit { section_id, part });
    }

    let local = Point::new(pt.x - rect.x, pt.y - rect.y);

    // Annotations sit above everything; later ids draw on top.
    let lines = doc.lines_for_section(&section_id);
    for line in lines.iter().rev() {
        if let Some(handle) = line_hotspot(line, local) {
            return Some(Hit { section_id, part: HitPart::Line { id: line.id, handle } });
        }
    }
    for text in doc.texts_for_section(&section_id).iter().rev() {
        let (w, h) = text.approx_size();
        let text_box = Rect::new(text.left, text.top, w, h);
        if text_box.contains(local) {
            return Some(Hit { section_id, part: HitPart::Text { id: text.id } });
        }
    }

    if local.y >= rect.height - RESIZE_HANDLE_BAND_PX {
        return Some(Hit { section_id, part: HitPart::ResizeHandle });
    }

    if let Some(grid) = doc.grid(&section_id) {
        if let Some(boundary) = grid.column_boundary_at(rect, pt) {
            return Some(Hit { section_id, part: HitPart::ColumnBoundary { boundary } });
        }
        if let Some(index) = grid.cell_at(rect, pt) {
            return Some(Hit { section_id, part: HitPart::Cell { index } });
        }
    }

    let part = if section.kind.is_image_bearing() {
        HitPart::ImageBody
    } else {
        HitPart::SectionBody
    };
    Some(Hit { section_id, part })
}

/// Which hotspot of a line (if any) lies under a section-local point.
/// Endpoint handles win over the stroke; the stroke uses an oversized
/// invisible hit path so thin lines stay grabbable.
#[must_use]
pub fn line_hotspot(line: &LineAnnotation, local: Point) -> Option<LineHandle> {
    let start = line.start();
    let end = line.end();
    if distance(local, start) <= HANDLE_RADIUS_PX {
        return Some(LineHandle::Start);
    }
    if distance(local, end) <= HANDLE_RADIUS_PX {
        return Some(LineHandle::End);
    }
    let slop = line.stroke_width.max(LINE_HIT_STROKE_PX) / 2.0;
    if stroke_distance(line, local) <= slop {
        return Some(LineHandle::Whole);
    }
    None
}

fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Shortest distance from a point to the line's rendered path.
fn stroke_distance(line: &LineAnnotation, pt: Point) -> f64 {
    match line.line_type {
        LineType::Straight => point_segment_distance(pt, line.start(), line.end()),
        LineType::Curved => {
            // Flatten the quadratic into short chords and take the nearest.
            const SAMPLES: usize = 16;
            let control = line.control_point();
            let mut best = f64::INFINITY;
            let mut prev = line.start();
            for i in 1..=SAMPLES {
                let t = i as f64 / SAMPLES as f64;
                let next = quadratic_point(line.start(), control, line.end(), t);
                best = best.min(point_segment_distance(pt, prev, next));
                prev = next;
            }
            best
        }
        LineType::Angled => {
            let pts = line.elbow_waypoints();
            pts.windows(2)
                .map(|pair| point_segment_distance(pt, pair[0], pair[1]))
                .fold(f64::INFINITY, f64::min)
        }
    }
}
