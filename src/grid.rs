//! Grid sub-layout: `cols × rows` cells with fractional column widths.
//!
//! Columns behave like CSS `fr` units — each column gets
//! `width · fraction / Σ fractions` of the section width — and rows are
//! equal shares of the section height. Each populated cell carries its own
//! pan/zoom [`Transform`], independent of the section transform.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Serialize};

use crate::consts::{COLUMN_BOUNDARY_SLOP_PX, MIN_COLUMN_FR};
use crate::geometry::{Point, Rect};
use crate::section::ImageRef;
use crate::transform::Transform;

/// One cell of a grid section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Cell content; `None` renders as a click-to-upload placeholder.
    pub image: Option<ImageRef>,
    pub transform: Transform,
}

/// Sub-layout for one grid section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
    /// Grid height in pixels, used as the owning section's default height.
    pub height: f64,
    /// Row-major, `cols × rows` entries.
    pub cells: Vec<GridCell>,
    /// Relative column widths (fr units), `cols` entries, all `1.0` by default.
    pub column_widths: Vec<f64>,
}

impl GridLayout {
    /// A grid of empty cells with equal columns.
    #[must_use]
    pub fn new(cols: usize, rows: usize, height: f64) -> Self {
        Self {
            cols,
            rows,
            height,
            cells: vec![GridCell::default(); cols * rows],
            column_widths: vec![1.0; cols],
        }
    }

    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut GridCell> {
        self.cells.get_mut(index)
    }

    /// Populate or replace a cell's image, resetting its transform.
    /// Returns false if the index is out of range.
    pub fn set_cell_image(&mut self, index: usize, image: ImageRef) -> bool {
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        cell.image = Some(image);
        cell.transform = Transform::identity();
        true
    }

    /// Restore a cell's transform to identity. Returns false if out of range.
    pub fn reset_cell_transform(&mut self, index: usize) -> bool {
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        cell.transform = Transform::identity();
        true
    }

    /// Apply a column-boundary drag. `boundary` separates columns
    /// `boundary` and `boundary + 1`; `initial` is the widths vector
    /// captured at pointer-down and `delta_fr` the drag distance converted
    /// to fractional units. The two neighbors trade space; every other
    /// column keeps its captured width. Each side is floored at the minimum
    /// fraction independently, so a drag past the floor can drift the total
    /// width slightly — preserved source behavior, not renormalized.
    pub fn apply_column_drag(&mut self, boundary: usize, initial: &[f64], delta_fr: f64) -> bool {
        if boundary + 1 >= self.cols || initial.len() != self.cols || self.column_widths.len() != self.cols {
            return false;
        }
        self.column_widths.clone_from_slice(initial);
        self.column_widths[boundary] = (initial[boundary] + delta_fr).max(MIN_COLUMN_FR);
        self.column_widths[boundary + 1] = (initial[boundary + 1] - delta_fr).max(MIN_COLUMN_FR);
        true
    }

    /// Pixel rects of all cells, row-major, laid out inside `section_rect`.
    #[must_use]
    pub fn cell_rects(&self, section_rect: Rect) -> Vec<Rect> {
        let total_fr: f64 = self.column_widths.iter().sum();
        if self.cols == 0 || self.rows == 0 || self.column_widths.len() != self.cols || total_fr <= 0.0 {
            return Vec::new();
        }
        let row_height = section_rect.height / self.rows as f64;
        let mut rects = Vec::with_capacity(self.cols * self.rows);
        for row in 0..self.rows {
            let mut x = section_rect.x;
            for col in 0..self.cols {
                let width = section_rect.width * self.column_widths[col] / total_fr;
                rects.push(Rect::new(x, section_rect.y + row as f64 * row_height, width, row_height));
                x += width;
            }
        }
        rects
    }

    /// Index of the cell under `pt`, if any.
    #[must_use]
    pub fn cell_at(&self, section_rect: Rect, pt: Point) -> Option<usize> {
        self.cell_rects(section_rect).iter().position(|r| r.contains(pt))
    }

    /// Index of the column boundary under `pt` (with horizontal slop), if
    /// any. Boundary `i` sits between columns `i` and `i + 1`.
    #[must_use]
    pub fn column_boundary_at(&self, section_rect: Rect, pt: Point) -> Option<usize> {
        if !section_rect.contains(pt) || self.cols < 2 || self.column_widths.len() != self.cols {
            return None;
        }
        let total_fr: f64 = self.column_widths.iter().sum();
        if total_fr <= 0.0 {
            return None;
        }
        let mut x = section_rect.x;
        for boundary in 0..self.cols - 1 {
            x += section_rect.width * self.column_widths[boundary] / total_fr;
            if (pt.x - x).abs() <= COLUMN_BOUNDARY_SLOP_PX {
                return Some(boundary);
            }
        }
        None
    }
}
