//! Document model: the ordered section list and every keyed sub-store.
//!
//! `DocStore` owns all persisted state — sections in order, per-section
//! transforms and explicit heights, grid layouts, and line/text annotations
//! — each as an independent map keyed by id. The engine mutates these maps
//! through the input handlers; the renderer reads them back in list order.
//! Transient interaction state (the active drag) lives in the engine, not
//! here.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::annotation::{LineAnnotation, LineId, TextElement, TextId};
use crate::consts::{DEFAULT_DOCUMENT_WIDTH, MIN_SECTION_HEIGHT, PLACEHOLDER_HEIGHT};
use crate::grid::GridLayout;
use crate::section::{ImageRef, Section, SectionId, SectionKind, SectionStatus};
use crate::geometry::{Point, Rect};
use crate::transform::Transform;

/// Snapshot load/validation failures.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot text was not valid JSON for the snapshot shape.
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The order list names a section that has no record.
    #[error("snapshot order references unknown section {0}")]
    UnknownSection(SectionId),
    /// An annotation points at a section that does not exist.
    #[error("{kind} annotation {id} references unknown section {section_id}")]
    DanglingAnnotation {
        kind: &'static str,
        id: uuid::Uuid,
        section_id: SectionId,
    },
    /// A grid layout's vectors disagree with its declared shape.
    #[error(
        "grid for section {section_id} is {cols}x{rows} but carries {cells} cell(s) and {columns} column width(s)"
    )]
    MalformedGrid {
        section_id: SectionId,
        cols: usize,
        rows: usize,
        cells: usize,
        columns: usize,
    },
}

/// The full serializable document state for the persistence boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub document_width: f64,
    pub order: Vec<SectionId>,
    pub sections: Vec<Section>,
    pub transforms: HashMap<SectionId, Transform>,
    pub heights: HashMap<SectionId, f64>,
    pub grids: HashMap<SectionId, GridLayout>,
    pub lines: Vec<LineAnnotation>,
    pub texts: Vec<TextElement>,
}

impl Snapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] when the text is not a snapshot.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// In-memory store of the composed document.
pub struct DocStore {
    document_width: f64,
    order: Vec<SectionId>,
    sections: HashMap<SectionId, Section>,
    transforms: HashMap<SectionId, Transform>,
    heights: HashMap<SectionId, f64>,
    grids: HashMap<SectionId, GridLayout>,
    lines: HashMap<LineId, LineAnnotation>,
    texts: HashMap<TextId, TextElement>,
}

impl DocStore {
    /// Create an empty document of the given width.
    #[must_use]
    pub fn new(document_width: f64) -> Self {
        Self {
            document_width,
            order: Vec::new(),
            sections: HashMap::new(),
            transforms: HashMap::new(),
            heights: HashMap::new(),
            grids: HashMap::new(),
            lines: HashMap::new(),
            texts: HashMap::new(),
        }
    }

    #[must_use]
    pub fn document_width(&self) -> f64 {
        self.document_width
    }

    pub fn set_document_width(&mut self, width: f64) {
        if width > 0.0 {
            self.document_width = width;
        }
    }

    // --- Sections ---

    /// Append a new section of the given kind and return its id. Grid
    /// sections get a default 2×2 layout.
    pub fn add_section(&mut self, kind: SectionKind) -> SectionId {
        let section = Section::new(kind);
        let id = section.id;
        if kind == SectionKind::Grid {
            self.grids.insert(id, GridLayout::new(2, 2, PLACEHOLDER_HEIGHT));
        }
        self.sections.insert(id, section);
        self.order.push(id);
        id
    }

    /// Remove a section and every record keyed by it: transform, height,
    /// grid layout, and all line/text annotations owned by it. Annotations
    /// of other sections are untouched.
    pub fn remove_section(&mut self, id: &SectionId) -> Option<Section> {
        let section = self.sections.remove(id)?;
        self.order.retain(|other| other != id);
        self.transforms.remove(id);
        self.heights.remove(id);
        self.grids.remove(id);
        self.lines.retain(|_, line| line.section_id != *id);
        self.texts.retain(|_, text| text.section_id != *id);
        Some(section)
    }

    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.get(id)
    }

    pub fn section_mut(&mut self, id: &SectionId) -> Option<&mut Section> {
        self.sections.get_mut(id)
    }

    /// Section ids in render order.
    #[must_use]
    pub fn order(&self) -> &[SectionId] {
        &self.order
    }

    /// Replace the render order. The new order must be a permutation of the
    /// current one; anything else is ignored (ordering is owned by the
    /// caller, validity is owned here).
    pub fn set_order(&mut self, order: Vec<SectionId>) -> bool {
        if order.len() != self.order.len() || !order.iter().all(|id| self.sections.contains_key(id)) {
            return false;
        }
        self.order = order;
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // --- Transforms ---

    /// The section's transform; identity if it has never been touched.
    #[must_use]
    pub fn transform(&self, id: &SectionId) -> Transform {
        self.transforms.get(id).copied().unwrap_or_default()
    }

    pub fn set_transform(&mut self, id: SectionId, transform: Transform) {
        self.transforms.insert(id, transform);
    }

    /// Restore a section's transform to identity.
    pub fn reset_transform(&mut self, id: &SectionId) {
        self.transforms.remove(id);
    }

    // --- Heights ---

    /// Explicit height override, if one has been set.
    #[must_use]
    pub fn explicit_height(&self, id: &SectionId) -> Option<f64> {
        self.heights.get(id).copied()
    }

    /// Set an explicit section height, floored at the minimum.
    pub fn set_height(&mut self, id: SectionId, height: f64) {
        self.heights.insert(id, height.max(MIN_SECTION_HEIGHT));
    }

    /// The height a section renders at: explicit override first, then the
    /// grid's own height for grid sections, then the kind default.
    #[must_use]
    pub fn effective_height(&self, id: &SectionId) -> f64 {
        if let Some(height) = self.heights.get(id) {
            return *height;
        }
        if let Some(grid) = self.grids.get(id) {
            return grid.height;
        }
        self.sections.get(id).map_or(PLACEHOLDER_HEIGHT, |s| s.kind.default_height())
    }

    // --- Image lifecycle ---

    /// Record a successful image decode: the section becomes populated and,
    /// if it never had an explicit height, gets one derived from the image
    /// aspect ratio. Zero-dimension images skip the height derivation
    /// rather than producing a non-finite height.
    pub fn apply_decoded_image(&mut self, id: &SectionId, image: ImageRef) -> bool {
        let Some(section) = self.sections.get_mut(id) else {
            return false;
        };
        if !self.heights.contains_key(id) && image.natural_w > 0.0 && image.natural_h > 0.0 {
            let derived = self.document_width * image.natural_h / image.natural_w;
            self.heights.insert(*id, derived.max(MIN_SECTION_HEIGHT));
        }
        section.image = Some(image);
        section.status = SectionStatus::Populated;
        true
    }

    // --- Grids ---

    #[must_use]
    pub fn grid(&self, id: &SectionId) -> Option<&GridLayout> {
        self.grids.get(id)
    }

    pub fn grid_mut(&mut self, id: &SectionId) -> Option<&mut GridLayout> {
        self.grids.get_mut(id)
    }

    /// Install or replace a grid layout for a section.
    pub fn set_grid(&mut self, id: SectionId, grid: GridLayout) {
        self.grids.insert(id, grid);
    }

    // --- Annotations ---

    pub fn add_line(&mut self, line: LineAnnotation) -> LineId {
        let id = line.id;
        self.lines.insert(id, line);
        id
    }

    pub fn remove_line(&mut self, id: &LineId) -> Option<LineAnnotation> {
        self.lines.remove(id)
    }

    #[must_use]
    pub fn line(&self, id: &LineId) -> Option<&LineAnnotation> {
        self.lines.get(id)
    }

    pub fn line_mut(&mut self, id: &LineId) -> Option<&mut LineAnnotation> {
        self.lines.get_mut(id)
    }

    /// Lines owned by a section, in a stable id order.
    #[must_use]
    pub fn lines_for_section(&self, id: &SectionId) -> Vec<&LineAnnotation> {
        let mut lines: Vec<&LineAnnotation> = self.lines.values().filter(|l| l.section_id == *id).collect();
        lines.sort_by_key(|l| l.id);
        lines
    }

    pub fn add_text(&mut self, text: TextElement) -> TextId {
        let id = text.id;
        self.texts.insert(id, text);
        id
    }

    pub fn remove_text(&mut self, id: &TextId) -> Option<TextElement> {
        self.texts.remove(id)
    }

    #[must_use]
    pub fn text(&self, id: &TextId) -> Option<&TextElement> {
        self.texts.get(id)
    }

    pub fn text_mut(&mut self, id: &TextId) -> Option<&mut TextElement> {
        self.texts.get_mut(id)
    }

    /// Text elements owned by a section, in a stable id order.
    #[must_use]
    pub fn texts_for_section(&self, id: &SectionId) -> Vec<&TextElement> {
        let mut texts: Vec<&TextElement> = self.texts.values().filter(|t| t.section_id == *id).collect();
        texts.sort_by_key(|t| t.id);
        texts
    }

    // --- Layout ---

    /// The rendered document-space rect of a section: full document width,
    /// stacked vertically in list order.
    #[must_use]
    pub fn section_rect(&self, id: &SectionId) -> Option<Rect> {
        let mut y = 0.0;
        for other in &self.order {
            let height = self.effective_height(other);
            if other == id {
                return Some(Rect::new(0.0, y, self.document_width, height));
            }
            y += height;
        }
        None
    }

    /// The section whose rect contains `pt`, if any.
    #[must_use]
    pub fn section_at_point(&self, pt: Point) -> Option<SectionId> {
        if pt.x < 0.0 || pt.x > self.document_width {
            return None;
        }
        let mut y = 0.0;
        for id in &self.order {
            let height = self.effective_height(id);
            if pt.y >= y && pt.y < y + height {
                return Some(*id);
            }
            y += height;
        }
        None
    }

    /// Total stacked height of the document.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.order.iter().map(|id| self.effective_height(id)).sum()
    }

    // --- Snapshots ---

    /// Capture the full persistable state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let sections = self.order.iter().filter_map(|id| self.sections.get(id)).cloned().collect();
        let mut lines: Vec<LineAnnotation> = self.lines.values().cloned().collect();
        lines.sort_by_key(|l| l.id);
        let mut texts: Vec<TextElement> = self.texts.values().cloned().collect();
        texts.sort_by_key(|t| t.id);
        Snapshot {
            document_width: self.document_width,
            order: self.order.clone(),
            sections,
            transforms: self.transforms.clone(),
            heights: self.heights.clone(),
            grids: self.grids.clone(),
            lines,
            texts,
        }
    }

    /// Replace the whole document from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the order names a section without a
    /// record, an annotation dangles, or a grid's vectors do not match its
    /// declared shape; the store is left unchanged.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let sections: HashMap<SectionId, Section> =
            snapshot.sections.into_iter().map(|s| (s.id, s)).collect();
        for id in &snapshot.order {
            if !sections.contains_key(id) {
                return Err(SnapshotError::UnknownSection(*id));
            }
        }
        for line in &snapshot.lines {
            if !sections.contains_key(&line.section_id) {
                return Err(SnapshotError::DanglingAnnotation {
                    kind: "line",
                    id: line.id,
                    section_id: line.section_id,
                });
            }
        }
        for text in &snapshot.texts {
            if !sections.contains_key(&text.section_id) {
                return Err(SnapshotError::DanglingAnnotation {
                    kind: "text",
                    id: text.id,
                    section_id: text.section_id,
                });
            }
        }
        // Grid vectors must match their declared shape; the layout walk
        // indexes by `cols` and `cols * rows`.
        for (id, grid) in &snapshot.grids {
            if grid.cells.len() != grid.cols * grid.rows || grid.column_widths.len() != grid.cols {
                return Err(SnapshotError::MalformedGrid {
                    section_id: *id,
                    cols: grid.cols,
                    rows: grid.rows,
                    cells: grid.cells.len(),
                    columns: grid.column_widths.len(),
                });
            }
        }
        self.document_width = snapshot.document_width;
        self.order = snapshot.order;
        self.sections = sections;
        self.transforms = snapshot.transforms;
        self.heights = snapshot.heights;
        self.grids = snapshot.grids;
        self.lines = snapshot.lines.into_iter().map(|l| (l.id, l)).collect();
        self.texts = snapshot.texts.into_iter().map(|t| (t.id, t)).collect();
        Ok(())
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT_WIDTH)
    }
}
