//! Top-level engine: input handlers, collaborator entry points, and the
//! [`Action`] boundary back to the host.
//!
//! `EngineCore` holds all logic with no browser dependency so it can be
//! tested on the host; `Engine` wraps it with the bound canvas element and
//! the decoded-image registry used by the renderer. Input handlers return
//! `Vec<Action>`: an empty vec means the event was not consumed (the host
//! lets it propagate — e.g. the page scrolls), while [`Action::None`] marks
//! an event that was swallowed without changing anything (the wheel over a
//! held-but-editable section).

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, HtmlImageElement};

use crate::annotation::{LineAnnotation, LineId, TextElement, TextId};
use crate::consts::{
    COLUMN_DRAG_PX_PER_FR, MAX_CELL_SCALE, MAX_SECTION_SCALE, MIN_CELL_SCALE, MIN_SECTION_HEIGHT,
    MIN_SECTION_SCALE,
};
use crate::doc::{DocStore, Snapshot, SnapshotError};
use crate::geometry::Point;
use crate::grid::GridCell;
use crate::hit::{hit_test, Hit, HitPart, LineHandle};
use crate::input::{Button, DragState, Key, Modifiers, WheelDelta};
use crate::region::ClothingRegion;
use crate::render;
use crate::section::{FilterPreset, ImageRef, Section, SectionId, SectionKind, SectionStatus};
use crate::transform::Transform;
use crate::visibility::VisibilityTracker;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Failure of an in-flight image edit, reported by the host when the
/// synthesis collaborator settles. The engine only needs it to restore the
/// section's prior state; user-facing messaging is the caller's job.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// The collaborator rejected or failed the edit.
    #[error("image edit rejected: {0}")]
    Rejected(String),
    /// The host abandoned the request before it settled.
    #[error("image edit aborted by the host")]
    Aborted,
}

/// Content dropped onto the document.
#[derive(Debug, Clone)]
pub enum DropPayload {
    /// An internal product image the host has already decoded.
    Product(ImageRef),
    /// A raw OS file. The engine routes it; the host decodes it and calls
    /// back with the resulting [`ImageRef`].
    File { name: String, mime: String },
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// Event consumed, nothing changed.
    None,
    /// The scene must be repainted.
    RenderNeeded,
    /// The host should change the pointer cursor.
    SetCursor(String),
    /// A section transform was written through.
    TransformChanged { section_id: SectionId, transform: Transform },
    /// A section height was written through.
    HeightChanged { section_id: SectionId, height: f64 },
    /// Grid column fractions changed.
    ColumnWidthsChanged { section_id: SectionId, widths: Vec<f64> },
    /// One grid cell changed (content or transform).
    CellChanged { section_id: SectionId, index: usize, cell: GridCell },
    /// A line annotation changed.
    LineChanged(LineAnnotation),
    /// A line annotation was deleted.
    LineDeleted { id: LineId },
    /// A text element changed.
    TextChanged(TextElement),
    /// A section record changed (image, status, flags).
    SectionChanged(Section),
    /// The user clicked an empty image slot; the host should open a picker.
    UploadRequested { section_id: SectionId, cell: Option<usize> },
    /// A section was held with no cached regions; the host should call the
    /// vision collaborator and report back via `set_regions`.
    RegionsRequested { section_id: SectionId },
    /// Right-click on a region: the host should open a color picker at the
    /// given screen position.
    RegionColorChangeRequested { section_id: SectionId, region_index: usize, screen: Point },
    /// Content was dropped on a region: the host should run the garment
    /// replacement flow.
    ReplaceClothingRequested { section_id: SectionId, region_index: usize, payload: DropPayload },
    /// A raw file was dropped on a section or cell; the host decodes it and
    /// calls `on_image_loaded` / `set_cell_image` with the result.
    FileDropped { section_id: SectionId, cell: Option<usize>, name: String, mime: String },
    /// The section centered in the viewport changed.
    ActiveSectionChanged { section_id: Option<SectionId> },
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from [`Engine`] so it can be tested without WASM/browser
/// dependencies.
pub struct EngineCore {
    pub doc: DocStore,
    pub drag: DragState,
    /// Document-wide edit toggle. A section is also editable when its own
    /// force-edit flag is set.
    pub edit_mode: bool,
    /// The exclusively selected line annotation, if any.
    pub selected_line: Option<LineId>,
    /// Session cache of sanitized regions, keyed by section. Present-but-
    /// empty means "asked, collaborator found nothing" — not refetched.
    pub regions: HashMap<SectionId, Vec<ClothingRegion>>,
    /// Region currently under the idle pointer, for the hover label.
    pub hovered_region: Option<(SectionId, usize)>,
    pub visibility: VisibilityTracker,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub scroll_y: f64,
    pub dpr: f64,
    cursor: String,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: DocStore::default(),
            drag: DragState::Idle,
            edit_mode: false,
            selected_line: None,
            regions: HashMap::new(),
            hovered_region: None,
            visibility: VisibilityTracker::new(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            scroll_y: 0.0,
            dpr: 1.0,
            cursor: "default".to_owned(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas-relative screen point to document space (adds vertical scroll).
    #[must_use]
    fn to_doc(&self, screen: Point) -> Point {
        Point::new(screen.x, screen.y + self.scroll_y)
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    /// Report a new scroll offset; emits a change when the centered section
    /// moved.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Vec<Action> {
        self.scroll_y = scroll_y;
        match self.visibility.update(&self.doc, scroll_y, self.viewport_height) {
            Some(section_id) => vec![Action::ActiveSectionChanged { section_id }],
            None => Vec::new(),
        }
    }

    // --- Document edits driven by the host UI ---

    /// Append a section and return its id.
    pub fn add_section(&mut self, kind: SectionKind) -> SectionId {
        self.doc.add_section(kind)
    }

    /// Delete a section. Cascades its transform, height, grid, annotations,
    /// cached regions, and any selection/capture that pointed at it.
    pub fn remove_section(&mut self, id: &SectionId) -> Option<Section> {
        // Resolve annotation-owned captures while the doc still holds them.
        self.release_capture_on(id);
        let removed = self.doc.remove_section(id)?;
        self.regions.remove(id);
        if self.selected_line.is_some_and(|line_id| self.doc.line(&line_id).is_none()) {
            self.selected_line = None;
        }
        if self.hovered_region.is_some_and(|(sid, _)| sid == *id) {
            self.hovered_region = None;
        }
        Some(removed)
    }

    /// Enable/disable the document-wide edit toggle.
    pub fn set_edit_mode(&mut self, on: bool) {
        self.edit_mode = on;
        if !on {
            self.drag = DragState::Idle;
        }
    }

    /// Make exactly one section locally editable (or none), independent of
    /// the document-wide toggle.
    pub fn set_force_edit(&mut self, id: Option<SectionId>) -> Vec<Action> {
        let mut changed = false;
        for sid in self.doc.order().to_vec() {
            let want = Some(sid) == id;
            if let Some(section) = self.doc.section_mut(&sid) {
                if section.selected != want {
                    section.selected = want;
                    changed = true;
                }
            }
        }
        if changed { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Lock a section for AI-assisted region edits. Fetches regions once per
    /// section per session.
    pub fn hold_section(&mut self, id: &SectionId) -> Vec<Action> {
        let Some(section) = self.doc.section_mut(id) else {
            return Vec::new();
        };
        if section.held {
            return Vec::new();
        }
        section.held = true;
        let snapshot = section.clone();
        self.release_capture_on(id);
        let mut actions = vec![Action::SectionChanged(snapshot)];
        if !self.regions.contains_key(id) {
            actions.push(Action::RegionsRequested { section_id: *id });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Unlock a held section.
    pub fn release_section(&mut self, id: &SectionId) -> Vec<Action> {
        let Some(section) = self.doc.section_mut(id) else {
            return Vec::new();
        };
        if !section.held {
            return Vec::new();
        }
        section.held = false;
        let snapshot = section.clone();
        if self.hovered_region.is_some_and(|(sid, _)| sid == *id) {
            self.hovered_region = None;
        }
        vec![Action::SectionChanged(snapshot), Action::RenderNeeded]
    }

    /// Toggle the render-time horizontal mirror.
    pub fn toggle_flip(&mut self, id: &SectionId) -> Vec<Action> {
        let Some(section) = self.doc.section_mut(id) else {
            return Vec::new();
        };
        section.flipped = !section.flipped;
        vec![Action::SectionChanged(section.clone()), Action::RenderNeeded]
    }

    /// Apply a render-time filter preset.
    pub fn set_filter(&mut self, id: &SectionId, filter: FilterPreset) -> Vec<Action> {
        let Some(section) = self.doc.section_mut(id) else {
            return Vec::new();
        };
        if section.filter == filter {
            return Vec::new();
        }
        section.filter = filter;
        vec![Action::SectionChanged(section.clone()), Action::RenderNeeded]
    }

    /// Explicit reset of a section transform back to identity.
    pub fn reset_transform(&mut self, id: &SectionId) -> Vec<Action> {
        if self.doc.section(id).is_none() {
            return Vec::new();
        }
        self.doc.reset_transform(id);
        vec![
            Action::TransformChanged { section_id: *id, transform: Transform::identity() },
            Action::RenderNeeded,
        ]
    }

    /// Per-cell reset button: restore a grid cell transform to identity.
    pub fn reset_cell_transform(&mut self, id: &SectionId, index: usize) -> Vec<Action> {
        let Some(grid) = self.doc.grid_mut(id) else {
            return Vec::new();
        };
        if !grid.reset_cell_transform(index) {
            return Vec::new();
        }
        let cell = grid.cells[index].clone();
        vec![Action::CellChanged { section_id: *id, index, cell }, Action::RenderNeeded]
    }

    /// Install a decoded image into a grid cell (after a file drop round-trip
    /// through the host decoder, or an internal product pick).
    pub fn set_cell_image(&mut self, id: &SectionId, index: usize, image: ImageRef) -> Vec<Action> {
        let Some(grid) = self.doc.grid_mut(id) else {
            return Vec::new();
        };
        if !grid.set_cell_image(index, image) {
            return Vec::new();
        }
        let cell = grid.cells[index].clone();
        vec![Action::CellChanged { section_id: *id, index, cell }, Action::RenderNeeded]
    }

    /// Add a line annotation to a section. Returns the stored record.
    pub fn add_line(&mut self, section_id: SectionId, start: Point, end: Point) -> Option<LineAnnotation> {
        self.doc.section(&section_id)?;
        let line = LineAnnotation::new(section_id, start, end);
        let id = self.doc.add_line(line);
        self.doc.line(&id).cloned()
    }

    /// Add a text element to a section. Returns the stored record.
    pub fn add_text(&mut self, section_id: SectionId, top: f64, left: f64, content: &str) -> Option<TextElement> {
        self.doc.section(&section_id)?;
        let text = TextElement::new(section_id, top, left, content);
        let id = self.doc.add_text(text);
        self.doc.text(&id).cloned()
    }

    // --- Image lifecycle ---

    /// The host decoded a section image. First decode also derives the
    /// section height from the image aspect ratio.
    pub fn on_image_loaded(&mut self, id: &SectionId, image: ImageRef) -> Vec<Action> {
        let height_before = self.doc.explicit_height(id);
        if !self.doc.apply_decoded_image(id, image) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if let Some(section) = self.doc.section(id) {
            actions.push(Action::SectionChanged(section.clone()));
        }
        if let Some(height) = self.doc.explicit_height(id) {
            if height_before != Some(height) {
                actions.push(Action::HeightChanged { section_id: *id, height });
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The host failed to decode a section image. The section stays a
    /// placeholder; a broken image never blocks the rest of the document.
    pub fn on_image_failed(&mut self, id: &SectionId) -> Vec<Action> {
        log::warn!("image decode failed for section {id}; leaving placeholder");
        Vec::new()
    }

    // --- Collaborators ---

    /// Mark a section as processing while an async edit is in flight.
    /// Refused when the section is unknown or already processing.
    pub fn begin_edit(&mut self, id: &SectionId) -> Vec<Action> {
        let Some(section) = self.doc.section_mut(id) else {
            return Vec::new();
        };
        if section.status == SectionStatus::Processing {
            return Vec::new();
        }
        section.status = SectionStatus::Processing;
        let snapshot = section.clone();
        self.release_capture_on(id);
        vec![Action::SectionChanged(snapshot), Action::RenderNeeded]
    }

    /// Settle an in-flight edit. The processing flag is always cleared on
    /// both arms so a section can never be stuck locked; on failure the
    /// section returns to its prior state and the failure is only logged —
    /// user-facing messaging belongs to the caller.
    pub fn finish_edit(&mut self, id: &SectionId, result: Result<ImageRef, EditError>) -> Vec<Action> {
        let Some(section) = self.doc.section_mut(id) else {
            return Vec::new();
        };
        match result {
            Ok(image) => {
                self.doc.apply_decoded_image(id, image);
            }
            Err(err) => {
                log::warn!("image edit failed for section {id}: {err}");
                section.status = section.settled_status();
            }
        }
        let mut actions = Vec::new();
        if let Some(section) = self.doc.section(id) {
            actions.push(Action::SectionChanged(section.clone()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Store regions from the vision collaborator for a section.
    /// Out-of-range bounds are clamped; empty boxes are dropped with a
    /// warning. An empty result is cached too — "no regions" is an answer.
    pub fn set_regions(&mut self, id: &SectionId, raw: Vec<ClothingRegion>) -> Vec<Action> {
        if self.doc.section(id).is_none() {
            return Vec::new();
        }
        let total = raw.len();
        let clean: Vec<ClothingRegion> = raw.into_iter().filter_map(ClothingRegion::sanitized).collect();
        if clean.len() < total {
            log::warn!("dropped {} degenerate region(s) for section {id}", total - clean.len());
        }
        self.regions.insert(*id, clean);
        if self.doc.section(id).is_some_and(|s| s.held) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Cached, sanitized regions for a section, if any were ever fetched.
    #[must_use]
    pub fn regions_for(&self, id: &SectionId) -> Option<&[ClothingRegion]> {
        self.regions.get(id).map(Vec::as_slice)
    }

    // --- Input events ---

    /// Pointer-down. Secondary button only triggers region color-change
    /// requests; primary begins a capture. A pointer-down while something is
    /// already captured replaces the capture — last down wins.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let pt = self.to_doc(screen);
        if button == Button::Secondary {
            if let Some(Hit { section_id, part: HitPart::Region { index } }) =
                hit_test(&self.doc, &self.regions, pt)
            {
                return vec![Action::RegionColorChangeRequested {
                    section_id,
                    region_index: index,
                    screen,
                }];
            }
            return Vec::new();
        }
        if button != Button::Primary {
            return Vec::new();
        }

        // Last pointer-down wins: replace any in-flight capture.
        self.drag = DragState::Idle;

        let Some(hit) = hit_test(&self.doc, &self.regions, pt) else {
            return self.clear_line_selection();
        };

        if let HitPart::Line { id, handle } = hit.part {
            return self.begin_line_drag(id, handle, screen);
        }

        let mut actions = self.clear_line_selection();
        actions.extend(self.begin_section_gesture(hit, screen, pt));
        actions
    }

    fn begin_line_drag(&mut self, id: LineId, handle: LineHandle, screen: Point) -> Vec<Action> {
        let Some(line) = self.doc.line(&id) else {
            return Vec::new();
        };
        if self.section_is_processing(&line.section_id) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.selected_line != Some(id) {
            self.selected_line = Some(id);
            actions.push(Action::RenderNeeded);
        }
        self.drag = DragState::DraggingLine {
            line_id: id,
            handle,
            start_screen: screen,
            initial: (line.x1, line.y1, line.x2, line.y2),
        };
        actions
    }

    fn begin_section_gesture(&mut self, hit: Hit, screen: Point, _pt: Point) -> Vec<Action> {
        let section_id = hit.section_id;
        if self.section_is_processing(&section_id) {
            return Vec::new();
        }
        match hit.part {
            HitPart::Text { id } => {
                if let Some(text) = self.doc.text(&id) {
                    self.drag = DragState::DraggingText {
                        text_id: id,
                        start_screen: screen,
                        initial_top: text.top,
                        initial_left: text.left,
                    };
                }
                Vec::new()
            }
            HitPart::ResizeHandle => {
                self.drag = DragState::ResizingSection {
                    section_id,
                    start_y: screen.y,
                    start_height: self.doc.effective_height(&section_id),
                };
                Vec::new()
            }
            HitPart::ColumnBoundary { boundary } => {
                if let Some(grid) = self.doc.grid(&section_id) {
                    self.drag = DragState::ResizingColumn {
                        section_id,
                        boundary,
                        start_x: screen.x,
                        initial_widths: grid.column_widths.clone(),
                    };
                }
                Vec::new()
            }
            HitPart::Cell { index } => self.begin_cell_gesture(section_id, index, screen),
            HitPart::ImageBody => self.begin_image_gesture(section_id, screen),
            HitPart::Line { .. } | HitPart::Region { .. } | HitPart::SectionBody => Vec::new(),
        }
    }

    fn begin_cell_gesture(&mut self, section_id: SectionId, index: usize, screen: Point) -> Vec<Action> {
        let editable = self.doc.section(&section_id).is_some_and(|s| s.is_editable(self.edit_mode));
        let Some(grid) = self.doc.grid(&section_id) else {
            return Vec::new();
        };
        let Some(cell) = grid.cell(index) else {
            return Vec::new();
        };
        if cell.image.is_none() {
            // Click-to-upload on an empty cell.
            return vec![Action::UploadRequested { section_id, cell: Some(index) }];
        }
        if editable {
            self.drag = DragState::PanningCell {
                section_id,
                cell: index,
                start_screen: screen,
                initial: cell.transform,
            };
        }
        Vec::new()
    }

    fn begin_image_gesture(&mut self, section_id: SectionId, screen: Point) -> Vec<Action> {
        let Some(section) = self.doc.section(&section_id) else {
            return Vec::new();
        };
        if section.image.is_none() {
            return vec![Action::UploadRequested { section_id, cell: None }];
        }
        if section.is_interactive(self.edit_mode) {
            self.drag = DragState::PanningImage {
                section_id,
                start_screen: screen,
                initial: self.doc.transform(&section_id),
            };
        }
        Vec::new()
    }

    /// Pointer-move. Applies the active gesture's delta math, or updates
    /// hover state when idle. Hosts register this on the window so drags
    /// survive the pointer leaving the original element.
    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        match self.drag.clone() {
            DragState::Idle => self.update_hover(screen),
            DragState::PanningImage { section_id, start_screen, initial } => {
                let transform = initial
                    .panned_to(initial.x + (screen.x - start_screen.x), initial.y + (screen.y - start_screen.y));
                self.doc.set_transform(section_id, transform);
                vec![Action::TransformChanged { section_id, transform }, Action::RenderNeeded]
            }
            DragState::ResizingSection { section_id, start_y, start_height } => {
                let height = (start_height + (screen.y - start_y)).max(MIN_SECTION_HEIGHT);
                self.doc.set_height(section_id, height);
                vec![Action::HeightChanged { section_id, height }, Action::RenderNeeded]
            }
            DragState::DraggingLine { line_id, handle, start_screen, initial } => {
                let dx = screen.x - start_screen.x;
                let dy = screen.y - start_screen.y;
                let Some(line) = self.doc.line_mut(&line_id) else {
                    self.drag = DragState::Idle;
                    return Vec::new();
                };
                let (x1, y1, x2, y2) = initial;
                match handle {
                    LineHandle::Start => {
                        line.x1 = x1 + dx;
                        line.y1 = y1 + dy;
                    }
                    LineHandle::End => {
                        line.x2 = x2 + dx;
                        line.y2 = y2 + dy;
                    }
                    LineHandle::Whole => {
                        line.x1 = x1 + dx;
                        line.y1 = y1 + dy;
                        line.x2 = x2 + dx;
                        line.y2 = y2 + dy;
                    }
                }
                vec![Action::LineChanged(line.clone()), Action::RenderNeeded]
            }
            DragState::DraggingText { text_id, start_screen, initial_top, initial_left } => {
                let dx = screen.x - start_screen.x;
                let dy = screen.y - start_screen.y;
                let Some(text) = self.doc.text_mut(&text_id) else {
                    self.drag = DragState::Idle;
                    return Vec::new();
                };
                text.left = initial_left + dx;
                text.top = initial_top + dy;
                vec![Action::TextChanged(text.clone()), Action::RenderNeeded]
            }
            DragState::PanningCell { section_id, cell, start_screen, initial } => {
                let transform = initial
                    .panned_to(initial.x + (screen.x - start_screen.x), initial.y + (screen.y - start_screen.y));
                let Some(grid) = self.doc.grid_mut(&section_id) else {
                    self.drag = DragState::Idle;
                    return Vec::new();
                };
                let Some(slot) = grid.cell_mut(cell) else {
                    self.drag = DragState::Idle;
                    return Vec::new();
                };
                slot.transform = transform;
                let snapshot = slot.clone();
                vec![Action::CellChanged { section_id, index: cell, cell: snapshot }, Action::RenderNeeded]
            }
            DragState::ResizingColumn { section_id, boundary, start_x, initial_widths } => {
                let delta_fr = (screen.x - start_x) / COLUMN_DRAG_PX_PER_FR;
                let Some(grid) = self.doc.grid_mut(&section_id) else {
                    self.drag = DragState::Idle;
                    return Vec::new();
                };
                if !grid.apply_column_drag(boundary, &initial_widths, delta_fr) {
                    self.drag = DragState::Idle;
                    return Vec::new();
                }
                let widths = grid.column_widths.clone();
                vec![Action::ColumnWidthsChanged { section_id, widths }, Action::RenderNeeded]
            }
        }
    }

    /// Pointer-up (or pointer-leave at the window level): release capture.
    /// The last written value of the gesture is final; nothing else moves.
    pub fn on_pointer_up(&mut self, _screen: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.drag.is_idle() {
            return Vec::new();
        }
        self.drag = DragState::Idle;
        self.set_cursor("default")
    }

    /// Wheel over the document. Over an editable section the event is
    /// always swallowed (so the page never scrolls underneath), but a held
    /// or processing section swallows without zooming.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let pt = self.to_doc(screen);
        let Some(section_id) = self.doc.section_at_point(pt) else {
            return Vec::new();
        };
        let Some(section) = self.doc.section(&section_id) else {
            return Vec::new();
        };
        if !section.is_editable(self.edit_mode) {
            return Vec::new();
        }
        if section.held || section.status == SectionStatus::Processing {
            return vec![Action::None];
        }

        if self.doc.grid(&section_id).is_some() {
            return self.wheel_on_grid(section_id, pt, delta);
        }

        if section.kind.is_image_bearing() && section.image.is_some() {
            let current = self.doc.transform(&section_id);
            let next = current.zoom_stepped(delta.dy, MIN_SECTION_SCALE, MAX_SECTION_SCALE);
            if next == current {
                return vec![Action::None];
            }
            self.doc.set_transform(section_id, next);
            return vec![Action::TransformChanged { section_id, transform: next }, Action::RenderNeeded];
        }
        vec![Action::None]
    }

    fn wheel_on_grid(&mut self, section_id: SectionId, pt: Point, delta: WheelDelta) -> Vec<Action> {
        let Some(rect) = self.doc.section_rect(&section_id) else {
            return vec![Action::None];
        };
        let Some(grid) = self.doc.grid_mut(&section_id) else {
            return vec![Action::None];
        };
        let Some(index) = grid.cell_at(rect, pt) else {
            return vec![Action::None];
        };
        let Some(cell) = grid.cell_mut(index) else {
            return vec![Action::None];
        };
        if cell.image.is_none() {
            return vec![Action::None];
        }
        let next = cell.transform.zoom_stepped(delta.dy, MIN_CELL_SCALE, MAX_CELL_SCALE);
        if next == cell.transform {
            return vec![Action::None];
        }
        cell.transform = next;
        let snapshot = cell.clone();
        vec![Action::CellChanged { section_id, index, cell: snapshot }, Action::RenderNeeded]
    }

    /// Keyboard input. `Delete`/`Backspace` removes the selected line —
    /// refused while any drag is captured, so a deletion can never race the
    /// gesture that is mutating the same line. `Escape` only deselects.
    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Delete" | "Backspace" => {
                let Some(id) = self.selected_line else {
                    return Vec::new();
                };
                if !self.drag.is_idle() {
                    return Vec::new();
                }
                if self.doc.remove_line(&id).is_none() {
                    self.selected_line = None;
                    return Vec::new();
                }
                self.selected_line = None;
                vec![Action::LineDeleted { id }, Action::RenderNeeded]
            }
            "Escape" => self.clear_line_selection(),
            _ => Vec::new(),
        }
    }

    /// Drop routing: regions on held sections take the garment-replacement
    /// path; grid cells and image sections take the populate/replace path.
    /// Raw files bounce back to the host for decoding.
    pub fn on_drop(&mut self, screen: Point, payload: DropPayload) -> Vec<Action> {
        let pt = self.to_doc(screen);
        let Some(hit) = hit_test(&self.doc, &self.regions, pt) else {
            return Vec::new();
        };
        let section_id = hit.section_id;
        match hit.part {
            HitPart::Region { index } => {
                vec![Action::ReplaceClothingRequested { section_id, region_index: index, payload }]
            }
            HitPart::Cell { index } => {
                if self.section_is_processing(&section_id) {
                    return Vec::new();
                }
                match payload {
                    DropPayload::Product(image) => self.set_cell_image(&section_id, index, image),
                    DropPayload::File { name, mime } => {
                        vec![Action::FileDropped { section_id, cell: Some(index), name, mime }]
                    }
                }
            }
            HitPart::ImageBody => {
                if self.section_is_processing(&section_id) {
                    return Vec::new();
                }
                match payload {
                    DropPayload::Product(image) => self.on_image_loaded(&section_id, image),
                    DropPayload::File { name, mime } => {
                        vec![Action::FileDropped { section_id, cell: None, name, mime }]
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    // --- Snapshots ---

    /// Capture the full persistable document state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.doc.snapshot()
    }

    /// Replace the document from a snapshot, resetting all transient state.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the snapshot is internally
    /// inconsistent; the engine is left unchanged.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        self.doc.load_snapshot(snapshot)?;
        self.drag = DragState::Idle;
        self.selected_line = None;
        self.regions.clear();
        self.hovered_region = None;
        self.visibility = VisibilityTracker::new();
        Ok(())
    }

    // --- Queries ---

    /// The exclusively selected line, if any.
    #[must_use]
    pub fn selection(&self) -> Option<LineId> {
        self.selected_line
    }

    /// The section currently centered in the viewport, if any.
    #[must_use]
    pub fn active_section(&self) -> Option<SectionId> {
        self.visibility.current()
    }

    // --- Internals ---

    fn section_is_processing(&self, id: &SectionId) -> bool {
        self.doc.section(id).is_some_and(|s| s.status == SectionStatus::Processing)
    }

    fn clear_line_selection(&mut self) -> Vec<Action> {
        if self.selected_line.take().is_some() {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    fn release_capture_on(&mut self, id: &SectionId) {
        let captured = match &self.drag {
            DragState::PanningImage { section_id, .. }
            | DragState::ResizingSection { section_id, .. }
            | DragState::PanningCell { section_id, .. }
            | DragState::ResizingColumn { section_id, .. } => Some(*section_id),
            DragState::DraggingLine { line_id, .. } => self.doc.line(line_id).map(|l| l.section_id),
            DragState::DraggingText { text_id, .. } => self.doc.text(text_id).map(|t| t.section_id),
            DragState::Idle => None,
        };
        if captured == Some(*id) {
            self.drag = DragState::Idle;
        }
    }

    fn set_cursor(&mut self, cursor: &str) -> Vec<Action> {
        if self.cursor == cursor {
            return Vec::new();
        }
        self.cursor = cursor.to_owned();
        vec![Action::SetCursor(cursor.to_owned())]
    }

    fn update_hover(&mut self, screen: Point) -> Vec<Action> {
        let pt = self.to_doc(screen);
        let hit = hit_test(&self.doc, &self.regions, pt);
        let hovered = match hit {
            Some(Hit { section_id, part: HitPart::Region { index } }) => Some((section_id, index)),
            _ => None,
        };
        let mut actions = Vec::new();
        if hovered != self.hovered_region {
            self.hovered_region = hovered;
            actions.push(Action::RenderNeeded);
        }
        let cursor = match hit.map(|h| h.part) {
            Some(HitPart::ResizeHandle) => "ns-resize",
            Some(HitPart::ColumnBoundary { .. }) => "col-resize",
            Some(HitPart::Line { .. } | HitPart::Text { .. }) => "move",
            Some(HitPart::Region { .. }) => "pointer",
            Some(HitPart::ImageBody | HitPart::Cell { .. }) => {
                let editable = hit
                    .and_then(|h| self.doc.section(&h.section_id))
                    .is_some_and(|s| s.is_interactive(self.edit_mode));
                if editable { "grab" } else { "default" }
            }
            _ => "default",
        };
        actions.extend(self.set_cursor(cursor));
        actions
    }
}

/// The full engine. Wraps [`EngineCore`] and owns the browser canvas element
/// plus the registry of decoded images the renderer draws from.
pub struct Engine {
    canvas: HtmlCanvasElement,
    images: HashMap<uuid::Uuid, HtmlImageElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, images: HashMap::new(), core: EngineCore::new() }
    }

    /// Register a decoded image element under its [`ImageRef`] id so the
    /// renderer can draw it.
    pub fn register_image(&mut self, id: uuid::Uuid, element: HtmlImageElement) {
        self.images.insert(id, element);
    }

    /// Drop a decoded image element from the registry.
    pub fn unregister_image(&mut self, id: &uuid::Uuid) {
        self.images.remove(id);
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the 2D context is unavailable or a canvas call
    /// fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()?;
        render::draw(&ctx, &self.core, &self.images)
    }
}
