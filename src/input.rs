//! Input model: buttons, modifier keys, wheel deltas, and the drag-capture
//! state machine.
//!
//! `DragState` is the single active gesture tracked between pointer-down and
//! pointer-up. Exactly one variant is live at a time, which is what makes the
//! six drag interactions (image pan, section resize, line drag, text drag,
//! cell pan, column resize) mutually exclusive: capture is the enum, not a
//! set of flags. Each variant carries whatever start conditions its
//! pointer-move math needs.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::annotation::{LineId, TextId};
use crate::geometry::Point;
use crate::hit::LineHandle;
use crate::section::SectionId;
use crate::transform::Transform;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A keyboard key, holding the browser-reported key name
/// (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// The active pointer gesture.
#[derive(Debug, Clone)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// Panning a section image.
    PanningImage {
        section_id: SectionId,
        /// Screen position at pointer-down.
        start_screen: Point,
        /// Transform captured at pointer-down; pan deltas add to its x/y.
        initial: Transform,
    },
    /// Dragging a section's bottom-edge resize handle.
    ResizingSection {
        section_id: SectionId,
        start_y: f64,
        start_height: f64,
    },
    /// Dragging a line annotation by one of its hotspots.
    DraggingLine {
        line_id: LineId,
        handle: LineHandle,
        start_screen: Point,
        /// `(x1, y1, x2, y2)` captured at pointer-down.
        initial: (f64, f64, f64, f64),
    },
    /// Dragging a free-floating text element.
    DraggingText {
        text_id: TextId,
        start_screen: Point,
        initial_top: f64,
        initial_left: f64,
    },
    /// Panning the image inside one grid cell.
    PanningCell {
        section_id: SectionId,
        cell: usize,
        start_screen: Point,
        initial: Transform,
    },
    /// Dragging the boundary between two grid columns.
    ResizingColumn {
        section_id: SectionId,
        /// Boundary index: between columns `boundary` and `boundary + 1`.
        boundary: usize,
        start_x: f64,
        /// Column widths captured at pointer-down.
        initial_widths: Vec<f64>,
    },
}

impl DragState {
    /// Whether no gesture is captured.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl Default for DragState {
    fn default() -> Self {
        Self::Idle
    }
}
