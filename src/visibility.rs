//! Centered-section tracking for the external navigation UI.
//!
//! The host reports scroll offsets; the tracker resolves which section's
//! rect contains the viewport centerline and reports transitions only, so
//! navigation chrome is not re-rendered on every scroll tick.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use crate::doc::DocStore;
use crate::geometry::Point;
use crate::section::SectionId;

/// Tracks which section is currently centered in the viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityTracker {
    current: Option<SectionId>,
}

impl VisibilityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The section last reported as centered, if any.
    #[must_use]
    pub fn current(&self) -> Option<SectionId> {
        self.current
    }

    /// Recompute against the document. Returns `Some(new_value)` when the
    /// centered section changed (including to/from none), `None` otherwise.
    pub fn update(&mut self, doc: &DocStore, scroll_y: f64, viewport_height: f64) -> Option<Option<SectionId>> {
        let centerline = Point::new(doc.document_width() / 2.0, scroll_y + viewport_height / 2.0);
        let centered = doc.section_at_point(centerline);
        if centered == self.current {
            return None;
        }
        self.current = centered;
        Some(centered)
    }
}
