//! Section types: document units, their kinds, flags, and image lifecycle.

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{AS_INFO_HEIGHT, PLACEHOLDER_HEIGHT, PRECAUTIONS_HEIGHT, SIZE_GUIDE_HEIGHT};

/// Unique identifier for a section.
pub type SectionId = Uuid;

/// The kind of a document section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    /// Top-of-page hero image with overlaid copy.
    Hero,
    /// Fixed size-guide table block.
    SizeGuide,
    /// Fixed after-sales info block.
    AsInfo,
    /// Fixed washing/handling precautions block.
    Precautions,
    /// Multi-cell image grid with fractional columns.
    Grid,
    /// Plain full-width image.
    Image,
}

impl SectionKind {
    /// Whether sections of this kind hold a single transformable image.
    #[must_use]
    pub fn is_image_bearing(self) -> bool {
        matches!(self, Self::Hero | Self::Image)
    }

    /// Default pixel height for sections that have no image-derived or
    /// explicitly resized height yet.
    #[must_use]
    pub fn default_height(self) -> f64 {
        match self {
            Self::SizeGuide => SIZE_GUIDE_HEIGHT,
            Self::AsInfo => AS_INFO_HEIGHT,
            Self::Precautions => PRECAUTIONS_HEIGHT,
            Self::Hero | Self::Grid | Self::Image => PLACEHOLDER_HEIGHT,
        }
    }
}

/// Lifecycle status of a section's content.
///
/// `Placeholder → Populated` happens on successful image decode.
/// `Processing` is entered while an async edit is in flight and always
/// cleared when the edit settles, success or failure; the state it returns
/// to is derived from whether the section holds an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    Placeholder,
    Populated,
    Processing,
}

/// Render-time filter applied to a section image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPreset {
    #[default]
    None,
    Grayscale,
    Sepia,
    Warm,
    Cool,
    Contrast,
}

impl FilterPreset {
    /// CSS filter string for the canvas context, or `None` for no filter.
    #[must_use]
    pub fn css(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Grayscale => Some("grayscale(1)"),
            Self::Sepia => Some("sepia(0.8)"),
            Self::Warm => Some("sepia(0.3) saturate(1.3)"),
            Self::Cool => Some("hue-rotate(15deg) saturate(0.9)"),
            Self::Contrast => Some("contrast(1.25)"),
        }
    }
}

/// Opaque handle to a decoded image. The engine never touches pixels; the
/// host decodes and reports natural dimensions through this handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: Uuid,
    /// Source URL or object-URL the host decoded this image from.
    pub src: String,
    pub natural_w: f64,
    pub natural_h: f64,
}

/// One ordered unit of the composed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub kind: SectionKind,
    /// The decoded image, for image-bearing kinds. `None` = placeholder.
    pub image: Option<ImageRef>,
    pub status: SectionStatus,
    /// Locked against direct manipulation, opened for region edits.
    pub held: bool,
    /// Force-edit flag: locally editable without the document-wide toggle.
    pub selected: bool,
    /// Horizontal mirror, applied at render time only.
    pub flipped: bool,
    pub filter: FilterPreset,
}

impl Section {
    /// Create a fresh placeholder section of the given kind.
    #[must_use]
    pub fn new(kind: SectionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            image: None,
            status: SectionStatus::Placeholder,
            held: false,
            selected: false,
            flipped: false,
            filter: FilterPreset::None,
        }
    }

    /// Whether direct manipulation is offered at all: the document-wide
    /// edit toggle or this section's force-edit flag. A held section is
    /// still "editable" in this sense — its wheel events are swallowed —
    /// but [`Self::is_interactive`] is what gates actual mutation.
    #[must_use]
    pub fn is_editable(&self, global_edit: bool) -> bool {
        global_edit || self.selected
    }

    /// Whether pan/zoom/drag may mutate this section right now.
    #[must_use]
    pub fn is_interactive(&self, global_edit: bool) -> bool {
        self.is_editable(global_edit) && !self.held && self.status != SectionStatus::Processing
    }

    /// The status this section settles back to when processing ends.
    #[must_use]
    pub fn settled_status(&self) -> SectionStatus {
        if self.image.is_some() {
            SectionStatus::Populated
        } else {
            SectionStatus::Placeholder
        }
    }
}
