//! Clothing regions: garment bounding boxes supplied by the vision
//! collaborator for a held section.
//!
//! Regions are ephemeral — cached per held section for the session, never
//! persisted. Bounds arrive in percentage space and are clamped before use;
//! a malformed region is repaired or dropped, never an error.

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;

use serde::{Deserialize, Serialize};

use crate::geometry::{to_pixel_rect, PercentRect, Point, Rect};

/// Garment category detected by the vision collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentKind {
    Outer,
    Top,
    Bottom,
    Shoes,
    Socks,
    Hat,
}

/// One detected garment region on a held section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingRegion {
    pub kind: GarmentKind,
    /// Display label shown on hover.
    pub label: String,
    /// Bounding box as percentages (0–100) of the section box.
    pub bounds: PercentRect,
    /// Detection confidence, `0.0`–`1.0`.
    pub confidence: f64,
}

impl ClothingRegion {
    /// Clamp bounds and confidence into range. Returns `None` if the box is
    /// empty after clamping — such regions are dropped with a warning at
    /// the call site.
    #[must_use]
    pub fn sanitized(mut self) -> Option<Self> {
        self.bounds = self.bounds.clamped();
        self.confidence = self.confidence.clamp(0.0, 1.0);
        if self.bounds.is_empty() { None } else { Some(self) }
    }
}

/// A region resolved to document pixels against its section's current box.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionZone {
    /// Index into the section's cached region list.
    pub index: usize,
    pub rect: Rect,
}

/// Resolve every region against the section's current rendered box. A
/// degenerate section rect yields no zones at all.
#[must_use]
pub fn resolve_zones(regions: &[ClothingRegion], section_rect: Rect) -> Vec<RegionZone> {
    if section_rect.is_degenerate() {
        return Vec::new();
    }
    regions
        .iter()
        .enumerate()
        .map(|(index, region)| RegionZone { index, rect: to_pixel_rect(section_rect, region.bounds) })
        .collect()
}

/// Index of the topmost region under `pt`, if any. Later regions in the
/// list sit above earlier ones, matching draw order.
#[must_use]
pub fn region_at(regions: &[ClothingRegion], section_rect: Rect, pt: Point) -> Option<usize> {
    resolve_zones(regions, section_rect)
        .iter()
        .rev()
        .find(|zone| zone.rect.contains(pt))
        .map(|zone| zone.index)
}
