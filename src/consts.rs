//! Shared numeric constants for the composer crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Scale added or removed per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;

/// Minimum scale for a section image.
pub const MIN_SECTION_SCALE: f64 = 0.1;

/// Maximum scale for a section image.
pub const MAX_SECTION_SCALE: f64 = 5.0;

/// Minimum scale for a grid cell image.
pub const MIN_CELL_SCALE: f64 = 0.5;

/// Maximum scale for a grid cell image.
pub const MAX_CELL_SCALE: f64 = 3.0;

// ── Layout ──────────────────────────────────────────────────────

/// Smallest height a section can be resized to, in pixels.
pub const MIN_SECTION_HEIGHT: f64 = 50.0;

/// Smallest fractional width a grid column can be squeezed to.
pub const MIN_COLUMN_FR: f64 = 0.2;

/// Horizontal pixels of column-boundary drag per fractional unit.
pub const COLUMN_DRAG_PX_PER_FR: f64 = 100.0;

/// Document width used when the host never sets one.
pub const DEFAULT_DOCUMENT_WIDTH: f64 = 860.0;

/// Height of a section that has no image and no explicit height yet.
pub const PLACEHOLDER_HEIGHT: f64 = 400.0;

/// Default height of the size-guide block.
pub const SIZE_GUIDE_HEIGHT: f64 = 600.0;

/// Default height of the AS-info block.
pub const AS_INFO_HEIGHT: f64 = 480.0;

/// Default height of the precautions block.
pub const PRECAUTIONS_HEIGHT: f64 = 360.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for endpoint handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Minimum invisible stroke width for grabbing a thin line.
pub const LINE_HIT_STROKE_PX: f64 = 10.0;

/// Height of the resize-handle band along a section's bottom edge.
pub const RESIZE_HANDLE_BAND_PX: f64 = 10.0;

/// Horizontal slop around a grid column boundary.
pub const COLUMN_BOUNDARY_SLOP_PX: f64 = 6.0;

// ── Annotations ─────────────────────────────────────────────────

/// Upward offset of the quadratic control point for curved lines.
pub const CURVE_CONTROL_LIFT_PX: f64 = 50.0;
