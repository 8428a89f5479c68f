//! Pan/zoom transform applied to a section image or grid cell.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

use crate::consts::ZOOM_STEP;

/// Pan/zoom state for one section image or one grid cell.
///
/// `x` / `y` are translation in CSS pixels; `scale` is a plain factor
/// (1.0 = no zoom). Created lazily with [`Transform::default`] on first
/// interaction and mutated only by the pan/zoom handlers or an explicit
/// reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { scale: 1.0, x: 0.0, y: 0.0 }
    }
}

impl Transform {
    /// The identity transform `{1, 0, 0}`.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// This transform translated to an absolute `(x, y)`, scale untouched.
    #[must_use]
    pub fn panned_to(self, x: f64, y: f64) -> Self {
        Self { x, y, ..self }
    }

    /// This transform stepped one zoom notch for a wheel delta, clamped to
    /// `[min, max]`. Wheel-up (negative `dy`) zooms in. Pan is untouched:
    /// zooming never resets a prior pan.
    #[must_use]
    pub fn zoom_stepped(self, wheel_dy: f64, min: f64, max: f64) -> Self {
        let step = if wheel_dy < 0.0 { ZOOM_STEP } else { -ZOOM_STEP };
        Self { scale: (self.scale + step).clamp(min, max), ..self }
    }
}
