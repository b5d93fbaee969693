//! Page coordinate mapping.
//!
//! Issue positions are stored normalized to the page's rendered size at
//! creation time, so they are independent of zoom level and viewport.
//! Re-projection to pixels always multiplies by the *current* surface
//! dimensions; the mapper itself is zoom-agnostic.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Pixel dimensions of a rendered page surface at the current zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    width: f64,
    height: f64,
}

impl SurfaceSize {
    /// Construct a surface size. Dimensions must be finite and positive,
    /// which keeps the mapping functions below total.
    pub fn new(width: f64, height: f64) -> Result<Self, CoreError> {
        if !width.is_finite() || !height.is_finite() {
            return Err(CoreError::Validation(
                "Surface dimensions must be finite numbers".to_string(),
            ));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Surface dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// A location on a page expressed as fractions of page width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

/// A not-yet-saved candidate issue location awaiting user-entered details.
/// Exists only between a pointer click and modal submit/cancel; never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPin {
    pub position: NormalizedPoint,
    pub page_number: i32,
}

// ---------------------------------------------------------------------------
// Mapping functions
// ---------------------------------------------------------------------------

/// Convert a raw pointer position on a rendered surface into normalized
/// page coordinates.
///
/// Inputs outside the surface bounds are clamped into `[0, 1]` rather than
/// rejected: a click registered at the surface edge during a resize race
/// must not fail. Non-finite pixel input collapses to the nearest bound.
pub fn to_normalized(pixel_x: f64, pixel_y: f64, surface: SurfaceSize) -> NormalizedPoint {
    // max/min rather than clamp: NaN.max(0.0) is 0.0, keeping this total.
    NormalizedPoint {
        x: (pixel_x / surface.width).max(0.0).min(1.0),
        y: (pixel_y / surface.height).max(0.0).min(1.0),
    }
}

/// Re-project a normalized position onto the current surface, returning
/// pixel coordinates. Exact inverse of [`to_normalized`] up to
/// floating-point rounding for in-bounds input.
pub fn to_pixel(point: NormalizedPoint, surface: SurfaceSize) -> (f64, f64) {
    (point.x * surface.width, point.y * surface.height)
}

/// Validate that a point lies within the unit square. Stored issue
/// positions must satisfy this.
pub fn validate_position(point: NormalizedPoint) -> Result<(), CoreError> {
    let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
    if !in_unit(point.x) || !in_unit(point.y) {
        return Err(CoreError::Validation(format!(
            "Position ({}, {}) is outside the unit square",
            point.x, point.y
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
