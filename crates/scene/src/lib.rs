//! Drawing layer for the energy lab
//!
//! This crate provides:
//! - The render surface adapter (sizing, frame counting, error isolation)
//! - The coordinate normalizer mapping virtual spaces onto the live surface
//! - Shared stroke/color theme and drawing primitives
//! - One painter module per physics model

pub mod circuit_scene;
pub mod falling_scene;
pub mod primitives;
pub mod solar_scene;
pub mod spring_scene;
pub mod surface;
pub mod theme;
pub mod viewport;
pub mod wind_scene;

pub use surface::*;
pub use viewport::*;

use thiserror::Error;

/// Failure inside one frame's draw step. Always recoverable: the surface
/// adapter logs it and the next tick proceeds normally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Guard against NaN/inf state reaching the painter.
pub fn ensure_finite(value: f64, what: &'static str) -> Result<f64, SceneError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::NonFinite(what))
    }
}
