//! Engine error taxonomy.
//!
//! Nothing here is fatal to a customization session: decode failures fall
//! back to placeholders, invalid transforms are clamped before they can
//! exist, and capture/commit errors are surfaced for the caller to supply a
//! fallback image.

use thiserror::Error;

use crate::angle::Angle;

/// Errors produced by the customization engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A base garment image or uploaded overlay image could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// A composed view could not be encoded for capture.
    #[error("failed to encode capture: {0}")]
    Encode(#[source] image::ImageError),

    /// Capture was requested for an angle whose base asset never loaded.
    #[error("no rendered surface available for the {} angle", .0.label())]
    CaptureUnavailable(Angle),

    /// Commit was requested while every angle is empty.
    #[error("design has no overlays on any angle")]
    EmptyDesign,
}
