//! Garment base-asset loading.
//!
//! Decoding runs off the interaction path (the embedding app decides where);
//! this module owns the slot bookkeeping: a load is started, a generation
//! token is handed out, and a completion carrying a stale token is discarded
//! rather than cancelled.

use image::RgbaImage;

use crate::angle::{Angle, AngleMap};
use crate::error::EngineError;

/// Decodes image bytes (PNG, JPEG, ...) into an RGBA buffer.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, EngineError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

// ============================================================================
// AssetSlot
// ============================================================================

/// Load state of one angle's base asset.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AssetState {
    /// No load has been requested.
    #[default]
    Empty,
    /// A decode is in flight.
    Pending,
    /// The decoded base image, ready to render.
    Ready(RgbaImage),
    /// The last decode failed; the renderer shows a placeholder.
    Failed,
}

/// One angle's asset slot with generation-checked completion.
#[derive(Debug, Clone, Default)]
pub struct AssetSlot {
    generation: u64,
    state: AssetState,
}

impl AssetSlot {
    /// Starts a new load, superseding any in-flight one. Returns the token
    /// that the eventual completion must present.
    pub fn begin_load(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.state = AssetState::Pending;
        self.generation
    }

    /// Completes a load. A completion whose token no longer matches the
    /// current generation is discarded and `false` is returned.
    pub fn complete(&mut self, token: u64, result: Result<RgbaImage, EngineError>) -> bool {
        if token != self.generation {
            log::debug!("discarding superseded asset decode (token {token})");
            return false;
        }
        self.state = match result {
            Ok(img) => AssetState::Ready(img),
            Err(err) => {
                log::warn!("base asset decode failed: {err}");
                AssetState::Failed
            }
        };
        true
    }

    /// Installs an already-decoded image directly (synchronous path).
    pub fn set_ready(&mut self, image: RgbaImage) {
        self.generation = self.generation.wrapping_add(1);
        self.state = AssetState::Ready(image);
    }

    pub fn state(&self) -> &AssetState {
        &self.state
    }

    /// The decoded image, if the slot is ready.
    pub fn image(&self) -> Option<&RgbaImage> {
        match &self.state {
            AssetState::Ready(img) => Some(img),
            _ => None,
        }
    }
}

// ============================================================================
// GarmentAssets
// ============================================================================

/// Base-asset slots for all four angles.
#[derive(Debug, Clone, Default)]
pub struct GarmentAssets {
    slots: AngleMap<AssetSlot>,
}

impl GarmentAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, angle: Angle) -> &AssetSlot {
        self.slots.get(angle)
    }

    pub fn slot_mut(&mut self, angle: Angle) -> &mut AssetSlot {
        self.slots.get_mut(angle)
    }

    /// Decodes and installs `bytes` for `angle` in one step.
    pub fn load_from_bytes(&mut self, angle: Angle, bytes: &[u8]) -> Result<(), EngineError> {
        let slot = self.slot_mut(angle);
        let token = slot.begin_load();
        match decode_rgba(bytes) {
            Ok(img) => {
                slot.complete(token, Ok(img));
                Ok(())
            }
            Err(err) => {
                log::warn!("base asset decode failed for {}: {err}", angle.label());
                slot.state = AssetState::Failed;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([200, 200, 200, 255]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn decode_roundtrip() {
        let img = decode_rgba(&png_bytes(3, 2)).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[test]
    fn decode_garbage_fails() {
        assert!(decode_rgba(b"not an image").is_err());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut slot = AssetSlot::default();
        let first = slot.begin_load();
        let second = slot.begin_load();

        // The superseded decode finishes late; its result must be dropped.
        let accepted = slot.complete(first, Ok(RgbaImage::new(1, 1)));
        assert!(!accepted);
        assert_eq!(*slot.state(), AssetState::Pending);

        assert!(slot.complete(second, Ok(RgbaImage::new(2, 2))));
        assert_eq!(slot.image().unwrap().width(), 2);
    }

    #[test]
    fn failed_decode_marks_slot_failed() {
        let mut slot = AssetSlot::default();
        let token = slot.begin_load();
        slot.complete(token, decode_rgba(b"junk"));
        assert_eq!(*slot.state(), AssetState::Failed);
        assert!(slot.image().is_none());
    }

    #[test]
    fn load_from_bytes_per_angle() {
        let mut assets = GarmentAssets::new();
        assets.load_from_bytes(Angle::Front, &png_bytes(4, 4)).unwrap();
        assert!(assets.slot(Angle::Front).image().is_some());
        assert!(assets.slot(Angle::Back).image().is_none());
        assert!(assets.load_from_bytes(Angle::Back, b"junk").is_err());
        assert_eq!(*assets.slot(Angle::Back).state(), AssetState::Failed);
    }
}
