//! Multi-view composer: four independent angle views behind one facade.
//!
//! The composer exclusively owns the per-angle overlay models and view
//! renderers. Exactly one angle is active at a time; only the active angle
//! receives input events. Switching the active angle aborts any in-flight
//! gesture and never mutates the other angles. The one cross-angle value is
//! the garment color, written only through [`DesignComposer::set_color`],
//! which marks all four views dirty.

use std::io::Cursor;

use image::RgbaImage;

use crate::angle::{Angle, AngleMap};
use crate::asset::{GarmentAssets, decode_rgba};
use crate::color::GarmentColor;
use crate::design::{CaptureResult, CommittedDesign, Design};
use crate::error::EngineError;
use crate::geom::PointPx;
use crate::interact::{CursorHint, InteractionController, KeyInput, PointerEvent, TransformUpdate};
use crate::overlay::text::FontStore;
use crate::overlay::{ImageOverlay, OverlayModel, TextOverlay};
use crate::render::{RendererConfig, ViewRenderer};

/// The garment customization session facade.
pub struct DesignComposer {
    color: GarmentColor,
    assets: GarmentAssets,
    models: AngleMap<OverlayModel>,
    renderers: AngleMap<ViewRenderer>,
    fonts: FontStore,
    active: Angle,
    controller: InteractionController,
    dirty: AngleMap<bool>,
    upload_generation: u64,
}

impl DesignComposer {
    /// Creates an empty customization session. All four views share the
    /// same renderer configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self {
            color: GarmentColor::base(),
            assets: GarmentAssets::new(),
            models: AngleMap::from_fn(|_| OverlayModel::new(config.canvas)),
            renderers: AngleMap::from_fn(|_| ViewRenderer::new(config)),
            fonts: FontStore::new(),
            active: Angle::Front,
            controller: InteractionController::new(),
            dirty: AngleMap::filled(true),
            upload_generation: 0,
        }
    }

    // ---- Angles and color ----

    pub fn active(&self) -> Angle {
        self.active
    }

    /// Makes `angle` the view that receives input and is visibly drawn.
    ///
    /// Any in-flight gesture on the previous angle is aborted; its model
    /// keeps the last values the gesture wrote.
    pub fn set_active(&mut self, angle: Angle) {
        if self.active != angle {
            self.controller.reset();
            self.active = angle;
        }
    }

    pub fn color(&self) -> &GarmentColor {
        &self.color
    }

    /// Sets the shared garment color and marks all four views for redraw.
    pub fn set_color(&mut self, color: GarmentColor) {
        if self.color != color {
            self.color = color;
            for (_, flag) in self.dirty.iter_mut() {
                *flag = true;
            }
        }
    }

    // ---- Assets and fonts ----

    /// Decodes and installs the base garment image for `angle`.
    pub fn load_base(&mut self, angle: Angle, bytes: &[u8]) -> Result<(), EngineError> {
        let result = self.assets.load_from_bytes(angle, bytes);
        *self.dirty.get_mut(angle) = true;
        result
    }

    /// Starts an asynchronous base load for `angle`; the returned token
    /// must accompany the completion.
    pub fn begin_base_load(&mut self, angle: Angle) -> u64 {
        self.assets.slot_mut(angle).begin_load()
    }

    /// Delivers the result of an asynchronous base load. Stale completions
    /// are discarded.
    pub fn complete_base_load(
        &mut self,
        angle: Angle,
        token: u64,
        result: Result<RgbaImage, EngineError>,
    ) -> bool {
        let accepted = self.assets.slot_mut(angle).complete(token, result);
        if accepted {
            *self.dirty.get_mut(angle) = true;
        }
        accepted
    }

    /// Registers a font for text overlays. Returns false for unparseable
    /// bytes.
    pub fn register_font(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> bool {
        self.fonts.register(name, bytes)
    }

    pub fn fonts(&self) -> &FontStore {
        &self.fonts
    }

    // ---- Overlay mutation ----

    pub fn model(&self, angle: Angle) -> &OverlayModel {
        self.models.get(angle)
    }

    /// Installs a text overlay on `angle`, replacing any image overlay.
    pub fn set_text(&mut self, angle: Angle, overlay: TextOverlay) {
        self.models.get_mut(angle).set_text(overlay);
        *self.dirty.get_mut(angle) = true;
    }

    /// Installs an image overlay on `angle`, replacing any text overlay.
    pub fn set_image(&mut self, angle: Angle, overlay: ImageOverlay) {
        self.models.get_mut(angle).set_image(overlay);
        *self.dirty.get_mut(angle) = true;
    }

    pub fn clear_overlay(&mut self, angle: Angle) {
        self.models.get_mut(angle).clear();
        *self.dirty.get_mut(angle) = true;
    }

    /// Stages an overlay image upload for the active angle and returns its
    /// token. A later-staged upload supersedes this one.
    pub fn begin_overlay_upload(&mut self) -> u64 {
        self.upload_generation = self.upload_generation.wrapping_add(1);
        self.upload_generation
    }

    /// Completes an overlay upload: decodes the bytes and installs the
    /// image centered on the active angle's canvas. Stale tokens and
    /// undecodable uploads are discarded (the overlay is simply omitted).
    pub fn complete_overlay_upload(&mut self, token: u64, bytes: &[u8]) -> bool {
        if token != self.upload_generation {
            log::debug!("discarding superseded overlay upload (token {token})");
            return false;
        }
        let bitmap = match decode_rgba(bytes) {
            Ok(img) => img,
            Err(err) => {
                log::warn!("overlay upload failed to decode: {err}");
                return false;
            }
        };
        let canvas = self.models.get(self.active).canvas();
        let overlay = ImageOverlay::new(bitmap)
            .at(canvas.width as f32 / 2.0, canvas.height as f32 / 2.0);
        self.set_image(self.active, overlay);
        true
    }

    // ---- Input routing ----

    /// Registers the callback invoked with the final transform whenever a
    /// gesture on any angle commits.
    pub fn set_commit_callback(&mut self, callback: impl FnMut(TransformUpdate) + 'static) {
        self.controller.set_commit_callback(callback);
    }

    /// Feeds a pointer event to the active angle. Returns true if its
    /// model changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let model = self.models.get_mut(self.active);
        let changed = self.controller.handle_pointer(model, event);
        if changed {
            *self.dirty.get_mut(self.active) = true;
        }
        changed
    }

    /// Feeds a keyboard event to the active angle.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        let model = self.models.get_mut(self.active);
        let changed = self.controller.handle_key(model, key);
        if changed {
            *self.dirty.get_mut(self.active) = true;
        }
        changed
    }

    /// Cursor suggestion for the pointer hovering the active view.
    pub fn cursor_hint(&self, p: PointPx) -> CursorHint {
        self.controller.cursor_hint(self.models.get(self.active), p)
    }

    // ---- Rendering and capture ----

    /// True if `angle` needs a redraw since it was last rendered.
    pub fn is_dirty(&self, angle: Angle) -> bool {
        *self.dirty.get(angle)
    }

    /// Renders `angle`'s composed view and clears its dirty flag.
    /// `affordances` adds selection chrome for interactive display.
    pub fn render(&mut self, angle: Angle, affordances: bool) -> RgbaImage {
        *self.dirty.get_mut(angle) = false;
        self.renderers.get(angle).render(
            self.assets.slot(angle),
            &self.color,
            self.models.get(angle),
            &self.fonts,
            affordances,
        )
    }

    /// Captures `angle` as a static PNG payload, without any selection
    /// chrome. Idempotent: unchanged state yields byte-identical output.
    pub fn capture(&self, angle: Angle) -> Result<CaptureResult, EngineError> {
        if self.assets.slot(angle).image().is_none() {
            return Err(EngineError::CaptureUnavailable(angle));
        }
        let composed = self.renderers.get(angle).render(
            self.assets.slot(angle),
            &self.color,
            self.models.get(angle),
            &self.fonts,
            false,
        );
        let mut buf = Cursor::new(Vec::new());
        composed
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(EngineError::Encode)?;
        Ok(CaptureResult {
            angle,
            width: composed.width(),
            height: composed.height(),
            png: buf.into_inner(),
        })
    }

    /// The angle a catalog thumbnail should be captured from: the first
    /// angle carrying an overlay, in front > back > left > right order.
    /// `None` means the caller must supply a fallback image.
    pub fn thumbnail_angle(&self) -> Option<Angle> {
        Angle::ALL
            .into_iter()
            .find(|a| !self.models.get(*a).is_empty())
    }

    // ---- Finalization ----

    /// Snapshots the current customization state.
    pub fn design(&self) -> Design {
        Design {
            color: self.color.clone(),
            overlays: AngleMap::from_fn(|a| self.models.get(a).overlay().cloned()),
        }
    }

    /// Freezes the design for the cart/catalog: captures every angle that
    /// carries an overlay. Fails with [`EngineError::EmptyDesign`] when no
    /// angle has one, or with a capture error if a non-empty angle's base
    /// asset never loaded.
    pub fn commit(&self) -> Result<CommittedDesign, EngineError> {
        let design = self.design();
        if design.is_empty() {
            return Err(EngineError::EmptyDesign);
        }
        let mut captures = Vec::new();
        for angle in Angle::ALL {
            if design.overlay(angle).is_some() {
                captures.push(self.capture(angle)?);
            }
        }
        Ok(CommittedDesign { design, captures })
    }
}
