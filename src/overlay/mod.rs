//! Overlay model: the single text-or-image customization on one angle.
//!
//! At most one overlay exists per angle, and that invariant is structural:
//! the model holds a single `Option<Overlay>` slot, so setting a text
//! overlay atomically replaces any image overlay and vice versa.
//!
//! Out-of-range positions and sizes are never rejected; they are silently
//! clamped into the canvas before being stored.

pub mod text;

use image::RgbaImage;

use crate::geom::{BoundingBox, CanvasSize, PointPx, SizeF, clamp_or_middle};
use text::approx_text_size;

/// Minimum font size for text overlays, in px.
pub const TEXT_MIN_SIZE: f32 = 12.0;
/// Margin kept between a text overlay's bounding box and the canvas edge.
pub const TEXT_MARGIN: f32 = 5.0;
/// Minimum side length for image overlays, in px.
pub const IMAGE_MIN_SIDE: f32 = 30.0;
/// Overlays may not exceed this fraction of the canvas dimension.
pub const MAX_CANVAS_FRACTION: f32 = 0.9;

// ============================================================================
// Overlay
// ============================================================================

/// A text overlay: content rendered in a named font at a center-anchored
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub content: String,
    /// Name of a font registered in the [`FontStore`](text::FontStore).
    pub font: String,
    pub color: [u8; 4],
    /// Font size in px.
    pub size: f32,
    /// Center of the text bounding box, in canvas coordinates.
    pub position: PointPx,
}

impl TextOverlay {
    pub fn new(content: impl Into<String>, font: impl Into<String>, size: f32) -> Self {
        Self {
            content: content.into(),
            font: font.into(),
            color: [0, 0, 0, 255],
            size,
            position: PointPx::default(),
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = PointPx::new(x, y);
        self
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    /// Approximate bounding size of the rendered text.
    pub fn measured_size(&self) -> SizeF {
        approx_text_size(&self.content, self.size)
    }
}

/// An image overlay: an uploaded bitmap drawn at a center-anchored position
/// with an explicit display size.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOverlay {
    pub bitmap: RgbaImage,
    /// Opaque reference to the upload source, kept so profiles can persist
    /// the overlay without embedding pixels.
    pub source_ref: Option<String>,
    /// Center of the overlay, in canvas coordinates.
    pub position: PointPx,
    /// Display size in canvas px (independent of the bitmap resolution).
    pub size: SizeF,
}

impl ImageOverlay {
    /// Creates an overlay displayed at the bitmap's own resolution.
    pub fn new(bitmap: RgbaImage) -> Self {
        let size = SizeF::new(bitmap.width() as f32, bitmap.height() as f32);
        Self {
            bitmap,
            source_ref: None,
            position: PointPx::default(),
            size,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = PointPx::new(x, y);
        self
    }

    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = SizeF::new(width, height);
        self
    }
}

/// The single customization attached to one angle.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Text(TextOverlay),
    Image(ImageOverlay),
}

impl Overlay {
    pub fn position(&self) -> PointPx {
        match self {
            Overlay::Text(t) => t.position,
            Overlay::Image(i) => i.position,
        }
    }

    /// The overlay's bounding box (measured for text, explicit for images).
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Overlay::Text(t) => BoundingBox::new(t.position, t.measured_size()),
            Overlay::Image(i) => BoundingBox::new(i.position, i.size),
        }
    }

    /// Margin this overlay type keeps from the canvas edge when clamping.
    fn edge_margin(&self) -> f32 {
        match self {
            Overlay::Text(_) => TEXT_MARGIN,
            Overlay::Image(_) => 0.0,
        }
    }
}

// ============================================================================
// OverlayModel
// ============================================================================

/// Holds the current overlay for one angle and enforces its invariants.
///
/// All setters clamp before storing; there is no way to observe an overlay
/// whose bounding box escapes the canvas or whose size is out of range.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayModel {
    canvas: CanvasSize,
    overlay: Option<Overlay>,
}

impl OverlayModel {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            overlay: None,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.overlay.is_none()
    }

    pub fn text(&self) -> Option<&TextOverlay> {
        match &self.overlay {
            Some(Overlay::Text(t)) => Some(t),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageOverlay> {
        match &self.overlay {
            Some(Overlay::Image(i)) => Some(i),
            _ => None,
        }
    }

    /// The current overlay's bounding box, if any.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.overlay.as_ref().map(|o| o.bounding_box())
    }

    /// Installs a text overlay, replacing any image overlay.
    pub fn set_text(&mut self, mut overlay: TextOverlay) {
        overlay.size = Self::clamp_text_size(self.canvas, overlay.size);
        let mut overlay = Overlay::Text(overlay);
        Self::clamp_into_canvas(self.canvas, &mut overlay);
        self.overlay = Some(overlay);
    }

    /// Installs an image overlay, replacing any text overlay.
    pub fn set_image(&mut self, mut overlay: ImageOverlay) {
        overlay.size = Self::clamp_image_size(self.canvas, overlay.size);
        let mut overlay = Overlay::Image(overlay);
        Self::clamp_into_canvas(self.canvas, &mut overlay);
        self.overlay = Some(overlay);
    }

    pub fn clear(&mut self) {
        self.overlay = None;
    }

    /// Moves the overlay's center, clamping so the bounding box stays inside
    /// the canvas. No-op when the model is empty.
    pub fn update_position(&mut self, x: f32, y: f32) {
        let canvas = self.canvas;
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        match overlay {
            Overlay::Text(t) => t.position = PointPx::new(x, y),
            Overlay::Image(i) => i.position = PointPx::new(x, y),
        }
        Self::clamp_into_canvas(canvas, overlay);
    }

    /// Resizes an image overlay, clamping each axis to its bounds and then
    /// re-clamping the center so the box stays in-canvas. No-op for text
    /// overlays and empty models.
    pub fn update_size(&mut self, width: f32, height: f32) {
        let canvas = self.canvas;
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        if let Overlay::Image(img) = overlay {
            img.size = Self::clamp_image_size(canvas, SizeF::new(width, height));
            Self::clamp_into_canvas(canvas, overlay);
        }
    }

    /// Adjusts a text overlay's font size by `delta` px (the explicit +/-
    /// controls and keyboard path). No-op for image overlays.
    pub fn adjust_text_size(&mut self, delta: f32) {
        let canvas = self.canvas;
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        if let Overlay::Text(t) = overlay {
            t.size = Self::clamp_text_size(canvas, t.size + delta);
            Self::clamp_into_canvas(canvas, overlay);
        }
    }

    // ---- Clamping ----

    fn clamp_text_size(canvas: CanvasSize, size: f32) -> f32 {
        let max = canvas.min_dim() as f32 * MAX_CANVAS_FRACTION;
        size.clamp(TEXT_MIN_SIZE, max.max(TEXT_MIN_SIZE))
    }

    fn clamp_image_size(canvas: CanvasSize, size: SizeF) -> SizeF {
        let max_w = (canvas.width as f32 * MAX_CANVAS_FRACTION).max(IMAGE_MIN_SIDE);
        let max_h = (canvas.height as f32 * MAX_CANVAS_FRACTION).max(IMAGE_MIN_SIDE);
        SizeF::new(
            size.width.clamp(IMAGE_MIN_SIDE, max_w),
            size.height.clamp(IMAGE_MIN_SIDE, max_h),
        )
    }

    /// Shifts the overlay's center so its bounding box (plus the type's edge
    /// margin) lies inside the canvas.
    fn clamp_into_canvas(canvas: CanvasSize, overlay: &mut Overlay) {
        let bb = overlay.bounding_box();
        let margin = overlay.edge_margin();
        let half_w = bb.size.width / 2.0;
        let half_h = bb.size.height / 2.0;
        let x = clamp_or_middle(
            bb.center.x,
            half_w + margin,
            canvas.width as f32 - half_w - margin,
        );
        let y = clamp_or_middle(
            bb.center.y,
            half_h + margin,
            canvas.height as f32 - half_h - margin,
        );
        match overlay {
            Overlay::Text(t) => t.position = PointPx::new(x, y),
            Overlay::Image(i) => i.position = PointPx::new(x, y),
        }
    }
}
