//! View renderer: composes one angle's colorized base and overlay.
//!
//! The renderer is pure over its inputs: configuration (canvas size, dark
//! mode) is passed at construction rather than read from ambient UI state,
//! and every call produces a fresh buffer. Missing or failed base assets
//! degrade to a neutral placeholder fill; a text overlay whose font is not
//! yet registered is simply not drawn.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::asset::AssetSlot;
use crate::color::{GarmentColor, colorize, contrast_color};
use crate::geom::CanvasSize;
use crate::interact::Handle;
use crate::overlay::text::{FontStore, rasterize_line};
use crate::overlay::{Overlay, OverlayModel};

/// Side length of a drawn resize handle, in px.
const HANDLE_DRAW_SIZE: i32 = 7;

/// Renderer construction parameters.
///
/// Explicit configuration keeps the rendering core testable without any UI
/// runtime; nothing here is looked up globally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    pub canvas: CanvasSize,
    pub dark_mode: bool,
}

impl RendererConfig {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            dark_mode: false,
        }
    }

    pub fn with_dark_mode(mut self, dark_mode: bool) -> Self {
        self.dark_mode = dark_mode;
        self
    }

    fn background(&self) -> Rgba<u8> {
        if self.dark_mode {
            Rgba([30, 30, 34, 255])
        } else {
            Rgba([244, 244, 246, 255])
        }
    }
}

// ============================================================================
// ViewRenderer
// ============================================================================

/// Renders one angle's composed view.
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    config: RendererConfig,
}

impl ViewRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> RendererConfig {
        self.config
    }

    /// Composes background + colorized base + overlay into a canvas-sized
    /// buffer.
    ///
    /// `affordances` adds the selection outline and resize handles for an
    /// image overlay; capture paths pass `false` so exported bitmaps never
    /// carry editing chrome.
    pub fn render(
        &self,
        base: &AssetSlot,
        color: &GarmentColor,
        model: &OverlayModel,
        fonts: &FontStore,
        affordances: bool,
    ) -> RgbaImage {
        let CanvasSize { width, height } = self.config.canvas;
        let mut canvas = RgbaImage::from_pixel(width, height, self.config.background());

        match base.image() {
            Some(img) => {
                let tinted = colorize(img, color);
                let x = (width as i32 - tinted.width() as i32) / 2;
                let y = (height as i32 - tinted.height() as i32) / 2;
                composite(&mut canvas, &tinted, x, y);
            }
            None => self.draw_placeholder(&mut canvas),
        }

        match model.overlay() {
            Some(Overlay::Image(img)) => {
                let w = img.size.width.round().max(1.0) as u32;
                let h = img.size.height.round().max(1.0) as u32;
                let scaled = if (w, h) == (img.bitmap.width(), img.bitmap.height()) {
                    img.bitmap.clone()
                } else {
                    imageops::resize(&img.bitmap, w, h, FilterType::Triangle)
                };
                let bb = model.bounding_box().map(|b| (b.left(), b.top()));
                if let Some((left, top)) = bb {
                    composite(&mut canvas, &scaled, left.round() as i32, top.round() as i32);
                }
                if affordances {
                    self.draw_affordances(&mut canvas, model, color);
                }
            }
            Some(Overlay::Text(text)) => match fonts.get(&text.font) {
                Some(font) => {
                    if let Some(patch) = rasterize_line(font, &text.content, text.size, text.color)
                    {
                        let x = text.position.x - patch.width() as f32 / 2.0;
                        let y = text.position.y - patch.height() as f32 / 2.0;
                        composite(&mut canvas, &patch, x.round() as i32, y.round() as i32);
                    }
                }
                None => {
                    log::debug!("font {:?} not registered yet; text overlay skipped", text.font);
                }
            },
            None => {}
        }

        canvas
    }

    /// Neutral fill shown while the base asset is missing or undecodable.
    fn draw_placeholder(&self, canvas: &mut RgbaImage) {
        let fill = if self.config.dark_mode {
            Rgba([70, 70, 74, 255])
        } else {
            Rgba([210, 210, 212, 255])
        };
        let inset_x = canvas.width() / 10;
        let inset_y = canvas.height() / 10;
        fill_rect(
            canvas,
            inset_x as i32,
            inset_y as i32,
            (canvas.width() - inset_x * 2) as i32,
            (canvas.height() - inset_y * 2) as i32,
            fill,
        );
    }

    /// Selection outline plus the eight resize grips.
    fn draw_affordances(&self, canvas: &mut RgbaImage, model: &OverlayModel, color: &GarmentColor) {
        let Some(bb) = model.bounding_box() else {
            return;
        };
        let accent = Rgba(contrast_color(color));

        stroke_rect(
            canvas,
            bb.left().round() as i32,
            bb.top().round() as i32,
            bb.size.width.round() as i32,
            bb.size.height.round() as i32,
            accent,
        );

        let half = HANDLE_DRAW_SIZE / 2;
        for handle in Handle::ALL {
            let a = handle.anchor(&bb);
            fill_rect(
                canvas,
                a.x.round() as i32 - half,
                a.y.round() as i32 - half,
                HANDLE_DRAW_SIZE,
                HANDLE_DRAW_SIZE,
                accent,
            );
        }
    }
}

// ============================================================================
// Pixel helpers
// ============================================================================

/// Source-over composites `src` onto `dst` at `(x, y)`, clipping at the
/// destination edges.
pub fn composite(dst: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let (dw, dh) = (dst.width() as i32, dst.height() as i32);
    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x + sx as i32;
        let dy = y + sy as i32;
        if dx < 0 || dy < 0 || dx >= dw || dy >= dh {
            continue;
        }
        let dst_pixel = *dst.get_pixel(dx as u32, dy as u32);
        dst.put_pixel(dx as u32, dy as u32, blend(dst_pixel, *src_pixel));
    }
}

/// Source-over blend of non-premultiplied RGBA, in integer math.
fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as u32;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let da = dst[3] as u32;
    let da_scaled = da * (255 - sa) / 255;
    let out_a = sa + da_scaled;
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let mixed = s as u32 * sa + d as u32 * da_scaled;
        ((mixed + out_a / 2) / out_a) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        out_a as u8,
    ])
}

fn fill_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
    let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);
    for py in y.max(0)..(y + h).min(ch) {
        for px in x.max(0)..(x + w).min(cw) {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}

fn stroke_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
    fill_rect(canvas, x, y, w, 1, color);
    fill_rect(canvas, x, y + h - 1, w, 1, color);
    fill_rect(canvas, x, y, 1, h, color);
    fill_rect(canvas, x + w - 1, y, 1, h, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::CanvasSize;
    use crate::overlay::ImageOverlay;

    fn ready_slot(w: u32, h: u32, gray: u8) -> AssetSlot {
        let mut slot = AssetSlot::default();
        slot.set_ready(RgbaImage::from_pixel(w, h, Rgba([gray, gray, gray, 255])));
        slot
    }

    fn renderer(w: u32, h: u32) -> ViewRenderer {
        ViewRenderer::new(RendererConfig::new(CanvasSize::new(w, h)))
    }

    #[test]
    fn base_only_render_is_colorized_base() {
        let r = renderer(100, 100);
        let slot = ready_slot(100, 100, 128);
        let model = OverlayModel::new(CanvasSize::new(100, 100));
        let fonts = FontStore::new();

        let cobalt = GarmentColor::new("Cobalt", [0x00, 0x47, 0xAB]);
        let out = r.render(&slot, &cobalt, &model, &fonts, false);

        let [red, g, b, _] = out.get_pixel(50, 50).0;
        assert_eq!(red, 0);
        assert!((g as i32 - 36).abs() <= 1);
        assert!((b as i32 - 86).abs() <= 1);
    }

    #[test]
    fn missing_base_renders_placeholder_not_panic() {
        let r = renderer(100, 100);
        let slot = AssetSlot::default();
        let model = OverlayModel::new(CanvasSize::new(100, 100));
        let out = r.render(&slot, &GarmentColor::base(), &model, &FontStore::new(), false);

        assert_eq!((out.width(), out.height()), (100, 100));
        // Center carries the neutral placeholder fill, not the background.
        assert_eq!(out.get_pixel(50, 50).0, [210, 210, 212, 255]);
        assert_eq!(out.get_pixel(0, 0).0, [244, 244, 246, 255]);
    }

    #[test]
    fn image_overlay_is_composited_at_its_box() {
        let r = renderer(200, 200);
        let slot = ready_slot(200, 200, 255);
        let mut model = OverlayModel::new(CanvasSize::new(200, 200));
        let red = RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 255]));
        model.set_image(ImageOverlay::new(red).at(100.0, 100.0));

        let out = r.render(&slot, &GarmentColor::base(), &model, &FontStore::new(), false);
        assert_eq!(out.get_pixel(100, 100).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(10, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn affordances_only_when_requested() {
        let r = renderer(200, 200);
        let slot = ready_slot(200, 200, 255);
        let mut model = OverlayModel::new(CanvasSize::new(200, 200));
        let red = RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 255]));
        model.set_image(ImageOverlay::new(red).at(100.0, 100.0));

        let plain = r.render(&slot, &GarmentColor::base(), &model, &FontStore::new(), false);
        let chrome = r.render(&slot, &GarmentColor::base(), &model, &FontStore::new(), true);

        // (119, 119) sits in the SE handle square and on the outline; it
        // shows the dark accent only with affordances on.
        assert_eq!(chrome.get_pixel(119, 119).0, [40, 40, 40, 255]);
        assert_eq!(plain.get_pixel(119, 119).0, [255, 0, 0, 255]);
    }

    #[test]
    fn unregistered_font_skips_text_overlay() {
        let r = renderer(200, 200);
        let slot = ready_slot(200, 200, 255);
        let mut model = OverlayModel::new(CanvasSize::new(200, 200));
        model.set_text(crate::overlay::TextOverlay::new("HELLO", "missing", 20.0).at(100.0, 100.0));

        let with_text = r.render(&slot, &GarmentColor::base(), &model, &FontStore::new(), false);
        let empty_model = OverlayModel::new(CanvasSize::new(200, 200));
        let without = r.render(&slot, &GarmentColor::base(), &empty_model, &FontStore::new(), false);
        assert_eq!(with_text, without);
    }

    #[test]
    fn dark_mode_changes_background() {
        let config = RendererConfig::new(CanvasSize::new(50, 50)).with_dark_mode(true);
        let r = ViewRenderer::new(config);
        let out = r.render(
            &ready_slot(10, 10, 255),
            &GarmentColor::base(),
            &OverlayModel::new(CanvasSize::new(50, 50)),
            &FontStore::new(),
            false,
        );
        assert_eq!(out.get_pixel(0, 0).0, [30, 30, 34, 255]);
    }

    #[test]
    fn blend_is_source_over() {
        let opaque = blend(Rgba([0, 0, 0, 255]), Rgba([255, 0, 0, 255]));
        assert_eq!(opaque.0, [255, 0, 0, 255]);

        let half = blend(Rgba([0, 0, 0, 255]), Rgba([255, 0, 0, 128]));
        assert!(half[0] > 120 && half[0] < 135, "r = {}", half[0]);
        assert_eq!(half[3], 255);

        let none = blend(Rgba([1, 2, 3, 255]), Rgba([9, 9, 9, 0]));
        assert_eq!(none.0, [1, 2, 3, 255]);
    }
}
