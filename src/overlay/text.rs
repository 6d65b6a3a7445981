//! Text measurement and rasterization.
//!
//! Fonts are application assets: the embedding app registers font bytes
//! under a name, and text overlays refer to fonts by that name. Overlay
//! clamping and hit testing use a deterministic approximate metric so the
//! model never depends on which fonts have finished loading; exact glyph
//! metrics apply only when pixels are produced.

use std::collections::HashMap;

use ab_glyph::{Font, FontArc, GlyphId, PxScaleFont, ScaleFont, point};
use image::{Rgba, RgbaImage};

use crate::geom::SizeF;

/// Horizontal advance per character, as a fraction of the font size, used
/// by the approximate metric.
const APPROX_ADVANCE: f32 = 0.6;
/// Line height as a fraction of the font size, used by the approximate
/// metric.
const APPROX_LINE_HEIGHT: f32 = 1.2;

/// Approximate bounding size for a single line of text.
///
/// Deterministic and font-independent; this is what the overlay model and
/// hit testing work with.
pub fn approx_text_size(content: &str, size: f32) -> SizeF {
    let chars = content.chars().count().max(1) as f32;
    SizeF::new(chars * size * APPROX_ADVANCE, size * APPROX_LINE_HEIGHT)
}

// ============================================================================
// FontStore
// ============================================================================

/// Named fonts registered by the embedding application.
#[derive(Default)]
pub struct FontStore {
    fonts: HashMap<String, FontArc>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers font bytes under `name`. Returns false (and logs) if the
    /// bytes are not a parseable font; the previous registration, if any,
    /// is kept in that case.
    pub fn register(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> bool {
        let name = name.into();
        match FontArc::try_from_vec(bytes) {
            Ok(font) => {
                self.fonts.insert(name, font);
                true
            }
            Err(err) => {
                log::warn!("font {name:?} failed to parse: {err}");
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FontArc> {
        self.fonts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }
}

// ============================================================================
// Rasterization
// ============================================================================

/// Lays out one line of glyphs with kerning, returning each glyph id with
/// its x offset, plus the total advance width.
fn layout_line(scaled: &PxScaleFont<&FontArc>, content: &str) -> (Vec<(GlyphId, f32)>, f32) {
    let mut glyphs = Vec::new();
    let mut cursor_x = 0.0f32;
    let mut prev: Option<GlyphId> = None;

    for ch in content.chars() {
        let id = scaled.font().glyph_id(ch);
        if let Some(p) = prev {
            cursor_x += scaled.kern(p, id);
        }
        glyphs.push((id, cursor_x));
        cursor_x += scaled.h_advance(id);
        prev = Some(id);
    }

    (glyphs, cursor_x)
}

/// Rasterizes a single line of text into a tightly-bounded RGBA patch.
///
/// Returns `None` when nothing would be drawn (empty string, whitespace
/// only, or no outlines in the font).
pub fn rasterize_line(
    font: &FontArc,
    content: &str,
    size: f32,
    color: [u8; 4],
) -> Option<RgbaImage> {
    let scaled = font.as_scaled(size);
    let ascent = scaled.ascent();
    let (glyphs, _) = layout_line(&scaled, content);

    let outlined: Vec<_> = glyphs
        .into_iter()
        .filter_map(|(id, x)| font.outline_glyph(id.with_scale_and_position(size, point(x, ascent))))
        .collect();
    if outlined.is_empty() {
        return None;
    }

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for og in &outlined {
        let b = og.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }

    let width = (max_x - min_x).ceil() as u32;
    let height = (max_y - min_y).ceil() as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let mut patch = RgbaImage::new(width, height);
    for og in &outlined {
        let b = og.px_bounds();
        let off_x = (b.min.x - min_x).round() as i32;
        let off_y = (b.min.y - min_y).round() as i32;
        og.draw(|px, py, coverage| {
            let x = off_x + px as i32;
            let y = off_y + py as i32;
            if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                return;
            }
            let alpha = (coverage * color[3] as f32).round().clamp(0.0, 255.0) as u8;
            let existing = patch.get_pixel(x as u32, y as u32)[3];
            if alpha > existing {
                patch.put_pixel(x as u32, y as u32, Rgba([color[0], color[1], color[2], alpha]));
            }
        });
    }

    Some(patch)
}
