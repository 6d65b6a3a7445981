//! Garment colors and the colorization engine.
//!
//! Garment photographs are shot in a near-white base fabric; recoloring
//! replaces the hue while keeping the shading (folds, shadows, silhouette)
//! encoded in each pixel's luminance.

use image::RgbaImage;
use palette::{Hsl, IntoColor, Srgb};

/// The native hue of an uncolored base asset. Tinting toward this value is
/// an identity operation.
pub const NATIVE_HUE: [u8; 3] = [255, 255, 255];

// ============================================================================
// GarmentColor
// ============================================================================

/// A semantic garment color: a display name plus its exact RGB value.
///
/// Colors flagged `prerendered` correspond to assets photographed in that
/// color already (e.g. a naturally black garment) and always bypass the
/// colorization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarmentColor {
    /// Display name, e.g. "Cobalt".
    pub name: String,
    /// Exact RGB value applied by the colorization pass.
    pub rgb: [u8; 3],
    /// True for colors whose asset is already shot in the target color.
    pub prerendered: bool,
}

impl GarmentColor {
    /// Creates a color that is applied via the colorization pass.
    pub fn new(name: impl Into<String>, rgb: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            rgb,
            prerendered: false,
        }
    }

    /// Creates a color whose asset is pre-rendered; colorization is skipped.
    pub fn prerendered(name: impl Into<String>, rgb: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            rgb,
            prerendered: true,
        }
    }

    /// The uncolored base variant.
    pub fn base() -> Self {
        Self::new("Base", NATIVE_HUE)
    }

    /// True if tinting with this color would be an identity operation.
    pub fn is_native(&self) -> bool {
        self.rgb == NATIVE_HUE
    }
}

impl Default for GarmentColor {
    fn default() -> Self {
        Self::base()
    }
}

// ============================================================================
// Colorization
// ============================================================================

/// Tints a garment image toward `color`, preserving per-pixel luminance.
///
/// The source buffer is never mutated; the result is built in a working
/// copy. Fully transparent pixels pass through untouched so the silhouette
/// cutout survives. Pre-rendered and native colors return the source
/// unchanged.
pub fn colorize(base: &RgbaImage, color: &GarmentColor) -> RgbaImage {
    if color.prerendered || color.is_native() {
        return base.clone();
    }

    let [tr, tg, tb] = color.rgb;
    let mut working = base.clone();

    for pixel in working.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }

        let lum = luminance(r, g, b);
        pixel.0 = [
            (tr as f32 * lum).round() as u8,
            (tg as f32 * lum).round() as u8,
            (tb as f32 * lum).round() as u8,
            a,
        ];
    }

    working
}

/// Rec. 601 luminance, normalized to [0, 1].
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// Picks a selection-affordance color that contrasts with the garment color.
///
/// Light garments get a dark outline and vice versa, judged by HSL lightness.
pub fn contrast_color(color: &GarmentColor) -> [u8; 4] {
    let [r, g, b] = color.rgb;
    let rgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let hsl: Hsl = rgb.into_color();
    if hsl.lightness > 0.5 {
        [40, 40, 40, 255]
    } else {
        [230, 230, 230, 255]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn shaded_base() -> RgbaImage {
        // Grayscale gradient with a transparent corner pixel.
        let mut img = RgbaImage::new(4, 4);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let v = (x * 60 + y * 10) as u8;
            pixel.0 = [v, v, v, 255];
        }
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img
    }

    #[test]
    fn native_color_is_identity() {
        let base = shaded_base();
        let out = colorize(&base, &GarmentColor::base());
        assert_eq!(out, base);
    }

    #[test]
    fn prerendered_color_bypasses() {
        let base = shaded_base();
        let black = GarmentColor::prerendered("Black", [20, 20, 20]);
        assert_eq!(colorize(&base, &black), base);
    }

    #[test]
    fn transparent_pixels_unchanged() {
        let base = shaded_base();
        let out = colorize(&base, &GarmentColor::new("Red", [255, 0, 0]));
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn half_luminance_cobalt() {
        // Gray 128 has luminance ~0.502; expect roughly half of #0047AB.
        let mut base = RgbaImage::new(1, 1);
        base.put_pixel(0, 0, Rgba([128, 128, 128, 255]));

        let cobalt = GarmentColor::new("Cobalt", [0x00, 0x47, 0xAB]);
        let out = colorize(&base, &cobalt);
        let [r, g, b, a] = out.get_pixel(0, 0).0;

        assert_eq!(r, 0);
        assert!((g as i32 - 35).abs() <= 1, "g = {g}");
        assert!((b as i32 - 85).abs() <= 1, "b = {b}");
        assert_eq!(a, 255);
    }

    #[test]
    fn channel_ratio_follows_target_scaled_by_luminance() {
        let base = shaded_base();
        let target = GarmentColor::new("Teal", [0, 180, 160]);
        let out = colorize(&base, &target);

        for (x, y, pixel) in out.enumerate_pixels() {
            let src = base.get_pixel(x, y).0;
            if src[3] == 0 {
                continue;
            }
            let lum = luminance(src[0], src[1], src[2]);
            let expected = [
                (0.0 * lum).round() as u8,
                (180.0 * lum).round() as u8,
                (160.0 * lum).round() as u8,
            ];
            assert_eq!(&pixel.0[..3], &expected);
        }
    }

    #[test]
    fn contrast_flips_with_lightness() {
        let white = GarmentColor::base();
        let navy = GarmentColor::new("Navy", [10, 15, 60]);
        assert_eq!(contrast_color(&white)[0], 40);
        assert_eq!(contrast_color(&navy)[0], 230);
    }
}
