//! Serializable design profile for cross-process communication.
//!
//! A [`DesignProfile`] captures the garment color and per-angle overlay
//! settings in a format that can be serialized to JSON and handed to
//! catalog and cart collaborators, or replayed into a fresh
//! [`DesignComposer`].
//!
//! Image overlay pixels are never embedded in the profile; an image overlay
//! travels as its `sourceRef` (an upload or asset identifier) and is
//! re-resolved to a bitmap when the profile is applied.
//!
//! # Example
//!
//! ```
//! use threadlab::{ColorSettings, DesignProfile, OverlaySettings};
//!
//! // Build a profile
//! let profile = DesignProfile::new()
//!     .with_color(ColorSettings {
//!         name: "Cobalt".into(),
//!         rgb: [0x00, 0x47, 0xAB],
//!         prerendered: false,
//!     })
//!     .with_front(OverlaySettings::Text {
//!         content: "HELLO".into(),
//!         font: "sans".into(),
//!         color: [40, 40, 40, 255],
//!         size: 32.0,
//!         x: 250.0,
//!         y: 180.0,
//!     });
//!
//! // Serialize to JSON for the cart
//! let json = profile.to_json().unwrap();
//!
//! // Deserialize on the other side
//! let restored = DesignProfile::from_json(&json).unwrap();
//! assert!(restored.front.is_some());
//! ```

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::color::GarmentColor;
use crate::composer::DesignComposer;
use crate::design::Design;
use crate::overlay::{ImageOverlay, Overlay, TextOverlay};

// ============================================================================
// Color Settings (Serializable)
// ============================================================================

/// Serializable garment color selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ColorSettings {
    /// Display name shown in the color picker.
    pub name: String,

    /// Target color as `[r, g, b]`.
    pub rgb: [u8; 3],

    /// Whether the base assets are already painted in this color and the
    /// colorization pass must be skipped.
    #[serde(default)]
    pub prerendered: bool,
}

impl From<&GarmentColor> for ColorSettings {
    fn from(color: &GarmentColor) -> Self {
        Self {
            name: color.name.clone(),
            rgb: color.rgb,
            prerendered: color.prerendered,
        }
    }
}

impl From<ColorSettings> for GarmentColor {
    fn from(settings: ColorSettings) -> Self {
        GarmentColor {
            name: settings.name,
            rgb: settings.rgb,
            prerendered: settings.prerendered,
        }
    }
}

// ============================================================================
// Overlay Settings (Serializable)
// ============================================================================

/// Serializable settings for one angle's overlay.
///
/// Tagged by kind:
///
/// ```json
/// { "type": "text", "content": "HELLO", "font": "sans",
///   "color": [40, 40, 40, 255], "size": 32.0, "x": 250.0, "y": 180.0 }
/// // or
/// { "type": "image", "sourceRef": "upload-17",
///   "x": 250.0, "y": 180.0, "width": 140.0, "height": 90.0 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OverlaySettings {
    Text {
        content: String,
        font: String,
        color: [u8; 4],
        size: f32,
        x: f32,
        y: f32,
    },
    Image {
        source_ref: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl OverlaySettings {
    /// Converts a live overlay into its serializable form.
    ///
    /// Returns `None` for an image overlay with no `source_ref`: its pixels
    /// cannot be re-resolved, so it is omitted from the profile.
    fn from_overlay(overlay: &Overlay) -> Option<Self> {
        match overlay {
            Overlay::Text(text) => Some(Self::Text {
                content: text.content.clone(),
                font: text.font.clone(),
                color: text.color,
                size: text.size,
                x: text.position.x,
                y: text.position.y,
            }),
            Overlay::Image(image) => {
                let source_ref = image.source_ref.clone()?;
                Some(Self::Image {
                    source_ref,
                    x: image.position.x,
                    y: image.position.y,
                    width: image.size.width,
                    height: image.size.height,
                })
            }
        }
    }
}

// ============================================================================
// DesignProfile
// ============================================================================

/// A serializable profile containing the full customization state.
///
/// This is the primary type for persisting a design or sending it to the
/// catalog/cart backend. Each angle carries at most one overlay setting;
/// `None` means the angle is plain.
///
/// # JSON Format
///
/// ```json
/// {
///   "color": { "name": "Cobalt", "rgb": [0, 71, 171], "prerendered": false },
///   "front": { "type": "text", "content": "HELLO", "font": "sans",
///              "color": [40, 40, 40, 255], "size": 32.0,
///              "x": 250.0, "y": 180.0 },
///   "back": { "type": "image", "sourceRef": "upload-17",
///             "x": 250.0, "y": 180.0, "width": 140.0, "height": 90.0 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignProfile {
    /// Garment color selection. `None` means the native (uncolorized) base.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub front: Option<OverlaySettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<OverlaySettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<OverlaySettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<OverlaySettings>,
}

impl DesignProfile {
    /// Creates an empty profile with no color or overlays set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the garment color.
    pub fn with_color(mut self, settings: ColorSettings) -> Self {
        self.color = Some(settings);
        self
    }

    /// Sets the front overlay.
    pub fn with_front(mut self, settings: OverlaySettings) -> Self {
        self.front = Some(settings);
        self
    }

    /// Sets the back overlay.
    pub fn with_back(mut self, settings: OverlaySettings) -> Self {
        self.back = Some(settings);
        self
    }

    /// Sets the left overlay.
    pub fn with_left(mut self, settings: OverlaySettings) -> Self {
        self.left = Some(settings);
        self
    }

    /// Sets the right overlay.
    pub fn with_right(mut self, settings: OverlaySettings) -> Self {
        self.right = Some(settings);
        self
    }

    /// The overlay settings recorded for `angle`.
    pub fn overlay(&self, angle: Angle) -> Option<&OverlaySettings> {
        match angle {
            Angle::Front => self.front.as_ref(),
            Angle::Back => self.back.as_ref(),
            Angle::Left => self.left.as_ref(),
            Angle::Right => self.right.as_ref(),
        }
    }

    fn overlay_mut(&mut self, angle: Angle) -> &mut Option<OverlaySettings> {
        match angle {
            Angle::Front => &mut self.front,
            Angle::Back => &mut self.back,
            Angle::Left => &mut self.left,
            Angle::Right => &mut self.right,
        }
    }

    /// Captures a design snapshot as a profile.
    ///
    /// Image overlays without a `source_ref` are omitted: their pixels live
    /// only in memory and cannot be restored from a profile.
    pub fn export(design: &Design) -> Self {
        let mut profile = Self::new().with_color(ColorSettings::from(&design.color));
        for angle in Angle::ALL {
            *profile.overlay_mut(angle) = design
                .overlay(angle)
                .and_then(OverlaySettings::from_overlay);
        }
        profile
    }

    /// Replays this profile into a composer.
    ///
    /// `resolve` maps an image overlay's `source_ref` back to its bitmap;
    /// returning `None` skips that overlay with a warning. Angles the
    /// profile does not mention are cleared, so applying a profile fully
    /// replaces the composer's overlay state.
    pub fn apply(
        &self,
        composer: &mut DesignComposer,
        mut resolve: impl FnMut(&str) -> Option<RgbaImage>,
    ) {
        if let Some(color) = &self.color {
            composer.set_color(GarmentColor::from(color.clone()));
        }
        for angle in Angle::ALL {
            match self.overlay(angle) {
                Some(OverlaySettings::Text {
                    content,
                    font,
                    color,
                    size,
                    x,
                    y,
                }) => {
                    let overlay = TextOverlay::new(content.clone(), font.clone(), *size)
                        .with_color(*color)
                        .at(*x, *y);
                    composer.set_text(angle, overlay);
                }
                Some(OverlaySettings::Image {
                    source_ref,
                    x,
                    y,
                    width,
                    height,
                }) => match resolve(source_ref) {
                    Some(bitmap) => {
                        let overlay = ImageOverlay::new(bitmap)
                            .with_source_ref(source_ref.clone())
                            .with_size(*width, *height)
                            .at(*x, *y);
                        composer.set_image(angle, overlay);
                    }
                    None => {
                        log::warn!(
                            "skipping {} overlay: source {source_ref:?} did not resolve",
                            angle.label()
                        );
                        composer.clear_overlay(angle);
                    }
                },
                None => composer.clear_overlay(angle),
            }
        }
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::CanvasSize;
    use crate::render::RendererConfig;

    fn text_settings(content: &str, x: f32, y: f32) -> OverlaySettings {
        OverlaySettings::Text {
            content: content.into(),
            font: "sans".into(),
            color: [40, 40, 40, 255],
            size: 24.0,
            x,
            y,
        }
    }

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = DesignProfile::new()
            .with_color(ColorSettings {
                name: "Cobalt".into(),
                rgb: [0x00, 0x47, 0xAB],
                prerendered: false,
            })
            .with_front(text_settings("HELLO", 250.0, 180.0))
            .with_back(OverlaySettings::Image {
                source_ref: "upload-17".into(),
                x: 250.0,
                y: 180.0,
                width: 140.0,
                height: 90.0,
            });

        let json = profile.to_json().unwrap();
        let restored = DesignProfile::from_json(&json).unwrap();

        assert_eq!(restored.color.as_ref().unwrap().rgb, [0x00, 0x47, 0xAB]);
        assert_eq!(restored.front, profile.front);
        assert_eq!(restored.back, profile.back);
        assert!(restored.left.is_none());
        assert!(restored.right.is_none());
    }

    #[test]
    fn profile_json_format() {
        let profile = DesignProfile::new()
            .with_color(ColorSettings {
                name: "Cobalt".into(),
                rgb: [0, 71, 171],
                prerendered: false,
            })
            .with_back(OverlaySettings::Image {
                source_ref: "upload-17".into(),
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
            });

        let json = profile.to_json_pretty().unwrap();

        // Verify camelCase serialization and the kind tag
        assert!(json.contains("\"color\""));
        assert!(json.contains("\"type\": \"image\""));
        assert!(json.contains("\"sourceRef\""));
        assert!(!json.contains("\"front\""));
    }

    #[test]
    fn empty_profile_deserializes() {
        let profile = DesignProfile::from_json("{}").unwrap();

        assert!(profile.color.is_none());
        for angle in Angle::ALL {
            assert!(profile.overlay(angle).is_none());
        }
    }

    #[test]
    fn export_skips_images_without_source_ref() {
        let mut composer = DesignComposer::new(RendererConfig::new(CanvasSize::new(200, 200)));
        composer.set_text(
            Angle::Front,
            TextOverlay::new("HELLO", "sans", 24.0).at(100.0, 100.0),
        );
        composer.set_image(
            Angle::Back,
            ImageOverlay::new(RgbaImage::new(40, 40)).at(100.0, 100.0),
        );
        composer.set_image(
            Angle::Left,
            ImageOverlay::new(RgbaImage::new(40, 40))
                .with_source_ref("upload-3")
                .at(100.0, 100.0),
        );

        let profile = DesignProfile::export(&composer.design());

        assert!(matches!(
            profile.front,
            Some(OverlaySettings::Text { ref content, .. }) if content == "HELLO"
        ));
        assert!(profile.back.is_none());
        assert!(matches!(
            profile.left,
            Some(OverlaySettings::Image { ref source_ref, .. }) if source_ref == "upload-3"
        ));
    }

    #[test]
    fn apply_restores_overlays_and_clears_unmentioned_angles() {
        let mut composer = DesignComposer::new(RendererConfig::new(CanvasSize::new(200, 200)));
        composer.set_text(
            Angle::Right,
            TextOverlay::new("STALE", "sans", 24.0).at(100.0, 100.0),
        );

        let profile = DesignProfile::new()
            .with_color(ColorSettings {
                name: "Red".into(),
                rgb: [200, 0, 0],
                prerendered: false,
            })
            .with_front(text_settings("HELLO", 100.0, 100.0))
            .with_back(OverlaySettings::Image {
                source_ref: "upload-3".into(),
                x: 100.0,
                y: 100.0,
                width: 40.0,
                height: 40.0,
            });

        profile.apply(&mut composer, |source_ref| {
            assert_eq!(source_ref, "upload-3");
            Some(RgbaImage::new(40, 40))
        });

        assert_eq!(composer.color().rgb, [200, 0, 0]);
        assert_eq!(
            composer.model(Angle::Front).text().unwrap().content,
            "HELLO"
        );
        let back = composer.model(Angle::Back).image().unwrap();
        assert_eq!(back.source_ref.as_deref(), Some("upload-3"));
        assert_eq!((back.size.width, back.size.height), (40.0, 40.0));

        // Profiles fully replace overlay state.
        assert!(composer.model(Angle::Right).is_empty());
    }

    #[test]
    fn apply_skips_unresolved_image_source() {
        let mut composer = DesignComposer::new(RendererConfig::new(CanvasSize::new(200, 200)));
        let profile = DesignProfile::new().with_front(OverlaySettings::Image {
            source_ref: "gone".into(),
            x: 100.0,
            y: 100.0,
            width: 40.0,
            height: 40.0,
        });

        profile.apply(&mut composer, |_| None);
        assert!(composer.model(Angle::Front).is_empty());
    }

    #[test]
    fn export_then_apply_roundtrip() {
        let config = RendererConfig::new(CanvasSize::new(200, 200));
        let mut original = DesignComposer::new(config);
        original.set_color(GarmentColor::new("Cobalt", [0x00, 0x47, 0xAB]));
        original.set_text(
            Angle::Front,
            TextOverlay::new("HELLO", "sans", 24.0).at(90.0, 110.0),
        );

        let json = DesignProfile::export(&original.design()).to_json().unwrap();
        let profile = DesignProfile::from_json(&json).unwrap();

        let mut restored = DesignComposer::new(config);
        profile.apply(&mut restored, |_| None);

        assert_eq!(restored.design(), original.design());
    }
}
