//! threadlab: Interactive garment design engine
//!
//! This crate provides the model and rendering core for a garment
//! customizer: four fixed views (front, back, left, right) over base
//! garment images, luminance-preserving colorization, and one draggable,
//! resizable text or image overlay per view.
//!
//! # Example
//!
//! ```
//! use threadlab::{
//!     Angle, CanvasSize, DesignComposer, GarmentColor, PointerEvent,
//!     RendererConfig, TextOverlay,
//! };
//!
//! let config = RendererConfig::new(CanvasSize::new(500, 500));
//! let mut composer = DesignComposer::new(config);
//!
//! // Pick a color and place a text overlay on the front view
//! composer.set_color(GarmentColor::new("Cobalt", [0x00, 0x47, 0xAB]));
//! composer.set_text(
//!     Angle::Front,
//!     TextOverlay::new("HELLO", "sans", 32.0).at(250.0, 180.0),
//! );
//!
//! // Drag it with pointer events
//! composer.handle_pointer(PointerEvent::down(250.0, 180.0));
//! composer.handle_pointer(PointerEvent::moved(260.0, 210.0));
//! composer.handle_pointer(PointerEvent::up(260.0, 210.0));
//!
//! let moved = composer.model(Angle::Front).text().unwrap().position;
//! assert_eq!((moved.x, moved.y), (260.0, 210.0));
//! ```
//!
//! # Serializable Profiles
//!
//! For persistence and cart/catalog communication, use [`DesignProfile`]:
//!
//! ```
//! use threadlab::{CanvasSize, DesignComposer, DesignProfile, RendererConfig};
//!
//! let composer = DesignComposer::new(RendererConfig::new(CanvasSize::new(500, 500)));
//!
//! // Export current state
//! let profile = DesignProfile::export(&composer.design());
//! let json = profile.to_json().unwrap();
//!
//! // Restore it elsewhere (image sources resolved by the caller)
//! let restored = DesignProfile::from_json(&json).unwrap();
//! let mut replay = DesignComposer::new(RendererConfig::new(CanvasSize::new(500, 500)));
//! restored.apply(&mut replay, |_source_ref| None);
//! ```

mod angle;
mod asset;
mod color;
mod composer;
mod design;
mod error;
mod geom;
mod interact;
mod logging;
mod overlay;
mod profile;
mod render;

pub use angle::{Angle, AngleMap};
pub use asset::{AssetSlot, AssetState, GarmentAssets, decode_rgba};
pub use color::{GarmentColor, NATIVE_HUE, colorize, contrast_color, luminance};
pub use composer::DesignComposer;
pub use design::{CaptureResult, CommittedDesign, Design};
pub use error::EngineError;
pub use geom::{BoundingBox, CanvasSize, PointPx, SizeF};
pub use interact::{
    CursorHint, Handle, InteractionController, InteractionState, KeyInput, PointerEvent,
    TransformUpdate,
};
pub use logging::{LoggingConfig, init_logging};
pub use overlay::text::FontStore;
pub use overlay::{ImageOverlay, Overlay, OverlayModel, TextOverlay};
pub use profile::{ColorSettings, DesignProfile, OverlaySettings};
pub use render::{RendererConfig, ViewRenderer};
