//! Design state handed to external cart/catalog collaborators.

use crate::angle::{Angle, AngleMap};
use crate::color::GarmentColor;
use crate::overlay::Overlay;

/// An immutable, PNG-encoded snapshot of one composed angle.
///
/// Produced once per committed angle and never mutated afterwards; the
/// payload is directly displayable by catalog and cart surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub angle: Angle,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// The full customization state of one garment instance: a single shared
/// color plus at most one overlay per angle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Design {
    pub color: GarmentColor,
    pub overlays: AngleMap<Option<Overlay>>,
}

impl Design {
    /// True when no angle carries an overlay. Such a design is not valid
    /// for commit.
    pub fn is_empty(&self) -> bool {
        self.overlays.iter().all(|(_, o)| o.is_none())
    }

    pub fn overlay(&self, angle: Angle) -> Option<&Overlay> {
        self.overlays.get(angle).as_ref()
    }
}

/// A finalized design: the frozen state plus one capture per non-empty
/// angle.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedDesign {
    pub design: Design,
    pub captures: Vec<CaptureResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::TextOverlay;

    #[test]
    fn empty_design_detection() {
        let mut design = Design::default();
        assert!(design.is_empty());

        *design.overlays.get_mut(Angle::Left) =
            Some(Overlay::Text(TextOverlay::new("X", "sans", 20.0)));
        assert!(!design.is_empty());
        assert!(design.overlay(Angle::Left).is_some());
        assert!(design.overlay(Angle::Front).is_none());
    }
}
