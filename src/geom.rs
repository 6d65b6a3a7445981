//! Canvas geometry types.
//!
//! Overlay transforms live in floating-point canvas coordinates so drag and
//! resize arithmetic stays exact between frames; conversion to integer pixels
//! happens only at composite time.

/// Pixel dimensions of a canvas surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The smaller of the two dimensions.
    pub fn min_dim(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// A point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointPx {
    pub x: f32,
    pub y: f32,
}

impl PointPx {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 2D extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width-to-height ratio. Degenerate heights yield 1.0 so resize math
    /// never divides by zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height <= f32::EPSILON {
            1.0
        } else {
            self.width / self.height
        }
    }
}

// ============================================================================
// BoundingBox
// ============================================================================

/// An axis-aligned box anchored at its center.
///
/// Overlay positions are center-anchored, so this is the natural shape for
/// hit testing and clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub center: PointPx,
    pub size: SizeF,
}

impl BoundingBox {
    pub fn new(center: PointPx, size: SizeF) -> Self {
        Self { center, size }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.size.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.size.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.size.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.height / 2.0
    }

    /// True if the point lies inside the box (edges inclusive).
    pub fn contains(&self, p: PointPx) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// The same box expanded by `pad` on every side.
    pub fn padded(&self, pad: f32) -> Self {
        Self {
            center: self.center,
            size: SizeF::new(self.size.width + pad * 2.0, self.size.height + pad * 2.0),
        }
    }
}

/// Clamps `value` into `[lo, hi]`, tolerating an inverted range.
///
/// When the box is wider than the clamp range (e.g. an overlay larger than
/// the canvas minus margins), the midpoint is used so the overlay stays
/// centered instead of snapping to one edge.
pub fn clamp_or_middle(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_edges() {
        let bb = BoundingBox::new(PointPx::new(100.0, 50.0), SizeF::new(40.0, 20.0));
        assert_eq!(bb.left(), 80.0);
        assert_eq!(bb.right(), 120.0);
        assert_eq!(bb.top(), 40.0);
        assert_eq!(bb.bottom(), 60.0);
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let bb = BoundingBox::new(PointPx::new(10.0, 10.0), SizeF::new(10.0, 10.0));
        assert!(bb.contains(PointPx::new(5.0, 10.0)));
        assert!(bb.contains(PointPx::new(15.0, 15.0)));
        assert!(!bb.contains(PointPx::new(15.1, 10.0)));
    }

    #[test]
    fn padded_grows_both_axes() {
        let bb = BoundingBox::new(PointPx::new(0.0, 0.0), SizeF::new(10.0, 4.0)).padded(3.0);
        assert_eq!(bb.size.width, 16.0);
        assert_eq!(bb.size.height, 10.0);
    }

    #[test]
    fn clamp_or_middle_handles_inverted_range() {
        assert_eq!(clamp_or_middle(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp_or_middle(-3.0, 0.0, 10.0), 0.0);
        // Inverted range: overlay wider than canvas, settle on the midpoint.
        assert_eq!(clamp_or_middle(2.0, 30.0, 10.0), 20.0);
    }

    #[test]
    fn aspect_ratio_degenerate_height() {
        assert_eq!(SizeF::new(10.0, 0.0).aspect_ratio(), 1.0);
        assert_eq!(SizeF::new(30.0, 15.0).aspect_ratio(), 2.0);
    }
}
