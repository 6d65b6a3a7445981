//! Pointer-driven interaction state machine.
//!
//! The machine interprets pointer and keyboard events against one angle's
//! [`OverlayModel`]: drag-to-move for both overlay types, 8-handle resize
//! for image overlays, keyboard +/- sizing for text. Transitions are plain
//! value updates, so a test harness can drive the whole machine with
//! synthetic events and no rendering surface.
//!
//! Touch input uses the identical machine; the embedding layer maps the
//! first touch point's coordinates onto the same [`PointerEvent`]s, with
//! touch-end delivered as [`PointerEvent::Up`].

use crate::geom::{BoundingBox, PointPx, SizeF};
use crate::overlay::{Overlay, OverlayModel};

/// Hit tolerance radius around each resize handle, in px.
pub const HANDLE_HIT_RADIUS: f32 = 8.0;
/// Extra hit padding around a text overlay's measured bounding box.
pub const TEXT_HIT_PADDING: f32 = 5.0;
/// Font-size step applied per keyboard +/- press.
pub const TEXT_KEY_STEP: f32 = 2.0;

// ============================================================================
// Events
// ============================================================================

/// A pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PointPx),
    Move(PointPx),
    Up(PointPx),
    /// Pointer capture lost (e.g. window blur); finalizes like `Up`.
    Cancel,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self::Down(PointPx::new(x, y))
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::Move(PointPx::new(x, y))
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::Up(PointPx::new(x, y))
    }
}

/// Keyboard input the machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// `+`: grow the text overlay.
    Plus,
    /// `-`: shrink the text overlay.
    Minus,
}

// ============================================================================
// Handles
// ============================================================================

/// One of the eight resize grips on an image overlay's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::NorthWest,
        Handle::North,
        Handle::NorthEast,
        Handle::East,
        Handle::SouthEast,
        Handle::South,
        Handle::SouthWest,
        Handle::West,
    ];

    /// True for the four corner grips (aspect-locked resize).
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Handle::NorthWest | Handle::NorthEast | Handle::SouthEast | Handle::SouthWest
        )
    }

    /// The grip's position on a bounding box.
    pub fn anchor(&self, bb: &BoundingBox) -> PointPx {
        let (x, y) = match self {
            Handle::NorthWest => (bb.left(), bb.top()),
            Handle::North => (bb.center.x, bb.top()),
            Handle::NorthEast => (bb.right(), bb.top()),
            Handle::East => (bb.right(), bb.center.y),
            Handle::SouthEast => (bb.right(), bb.bottom()),
            Handle::South => (bb.center.x, bb.bottom()),
            Handle::SouthWest => (bb.left(), bb.bottom()),
            Handle::West => (bb.left(), bb.center.y),
        };
        PointPx::new(x, y)
    }

    fn cursor(&self) -> CursorHint {
        match self {
            Handle::NorthWest | Handle::SouthEast => CursorHint::ResizeNwSe,
            Handle::NorthEast | Handle::SouthWest => CursorHint::ResizeNeSw,
            Handle::North | Handle::South => CursorHint::ResizeNs,
            Handle::East | Handle::West => CursorHint::ResizeEw,
        }
    }
}

/// Cursor shape suggestion for hover feedback. Presentation only; no effect
/// on the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Move,
    ResizeNwSe,
    ResizeNeSw,
    ResizeNs,
    ResizeEw,
}

// ============================================================================
// State machine
// ============================================================================

/// Current interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    /// A body drag: `pointer_offset` is pointer minus overlay center at the
    /// moment of grab, so the overlay doesn't jump under the pointer.
    Dragging { pointer_offset: PointPx },
    /// A handle drag: the center stays fixed at `anchor_center` and size is
    /// recomputed from the pointer's displacement from it.
    Resizing {
        handle: Handle,
        anchor_center: PointPx,
        start_size: SizeF,
    },
}

/// Final transform reported to the commit callback at gesture end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformUpdate {
    pub position: PointPx,
    /// Bounding-box size (measured for text overlays).
    pub size: SizeF,
    /// Font size for text overlays, so form fields can mirror it.
    pub font_size: Option<f32>,
}

type CommitCallback = Box<dyn FnMut(TransformUpdate)>;

/// Drives [`InteractionState`] transitions against one overlay model.
///
/// The controller is transient: it holds no overlay data of its own beyond
/// the in-flight gesture, and resetting it (e.g. when the active angle
/// switches) leaves the model at its last written values.
#[derive(Default)]
pub struct InteractionController {
    state: InteractionState,
    on_commit: Option<CommitCallback>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback invoked with the final transform whenever a
    /// gesture commits, so external form state stays in sync.
    pub fn set_commit_callback(&mut self, callback: impl FnMut(TransformUpdate) + 'static) {
        self.on_commit = Some(Box::new(callback));
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Aborts any in-flight gesture. The model keeps whatever the gesture
    /// last wrote.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Suggests a cursor shape for the pointer at `p`.
    pub fn cursor_hint(&self, model: &OverlayModel, p: PointPx) -> CursorHint {
        match self.state {
            InteractionState::Dragging { .. } => CursorHint::Move,
            InteractionState::Resizing { handle, .. } => handle.cursor(),
            InteractionState::Idle => {
                if let Some(handle) = hit_handle(model, p) {
                    handle.cursor()
                } else if hit_body(model, p) {
                    CursorHint::Move
                } else {
                    CursorHint::Default
                }
            }
        }
    }

    /// Feeds one pointer event through the machine.
    ///
    /// Returns true if the overlay model changed (a redraw is needed).
    pub fn handle_pointer(&mut self, model: &mut OverlayModel, event: PointerEvent) -> bool {
        match (self.state, event) {
            (InteractionState::Idle, PointerEvent::Down(p)) => {
                // Handles win over the body wherever the regions overlap.
                if let Some(handle) = hit_handle(model, p) {
                    let bb = model
                        .bounding_box()
                        .unwrap_or(BoundingBox::new(p, SizeF::default()));
                    self.state = InteractionState::Resizing {
                        handle,
                        anchor_center: bb.center,
                        start_size: bb.size,
                    };
                    log::trace!("resize gesture started on {handle:?}");
                } else if hit_body(model, p) {
                    let center = model.bounding_box().map(|bb| bb.center).unwrap_or(p);
                    self.state = InteractionState::Dragging {
                        pointer_offset: PointPx::new(p.x - center.x, p.y - center.y),
                    };
                    log::trace!("drag gesture started");
                }
                false
            }
            (InteractionState::Dragging { pointer_offset }, PointerEvent::Move(p)) => {
                model.update_position(p.x - pointer_offset.x, p.y - pointer_offset.y);
                true
            }
            (
                InteractionState::Resizing {
                    handle,
                    anchor_center,
                    start_size,
                },
                PointerEvent::Move(p),
            ) => {
                let size = resized_from_handle(handle, anchor_center, start_size, p);
                model.update_size(size.width, size.height);
                true
            }
            (
                InteractionState::Dragging { .. } | InteractionState::Resizing { .. },
                PointerEvent::Up(_) | PointerEvent::Cancel,
            ) => {
                // Every intermediate frame was already committed to the
                // model; finishing only notifies and returns to Idle.
                self.state = InteractionState::Idle;
                self.notify_commit(model);
                false
            }
            _ => false,
        }
    }

    /// Feeds a keyboard event through the machine (text sizing only).
    ///
    /// Returns true if the overlay model changed.
    pub fn handle_key(&mut self, model: &mut OverlayModel, key: KeyInput) -> bool {
        if model.text().is_none() {
            return false;
        }
        let delta = match key {
            KeyInput::Plus => TEXT_KEY_STEP,
            KeyInput::Minus => -TEXT_KEY_STEP,
        };
        model.adjust_text_size(delta);
        self.notify_commit(model);
        true
    }

    fn notify_commit(&mut self, model: &OverlayModel) {
        let (Some(callback), Some(bb)) = (self.on_commit.as_mut(), model.bounding_box()) else {
            return;
        };
        callback(TransformUpdate {
            position: bb.center,
            size: bb.size,
            font_size: model.text().map(|t| t.size),
        });
    }
}

// ============================================================================
// Hit testing and resize math
// ============================================================================

/// Finds the handle under the pointer. Handles exist only on image
/// overlays; text overlays resize via keyboard/explicit controls.
fn hit_handle(model: &OverlayModel, p: PointPx) -> Option<Handle> {
    let overlay = model.overlay()?;
    if !matches!(overlay, Overlay::Image(_)) {
        return None;
    }
    let bb = overlay.bounding_box();
    Handle::ALL.into_iter().find(|h| {
        let a = h.anchor(&bb);
        (p.x - a.x).abs() <= HANDLE_HIT_RADIUS && (p.y - a.y).abs() <= HANDLE_HIT_RADIUS
    })
}

/// Tests the overlay body: the bounding box for images, the measured box
/// with a small padding for text.
fn hit_body(model: &OverlayModel, p: PointPx) -> bool {
    match model.overlay() {
        Some(Overlay::Image(_)) => model
            .bounding_box()
            .is_some_and(|bb| bb.contains(p)),
        Some(Overlay::Text(_)) => model
            .bounding_box()
            .is_some_and(|bb| bb.padded(TEXT_HIT_PADDING).contains(p)),
        None => false,
    }
}

/// Computes the new size implied by dragging `handle` to `pointer`, with
/// the overlay center fixed at `anchor_center`.
///
/// Corner handles lock the start aspect ratio: whichever implied dimension
/// is larger relative to that ratio wins and the other is derived from it.
/// Edge handles change only their own axis.
fn resized_from_handle(
    handle: Handle,
    anchor_center: PointPx,
    start_size: SizeF,
    pointer: PointPx,
) -> SizeF {
    let dx = (pointer.x - anchor_center.x).abs();
    let dy = (pointer.y - anchor_center.y).abs();
    let implied_w = dx * 2.0;
    let implied_h = dy * 2.0;

    if handle.is_corner() {
        let ratio = start_size.aspect_ratio();
        if implied_w >= implied_h * ratio {
            SizeF::new(implied_w, implied_w / ratio)
        } else {
            SizeF::new(implied_h * ratio, implied_h)
        }
    } else {
        match handle {
            Handle::East | Handle::West => SizeF::new(implied_w, start_size.height),
            Handle::North | Handle::South => SizeF::new(start_size.width, implied_h),
            _ => start_size,
        }
    }
}
