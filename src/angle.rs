//! Garment viewing angles.
//!
//! A design addresses exactly four fixed viewpoints. [`Angle`] is the single
//! canonical vocabulary for them; display text comes from [`Angle::label`]
//! rather than a parallel set of strings.

use serde::{Deserialize, Serialize};

/// One of the four fixed garment viewpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Angle {
    Front,
    Back,
    Left,
    Right,
}

impl Angle {
    /// All angles in their fixed order.
    ///
    /// This order doubles as the thumbnail priority order: the catalog
    /// thumbnail is captured from the first angle that carries an overlay.
    pub const ALL: [Angle; 4] = [Angle::Front, Angle::Back, Angle::Left, Angle::Right];

    /// Human-readable label for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            Angle::Front => "Front",
            Angle::Back => "Back",
            Angle::Left => "Left",
            Angle::Right => "Right",
        }
    }

    fn index(&self) -> usize {
        match self {
            Angle::Front => 0,
            Angle::Back => 1,
            Angle::Left => 2,
            Angle::Right => 3,
        }
    }
}

// ============================================================================
// AngleMap
// ============================================================================

/// A value of type `T` for each of the four angles.
///
/// Indexing is total: every angle always has a slot, so per-angle state can
/// never desynchronize from the angle vocabulary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AngleMap<T> {
    slots: [T; 4],
}

impl<T> AngleMap<T> {
    /// Builds a map by calling `f` once per angle, in fixed order.
    pub fn from_fn(mut f: impl FnMut(Angle) -> T) -> Self {
        Self {
            slots: Angle::ALL.map(&mut f),
        }
    }

    pub fn get(&self, angle: Angle) -> &T {
        &self.slots[angle.index()]
    }

    pub fn get_mut(&mut self, angle: Angle) -> &mut T {
        &mut self.slots[angle.index()]
    }

    /// Iterates over `(angle, value)` pairs in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Angle, &T)> {
        Angle::ALL.iter().map(|a| (*a, self.get(*a)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Angle, &mut T)> {
        Angle::ALL.into_iter().zip(self.slots.iter_mut())
    }
}

impl<T: Clone> AngleMap<T> {
    /// Builds a map holding a clone of `value` for every angle.
    pub fn filled(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}
