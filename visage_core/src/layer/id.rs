// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer identity types.

use alloc::string::String;
use core::fmt;

use crate::appearance::Sex;

/// Sentinel value indicating "no slot" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A body-part or visual slot on a humanoid's render surface.
///
/// Declaration order is back-to-front for species that do not declare their
/// own sprite ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HumanoidLayer {
    /// Behind-the-body effects.
    Special,
    /// Tail.
    Tail,
    /// Wings.
    Wings,
    /// Torso.
    Chest,
    /// Head.
    Head,
    /// Snout or muzzle.
    Snout,
    /// Side-of-head features such as ears or frills.
    HeadSide,
    /// Top-of-head features such as horns.
    HeadTop,
    /// Eyes. Always tinted with the humanoid's eye color.
    Eyes,
    /// Right arm.
    RArm,
    /// Left arm.
    LArm,
    /// Right hand.
    RHand,
    /// Left hand.
    LHand,
    /// Right leg.
    RLeg,
    /// Left leg.
    LLeg,
    /// Right foot.
    RFoot,
    /// Left foot.
    LFoot,
    /// Lower undergarment.
    UndergarmentBottom,
    /// Upper undergarment.
    UndergarmentTop,
    /// Facial hair.
    FacialHair,
    /// Hair.
    Hair,
}

impl HumanoidLayer {
    /// Returns whether base sprites for this layer come in per-sex variants.
    #[must_use]
    pub const fn is_sex_morphed(self) -> bool {
        matches!(self, Self::Chest | Self::Head)
    }

    /// Returns the sprite id to use for `sex`, given the unmorphed `id`.
    ///
    /// Morphed variants append the sex name, e.g. `"HumanTorso"` becomes
    /// `"HumanTorsoFemale"`. Unsexed humanoids and layers without variants use
    /// `id` unchanged.
    #[must_use]
    pub fn sex_morph(self, sex: Sex, id: &str) -> String {
        if !self.is_sex_morphed() || sex == Sex::Unsexed {
            return String::from(id);
        }
        alloc::format!("{id}{sex:?}")
    }
}

/// Key under which a layer is registered on a render surface.
///
/// Base layers are keyed by their [`HumanoidLayer`]; every sprite of a marking
/// gets its own derived key so that re-applying the same marking addresses the
/// same surface layer.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKey {
    /// A body-part slot.
    Identifier(HumanoidLayer),
    /// A marking sprite, keyed by marking id and sprite state.
    Derived {
        /// Marking definition id.
        marking: String,
        /// Sprite state within the marking.
        state: String,
    },
}

impl LayerKey {
    /// Creates a derived key for one sprite of a marking.
    #[must_use]
    pub fn derived(marking: &str, state: &str) -> Self {
        Self::Derived {
            marking: String::from(marking),
            state: String::from(state),
        }
    }
}

impl From<HumanoidLayer> for LayerKey {
    fn from(layer: HumanoidLayer) -> Self {
        Self::Identifier(layer)
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(layer) => write!(f, "{layer:?}"),
            Self::Derived { marking, state } => write!(f, "{marking}-{state}"),
        }
    }
}

/// A handle to a layer slot in a [`LayerStack`](super::LayerStack).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a layer is removed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl LayerHandle {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerHandle({}@gen{})", self.idx, self.generation)
    }
}
