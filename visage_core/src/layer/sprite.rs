// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite references assigned to layers.

use alloc::string::String;

/// Identifies the image a layer draws.
///
/// Rasterization is the surface's job; core only passes these through.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpriteSpecifier {
    /// A named state inside a sprite sheet.
    Rsi {
        /// Path of the sprite sheet.
        rsi: String,
        /// State name inside the sheet.
        state: String,
    },
    /// A standalone texture path.
    Texture(String),
}

impl SpriteSpecifier {
    /// Creates a sprite-sheet state reference.
    #[must_use]
    pub fn rsi(rsi: &str, state: &str) -> Self {
        Self::Rsi {
            rsi: String::from(rsi),
            state: String::from(state),
        }
    }

    /// Returns the sprite-sheet state, or `None` for plain textures.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        match self {
            Self::Rsi { state, .. } => Some(state),
            Self::Texture(_) => None,
        }
    }
}
