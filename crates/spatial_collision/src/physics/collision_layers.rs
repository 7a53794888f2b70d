//! Collision layers and masks
//!
//! A collidable belongs to exactly one layer (a single bit) and carries a
//! mask of the layers it reacts to. An empty mask matches every layer.

use serde::{Deserialize, Serialize};

/// A single collision layer bit
pub type CollisionLayer = u32;

/// Named layers. Bits 8 and up are free for games to assign via
/// [`CollisionLayers::custom`].
pub struct CollisionLayers;

impl CollisionLayers {
    /// Default layer for new collidables
    pub const DEFAULT: CollisionLayer = 1 << 0;

    /// Player controlled bodies
    pub const PLAYER: CollisionLayer = 1 << 1;

    /// Hostile bodies
    pub const ENEMY: CollisionLayer = 1 << 2;

    /// Projectiles
    pub const PROJECTILE: CollisionLayer = 1 << 3;

    /// Static level geometry
    pub const ENVIRONMENT: CollisionLayer = 1 << 4;

    /// Trigger areas with no physical response
    pub const TRIGGER: CollisionLayer = 1 << 5;

    /// First bit available for [`CollisionLayers::custom`]
    pub const FIRST_CUSTOM_BIT: u32 = 8;

    /// User layer `index` (0-based) above the named layers
    ///
    /// Indices past the last bit saturate to the highest layer.
    pub fn custom(index: u32) -> CollisionLayer {
        1 << Self::FIRST_CUSTOM_BIT.saturating_add(index).min(31)
    }
}

/// Set of layers a collidable or query accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionMask(u32);

impl CollisionMask {
    /// Empty mask: accepts every layer
    pub const ALL: CollisionMask = CollisionMask(0);

    /// Mask from raw bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Mask accepting exactly `layers`; an empty slice accepts everything
    pub fn from_layers(layers: &[CollisionLayer]) -> Self {
        Self(layers.iter().fold(0, |acc, &layer| acc | layer))
    }

    /// This mask plus `layer`
    pub const fn with_layer(self, layer: CollisionLayer) -> Self {
        Self(self.0 | layer)
    }

    /// Raw bits
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// True when no layer was named, meaning every layer matches
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether a collidable on `layer` passes this mask
    pub const fn accepts(&self, layer: CollisionLayer) -> bool {
        self.is_empty() || self.0 & layer != 0
    }
}

impl From<&[CollisionLayer]> for CollisionMask {
    fn from(layers: &[CollisionLayer]) -> Self {
        Self::from_layers(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mask_accepts_everything() {
        assert!(CollisionMask::ALL.accepts(CollisionLayers::ENEMY));
        assert!(CollisionMask::from_layers(&[]).accepts(CollisionLayers::custom(3)));
    }

    #[test]
    fn test_mask_filters_layers() {
        let mask = CollisionMask::from_layers(&[CollisionLayers::PLAYER, CollisionLayers::PROJECTILE]);
        assert!(mask.accepts(CollisionLayers::PLAYER));
        assert!(mask.accepts(CollisionLayers::PROJECTILE));
        assert!(!mask.accepts(CollisionLayers::ENEMY));
    }

    #[test]
    fn test_custom_layers_do_not_alias_named() {
        let named = CollisionMask::from_layers(&[
            CollisionLayers::DEFAULT,
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::PROJECTILE,
            CollisionLayers::ENVIRONMENT,
            CollisionLayers::TRIGGER,
        ]);
        assert_eq!(named.bits() & CollisionLayers::custom(0), 0);
        assert_eq!(CollisionLayers::custom(100), 1 << 31);
    }

    #[test]
    fn test_with_layer() {
        let mask = CollisionMask::ALL.with_layer(CollisionLayers::TRIGGER);
        assert!(!mask.is_empty());
        assert!(!mask.accepts(CollisionLayers::PLAYER));
    }
}
