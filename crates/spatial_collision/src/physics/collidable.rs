//! Collidable: a collider with layer filtering and an event handler

use super::collider::Collider;
use super::collision::{Rect, Shape};
use super::collision_layers::{CollisionLayer, CollisionLayers, CollisionMask};
use super::events::CollisionHandler;
use crate::foundation::math::Vec2;
use std::fmt;

/// An object tracked by the collision system
///
/// Identity is the [`CollidableId`](crate::foundation::collections::CollidableId)
/// handed out on registration, never the shape.
pub struct Collidable {
    /// Shape, transform and body state
    pub collider: Collider,
    /// The single layer this collidable belongs to
    pub layer: CollisionLayer,
    /// Layers this collidable reacts to; empty accepts all
    pub mask: CollisionMask,
    handler: Option<Box<dyn CollisionHandler>>,
}

impl Collidable {
    /// Creates a collidable on [`CollisionLayers::DEFAULT`] accepting every layer
    pub fn new(collider: Collider) -> Self {
        Self {
            collider,
            layer: CollisionLayers::DEFAULT,
            mask: CollisionMask::ALL,
            handler: None,
        }
    }

    /// Set the layer (builder pattern)
    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Set the mask (builder pattern)
    pub fn with_mask(mut self, mask: CollisionMask) -> Self {
        self.mask = mask;
        self
    }

    /// Attach an event handler (builder pattern)
    pub fn with_handler(mut self, handler: impl CollisionHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Replace the event handler
    pub fn set_handler(&mut self, handler: Option<Box<dyn CollisionHandler>>) {
        self.handler = handler;
    }

    /// Whether a handler is attached
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub(crate) fn take_handler(&mut self) -> Option<Box<dyn CollisionHandler>> {
        self.handler.take()
    }

    pub(crate) fn restore_handler(&mut self, handler: Box<dyn CollisionHandler>) {
        // A handler installed while dispatching wins over the one being returned.
        if self.handler.is_none() {
            self.handler = Some(handler);
        }
    }

    /// Shortcut for the collider's enabled flag
    pub fn is_enabled(&self) -> bool {
        self.collider.is_enabled()
    }

    /// Shortcut for the collider's position
    pub fn position(&self) -> Vec2 {
        self.collider.position()
    }

    /// World-space shape
    pub fn shape(&self) -> Shape {
        self.collider.shape()
    }

    /// Bounds of the world-space shape
    pub fn bounding_box(&self) -> Rect {
        self.collider.bounding_box()
    }

    /// Whether `other`'s layer passes this collidable's mask
    pub fn accepts(&self, other: &Collidable) -> bool {
        self.mask.accepts(other.layer)
    }
}

impl fmt::Debug for Collidable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collidable")
            .field("collider", &self.collider)
            .field("layer", &self.layer)
            .field("mask", &self.mask)
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

impl From<Collider> for Collidable {
    fn from(collider: Collider) -> Self {
        Self::new(collider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;
    impl CollisionHandler for Noop {}

    #[test]
    fn test_defaults_accept_everything() {
        let a = Collidable::new(Collider::circle(Vec2::zeros(), 1.0));
        let b = Collidable::new(Collider::circle(Vec2::zeros(), 1.0)).with_layer(CollisionLayers::ENEMY);
        assert!(a.accepts(&b));
        assert_eq!(a.layer, CollisionLayers::DEFAULT);
    }

    #[test]
    fn test_mask_rejects_other_layers() {
        let a = Collidable::new(Collider::circle(Vec2::zeros(), 1.0))
            .with_mask(CollisionMask::from_layers(&[CollisionLayers::PLAYER]));
        let b = Collidable::new(Collider::circle(Vec2::zeros(), 1.0)).with_layer(CollisionLayers::ENEMY);
        assert!(!a.accepts(&b));
        assert!(b.accepts(&a));
    }

    #[test]
    fn test_handler_round_trip() {
        let mut a = Collidable::new(Collider::circle(Vec2::zeros(), 1.0)).with_handler(Noop);
        let handler = a.take_handler();
        assert!(!a.has_handler());
        if let Some(handler) = handler {
            a.restore_handler(handler);
        }
        assert!(a.has_handler());
    }
}
