//! Overlap events and the handler interface
//!
//! The resolver queues events while it scans and delivers them once the
//! scan is over. Handlers cannot touch the registry directly; they get a
//! [`CollisionCommands`] whose add/remove calls are queued and applied at
//! the start of the next tick.

use super::collidable::Collidable;
use super::collision::CollisionPoint;
use super::collision_layers::CollisionLayer;
use super::registry::CollidableRegistry;
use crate::foundation::collections::CollidableId;
use crate::foundation::math::Vec2;

/// Details of an overlap, as seen from the owner
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionInfo {
    /// Collidable receiving the event
    pub owner: CollidableId,
    /// Collidable it overlaps
    pub other: CollidableId,
    /// Layer of `other`
    pub other_layer: CollisionLayer,
    /// True on the tick the overlap began
    pub first_contact: bool,
    /// Outline crossings; empty unless the owner computes intersections
    pub points: Vec<CollisionPoint>,
    /// Owner velocity at scan time
    pub owner_velocity: Vec2,
    /// Other velocity at scan time
    pub other_velocity: Vec2,
}

/// Overlap lifecycle transition for an ordered pair (owner watching other)
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionEvent {
    /// Not overlapping last tick, overlapping now
    Began(CollisionInfo),
    /// Overlapping last tick and still overlapping
    Persists(CollisionInfo),
    /// Overlapping last tick, not any more
    Ended {
        /// Collidable receiving the event
        owner: CollidableId,
        /// Collidable it stopped overlapping
        other: CollidableId,
    },
}

impl CollisionEvent {
    /// Collidable the event is delivered to
    pub fn owner(&self) -> CollidableId {
        match self {
            Self::Began(info) | Self::Persists(info) => info.owner,
            Self::Ended { owner, .. } => *owner,
        }
    }

    /// The other collidable of the pair
    pub fn other(&self) -> CollidableId {
        match self {
            Self::Began(info) | Self::Persists(info) => info.other,
            Self::Ended { other, .. } => *other,
        }
    }

    /// Overlap details for began/persists events
    pub fn info(&self) -> Option<&CollisionInfo> {
        match self {
            Self::Began(info) | Self::Persists(info) => Some(info),
            Self::Ended { .. } => None,
        }
    }

    /// True for [`CollisionEvent::Began`]
    pub fn is_began(&self) -> bool {
        matches!(self, Self::Began(_))
    }

    /// True for [`CollisionEvent::Persists`]
    pub fn is_persists(&self) -> bool {
        matches!(self, Self::Persists(_))
    }

    /// True for [`CollisionEvent::Ended`]
    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended { .. })
    }
}

/// Reaction to overlap events
///
/// Both methods default to no-ops.
pub trait CollisionHandler {
    /// Called for began and persists events
    fn overlap(&mut self, _info: &CollisionInfo, _commands: &mut CollisionCommands<'_>) {}

    /// Called when the owner stopped overlapping `other`
    ///
    /// Only the side whose scan noticed the change is told; the reverse pair
    /// ends independently when `other` runs its own scan.
    fn overlap_ended(&mut self, _other: CollidableId, _commands: &mut CollisionCommands<'_>) {}
}

/// Registry access handed to handlers during dispatch
pub struct CollisionCommands<'a> {
    registry: &'a mut CollidableRegistry,
    owner: CollidableId,
}

impl<'a> CollisionCommands<'a> {
    pub(crate) fn new(registry: &'a mut CollidableRegistry, owner: CollidableId) -> Self {
        Self { registry, owner }
    }

    /// Collidable whose handler is running
    pub fn owner(&self) -> CollidableId {
        self.owner
    }

    /// Queue a new collidable; it joins the scan from the next tick on
    pub fn add(&mut self, collidable: Collidable) -> CollidableId {
        self.registry.add(collidable)
    }

    /// Queue removal of `id`
    pub fn remove(&mut self, id: CollidableId) {
        // The registry is locked during dispatch, so this only queues.
        let _ = self.registry.remove(id);
    }

    /// Queue removal of the owner
    pub fn remove_self(&mut self) {
        self.remove(self.owner);
    }

    /// Read another collidable
    pub fn get(&self, id: CollidableId) -> Option<&Collidable> {
        self.registry.get(id)
    }

    /// Mutate a collidable's state (velocity, flags, ...)
    ///
    /// The owner's handler is detached while it runs, so the owner's
    /// collidable reports no handler here.
    pub fn get_mut(&mut self, id: CollidableId) -> Option<&mut Collidable> {
        self.registry.get_mut(id)
    }
}
