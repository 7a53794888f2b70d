//! Collision detection and response bookkeeping
//!
//! Shapes and their pairwise tests live in [`collision`]. Colliders put a
//! shape on a moving body, collidables add layer filtering and a handler,
//! and [`CollisionSystem`] runs the per-tick broad and narrow phases on top
//! of the spatial hash.

pub mod collision;
pub mod collider;
pub mod collidable;
pub mod collision_layers;
pub mod collision_system;
pub mod events;
pub mod query;
pub mod registry;

#[cfg(test)]
mod tests;

pub use collision::{Circle, ClosestPoint, CollisionPoint, Polygon, Ray, Rect, Segment, Shape, Triangle};
pub use collider::{Collider, ColliderFlags, ColliderShape};
pub use collidable::Collidable;
pub use collision_layers::{CollisionLayer, CollisionLayers, CollisionMask};
pub use collision_system::{CollisionError, CollisionSystem, TickReport};
pub use events::{CollisionCommands, CollisionEvent, CollisionHandler, CollisionInfo};
pub use query::{QueryCaster, QueryHit, RaycastHit};
pub use registry::{CollidableRegistry, Flushed};
