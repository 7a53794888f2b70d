//! # Spatial Collision
//!
//! 2D broad-phase collision on a uniform spatial hash, with a per-tick
//! resolver that tracks overlap lifecycles (began, persists, ended) and
//! read-only spatial queries.
//!
//! ## Quick Start
//!
//! ```rust
//! use spatial_collision::prelude::*;
//!
//! let mut system = CollisionSystem::new(Rect::new(0.0, 0.0, 512.0, 512.0), 8, 8)?;
//! let a = system.add(Collidable::new(Collider::circle(Vec2::new(100.0, 100.0), 10.0)));
//! let b = system.add(Collidable::new(Collider::circle(Vec2::new(115.0, 100.0), 10.0)));
//!
//! let report = system.update(1.0 / 60.0);
//! assert_eq!(report.began, 2);
//! assert_eq!(system.overlapping(a), &[b]);
//! # Ok::<(), CollisionError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError, GridBounds},
        foundation::{collections::CollidableId, math::Vec2},
        physics::{
            Circle, Collidable, CollisionCommands, CollisionError, CollisionEvent, CollisionHandler,
            CollisionInfo, CollisionLayers, CollisionMask, CollisionPoint, CollisionSystem, Collider,
            ColliderFlags, ColliderShape, Polygon, QueryCaster, QueryHit, Ray, RaycastHit, Rect, Segment,
            Shape, TickReport, Triangle,
        },
        spatial::{CellView, SpatialHash},
    };
}
