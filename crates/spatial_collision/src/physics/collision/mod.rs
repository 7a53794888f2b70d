//! Shape primitives and narrow-phase tests
//!
//! All geometry here is world space and immutable. Colliders keep their
//! local description and produce a [`Shape`] on demand.
//!
//! # Module Organization
//!
//! - [`primitives`] - Circles, segments, rays and the pairwise routines
//! - [`polygon`] - Rectangles, triangles, polygons and vertex helpers
//! - [`shape`] - The [`Shape`] sum type and its dispatch tables

pub mod primitives;
pub mod polygon;
pub mod shape;

// Re-export commonly used types
pub use primitives::{Circle, ClosestPoint, CollisionPoint, Ray, Segment};
pub use polygon::{Polygon, Rect, Triangle};
pub use shape::Shape;
