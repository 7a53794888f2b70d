//! Spatial partitioning for the broad phase
//!
//! A uniform grid keyed by collidable id. The grid never owns collidables;
//! it only records which cells their bounding boxes touch.

mod spatial_hash;

pub use spatial_hash::{CellView, SpatialHash};
