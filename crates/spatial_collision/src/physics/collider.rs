//! Colliders: a local shape plus transform and simple rigid-body state
//!
//! Shapes are stored in local space and turned into a world-space
//! [`Shape`] when asked. Polygon colliders cache their transformed
//! vertices and only recompute them after the transform or shape changed.

use super::collision::{Circle, Polygon, Ray, Rect, Segment, Shape, Triangle};
use crate::foundation::math::{utils, Vec2};
use bitflags::bitflags;
use std::cell::{Cell, RefCell};

bitflags! {
    /// Participation switches for a collider
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColliderFlags: u8 {
        /// Takes part in the grid and in queries
        const ENABLED = 1 << 0;
        /// Scans its own candidates and receives overlap events
        const COMPUTE_COLLISION = 1 << 1;
        /// Collects intersection points for its events
        const COMPUTE_INTERSECTIONS = 1 << 2;
    }
}

impl Default for ColliderFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Shape description in collider-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Circle centered on the collider position; scaled by the larger scale axis
    Circle {
        /// Local radius
        radius: f32,
    },
    /// Segment between two local points
    Segment {
        /// Local start point
        start: Vec2,
        /// Local end point
        end: Vec2,
    },
    /// Axis-aligned rectangle; rotation does not apply
    Rect {
        /// Unscaled size
        size: Vec2,
        /// Which point of the rectangle sits on the collider position
        anchor: Vec2,
    },
    /// Polygon from local vertices
    Polygon {
        /// Local vertices in order
        points: Vec<Vec2>,
    },
    /// Triangle from local vertices
    Triangle {
        /// First vertex
        a: Vec2,
        /// Second vertex
        b: Vec2,
        /// Third vertex
        c: Vec2,
    },
    /// Ray starting at the collider position
    Ray {
        /// Local direction
        direction: Vec2,
    },
}

impl ColliderShape {
    /// Circle of `radius`
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    /// Rectangle centered on the collider position
    pub fn rect(width: f32, height: f32) -> Self {
        Self::Rect {
            size: Vec2::new(width, height),
            anchor: Vec2::new(0.5, 0.5),
        }
    }

    /// Polygon from local vertices
    pub fn polygon(points: Vec<Vec2>) -> Self {
        Self::Polygon { points }
    }
}

/// A shape attached to a moving body
#[derive(Debug, Clone)]
pub struct Collider {
    shape: ColliderShape,
    position: Vec2,
    rotation: f32,
    scale: Vec2,

    /// Linear velocity in units per second
    pub velocity: Vec2,
    /// Mass; forces are ignored when this is not positive
    pub mass: f32,
    /// Linear drag coefficient per second
    pub drag: f32,
    /// Acceleration applied every step (gravity and the like)
    pub constant_acceleration: Vec2,
    accumulated_force: Vec2,

    flags: ColliderFlags,

    world_points: RefCell<Vec<Vec2>>,
    dirty: Cell<bool>,
}

impl Collider {
    /// Creates an enabled collider at the origin
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            velocity: Vec2::zeros(),
            mass: 1.0,
            drag: 0.0,
            constant_acceleration: Vec2::zeros(),
            accumulated_force: Vec2::zeros(),
            flags: ColliderFlags::default(),
            world_points: RefCell::new(Vec::new()),
            dirty: Cell::new(true),
        }
    }

    /// Circle collider at `position`
    pub fn circle(position: Vec2, radius: f32) -> Self {
        Self::new(ColliderShape::circle(radius)).with_position(position)
    }

    /// Set the position (builder pattern)
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.set_position(position);
        self
    }

    /// Set the velocity (builder pattern)
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the flags (builder pattern)
    pub fn with_flags(mut self, flags: ColliderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Local shape description
    pub fn local_shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Replace the local shape
    pub fn set_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
        self.dirty.set(true);
    }

    /// World position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move to `position`
    pub fn set_position(&mut self, position: Vec2) {
        if self.position != position {
            self.position = position;
            self.dirty.set(true);
        }
    }

    /// Move by `offset`
    pub fn translate(&mut self, offset: Vec2) {
        self.set_position(self.position + offset);
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Set the rotation in radians
    pub fn set_rotation(&mut self, rotation: f32) {
        if self.rotation != rotation {
            self.rotation = rotation;
            self.dirty.set(true);
        }
    }

    /// Per-axis scale
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Set the per-axis scale
    pub fn set_scale(&mut self, scale: Vec2) {
        if self.scale != scale {
            self.scale = scale;
            self.dirty.set(true);
        }
    }

    /// Current flags
    pub fn flags(&self) -> ColliderFlags {
        self.flags
    }

    /// Replace all flags
    pub fn set_flags(&mut self, flags: ColliderFlags) {
        self.flags = flags;
    }

    /// Whether the collider takes part in the grid
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(ColliderFlags::ENABLED)
    }

    /// Enable or disable the collider
    pub fn set_enabled(&mut self, enabled: bool) {
        self.flags.set(ColliderFlags::ENABLED, enabled);
    }

    /// Whether the collider scans for its own overlaps
    pub fn computes_collision(&self) -> bool {
        self.flags.contains(ColliderFlags::COMPUTE_COLLISION)
    }

    /// Whether overlap events carry intersection points
    pub fn computes_intersections(&self) -> bool {
        self.flags.contains(ColliderFlags::COMPUTE_INTERSECTIONS)
    }

    /// True when the cached polygon points are stale
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Force accumulated since the last step
    pub fn accumulated_force(&self) -> Vec2 {
        self.accumulated_force
    }

    /// Add a force for the next step
    pub fn apply_force(&mut self, force: Vec2) {
        self.accumulated_force += force;
    }

    /// Advance velocity and position by `dt` seconds and clear the force
    pub fn integrate(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let mut acceleration = self.constant_acceleration;
        if self.mass > 0.0 {
            acceleration += self.accumulated_force / self.mass;
        }
        self.velocity += acceleration * dt;
        self.velocity *= (1.0 - self.drag * dt).max(0.0);
        self.accumulated_force = Vec2::zeros();
        if self.velocity != Vec2::zeros() {
            self.translate(self.velocity * dt);
        }
    }

    fn to_world(&self, local: &Vec2) -> Vec2 {
        self.position + utils::rotate(&local.component_mul(&self.scale), self.rotation)
    }

    fn polygon_points(&self, local: &[Vec2]) -> Vec<Vec2> {
        if self.dirty.get() {
            let mut cache = self.world_points.borrow_mut();
            cache.clear();
            cache.extend(local.iter().map(|p| self.to_world(p)));
            self.dirty.set(false);
        }
        self.world_points.borrow().clone()
    }

    /// World-space shape built from the current transform
    pub fn shape(&self) -> Shape {
        match &self.shape {
            ColliderShape::Circle { radius } => {
                let scale = self.scale.x.abs().max(self.scale.y.abs());
                Circle::new(self.position, radius * scale).into()
            }
            ColliderShape::Segment { start, end } => Segment::new(self.to_world(start), self.to_world(end)).into(),
            ColliderShape::Rect { size, anchor } => {
                Rect::from_anchor(self.position, size.component_mul(&self.scale.abs()), *anchor).into()
            }
            ColliderShape::Polygon { points } => Polygon::new(self.polygon_points(points)).into(),
            ColliderShape::Triangle { a, b, c } => {
                Triangle::new(self.to_world(a), self.to_world(b), self.to_world(c)).into()
            }
            ColliderShape::Ray { direction } => {
                Ray::new(self.position, utils::rotate(direction, self.rotation)).into()
            }
        }
    }

    /// Bounds of the world-space shape
    pub fn bounding_box(&self) -> Rect {
        self.shape().bounding_box()
    }
}
