//! Math utilities and types
//!
//! 2D vector aliases over nalgebra plus the small set of helpers the
//! geometry code leans on.

pub use nalgebra::{Rotation2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Distances and denominators below this are treated as exactly zero
pub const EPSILON: f32 = 1e-6;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = std::f32::consts::TAU;
}

/// Math utility functions
pub mod utils {
    use super::{Rotation2, Vec2, EPSILON};

    /// Z component of the 3D cross product of two planar vectors
    #[inline]
    pub fn cross(a: &Vec2, b: &Vec2) -> f32 {
        a.x * b.y - a.y * b.x
    }

    /// Counter-clockwise perpendicular (y-up convention)
    #[inline]
    pub fn perpendicular(v: &Vec2) -> Vec2 {
        Vec2::new(-v.y, v.x)
    }

    /// Rotate `v` by `angle` radians around the origin
    #[inline]
    pub fn rotate(v: &Vec2, angle: f32) -> Vec2 {
        if angle == 0.0 {
            return *v;
        }
        Rotation2::new(angle) * *v
    }

    /// Snap values within `EPSILON` of zero to exactly zero
    #[inline]
    pub fn snap_zero(value: f32) -> f32 {
        if value.abs() < EPSILON {
            0.0
        } else {
            value
        }
    }

    /// Normalize, or `None` for (near) zero vectors
    #[inline]
    pub fn try_normalize(v: &Vec2) -> Option<Vec2> {
        v.try_normalize(EPSILON)
    }

    /// Flip `normal` so it points from `point` toward `reference`
    ///
    /// When `reference` lies on the normal's line the normal is kept as is.
    #[inline]
    pub fn face_toward(normal: Vec2, point: &Vec2, reference: &Vec2) -> Vec2 {
        if normal.dot(&(reference - point)) < 0.0 {
            -normal
        } else {
            normal
        }
    }
}
