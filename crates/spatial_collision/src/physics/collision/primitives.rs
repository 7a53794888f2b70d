//! Primitive collision shapes and intersection algorithms
//!
//! Circles, segments and rays, plus the low-level pairwise routines the
//! [`Shape`](super::Shape) dispatch tables are built from. Every routine is
//! total: degenerate inputs (zero-length segments, zero directions) produce
//! empty or neutral results instead of panicking.

use super::polygon::Rect;
use crate::foundation::math::{constants, utils, Vec2, EPSILON};

/// A point where two shape outlines cross
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPoint {
    /// World-space location of the crossing
    pub point: Vec2,
    /// Surface normal of the shape that was hit, at `point`
    pub normal: Vec2,
}

impl CollisionPoint {
    /// Creates a new collision point
    pub fn new(point: Vec2, normal: Vec2) -> Self {
        Self { point, normal }
    }

    /// Squared distance from this point to `p`
    pub fn distance_squared_to(&self, p: &Vec2) -> f32 {
        (self.point - p).magnitude_squared()
    }
}

/// Closest point on a shape outline to some query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// The point on the outline
    pub point: Vec2,
    /// Outline normal at `point`
    pub normal: Vec2,
    /// Distance from the query point to `point`
    pub distance: f32,
}

impl ClosestPoint {
    /// Creates a closest-point result, measuring the distance to `query`
    pub fn new(point: Vec2, normal: Vec2, query: &Vec2) -> Self {
        Self {
            point,
            normal,
            distance: utils::snap_zero((query - point).norm()),
        }
    }

    /// Squared distance to the query point
    pub fn distance_squared(&self) -> f32 {
        self.distance * self.distance
    }
}

/// A circle; a zero radius makes it a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center in world space
    pub center: Vec2,
    /// Radius, never negative
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle. Negative (or NaN) radii are clamped to zero.
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// True when the radius is too small to matter
    pub fn is_point(&self) -> bool {
        self.radius <= EPSILON
    }

    /// Enclosed area
    pub fn area(&self) -> f32 {
        constants::PI * self.radius * self.radius
    }

    /// Circumference
    pub fn circumference(&self) -> f32 {
        constants::TAU * self.radius
    }

    /// Axis-aligned bounds
    pub fn bounding_box(&self) -> Rect {
        let diameter = self.radius * 2.0;
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            diameter,
            diameter,
        )
    }

    /// Inclusive containment test (points on the circle count)
    pub fn contains_point(&self, p: &Vec2) -> bool {
        let distance_squared = (p - self.center).magnitude_squared();
        if self.is_point() {
            return distance_squared <= EPSILON * EPSILON;
        }
        distance_squared <= self.radius * self.radius
    }

    /// Circle-circle overlap
    ///
    /// Compares the squared center distance against the squared radius sum
    /// with a strict `<`, so tangent circles do not overlap. A zero-radius
    /// circle is treated as a point and tested for containment instead.
    pub fn overlaps_circle(&self, other: &Circle) -> bool {
        match (self.is_point(), other.is_point()) {
            (true, true) => (self.center - other.center).magnitude_squared() <= EPSILON * EPSILON,
            (true, false) => other.contains_point(&self.center),
            (false, true) => self.contains_point(&other.center),
            (false, false) => {
                let distance_squared = (self.center - other.center).magnitude_squared();
                let radius_sum = self.radius + other.radius;
                distance_squared < radius_sum * radius_sum
            }
        }
    }

    /// Closest point on the circle outline
    pub fn closest_point(&self, p: &Vec2) -> ClosestPoint {
        // A query at the exact center picks an arbitrary but stable direction.
        let direction = utils::try_normalize(&(p - self.center)).unwrap_or_else(|| Vec2::new(1.0, 0.0));
        ClosestPoint::new(self.center + direction * self.radius, direction, p)
    }

    /// Outline sampled as a regular polygon with `segments` vertices
    pub fn points(&self, segments: usize) -> Vec<Vec2> {
        let segments = segments.max(3);
        let step = constants::TAU / segments as f32;
        (0..segments)
            .map(|i| {
                let angle = step * i as f32;
                self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius
            })
            .collect()
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint
    pub start: Vec2,
    /// Second endpoint
    pub end: Vec2,
}

impl Segment {
    /// Creates a new segment
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// `end - start`
    pub fn displacement(&self) -> Vec2 {
        self.end - self.start
    }

    /// Segment length
    pub fn length(&self) -> f32 {
        self.displacement().norm()
    }

    /// Midpoint
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// True for zero-length segments
    pub fn is_degenerate(&self) -> bool {
        self.displacement().magnitude_squared() < EPSILON * EPSILON
    }

    /// Unit normal (counter-clockwise perpendicular of the direction)
    ///
    /// Zero for degenerate segments.
    pub fn normal(&self) -> Vec2 {
        utils::try_normalize(&self.displacement())
            .map(|d| utils::perpendicular(&d))
            .unwrap_or_else(Vec2::zeros)
    }

    /// Axis-aligned bounds
    pub fn bounding_box(&self) -> Rect {
        Rect::from_min_max(
            Vec2::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            Vec2::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        )
    }

    /// Nearest point on the segment: projection parameter clamped to `[0, 1]`
    pub fn closest_point_to(&self, p: &Vec2) -> Vec2 {
        let d = self.displacement();
        let length_squared = d.magnitude_squared();
        if length_squared < EPSILON * EPSILON {
            return self.start;
        }
        let t = ((p - self.start).dot(&d) / length_squared).clamp(0.0, 1.0);
        self.start + d * t
    }

    /// Squared distance from `p` to the segment
    pub fn distance_squared_to(&self, p: &Vec2) -> f32 {
        (p - self.closest_point_to(p)).magnitude_squared()
    }

    /// True when `p` lies on the segment (within `EPSILON`)
    pub fn contains_point(&self, p: &Vec2) -> bool {
        self.distance_squared_to(p) <= EPSILON * EPSILON
    }

    /// Closest point with its normal facing the query point
    pub fn closest_point(&self, p: &Vec2) -> ClosestPoint {
        let point = self.closest_point_to(p);
        ClosestPoint::new(point, utils::face_toward(self.normal(), &point, p), p)
    }
}

/// A half-line starting at `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray
    pub origin: Vec2,
    /// Unit direction, or zero for a degenerate ray
    pub direction: Vec2,
}

impl Ray {
    /// How far the bounding box of a ray reaches along its direction
    pub const BOUNDING_EXTENT: f32 = 100_000.0;

    /// Creates a new ray; the direction is normalized
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self {
            origin,
            direction: utils::try_normalize(&direction).unwrap_or_else(Vec2::zeros),
        }
    }

    /// True when the direction is zero
    pub fn is_degenerate(&self) -> bool {
        self.direction.magnitude_squared() < EPSILON
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// Unit normal (counter-clockwise perpendicular of the direction)
    pub fn normal(&self) -> Vec2 {
        utils::perpendicular(&self.direction)
    }

    /// Bounds of the ray truncated at [`Ray::BOUNDING_EXTENT`]
    pub fn bounding_box(&self) -> Rect {
        Segment::new(self.origin, self.point_at(Self::BOUNDING_EXTENT)).bounding_box()
    }

    /// Nearest point on the ray to `p`
    pub fn closest_point_to(&self, p: &Vec2) -> Vec2 {
        let t = (p - self.origin).dot(&self.direction).max(0.0);
        self.point_at(t)
    }

    /// True when `p` lies on the ray (within `EPSILON`)
    pub fn contains_point(&self, p: &Vec2) -> bool {
        (p - self.closest_point_to(p)).magnitude_squared() <= EPSILON * EPSILON
    }

    /// Closest point with its normal facing the query point
    pub fn closest_point(&self, p: &Vec2) -> ClosestPoint {
        let point = self.closest_point_to(p);
        ClosestPoint::new(point, utils::face_toward(self.normal(), &point, p), p)
    }
}

/// Parameters `t` where the line `p + d * t` meets the circle, ascending
fn line_circle_params(p: &Vec2, d: &Vec2, circle: &Circle) -> Vec<f32> {
    let a = d.magnitude_squared();
    if a < EPSILON * EPSILON {
        return Vec::new();
    }
    let f = p - circle.center;
    let b = 2.0 * f.dot(d);
    let c = f.magnitude_squared() - circle.radius * circle.radius;
    let discriminant = utils::snap_zero(b * b - 4.0 * a * c);
    if discriminant < 0.0 {
        return Vec::new();
    }
    if discriminant == 0.0 {
        return vec![-b / (2.0 * a)];
    }
    let root = discriminant.sqrt();
    vec![(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
}

/// Points where a segment crosses a circle outline
pub fn segment_circle_points(segment: &Segment, circle: &Circle) -> Vec<Vec2> {
    if segment.is_degenerate() {
        let on_outline = ((segment.start - circle.center).norm() - circle.radius).abs() <= EPSILON;
        return if on_outline { vec![segment.start] } else { Vec::new() };
    }
    let d = segment.displacement();
    line_circle_params(&segment.start, &d, circle)
        .into_iter()
        .filter(|t| (-EPSILON..=1.0 + EPSILON).contains(t))
        .map(|t| segment.start + d * t)
        .collect()
}

/// Points where a ray crosses a circle outline, nearest first
pub fn ray_circle_points(ray: &Ray, circle: &Circle) -> Vec<Vec2> {
    line_circle_params(&ray.origin, &ray.direction, circle)
        .into_iter()
        .filter(|t| *t >= -EPSILON)
        .map(|t| ray.point_at(t.max(0.0)))
        .collect()
}

/// Points where two circle outlines cross (one point when tangent)
pub fn circle_circle_points(a: &Circle, b: &Circle) -> Vec<Vec2> {
    let d = b.center - a.center;
    let distance = d.norm();
    if distance < EPSILON {
        return Vec::new();
    }
    if distance > a.radius + b.radius + EPSILON || distance < (a.radius - b.radius).abs() - EPSILON {
        return Vec::new();
    }
    let along = (a.radius * a.radius - b.radius * b.radius + distance * distance) / (2.0 * distance);
    let h = utils::snap_zero((a.radius * a.radius - along * along).max(0.0).sqrt());
    let mid = a.center + d * (along / distance);
    if h == 0.0 {
        return vec![mid];
    }
    let offset = utils::perpendicular(&d) * (h / distance);
    vec![mid + offset, mid - offset]
}

/// Solves `p + r * t = q + s * u`, returning `(t, u)` for non-parallel lines
fn line_line_params(p: &Vec2, r: &Vec2, q: &Vec2, s: &Vec2) -> Option<(f32, f32)> {
    let denominator = utils::cross(r, s);
    if denominator.abs() < EPSILON {
        return None;
    }
    let diff = q - p;
    Some((utils::cross(&diff, s) / denominator, utils::cross(&diff, r) / denominator))
}

fn unit_interval(t: f32) -> bool {
    (-EPSILON..=1.0 + EPSILON).contains(&t)
}

/// Crossing point of two segments; parallel segments report `None`
pub fn segment_segment_point(a: &Segment, b: &Segment) -> Option<Vec2> {
    let da = a.displacement();
    let (t, u) = line_line_params(&a.start, &da, &b.start, &b.displacement())?;
    (unit_interval(t) && unit_interval(u)).then(|| a.start + da * t)
}

/// Crossing point of a ray and a segment
pub fn ray_segment_point(ray: &Ray, segment: &Segment) -> Option<Vec2> {
    if ray.is_degenerate() {
        return None;
    }
    let (t, u) = line_line_params(&ray.origin, &ray.direction, &segment.start, &segment.displacement())?;
    (t >= -EPSILON && unit_interval(u)).then(|| ray.point_at(t.max(0.0)))
}

/// Crossing point of two rays
pub fn ray_ray_point(a: &Ray, b: &Ray) -> Option<Vec2> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }
    let (t, u) = line_line_params(&a.origin, &a.direction, &b.origin, &b.direction)?;
    (t >= -EPSILON && u >= -EPSILON).then(|| a.point_at(t.max(0.0)))
}

/// Segment-segment overlap, including collinear overlap and point segments
pub fn segments_overlap(a: &Segment, b: &Segment) -> bool {
    if a.is_degenerate() {
        return b.contains_point(&a.start);
    }
    if b.is_degenerate() {
        return a.contains_point(&b.start);
    }
    if segment_segment_point(a, b).is_some() {
        return true;
    }
    let da = a.displacement();
    if utils::cross(&da, &b.displacement()).abs() >= EPSILON {
        return false;
    }
    // Parallel: overlap only when collinear with intersecting projections.
    let length_squared = da.magnitude_squared();
    let off_line = utils::cross(&(b.start - a.start), &da).abs() / length_squared.sqrt();
    if off_line > EPSILON {
        return false;
    }
    let t0 = (b.start - a.start).dot(&da) / length_squared;
    let t1 = (b.end - a.start).dot(&da) / length_squared;
    t0.max(t1) >= -EPSILON && t0.min(t1) <= 1.0 + EPSILON
}

/// Circle-segment overlap via the clamped projection of the center
pub fn circle_overlaps_segment(circle: &Circle, segment: &Segment) -> bool {
    segment.distance_squared_to(&circle.center) <= circle.radius * circle.radius
}

/// Ray-circle overlap: the origin is inside or the ray reaches the outline
pub fn ray_overlaps_circle(ray: &Ray, circle: &Circle) -> bool {
    if circle.contains_point(&ray.origin) {
        return true;
    }
    !ray.is_degenerate() && !ray_circle_points(ray, circle).is_empty()
}

/// Ray-segment overlap, including the collinear case
pub fn ray_overlaps_segment(ray: &Ray, segment: &Segment) -> bool {
    if segment.contains_point(&ray.origin) {
        return true;
    }
    if ray.is_degenerate() {
        return false;
    }
    ray_segment_point(ray, segment).is_some()
        || ray.contains_point(&segment.start)
        || ray.contains_point(&segment.end)
}

/// Ray-ray overlap, including collinear rays
pub fn rays_overlap(a: &Ray, b: &Ray) -> bool {
    if a.contains_point(&b.origin) || b.contains_point(&a.origin) {
        return true;
    }
    ray_ray_point(a, b).is_some()
}
