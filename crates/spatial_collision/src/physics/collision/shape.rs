//! World-space shape sum type and pairwise dispatch
//!
//! [`Shape`] closes over every primitive the collision core understands.
//! Pairwise operations are a single `match` over `(Shape, Shape)`, so adding
//! a variant forces every table below to be revisited.

use super::polygon::{self, Polygon, Rect, Triangle};
use super::primitives::{
    circle_circle_points, circle_overlaps_segment, ray_circle_points, ray_overlaps_circle,
    ray_overlaps_segment, ray_ray_point, ray_segment_point, rays_overlap, segment_circle_points,
    segment_segment_point, segments_overlap, Circle, ClosestPoint, CollisionPoint, Ray, Segment,
};
use crate::foundation::math::{utils, Vec2};
use std::borrow::Cow;

/// Vertex count used when a circle has to be expressed as points
pub const CIRCLE_SEGMENTS: usize = 32;

/// Points closer than this are reported once
const MERGE_DISTANCE_SQUARED: f32 = 1e-8;

/// A world-space shape
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Circle (or point, when the radius is zero)
    Circle(Circle),
    /// Line segment
    Segment(Segment),
    /// Axis-aligned rectangle
    Rect(Rect),
    /// Simple polygon
    Polygon(Polygon),
    /// Triangle
    Triangle(Triangle),
    /// Half-line
    Ray(Ray),
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Segment> for Shape {
    fn from(segment: Segment) -> Self {
        Shape::Segment(segment)
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::Rect(rect)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Self {
        Shape::Triangle(triangle)
    }
}

impl From<Ray> for Shape {
    fn from(ray: Ray) -> Self {
        Shape::Ray(ray)
    }
}

impl Shape {
    /// Axis-aligned bounds
    pub fn bounding_box(&self) -> Rect {
        match self {
            Shape::Circle(c) => c.bounding_box(),
            Shape::Segment(s) => s.bounding_box(),
            Shape::Rect(r) => *r,
            Shape::Polygon(p) => p.bounding_box(),
            Shape::Triangle(t) => t.bounding_box(),
            Shape::Ray(r) => r.bounding_box(),
        }
    }

    /// Reference point: area centroid, segment midpoint or ray origin
    pub fn centroid(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => c.center,
            Shape::Segment(s) => s.midpoint(),
            Shape::Rect(r) => r.center(),
            Shape::Polygon(p) => p.centroid(),
            Shape::Triangle(t) => t.centroid(),
            Shape::Ray(r) => r.origin,
        }
    }

    /// Enclosed area; zero for segments and rays
    pub fn area(&self) -> f32 {
        match self {
            Shape::Circle(c) => c.area(),
            Shape::Rect(r) => r.area(),
            Shape::Polygon(p) => p.area(),
            Shape::Triangle(t) => t.area(),
            Shape::Segment(_) | Shape::Ray(_) => 0.0,
        }
    }

    /// Outline length; a segment reports its length and a ray zero
    pub fn perimeter(&self) -> f32 {
        match self {
            Shape::Circle(c) => c.circumference(),
            Shape::Segment(s) => s.length(),
            Shape::Rect(r) => r.perimeter(),
            Shape::Polygon(p) => p.perimeter(),
            Shape::Triangle(t) => t.perimeter(),
            Shape::Ray(_) => 0.0,
        }
    }

    /// Inclusive containment; segments and rays contain the points on them
    pub fn contains_point(&self, p: &Vec2) -> bool {
        match self {
            Shape::Circle(c) => c.contains_point(p),
            Shape::Segment(s) => s.contains_point(p),
            Shape::Rect(r) => r.contains_point(p),
            Shape::Polygon(poly) => poly.contains_point(p),
            Shape::Triangle(t) => t.contains_point(p),
            Shape::Ray(r) => r.contains_point(p),
        }
    }

    /// Closest outline point; `None` only for an empty polygon
    pub fn closest_point(&self, p: &Vec2) -> Option<ClosestPoint> {
        match self {
            Shape::Circle(c) => Some(c.closest_point(p)),
            Shape::Segment(s) => Some(s.closest_point(p)),
            Shape::Rect(r) => Some(r.closest_point(p)),
            Shape::Polygon(poly) => poly.closest_point(p),
            Shape::Triangle(t) => polygon::closest_on_outline(&t.points(), p),
            Shape::Ray(r) => Some(r.closest_point(p)),
        }
    }

    /// Outline as points; circles are sampled with [`CIRCLE_SEGMENTS`]
    /// vertices and a ray is reduced to its origin
    pub fn to_points(&self) -> Vec<Vec2> {
        match self {
            Shape::Circle(c) => c.points(CIRCLE_SEGMENTS),
            Shape::Segment(s) => vec![s.start, s.end],
            Shape::Ray(r) => vec![r.origin],
            _ => self.outline().into_owned(),
        }
    }

    /// Convex hull swept by this shape when moved by `motion`
    pub fn project(&self, motion: &Vec2) -> Polygon {
        let points = self.to_points();
        let mut swept = Vec::with_capacity(points.len() * 2);
        swept.extend(points.iter().copied());
        swept.extend(points.iter().map(|p| p + motion));
        Polygon::convex_hull(&swept)
    }

    /// Vertices of an area shape
    fn outline(&self) -> Cow<'_, [Vec2]> {
        match self {
            Shape::Rect(r) => Cow::Owned(r.corners().to_vec()),
            Shape::Polygon(p) => Cow::Borrowed(p.points()),
            Shape::Triangle(t) => Cow::Owned(t.points().to_vec()),
            Shape::Circle(_) | Shape::Segment(_) | Shape::Ray(_) => Cow::Owned(self.to_points()),
        }
    }

    /// Boolean overlap test
    pub fn overlaps(&self, other: &Shape) -> bool {
        use Shape::{Circle as C, Ray as R, Rect as Re, Segment as S};

        match (self, other) {
            (C(a), C(b)) => a.overlaps_circle(b),
            (C(c), S(s)) | (S(s), C(c)) => circle_overlaps_segment(c, s),
            (C(c), Re(r)) | (Re(r), C(c)) => circle_overlaps_rect(c, r),
            (C(c), R(r)) | (R(r), C(c)) => ray_overlaps_circle(r, c),
            (C(c), area) | (area, C(c)) => circle_overlaps_area(c, &area.outline()),
            (S(a), S(b)) => segments_overlap(a, b),
            (S(s), R(r)) | (R(r), S(s)) => ray_overlaps_segment(r, s),
            (S(s), area) | (area, S(s)) => segment_overlaps_area(s, &area.outline()),
            (R(a), R(b)) => rays_overlap(a, b),
            (R(r), area) | (area, R(r)) => ray_overlaps_area(r, &area.outline()),
            (Re(a), Re(b)) => a.overlaps_rect(b),
            (a, b) => areas_overlap(&a.outline(), &b.outline()),
        }
    }

    /// Points where the outlines cross
    ///
    /// Each point carries the normal of `other` at the hit: outward for area
    /// shapes and circles, and oriented toward this shape's centroid for
    /// segments and rays. Area shapes are reduced to their edges, so a shape
    /// fully inside another yields no points.
    pub fn intersect(&self, other: &Shape) -> Vec<CollisionPoint> {
        let reference = self.centroid();
        let theirs = other.pieces();
        let mut points: Vec<CollisionPoint> = Vec::new();
        for mine in self.pieces() {
            for piece in &theirs {
                for p in piece_hits(&mine, piece) {
                    let duplicate = points
                        .iter()
                        .any(|existing| existing.distance_squared_to(&p) <= MERGE_DISTANCE_SQUARED);
                    if !duplicate {
                        points.push(CollisionPoint::new(p, piece.normal_at(&p, &reference)));
                    }
                }
            }
        }
        points
    }

    fn pieces(&self) -> Vec<Piece> {
        match self {
            Shape::Circle(c) => vec![Piece::Arc(*c)],
            Shape::Segment(s) => vec![Piece::Edge { segment: *s, outward: None }],
            Shape::Ray(r) => vec![Piece::HalfLine(*r)],
            Shape::Rect(_) | Shape::Polygon(_) | Shape::Triangle(_) => {
                let outline = self.outline();
                if outline.len() < 3 {
                    return Vec::new();
                }
                let counter_clockwise = polygon::signed_area(&outline) >= 0.0;
                polygon::edges(&outline)
                    .map(|(a, b)| Piece::Edge {
                        segment: Segment::new(a, b),
                        outward: Some(polygon::outward_normal(&a, &b, counter_clockwise)),
                    })
                    .collect()
            }
        }
    }
}

/// One-dimensional building block of an outline
#[derive(Debug, Clone, Copy)]
enum Piece {
    Arc(Circle),
    Edge { segment: Segment, outward: Option<Vec2> },
    HalfLine(Ray),
}

impl Piece {
    fn normal_at(&self, p: &Vec2, reference: &Vec2) -> Vec2 {
        match self {
            Piece::Arc(c) => utils::try_normalize(&(p - c.center)).unwrap_or_else(Vec2::zeros),
            Piece::Edge { outward: Some(n), .. } => *n,
            Piece::Edge { segment, outward: None } => utils::face_toward(segment.normal(), p, reference),
            Piece::HalfLine(r) => utils::face_toward(r.normal(), p, reference),
        }
    }
}

fn piece_hits(a: &Piece, b: &Piece) -> Vec<Vec2> {
    match (a, b) {
        (Piece::Arc(a), Piece::Arc(b)) => circle_circle_points(a, b),
        (Piece::Arc(c), Piece::Edge { segment, .. }) | (Piece::Edge { segment, .. }, Piece::Arc(c)) => {
            segment_circle_points(segment, c)
        }
        (Piece::Arc(c), Piece::HalfLine(r)) | (Piece::HalfLine(r), Piece::Arc(c)) => ray_circle_points(r, c),
        (Piece::Edge { segment: a, .. }, Piece::Edge { segment: b, .. }) => {
            segment_segment_point(a, b).into_iter().collect()
        }
        (Piece::Edge { segment, .. }, Piece::HalfLine(r)) | (Piece::HalfLine(r), Piece::Edge { segment, .. }) => {
            ray_segment_point(r, segment).into_iter().collect()
        }
        (Piece::HalfLine(a), Piece::HalfLine(b)) => ray_ray_point(a, b).into_iter().collect(),
    }
}

/// Circle-rectangle overlap via the clamped center
fn circle_overlaps_rect(circle: &Circle, rect: &Rect) -> bool {
    let nearest = rect.clamp_point(&circle.center);
    (nearest - circle.center).magnitude_squared() <= circle.radius * circle.radius
}

fn circle_overlaps_area(circle: &Circle, outline: &[Vec2]) -> bool {
    if outline.len() < 3 {
        return false;
    }
    polygon::contains_point(outline, &circle.center)
        || polygon::edges(outline).any(|(a, b)| circle_overlaps_segment(circle, &Segment::new(a, b)))
}

fn segment_overlaps_area(segment: &Segment, outline: &[Vec2]) -> bool {
    if outline.len() < 3 {
        return false;
    }
    polygon::contains_point(outline, &segment.start)
        || polygon::edges(outline).any(|(a, b)| segments_overlap(segment, &Segment::new(a, b)))
}

fn ray_overlaps_area(ray: &Ray, outline: &[Vec2]) -> bool {
    if outline.len() < 3 {
        return false;
    }
    polygon::contains_point(outline, &ray.origin)
        || (!ray.is_degenerate()
            && polygon::edges(outline).any(|(a, b)| ray_overlaps_segment(ray, &Segment::new(a, b))))
}

fn areas_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    if polygon::contains_point(a, &b[0]) || polygon::contains_point(b, &a[0]) {
        return true;
    }
    polygon::edges(a).any(|(a0, a1)| {
        let edge = Segment::new(a0, a1);
        polygon::edges(b).any(|(b0, b1)| segments_overlap(&edge, &Segment::new(b0, b1)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn notched() -> Shape {
        Shape::Polygon(Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 4.0),
            Vec2::new(0.0, 4.0),
        ]))
    }

    fn circle(x: f32, y: f32, r: f32) -> Shape {
        Shape::Circle(Circle::new(Vec2::new(x, y), r))
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(circle(-2.0, 5.0, 2.5).overlaps(&rect));
        assert!(rect.overlaps(&circle(-2.0, 5.0, 2.5)));
        assert!(!circle(-3.0, -3.0, 2.0).overlaps(&rect));
    }

    #[test]
    fn test_circle_in_concave_notch_misses() {
        let polygon = notched();
        assert!(!circle(3.0, 3.0, 1.0).overlaps(&polygon));
        assert!(circle(3.0, 3.0, 2.5).overlaps(&polygon));
        assert!(circle(0.5, 0.5, 0.1).overlaps(&polygon));
    }

    #[test]
    fn test_segment_inside_area_overlaps() {
        let rect = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let inside = Shape::Segment(Segment::new(Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0)));
        assert!(inside.overlaps(&rect));
        // Fully contained shapes have no crossing points
        assert!(inside.intersect(&rect).is_empty());
    }

    #[test]
    fn test_ray_overlaps_polygon_ahead_only() {
        let polygon = notched();
        let ahead = Shape::Ray(Ray::new(Vec2::new(-5.0, 0.5), Vec2::new(1.0, 0.0)));
        let behind = Shape::Ray(Ray::new(Vec2::new(-5.0, 0.5), Vec2::new(-1.0, 0.0)));
        assert!(ahead.overlaps(&polygon));
        assert!(!behind.overlaps(&polygon));
    }

    #[test]
    fn test_degenerate_polygon_never_overlaps() {
        let line = Shape::Polygon(Polygon::new(vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0)]));
        assert!(!line.overlaps(&circle(2.0, 0.0, 1.0)));
        assert!(line.intersect(&circle(2.0, 0.0, 1.0)).is_empty());
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let shapes = vec![
            circle(0.0, 0.0, 2.0),
            circle(50.0, 50.0, 1.0),
            Shape::Segment(Segment::new(Vec2::new(-5.0, 1.0), Vec2::new(5.0, 1.0))),
            Shape::Rect(Rect::new(1.0, -1.0, 3.0, 3.0)),
            Shape::Triangle(Triangle::new(Vec2::new(10.0, 10.0), Vec2::new(14.0, 10.0), Vec2::new(10.0, 14.0))),
            Shape::Ray(Ray::new(Vec2::new(-10.0, 11.0), Vec2::new(1.0, 0.0))),
            notched(),
        ];
        for a in &shapes {
            for b in &shapes {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_segment_rect_intersection_uses_outward_normal() {
        let rect = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let segment = Shape::Segment(Segment::new(Vec2::new(-5.0, 5.0), Vec2::new(5.0, 5.0)));
        let points = segment.intersect(&rect);
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].point, Vec2::new(0.0, 5.0), epsilon = 1e-5);
        assert_relative_eq!(points[0].normal, Vec2::new(-1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_circle_circle_intersection_normals_are_radial() {
        let a = circle(0.0, 0.0, 5.0);
        let b = circle(8.0, 0.0, 5.0);
        let points = a.intersect(&b);
        assert_eq!(points.len(), 2);
        for hit in &points {
            assert_relative_eq!(hit.point.x, 4.0, epsilon = 1e-4);
            assert_relative_eq!(hit.normal.x, -0.8, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_project_sweeps_rect() {
        let rect = Shape::Rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        let swept = rect.project(&Vec2::new(2.0, 0.0));
        assert_eq!(swept.len(), 4);
        assert_relative_eq!(swept.area(), 8.0);
    }

    #[test]
    fn test_ray_metrics() {
        let ray = Shape::Ray(Ray::new(Vec2::new(1.0, 2.0), Vec2::new(0.0, 3.0)));
        assert_relative_eq!(ray.centroid(), Vec2::new(1.0, 2.0));
        assert_eq!(ray.perimeter(), 0.0);
        assert!(ray.contains_point(&Vec2::new(1.0, 50.0)));
    }

    #[test]
    fn test_circle_against_degenerate_rect_does_not_panic() {
        let nan_wide = Shape::Rect(Rect::new(0.0, 0.0, f32::NAN, 10.0));
        let far_left = Shape::Circle(Circle::new(Vec2::new(-50.0, 5.0), 1.0));
        assert!(!far_left.overlaps(&nan_wide));
        assert!(!nan_wide.overlaps(&far_left));

        let inverted = Shape::Rect(Rect {
            x: 0.0,
            y: 0.0,
            width: -5.0,
            height: 10.0,
        });
        let right = Shape::Circle(Circle::new(Vec2::new(10.0, 5.0), 1.0));
        assert!(!right.overlaps(&inverted));
        assert_relative_eq!(
            Rect::new(0.0, 0.0, 4.0, 4.0).clamp_point(&Vec2::new(9.0, -3.0)),
            Vec2::new(4.0, 0.0)
        );
    }
}
