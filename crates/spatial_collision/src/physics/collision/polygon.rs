//! Area shapes: axis-aligned rectangles, triangles and polygons
//!
//! Also hosts the vertex-slice helpers (even-odd containment, winding,
//! convex hull) shared by every area shape.

use super::primitives::{ClosestPoint, Segment};
use crate::foundation::math::{constants, utils, Vec2, EPSILON};
use std::cmp::Ordering;

/// Axis-aligned rectangle stored as its minimum corner and size
///
/// "Top-left" below means the minimum corner (screen coordinates, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Minimum x
    pub x: f32,
    /// Minimum y
    pub y: f32,
    /// Width, never negative
    pub width: f32,
    /// Height, never negative
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle; negative sizes are flipped around the given corner
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        Self { x, y, width, height }
    }

    /// Places a rectangle of `size` so that the point selected by `anchor`
    /// sits at `position`
    ///
    /// `anchor` is in `[0, 1]²`: `(0, 0)` is the top-left corner, `(0.5, 0.5)`
    /// the center and `(1, 1)` the bottom-right corner.
    pub fn from_anchor(position: Vec2, size: Vec2, anchor: Vec2) -> Self {
        let top_left = position - size.component_mul(&anchor);
        Self::new(top_left.x, top_left.y, size.x, size.y)
    }

    /// Creates a rectangle spanning two corners
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Smallest rectangle containing every point; empty input yields the
    /// zero rectangle
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (min, max) = points.iter().skip(1).fold((*first, *first), |(min, max), p| {
            (
                Vec2::new(min.x.min(p.x), min.y.min(p.y)),
                Vec2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Self::from_min_max(min, max)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Minimum corner
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maximum corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Size as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Corners in order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.right(), self.y),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.x, self.bottom()),
        ]
    }

    /// Area
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Perimeter
    pub fn perimeter(&self) -> f32 {
        2.0 * (self.width + self.height)
    }

    /// Inclusive containment test
    pub fn contains_point(&self, p: &Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Inclusive overlap test; rectangles sharing only an edge overlap
    pub fn overlaps_rect(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Nearest point inside the rectangle
    ///
    /// Never panics: a NaN or negative extent pins the result to the far edge
    /// instead of tripping `f32::clamp`.
    pub fn clamp_point(&self, p: &Vec2) -> Vec2 {
        Vec2::new(
            p.x.max(self.x).min(self.right()),
            p.y.max(self.y).min(self.bottom()),
        )
    }

    /// This rectangle with both corners clamped into `bounds`
    ///
    /// A rectangle entirely outside `bounds` collapses onto its nearest edge.
    pub fn clamped_to(&self, bounds: &Rect) -> Rect {
        Rect::from_min_max(bounds.clamp_point(&self.min()), bounds.clamp_point(&self.max()))
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_min_max(
            Vec2::new(self.x.min(other.x), self.y.min(other.y)),
            Vec2::new(self.right().max(other.right()), self.bottom().max(other.bottom())),
        )
    }

    /// Closest point on the outline with its outward normal
    pub fn closest_point(&self, p: &Vec2) -> ClosestPoint {
        closest_on_outline(&self.corners(), p).unwrap_or_else(|| ClosestPoint::new(self.min(), Vec2::zeros(), p))
    }
}

/// A triangle given by three vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub a: Vec2,
    /// Second vertex
    pub b: Vec2,
    /// Third vertex
    pub c: Vec2,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { a, b, c }
    }

    /// Vertices in construction order
    pub fn points(&self) -> [Vec2; 3] {
        [self.a, self.b, self.c]
    }

    /// Unsigned area
    pub fn area(&self) -> f32 {
        utils::cross(&(self.b - self.a), &(self.c - self.a)).abs() * 0.5
    }

    /// Sum of edge lengths
    pub fn perimeter(&self) -> f32 {
        (self.b - self.a).norm() + (self.c - self.b).norm() + (self.a - self.c).norm()
    }

    /// Vertex average
    pub fn centroid(&self) -> Vec2 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Axis-aligned bounds
    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(&self.points())
    }

    /// Same-side test, inclusive of the edges
    pub fn contains_point(&self, p: &Vec2) -> bool {
        let d1 = utils::snap_zero(utils::cross(&(self.b - self.a), &(p - self.a)));
        let d2 = utils::snap_zero(utils::cross(&(self.c - self.b), &(p - self.b)));
        let d3 = utils::snap_zero(utils::cross(&(self.a - self.c), &(p - self.c)));
        let has_negative = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_positive = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        if !(has_negative && has_positive) {
            // Degenerate (collinear) triangles only contain points on their edges.
            return self.area() > EPSILON || on_outline(&self.points(), p);
        }
        false
    }

    /// Converts to a three-vertex polygon
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.points().to_vec())
    }
}

/// A simple polygon given by its vertices in order
///
/// Either winding is accepted. Fewer than three vertices make the polygon
/// degenerate: zero area, no containment and no intersections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    /// Creates a polygon from ordered vertices
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Rectangle as a four-vertex polygon
    pub fn from_rect(rect: &Rect) -> Self {
        Self::new(rect.corners().to_vec())
    }

    /// Vertices
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True with at least three vertices
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3
    }

    /// Unsigned area (shoelace)
    pub fn area(&self) -> f32 {
        signed_area(&self.points).abs()
    }

    /// Closed outline length
    pub fn perimeter(&self) -> f32 {
        if self.points.len() < 2 {
            return 0.0;
        }
        edges(&self.points).map(|(a, b)| (b - a).norm()).sum()
    }

    /// Area centroid; falls back to the vertex average for degenerate input
    pub fn centroid(&self) -> Vec2 {
        centroid(&self.points)
    }

    /// Axis-aligned bounds
    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(&self.points)
    }

    /// Even-odd containment, inclusive of the outline
    pub fn contains_point(&self, p: &Vec2) -> bool {
        contains_point(&self.points, p)
    }

    /// Closest outline point with its outward normal; `None` when empty
    pub fn closest_point(&self, p: &Vec2) -> Option<ClosestPoint> {
        closest_on_outline(&self.points, p)
    }

    /// Polygon moved by `offset`
    pub fn translated(&self, offset: &Vec2) -> Polygon {
        Polygon::new(self.points.iter().map(|p| p + offset).collect())
    }

    /// Convex hull of a point cloud (monotone chain), counter-clockwise in a
    /// y-up frame
    pub fn convex_hull(points: &[Vec2]) -> Polygon {
        let mut sorted: Vec<Vec2> = points.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
        sorted.dedup_by(|a, b| (*a - *b).magnitude_squared() < EPSILON * EPSILON);
        if sorted.len() < 3 {
            return Polygon::new(sorted);
        }

        fn turns_left(hull: &[Vec2], p: &Vec2) -> bool {
            let n = hull.len();
            utils::cross(&(hull[n - 1] - hull[n - 2]), &(p - hull[n - 2])) > EPSILON
        }

        let mut lower: Vec<Vec2> = Vec::with_capacity(sorted.len());
        for p in &sorted {
            while lower.len() >= 2 && !turns_left(&lower, p) {
                lower.pop();
            }
            lower.push(*p);
        }
        let mut upper: Vec<Vec2> = Vec::with_capacity(sorted.len());
        for p in sorted.iter().rev() {
            while upper.len() >= 2 && !turns_left(&upper, p) {
                upper.pop();
            }
            upper.push(*p);
        }
        lower.pop();
        upper.pop();
        lower.extend(upper);
        Polygon::new(lower)
    }

    /// Pie-slice polygon: the center followed by `segments + 1` arc points
    /// from `start_angle` to `end_angle` (radians)
    pub fn sector(center: Vec2, radius: f32, start_angle: f32, end_angle: f32, segments: usize) -> Polygon {
        let segments = segments.max(1);
        let sweep = (end_angle - start_angle).clamp(-constants::TAU, constants::TAU);
        let mut points = Vec::with_capacity(segments + 2);
        points.push(center);
        for i in 0..=segments {
            let angle = start_angle + sweep * (i as f32 / segments as f32);
            points.push(center + Vec2::new(angle.cos(), angle.sin()) * radius.max(0.0));
        }
        Polygon::new(points)
    }
}

/// Closed-outline edges `(p[i], p[i+1])`, wrapping around
pub(crate) fn edges(points: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

/// Shoelace signed area; positive for counter-clockwise in a y-up frame
pub(crate) fn signed_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    edges(points).map(|(a, b)| utils::cross(&a, &b)).sum::<f32>() * 0.5
}

/// Outward normal of edge `a -> b` for a polygon with the given winding
pub(crate) fn outward_normal(a: &Vec2, b: &Vec2, counter_clockwise: bool) -> Vec2 {
    let Some(d) = utils::try_normalize(&(b - a)) else {
        return Vec2::zeros();
    };
    if counter_clockwise {
        Vec2::new(d.y, -d.x)
    } else {
        Vec2::new(-d.y, d.x)
    }
}

pub(crate) fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::zeros();
    }
    let area = signed_area(points);
    if area.abs() < EPSILON {
        return points.iter().sum::<Vec2>() / points.len() as f32;
    }
    let weighted = edges(points).fold(Vec2::zeros(), |acc, (a, b)| acc + (a + b) * utils::cross(&a, &b));
    weighted / (6.0 * area)
}

fn on_outline(points: &[Vec2], p: &Vec2) -> bool {
    edges(points).any(|(a, b)| Segment::new(a, b).contains_point(p))
}

/// Even-odd (crossing number) containment, inclusive of the outline
pub(crate) fn contains_point(points: &[Vec2], p: &Vec2) -> bool {
    if points.len() < 3 {
        return false;
    }
    if on_outline(points, p) {
        return true;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > p.y) != (pj.y > p.y) && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Closest point on a closed outline with the outward normal of its edge
pub(crate) fn closest_on_outline(points: &[Vec2], p: &Vec2) -> Option<ClosestPoint> {
    match points.len() {
        0 => None,
        1 => Some(ClosestPoint::new(points[0], Vec2::zeros(), p)),
        _ => {
            let counter_clockwise = signed_area(points) >= 0.0;
            edges(points)
                .map(|(a, b)| {
                    let point = Segment::new(a, b).closest_point_to(p);
                    (point, (p - point).magnitude_squared(), a, b)
                })
                .min_by(|x, y| x.1.partial_cmp(&y.1).unwrap_or(Ordering::Equal))
                .map(|(point, _, a, b)| ClosestPoint::new(point, outward_normal(&a, &b, counter_clockwise), p))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn concave_l() -> Polygon {
        Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 4.0),
            Vec2::new(0.0, 4.0),
        ])
    }

    #[test]
    fn test_rect_anchor() {
        let centered = Rect::from_anchor(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0), Vec2::new(0.5, 0.5));
        assert_relative_eq!(centered.x, 8.0);
        assert_relative_eq!(centered.y, 9.0);

        let bottom_right = Rect::from_anchor(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0), Vec2::new(1.0, 1.0));
        assert_relative_eq!(bottom_right.max(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_rect_negative_size_normalized() {
        let rect = Rect::new(5.0, 5.0, -2.0, -3.0);
        assert_eq!(rect, Rect::new(3.0, 2.0, 2.0, 3.0));
    }

    #[test]
    fn test_rect_edge_touch_overlaps() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(10.5, 0.0, 10.0, 10.0);
        assert!(a.overlaps_rect(&b));
        assert!(!a.overlaps_rect(&c));
    }

    #[test]
    fn test_clamped_outside_rect_lands_on_edge() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let outside = Rect::new(-50.0, 20.0, 10.0, 10.0);
        let clamped = outside.clamped_to(&bounds);
        assert_relative_eq!(clamped.x, 0.0);
        assert_relative_eq!(clamped.width, 0.0);
        assert!(clamped.overlaps_rect(&bounds));
    }

    #[test]
    fn test_concave_containment_even_odd() {
        let polygon = concave_l();
        assert!(polygon.contains_point(&Vec2::new(0.5, 3.0)));
        assert!(polygon.contains_point(&Vec2::new(3.0, 0.5)));
        // Inside the notch of the L
        assert!(!polygon.contains_point(&Vec2::new(3.0, 3.0)));
        // On the outline counts
        assert!(polygon.contains_point(&Vec2::new(4.0, 0.5)));
    }

    #[test]
    fn test_polygon_area_and_centroid() {
        let square = Polygon::from_rect(&Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_relative_eq!(square.area(), 4.0);
        assert_relative_eq!(square.perimeter(), 8.0);
        assert_relative_eq!(square.centroid(), Vec2::new(1.0, 1.0), epsilon = 1e-5);
        assert_relative_eq!(concave_l().area(), 7.0);
    }

    #[test]
    fn test_degenerate_polygon_is_neutral() {
        let line = Polygon::new(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)]);
        assert_eq!(line.area(), 0.0);
        assert!(!line.contains_point(&Vec2::new(0.5, 0.5)));
        assert!(Polygon::default().closest_point(&Vec2::zeros()).is_none());
    }

    #[test]
    fn test_convex_hull_drops_interior_points() {
        let hull = Polygon::convex_hull(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(1.0, 0.0),
        ]);
        assert_eq!(hull.len(), 4);
        assert!(signed_area(hull.points()) > 0.0);
        assert_relative_eq!(hull.area(), 4.0);
    }

    #[test]
    fn test_sector_starts_at_center() {
        let sector = Polygon::sector(Vec2::zeros(), 2.0, 0.0, constants::PI * 0.5, 4);
        assert_eq!(sector.len(), 6);
        assert_relative_eq!(sector.points()[0], Vec2::zeros());
        assert_relative_eq!(sector.points()[1], Vec2::new(2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(sector.points()[5], Vec2::new(0.0, 2.0), epsilon = 1e-5);
        assert!(sector.contains_point(&Vec2::new(0.5, 0.5)));
        assert!(!sector.contains_point(&Vec2::new(-0.5, 0.5)));
    }

    #[test]
    fn test_triangle_containment() {
        let triangle = Triangle::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0));
        assert!(triangle.contains_point(&Vec2::new(1.0, 1.0)));
        assert!(triangle.contains_point(&Vec2::new(2.0, 2.0)));
        assert!(!triangle.contains_point(&Vec2::new(3.0, 3.0)));
        assert_relative_eq!(triangle.area(), 8.0);
    }

    #[test]
    fn test_rect_closest_point_outward_normal() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let closest = rect.closest_point(&Vec2::new(5.0, -4.0));
        assert_relative_eq!(closest.point, Vec2::new(5.0, 0.0));
        assert_relative_eq!(closest.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(closest.distance, 4.0);
    }
}
