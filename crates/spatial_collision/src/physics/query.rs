//! Read-only spatial queries against the collision grid
//!
//! Queries reuse the grid built by the last tick (or by `add` since then)
//! and test candidates against their current shapes. They never touch the
//! overlap state, so they can run any number of times per tick.

use super::collidable::Collidable;
use super::collision::{CollisionPoint, Ray, Rect, Shape};
use super::collision_layers::CollisionMask;
use super::collision_system::CollisionSystem;
use crate::foundation::collections::CollidableId;
use crate::foundation::math::Vec2;
use std::cmp::Ordering;

/// Who is asking: a registered collidable or a free shape
#[derive(Debug, Clone, Copy)]
pub enum QueryCaster<'a> {
    /// A registered collidable; excluded from its own results and measured
    /// from its position
    Collidable(CollidableId),
    /// A free shape, measured from its centroid
    Shape(&'a Shape),
}

impl From<CollidableId> for QueryCaster<'_> {
    fn from(id: CollidableId) -> Self {
        Self::Collidable(id)
    }
}

impl<'a> From<&'a Shape> for QueryCaster<'a> {
    fn from(shape: &'a Shape) -> Self {
        Self::Shape(shape)
    }
}

/// A collidable hit by [`CollisionSystem::query_space`]
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    /// The collidable that was hit
    pub id: CollidableId,
    /// Outline crossings between caster and collidable
    pub points: Vec<CollisionPoint>,
}

/// Nearest hit of [`CollisionSystem::raycast`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The collidable that was hit
    pub id: CollidableId,
    /// Hit location
    pub point: Vec2,
    /// Surface normal at the hit (zero when the ray starts inside)
    pub normal: Vec2,
    /// Distance from the ray origin
    pub distance: f32,
}

struct ResolvedCaster {
    shape: Shape,
    reference: Vec2,
    exclude: Option<CollidableId>,
}

fn by_distance(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

impl CollisionSystem {
    fn resolve_caster(&self, caster: QueryCaster<'_>) -> Option<ResolvedCaster> {
        match caster {
            QueryCaster::Collidable(id) => {
                let collidable = self.registry().get(id)?;
                Some(ResolvedCaster {
                    shape: collidable.shape(),
                    reference: collidable.position(),
                    exclude: Some(id),
                })
            }
            QueryCaster::Shape(shape) => Some(ResolvedCaster {
                shape: shape.clone(),
                reference: shape.centroid(),
                exclude: None,
            }),
        }
    }

    /// Enabled, active collidables in the cells `bbox` maps to whose layer
    /// passes `mask`
    fn query_candidates(
        &self,
        bbox: &Rect,
        exclude: Option<CollidableId>,
        mask: CollisionMask,
    ) -> impl Iterator<Item = (CollidableId, &Collidable)> + '_ {
        let registry = self.registry();
        self.grid()
            .get_objects(bbox, exclude)
            .into_iter()
            .filter(move |id| registry.is_active(*id))
            .filter_map(move |id| registry.get(id).map(|collidable| (id, collidable)))
            .filter(move |(_, collidable)| collidable.is_enabled() && mask.accepts(collidable.layer))
    }

    /// Collidables whose shape overlaps the caster
    ///
    /// With `sorted`, results are ordered by squared distance from the
    /// caster's reference point to each hit collidable's position; ties keep
    /// grid order.
    pub fn cast_space<'a>(
        &self,
        caster: impl Into<QueryCaster<'a>>,
        sorted: bool,
        mask: CollisionMask,
    ) -> Vec<CollidableId> {
        let Some(caster) = self.resolve_caster(caster.into()) else {
            return Vec::new();
        };
        let mut hits: Vec<(CollidableId, f32)> = self
            .query_candidates(&caster.shape.bounding_box(), caster.exclude, mask)
            .filter(|(_, collidable)| caster.shape.overlaps(&collidable.shape()))
            .map(|(id, collidable)| (id, (collidable.position() - caster.reference).magnitude_squared()))
            .collect();
        if sorted {
            hits.sort_by(|a, b| by_distance(a.1, b.1));
        }
        hits.into_iter().map(|(id, _)| id).collect()
    }

    /// Collidables whose outline crosses the caster's, with the crossing
    /// points
    ///
    /// Candidates without crossing points (including ones fully inside the
    /// caster) are left out. With `sorted`, results are ordered by squared
    /// distance from the caster's reference point to the nearest crossing.
    pub fn query_space<'a>(
        &self,
        caster: impl Into<QueryCaster<'a>>,
        sorted: bool,
        mask: CollisionMask,
    ) -> Vec<QueryHit> {
        let Some(caster) = self.resolve_caster(caster.into()) else {
            return Vec::new();
        };
        let mut hits: Vec<(QueryHit, f32)> = self
            .query_candidates(&caster.shape.bounding_box(), caster.exclude, mask)
            .filter_map(|(id, collidable)| {
                let points = caster.shape.intersect(&collidable.shape());
                let nearest = points
                    .iter()
                    .map(|p| p.distance_squared_to(&caster.reference))
                    .min_by(|a, b| by_distance(*a, *b))?;
                Some((QueryHit { id, points }, nearest))
            })
            .collect();
        if sorted {
            hits.sort_by(|a, b| by_distance(a.1, b.1));
        }
        hits.into_iter().map(|(hit, _)| hit).collect()
    }

    /// Collidables whose shape contains `point`
    pub fn query_point(&self, point: Vec2, mask: CollisionMask) -> Vec<CollidableId> {
        let bbox = Rect::new(point.x, point.y, 0.0, 0.0);
        self.query_candidates(&bbox, None, mask)
            .filter(|(_, collidable)| collidable.shape().contains_point(&point))
            .map(|(id, _)| id)
            .collect()
    }

    /// Nearest collidable along `ray`
    ///
    /// A collidable containing the ray origin is hit at distance zero.
    pub fn raycast(&self, ray: &Ray, mask: CollisionMask) -> Option<RaycastHit> {
        if ray.is_degenerate() {
            return None;
        }
        let ray_shape = Shape::Ray(*ray);
        self.query_candidates(&ray.bounding_box(), None, mask)
            .filter_map(|(id, collidable)| {
                let shape = collidable.shape();
                if shape.contains_point(&ray.origin) {
                    return Some(RaycastHit {
                        id,
                        point: ray.origin,
                        normal: Vec2::zeros(),
                        distance: 0.0,
                    });
                }
                ray_shape
                    .intersect(&shape)
                    .into_iter()
                    .map(|hit| RaycastHit {
                        id,
                        point: hit.point,
                        normal: hit.normal,
                        distance: (hit.point - ray.origin).norm(),
                    })
                    .min_by(|a, b| by_distance(a.distance, b.distance))
            })
            .min_by(|a, b| by_distance(a.distance, b.distance))
    }
}
