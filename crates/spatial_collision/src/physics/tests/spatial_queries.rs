//! Cast, query, point and ray queries against the grid

use super::{circle, world};
use crate::foundation::math::Vec2;
use crate::physics::{CollisionLayers, CollisionMask, Ray, Rect, Shape};
use approx::assert_relative_eq;

fn ray_along_x() -> Shape {
    Shape::Ray(Ray::new(Vec2::zeros(), Vec2::new(1.0, 0.0)))
}

#[test]
fn test_sorted_query_orders_by_nearest_hit() {
    let mut system = world();
    let near = system.add(circle(2.0, 0.0, 1.0));
    let far = system.add(circle(6.0, 0.0, 1.0));
    let middle = system.add(circle(4.0, 0.0, 1.0));

    let caster = ray_along_x();
    let unsorted: Vec<_> = system.query_space(&caster, false, CollisionMask::ALL).into_iter().map(|hit| hit.id).collect();
    assert_eq!(unsorted.len(), 3);

    let hits = system.query_space(&caster, true, CollisionMask::ALL);
    let ids: Vec<_> = hits.iter().map(|hit| hit.id).collect();
    assert_eq!(ids, vec![near, middle, far]);

    let nearest: Vec<f32> = hits
        .iter()
        .map(|hit| hit.points.iter().map(|p| p.point.x).fold(f32::INFINITY, f32::min))
        .collect();
    assert_relative_eq!(nearest[0], 1.0, epsilon = 1e-4);
    assert_relative_eq!(nearest[1], 3.0, epsilon = 1e-4);
    assert_relative_eq!(nearest[2], 5.0, epsilon = 1e-4);
}

#[test]
fn test_sorted_cast_orders_by_position_and_excludes_caster() {
    let mut system = world();
    let caster = system.add(circle(0.0, 0.0, 10.0));
    let one = system.add(circle(1.0, 0.0, 0.5));
    let five = system.add(circle(0.0, 5.0, 0.5));
    let three = system.add(circle(-3.0, 0.0, 0.5));

    let hits = system.cast_space(caster, true, CollisionMask::ALL);
    assert_eq!(hits, vec![one, three, five]);
    assert!(!hits.contains(&caster));
}

#[test]
fn test_grid_lookup_excludes_self() {
    let mut system = world();
    let a = system.add(circle(0.0, 0.0, 5.0));
    let b = system.add(circle(2.0, 0.0, 5.0));
    let bbox = system.get(a).unwrap().bounding_box();
    assert_eq!(system.grid().get_objects(&bbox, Some(a)), vec![b]);
    assert_eq!(system.grid().get_objects(&bbox, None), vec![a, b]);
}

#[test]
fn test_mask_filters_candidates() {
    let layer_1 = CollisionLayers::custom(1);
    let layer_2 = CollisionLayers::custom(2);
    let layer_3 = CollisionLayers::custom(3);

    let mut system = world();
    let target = system.add(
        circle(0.0, 0.0, 5.0)
            .with_layer(layer_2)
            .with_mask(CollisionMask::from_layers(&[layer_1, layer_3])),
    );
    let probe = Shape::from(crate::physics::Circle::new(Vec2::new(2.0, 0.0), 5.0));

    let excluding = CollisionMask::from_layers(&[layer_1, layer_3]);
    assert!(system.cast_space(&probe, false, excluding).is_empty());
    assert!(system.query_space(&probe, false, excluding).is_empty());
    assert_eq!(system.cast_space(&probe, false, CollisionMask::ALL), vec![target]);
    assert_eq!(system.cast_space(&probe, false, CollisionMask::from_layers(&[layer_2])), vec![target]);

    // Resolver applies the same rule to the scanning side's mask.
    let picky = system.add(circle(2.0, 0.0, 5.0).with_mask(excluding));
    let open = system.add(circle(-2.0, 0.0, 5.0));
    system.update(0.0);
    assert!(!system.overlapping(picky).contains(&target));
    assert!(system.overlapping(open).contains(&target));
}

#[test]
fn test_query_skips_contained_candidates_but_cast_does_not() {
    let mut system = world();
    let inner = system.add(circle(1.0, 1.0, 1.0));
    let probe = Shape::Rect(Rect::new(-20.0, -20.0, 40.0, 40.0));

    assert_eq!(system.cast_space(&probe, false, CollisionMask::ALL), vec![inner]);
    assert!(system.query_space(&probe, false, CollisionMask::ALL).is_empty());
}

#[test]
fn test_query_point() {
    let mut system = world();
    let a = system.add(circle(0.0, 0.0, 5.0).with_layer(CollisionLayers::PLAYER));
    let b = system.add(circle(4.0, 0.0, 5.0).with_layer(CollisionLayers::ENEMY));
    system.add(circle(50.0, 50.0, 5.0));

    assert_eq!(system.query_point(Vec2::new(2.0, 0.0), CollisionMask::ALL), vec![a, b]);
    assert_eq!(
        system.query_point(Vec2::new(2.0, 0.0), CollisionMask::from_layers(&[CollisionLayers::ENEMY])),
        vec![b]
    );
    assert!(system.query_point(Vec2::new(-30.0, 0.0), CollisionMask::ALL).is_empty());
}

#[test]
fn test_raycast_returns_nearest_hit() {
    let mut system = world();
    let near = system.add(circle(0.0, 0.0, 5.0).with_layer(CollisionLayers::ENVIRONMENT));
    let far = system.add(circle(20.0, 0.0, 5.0));
    let ray = Ray::new(Vec2::new(-50.0, 0.0), Vec2::new(1.0, 0.0));

    let hit = system.raycast(&ray, CollisionMask::ALL).unwrap();
    assert_eq!(hit.id, near);
    assert_relative_eq!(hit.distance, 45.0, epsilon = 1e-3);
    assert_relative_eq!(hit.point, Vec2::new(-5.0, 0.0), epsilon = 1e-3);
    assert_relative_eq!(hit.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-3);

    let masked = system
        .raycast(&ray, CollisionMask::from_layers(&[CollisionLayers::DEFAULT]))
        .unwrap();
    assert_eq!(masked.id, far);
    assert_relative_eq!(masked.distance, 65.0, epsilon = 1e-3);

    assert!(system.raycast(&Ray::new(Vec2::new(-50.0, 0.0), Vec2::zeros()), CollisionMask::ALL).is_none());
}

#[test]
fn test_queries_leave_overlap_state_alone() {
    let mut system = world();
    let a = system.add(circle(0.0, 0.0, 5.0));
    let b = system.add(circle(3.0, 0.0, 5.0));
    system.update(0.0);
    let events = system.last_events().to_vec();

    for _ in 0..3 {
        system.cast_space(a, true, CollisionMask::ALL);
        system.query_space(b, true, CollisionMask::ALL);
        system.query_point(Vec2::zeros(), CollisionMask::ALL);
    }
    assert_eq!(system.last_events(), events.as_slice());
    assert_eq!(system.overlapping(a), &[b]);

    system.update(0.0);
    assert!(system.last_events().iter().all(|event| event.is_persists()));
}

#[test]
fn test_grid_membership_after_update() {
    let mut system = world();
    let ids = system.add_range([
        circle(0.0, 0.0, 5.0),
        circle(-90.0, -90.0, 30.0),
        circle(24.0, 24.0, 2.0),
        circle(300.0, 0.0, 1.0),
    ]);
    system.update(0.0);

    let bounds = system.grid().bounds();
    for id in ids {
        let clamped = system.get(id).unwrap().bounding_box().clamped_to(&bounds);
        for cell in system.grid_cells() {
            let member = system.grid().objects_in_cell(cell.id).contains(&id);
            assert_eq!(member, cell.rect.overlaps_rect(&clamped));
        }
    }
}
