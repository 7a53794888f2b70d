//! Scene generation and per-tick movement for the sandbox

use crate::config::SandboxConfig;
use rand::rngs::StdRng;
use rand::Rng;
use spatial_collision::foundation::logging::{debug, info, trace};
use spatial_collision::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

/// Running totals shared with the handlers
#[derive(Debug, Default)]
pub struct Tally {
    contacts: Cell<u64>,
    separations: Cell<u64>,
    destroyed: Cell<u64>,
}

impl Tally {
    /// Contacts that started
    pub fn contacts(&self) -> u64 {
        self.contacts.get()
    }

    /// Ended overlaps
    pub fn separations(&self) -> u64 {
        self.separations.get()
    }

    /// Bodies removed by projectiles
    pub fn destroyed(&self) -> u64 {
        self.destroyed.get()
    }

    fn bump(counter: &Cell<u64>) {
        counter.set(counter.get() + 1);
    }
}

/// Counts contacts for a drifting body
struct Drifter {
    tally: Rc<Tally>,
}

impl CollisionHandler for Drifter {
    fn overlap(&mut self, info: &CollisionInfo, _commands: &mut CollisionCommands<'_>) {
        if info.first_contact {
            Tally::bump(&self.tally.contacts);
            debug!(
                "{:?} touched {:?} at {} point(s)",
                info.owner,
                info.other,
                info.points.len()
            );
        }
    }

    fn overlap_ended(&mut self, other: CollidableId, commands: &mut CollisionCommands<'_>) {
        Tally::bump(&self.tally.separations);
        trace!("{:?} left {:?}", commands.owner(), other);
    }
}

/// Destroys the first body it hits, then itself
struct Projectile {
    tally: Rc<Tally>,
    spent: bool,
}

impl CollisionHandler for Projectile {
    fn overlap(&mut self, info: &CollisionInfo, commands: &mut CollisionCommands<'_>) {
        if self.spent {
            return;
        }
        self.spent = true;
        Tally::bump(&self.tally.destroyed);
        info!("Projectile {:?} destroyed {:?}", info.owner, info.other);
        commands.remove(info.other);
        commands.remove_self();
    }
}

/// Populate `system` with random drifting bodies and projectiles
pub fn spawn(system: &mut CollisionSystem, config: &SandboxConfig, rng: &mut StdRng, tally: &Rc<Tally>) {
    let bounds = system.grid().bounds();
    let random_position = |rng: &mut StdRng| {
        Vec2::new(
            rng.gen_range(bounds.x..=bounds.right()),
            rng.gen_range(bounds.y..=bounds.bottom()),
        )
    };
    let random_velocity = |rng: &mut StdRng| {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = rng.gen_range(0.0..=config.max_speed);
        Vec2::new(angle.cos(), angle.sin()) * speed
    };

    for _ in 0..config.body_count {
        let radius = rng.gen_range(config.min_radius..=config.max_radius);
        let collider = Collider::circle(random_position(rng), radius).with_velocity(random_velocity(rng));
        system.add(
            Collidable::new(collider)
                .with_layer(CollisionLayers::ENEMY)
                .with_handler(Drifter { tally: Rc::clone(tally) }),
        );
    }

    for _ in 0..config.projectile_count {
        let collider = Collider::circle(random_position(rng), config.min_radius * 0.25)
            .with_velocity(random_velocity(rng) * 2.0);
        system.add(
            Collidable::new(collider)
                .with_layer(CollisionLayers::PROJECTILE)
                .with_mask(CollisionMask::from_layers(&[CollisionLayers::ENEMY]))
                .with_handler(Projectile {
                    tally: Rc::clone(tally),
                    spent: false,
                }),
        );
    }
    info!("Spawned {} collidables", system.len());
}

/// Reflect bodies that left the grid back inside it
pub fn bounce(system: &mut CollisionSystem) {
    let bounds = system.grid().bounds();
    for id in system.ids() {
        let Some(collidable) = system.get_mut(id) else {
            continue;
        };
        let collider = &mut collidable.collider;
        let mut position = collider.position();
        let mut velocity = collider.velocity;

        if position.x < bounds.x || position.x > bounds.right() {
            velocity.x = -velocity.x;
            position.x = position.x.clamp(bounds.x, bounds.right());
        }
        if position.y < bounds.y || position.y > bounds.bottom() {
            velocity.y = -velocity.y;
            position.y = position.y.clamp(bounds.y, bounds.bottom());
        }
        if velocity != collider.velocity {
            collider.velocity = velocity;
            collider.set_position(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn small_config() -> SandboxConfig {
        let mut config = SandboxConfig {
            body_count: 10,
            projectile_count: 3,
            ..SandboxConfig::default()
        };
        config.collision.bounds = GridBounds {
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 200.0,
        };
        config.collision.cols = 4;
        config.collision.rows = 4;
        config
    }

    #[test]
    fn test_spawn_inside_bounds() {
        let config = small_config();
        let mut system = CollisionSystem::from_config(&config.collision).unwrap();
        let tally = Rc::new(Tally::default());
        spawn(&mut system, &config, &mut StdRng::seed_from_u64(1), &tally);

        assert_eq!(system.len(), 13);
        let bounds = system.grid().bounds();
        for id in system.ids() {
            assert!(bounds.contains_point(&system.get(id).unwrap().position()));
        }
    }

    #[test]
    fn test_bounce_reflects_escaping_body() {
        let mut system = CollisionSystem::new(Rect::new(0.0, 0.0, 100.0, 100.0), 2, 2).unwrap();
        let id = system.add(Collidable::new(
            Collider::circle(Vec2::new(105.0, 50.0), 1.0).with_velocity(Vec2::new(10.0, 3.0)),
        ));
        bounce(&mut system);

        let collider = &system.get(id).unwrap().collider;
        assert_eq!(collider.velocity, Vec2::new(-10.0, 3.0));
        assert_eq!(collider.position(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_projectile_removes_target_and_itself() {
        let mut system = CollisionSystem::new(Rect::new(0.0, 0.0, 100.0, 100.0), 2, 2).unwrap();
        let tally = Rc::new(Tally::default());
        let target = system.add(
            Collidable::new(Collider::circle(Vec2::new(50.0, 50.0), 10.0)).with_layer(CollisionLayers::ENEMY),
        );
        let shot = system.add(
            Collidable::new(Collider::circle(Vec2::new(55.0, 50.0), 2.0))
                .with_layer(CollisionLayers::PROJECTILE)
                .with_handler(Projectile {
                    tally: Rc::clone(&tally),
                    spent: false,
                }),
        );

        system.update(0.0);
        assert_eq!(tally.destroyed(), 1);
        system.update(0.0);
        assert!(!system.contains(target));
        assert!(!system.contains(shot));
    }
}
