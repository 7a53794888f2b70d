//! Scenario tests driving the whole collision system
//!
//! Shared fixtures live here; each submodule covers one area.

mod spatial_queries;

use crate::foundation::collections::CollidableId;
use crate::foundation::math::Vec2;
use crate::physics::{
    Collidable, Collider, CollisionCommands, CollisionHandler, CollisionInfo, CollisionSystem, Rect,
};
use std::cell::RefCell;
use std::rc::Rc;

/// 200x200 world centered on the origin, 8x8 cells of 25 units
pub(super) fn world() -> CollisionSystem {
    CollisionSystem::new(Rect::new(-100.0, -100.0, 200.0, 200.0), 8, 8).unwrap()
}

pub(super) fn circle(x: f32, y: f32, radius: f32) -> Collidable {
    Collidable::new(Collider::circle(Vec2::new(x, y), radius))
}

/// What a [`Recorder`] saw, in delivery order
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Record {
    Overlap {
        owner: CollidableId,
        other: CollidableId,
        first_contact: bool,
    },
    Ended {
        owner: CollidableId,
        other: CollidableId,
    },
}

/// Shared, inspectable event log
#[derive(Debug, Clone, Default)]
pub(super) struct EventLog(Rc<RefCell<Vec<Record>>>);

impl EventLog {
    pub(super) fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    fn push(&self, record: Record) {
        self.0.borrow_mut().push(record);
    }

    pub(super) fn recorder(&self) -> Recorder {
        Recorder { log: self.clone() }
    }
}

/// Handler writing every delivery into an [`EventLog`]
pub(super) struct Recorder {
    log: EventLog,
}

impl CollisionHandler for Recorder {
    fn overlap(&mut self, info: &CollisionInfo, _commands: &mut CollisionCommands<'_>) {
        self.log.push(Record::Overlap {
            owner: info.owner,
            other: info.other,
            first_contact: info.first_contact,
        });
    }

    fn overlap_ended(&mut self, other: CollidableId, commands: &mut CollisionCommands<'_>) {
        self.log.push(Record::Ended {
            owner: commands.owner(),
            other,
        });
    }
}
