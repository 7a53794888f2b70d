//! Per-tick collision resolver
//!
//! Each tick rebuilds the spatial hash from a snapshot of world shapes, lets
//! every scanning collidable test its grid candidates, diffs the result
//! against last tick's overlaps and finally hands the resulting events to
//! the collidables' handlers.
//!
//! Overlap state is tracked per ordered pair: A watching B and B watching A
//! are separate entries, and each side only learns about transitions its
//! own scan observed.

use super::collidable::Collidable;
use super::collision::{Rect, Shape};
use super::events::{CollisionCommands, CollisionEvent, CollisionInfo};
use super::registry::{CollidableRegistry, Flushed};
use crate::config::CollisionConfig;
use crate::foundation::collections::{CollidableId, CollidableTable};
use crate::spatial::{CellView, SpatialHash};
use crate::foundation::logging::{debug, trace};
use std::collections::HashMap;
use thiserror::Error;

/// Construction-time failures of the collision system
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// Grid with no cells or a degenerate region
    #[error("Invalid grid: {cols}x{rows} cells over a {width}x{height} region")]
    InvalidGrid {
        /// Requested columns
        cols: usize,
        /// Requested rows
        rows: usize,
        /// Region width
        width: f32,
        /// Region height
        height: f32,
    },
}

/// Counters for one resolver tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Collidables that scanned their candidates
    pub scanned: usize,
    /// Candidate pairs that reached the narrow phase
    pub candidates: usize,
    /// Began events
    pub began: usize,
    /// Persists events
    pub persisted: usize,
    /// Ended events
    pub ended: usize,
    /// Collidables activated by queue flushes
    pub added: usize,
    /// Collidables removed by queue flushes
    pub removed: usize,
}

/// Broad phase, narrow phase and overlap bookkeeping for a set of collidables
pub struct CollisionSystem {
    grid: SpatialHash,
    registry: CollidableRegistry,
    /// Shapes the grid was last built from
    shapes: CollidableTable<Shape>,
    /// Who each collidable overlapped at the end of the previous scan
    overlaps: HashMap<CollidableId, Vec<CollidableId>>,
    events: Vec<CollisionEvent>,
    tick: u64,
}

impl CollisionSystem {
    /// Creates a system whose grid has `cols × rows` cells over `bounds`
    pub fn new(bounds: Rect, cols: usize, rows: usize) -> Result<Self, CollisionError> {
        Ok(Self {
            grid: SpatialHash::new(bounds, cols, rows)?,
            registry: CollidableRegistry::new(),
            shapes: CollidableTable::new(),
            overlaps: HashMap::new(),
            events: Vec::new(),
            tick: 0,
        })
    }

    /// Creates a system from configuration
    pub fn from_config(config: &CollisionConfig) -> Result<Self, CollisionError> {
        Self::new(config.bounds.to_rect(), config.cols, config.rows)
    }

    /// The broad-phase grid
    pub fn grid(&self) -> &SpatialHash {
        &self.grid
    }

    /// The collidable registry
    pub fn registry(&self) -> &CollidableRegistry {
        &self.registry
    }

    /// Number of ticks run so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of stored collidables
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True when no collidable is stored
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Whether `id` is stored
    pub fn contains(&self, id: CollidableId) -> bool {
        self.registry.contains(id)
    }

    /// Collidable by id
    pub fn get(&self, id: CollidableId) -> Option<&Collidable> {
        self.registry.get(id)
    }

    /// Mutable collidable by id
    pub fn get_mut(&mut self, id: CollidableId) -> Option<&mut Collidable> {
        self.registry.get_mut(id)
    }

    /// Active collidable ids in storage order
    pub fn ids(&self) -> Vec<CollidableId> {
        self.registry.ids()
    }

    /// Register a collidable; it is visible to queries right away
    pub fn add(&mut self, collidable: Collidable) -> CollidableId {
        let id = self.registry.add(collidable);
        self.index(id);
        id
    }

    /// Register several collidables
    pub fn add_range(&mut self, collidables: impl IntoIterator<Item = Collidable>) -> Vec<CollidableId> {
        collidables.into_iter().map(|c| self.add(c)).collect()
    }

    /// Remove a collidable and forget its overlaps
    ///
    /// Other collidables that overlapped it get an ended event on the next
    /// tick. Unknown ids return `None`.
    pub fn remove(&mut self, id: CollidableId) -> Option<Collidable> {
        let collidable = self.registry.remove(id)?;
        self.unindex(id, &collidable);
        Some(collidable)
    }

    /// Remove several collidables
    pub fn remove_range(&mut self, ids: impl IntoIterator<Item = CollidableId>) -> Vec<Collidable> {
        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Remove every collidable and all overlap state
    pub fn clear(&mut self) {
        self.registry.clear();
        self.grid.clear();
        self.shapes.clear();
        self.overlaps.clear();
        self.events.clear();
    }

    /// Drop everything, including queued changes, and release grid storage
    pub fn close(&mut self) {
        self.registry.close();
        self.grid.release();
        self.shapes.clear();
        self.overlaps.clear();
        self.events.clear();
        debug!("Collision system closed after {} ticks", self.tick);
    }

    /// Move the grid over a new region and re-index every collidable
    pub fn update_bounds(&mut self, bounds: Rect) -> Result<(), CollisionError> {
        self.grid.resize(bounds)?;
        self.rebuild();
        debug!(
            "Collision bounds now ({}, {}, {}, {})",
            bounds.x, bounds.y, bounds.width, bounds.height
        );
        Ok(())
    }

    /// Per-cell debug view of the grid
    pub fn grid_cells(&self) -> impl Iterator<Item = CellView> + '_ {
        self.grid.cell_views()
    }

    /// Events produced by the last tick, in scan order
    pub fn last_events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Collidables `id` overlapped at the end of the last scan
    pub fn overlapping(&self, id: CollidableId) -> &[CollidableId] {
        self.overlaps.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn index(&mut self, id: CollidableId) {
        if !self.registry.is_active(id) {
            return;
        }
        if let Some(collidable) = self.registry.get(id).filter(|c| c.is_enabled()) {
            let shape = collidable.shape();
            self.grid.add(id, &shape.bounding_box());
            self.shapes.insert(id, shape);
        }
    }

    fn unindex(&mut self, id: CollidableId, collidable: &Collidable) {
        let bbox = match self.shapes.remove(id) {
            Some(shape) => shape.bounding_box(),
            None => collidable.bounding_box(),
        };
        self.grid.remove(id, &bbox);
        self.overlaps.remove(&id);
    }

    fn purge(&mut self, flushed: &Flushed, report: &mut TickReport) {
        for (id, _) in &flushed.removed {
            self.overlaps.remove(id);
        }
        report.added += flushed.added.len();
        report.removed += flushed.removed.len();
    }

    /// Run one tick
    ///
    /// 1. Apply changes queued by last tick's handlers and integrate every
    ///    enabled collider by `dt`.
    /// 2. Lock the registry and rebuild the grid.
    /// 3. Scan: classify every candidate pair as began, persists or ended.
    /// 4. Resolve: flush the queues, then deliver began/persists events
    ///    followed by ended events.
    pub fn update(&mut self, dt: f32) -> TickReport {
        self.tick += 1;
        self.events.clear();
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        let leftover = self.registry.flush();
        self.purge(&leftover, &mut report);

        for (_, collidable) in self.registry.iter_mut() {
            if collidable.is_enabled() {
                collidable.collider.integrate(dt);
            }
        }

        self.registry.lock();
        self.rebuild();
        self.scan(&mut report);
        self.resolve(&mut report);
        self.registry.unlock();

        trace!(
            "Tick {}: {} scanned, {} candidates, {} began, {} persisted, {} ended",
            report.tick,
            report.scanned,
            report.candidates,
            report.began,
            report.persisted,
            report.ended
        );
        report
    }

    fn rebuild(&mut self) {
        self.grid.clear();
        self.shapes.clear();
        for (id, collidable) in self.registry.iter() {
            if !collidable.is_enabled() {
                continue;
            }
            let shape = collidable.shape();
            self.grid.add(id, &shape.bounding_box());
            self.shapes.insert(id, shape);
        }
    }

    fn scan(&mut self, report: &mut TickReport) {
        for a_id in self.registry.ids() {
            let previous = self.overlaps.remove(&a_id).unwrap_or_default();
            let Some(a) = self.registry.get(a_id) else {
                trace!("Skipping stale collidable {:?}", a_id);
                continue;
            };

            // Not scanning this tick: every overlap it saw ends.
            let scanning = a.collider.computes_collision();
            let Some(a_shape) = self.shapes.get(a_id).filter(|_| scanning) else {
                for other in previous {
                    self.events.push(CollisionEvent::Ended { owner: a_id, other });
                    report.ended += 1;
                }
                continue;
            };
            report.scanned += 1;

            let mut current = Vec::new();
            for b_id in self.grid.get_objects(&a_shape.bounding_box(), Some(a_id)) {
                let (Some(b), Some(b_shape)) = (self.registry.get(b_id), self.shapes.get(b_id)) else {
                    trace!("Skipping stale candidate {:?}", b_id);
                    continue;
                };
                if !b.is_enabled() || !a.accepts(b) {
                    continue;
                }
                report.candidates += 1;
                if !a_shape.overlaps(b_shape) {
                    continue;
                }

                let was_overlapping = previous.contains(&b_id);
                let points = if a.collider.computes_intersections() {
                    a_shape.intersect(b_shape)
                } else {
                    Vec::new()
                };
                let info = CollisionInfo {
                    owner: a_id,
                    other: b_id,
                    other_layer: b.layer,
                    first_contact: !was_overlapping,
                    points,
                    owner_velocity: a.collider.velocity,
                    other_velocity: b.collider.velocity,
                };
                if was_overlapping {
                    self.events.push(CollisionEvent::Persists(info));
                    report.persisted += 1;
                } else {
                    self.events.push(CollisionEvent::Began(info));
                    report.began += 1;
                }
                current.push(b_id);
            }

            for other in previous {
                if !current.contains(&other) {
                    self.events.push(CollisionEvent::Ended { owner: a_id, other });
                    report.ended += 1;
                }
            }
            if !current.is_empty() {
                self.overlaps.insert(a_id, current);
            }
        }
    }

    fn resolve(&mut self, report: &mut TickReport) {
        let flushed = self.registry.flush();
        self.purge(&flushed, report);
        let mut graveyard = flushed.removed;

        let events = std::mem::take(&mut self.events);
        let ordered = events
            .iter()
            .filter(|event| !event.is_ended())
            .chain(events.iter().filter(|event| event.is_ended()));
        for event in ordered {
            let owner = event.owner();
            let handler = match self.registry.get_mut(owner) {
                Some(collidable) => collidable.take_handler(),
                None => graveyard
                    .iter_mut()
                    .find(|(id, _)| *id == owner)
                    .and_then(|(_, collidable)| collidable.take_handler()),
            };
            let Some(mut handler) = handler else {
                continue;
            };

            let mut commands = CollisionCommands::new(&mut self.registry, owner);
            match event {
                CollisionEvent::Began(info) | CollisionEvent::Persists(info) => {
                    handler.overlap(info, &mut commands);
                }
                CollisionEvent::Ended { other, .. } => handler.overlap_ended(*other, &mut commands),
            }

            if let Some(collidable) = self.registry.get_mut(owner) {
                collidable.restore_handler(handler);
            } else if let Some((_, collidable)) = graveyard.iter_mut().find(|(id, _)| *id == owner) {
                collidable.restore_handler(handler);
            }
        }
        self.events = events;
    }
}
