//! Collidable registry with deferred mutation
//!
//! While the resolver runs a tick the registry is locked: `add` still hands
//! out an id right away but the collidable stays inactive, and `remove` is
//! queued. Both queues are applied by [`CollidableRegistry::flush`].

use super::collidable::Collidable;
use crate::foundation::collections::{CollidableId, CollidableMap};
use crate::foundation::logging::{debug, trace};

struct RegistryEntry {
    collidable: Collidable,
    active: bool,
}

/// Result of applying the pending queues
#[derive(Debug, Default)]
pub struct Flushed {
    /// Collidables that became active
    pub added: Vec<CollidableId>,
    /// Collidables taken out of the registry
    pub removed: Vec<(CollidableId, Collidable)>,
}

impl Flushed {
    /// True when nothing changed
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Owner of every collidable
#[derive(Default)]
pub struct CollidableRegistry {
    entries: CollidableMap<RegistryEntry>,
    pending_add: Vec<CollidableId>,
    pending_remove: Vec<CollidableId>,
    locked: bool,
}

impl CollidableRegistry {
    /// Creates an empty, unlocked registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored collidables, including ones waiting to become active
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True while a tick is in progress
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }

    pub(crate) fn unlock(&mut self) {
        self.locked = false;
    }

    /// Whether `id` is stored (active or pending)
    pub fn contains(&self, id: CollidableId) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether `id` takes part in scans and queries
    pub fn is_active(&self, id: CollidableId) -> bool {
        self.entries.get(id).is_some_and(|entry| entry.active)
    }

    /// Whether `id` is queued for removal
    pub fn is_pending_removal(&self, id: CollidableId) -> bool {
        self.pending_remove.contains(&id)
    }

    /// Collidable by id, active or pending
    pub fn get(&self, id: CollidableId) -> Option<&Collidable> {
        self.entries.get(id).map(|entry| &entry.collidable)
    }

    /// Mutable collidable by id, active or pending
    pub fn get_mut(&mut self, id: CollidableId) -> Option<&mut Collidable> {
        self.entries.get_mut(id).map(|entry| &mut entry.collidable)
    }

    /// Active collidables in storage order
    pub fn iter(&self) -> impl Iterator<Item = (CollidableId, &Collidable)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.active)
            .map(|(id, entry)| (id, &entry.collidable))
    }

    /// Mutable active collidables in storage order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CollidableId, &mut Collidable)> {
        self.entries
            .iter_mut()
            .filter(|(_, entry)| entry.active)
            .map(|(id, entry)| (id, &mut entry.collidable))
    }

    /// Ids of active collidables in storage order
    pub fn ids(&self) -> Vec<CollidableId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Register a collidable
    ///
    /// Unlocked, it is active immediately. Locked, the id is reserved now and
    /// the collidable becomes active at the next flush.
    pub fn add(&mut self, collidable: Collidable) -> CollidableId {
        let active = !self.locked;
        let id = self.entries.insert(RegistryEntry { collidable, active });
        if self.locked {
            self.pending_add.push(id);
        }
        debug!("Registered collidable {:?} (active: {})", id, active);
        id
    }

    /// Register several collidables
    pub fn add_range(&mut self, collidables: impl IntoIterator<Item = Collidable>) -> Vec<CollidableId> {
        collidables.into_iter().map(|c| self.add(c)).collect()
    }

    /// Remove a collidable
    ///
    /// Unlocked, the collidable is returned. Locked, removal is queued and
    /// `None` is returned. Unknown ids are ignored.
    pub fn remove(&mut self, id: CollidableId) -> Option<Collidable> {
        if !self.entries.contains_key(id) {
            trace!("Ignoring removal of stale collidable {:?}", id);
            return None;
        }
        if self.locked {
            if !self.pending_remove.contains(&id) {
                self.pending_remove.push(id);
            }
            return None;
        }
        debug!("Removed collidable {:?}", id);
        self.pending_add.retain(|pending| *pending != id);
        self.entries.remove(id).map(|entry| entry.collidable)
    }

    /// Remove several collidables; returns the ones removed immediately
    pub fn remove_range(&mut self, ids: impl IntoIterator<Item = CollidableId>) -> Vec<Collidable> {
        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Remove everything
    ///
    /// Locked, every stored collidable is queued for removal instead.
    pub fn clear(&mut self) {
        if self.locked {
            let ids: Vec<CollidableId> = self.entries.keys().collect();
            for id in ids {
                let _ = self.remove(id);
            }
            return;
        }
        debug!("Cleared {} collidables", self.entries.len());
        self.entries.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
    }

    /// Drop every collidable and pending change and unlock
    pub fn close(&mut self) {
        self.entries.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
        self.locked = false;
    }

    /// Apply the pending queues: activate queued adds, then take out queued
    /// removals
    pub fn flush(&mut self) -> Flushed {
        let mut flushed = Flushed::default();
        for id in std::mem::take(&mut self.pending_add) {
            match self.entries.get_mut(id) {
                Some(entry) => {
                    entry.active = true;
                    flushed.added.push(id);
                }
                None => trace!("Skipping stale pending add {:?}", id),
            }
        }
        for id in std::mem::take(&mut self.pending_remove) {
            match self.entries.remove(id) {
                Some(entry) => flushed.removed.push((id, entry.collidable)),
                None => trace!("Skipping stale pending removal {:?}", id),
            }
        }
        if !flushed.is_empty() {
            debug!(
                "Registry flush: {} added, {} removed",
                flushed.added.len(),
                flushed.removed.len()
            );
        }
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::collider::Collider;

    fn body() -> Collidable {
        Collidable::new(Collider::circle(Vec2::zeros(), 1.0))
    }

    #[test]
    fn test_unlocked_add_is_active() {
        let mut registry = CollidableRegistry::new();
        let id = registry.add(body());
        assert!(registry.is_active(id));
        assert_eq!(registry.ids(), vec![id]);
    }

    #[test]
    fn test_locked_add_waits_for_flush() {
        let mut registry = CollidableRegistry::new();
        registry.lock();
        let id = registry.add(body());
        assert!(registry.contains(id));
        assert!(!registry.is_active(id));
        assert_eq!(registry.iter().count(), 0);

        let flushed = registry.flush();
        assert_eq!(flushed.added, vec![id]);
        assert!(registry.is_active(id));
    }

    #[test]
    fn test_locked_remove_is_queued() {
        let mut registry = CollidableRegistry::new();
        let id = registry.add(body());
        registry.lock();
        assert!(registry.remove(id).is_none());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_active(id));
        assert!(registry.is_pending_removal(id));

        let flushed = registry.flush();
        assert_eq!(flushed.removed.len(), 1);
        assert_eq!(flushed.removed[0].0, id);
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_stale_ids_are_ignored() {
        let mut registry = CollidableRegistry::new();
        let id = registry.add(body());
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.get(id).is_none());
        assert!(registry.flush().is_empty());
    }

    #[test]
    fn test_add_then_remove_in_same_lock() {
        let mut registry = CollidableRegistry::new();
        registry.lock();
        let id = registry.add(body());
        let _ = registry.remove(id);
        let flushed = registry.flush();
        assert_eq!(flushed.added, vec![id]);
        assert_eq!(flushed.removed.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_while_locked_queues_everything() {
        let mut registry = CollidableRegistry::new();
        registry.add_range([body(), body(), body()]);
        registry.lock();
        registry.clear();
        assert_eq!(registry.len(), 3);
        registry.unlock();
        assert_eq!(registry.flush().removed.len(), 3);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_close_drops_pending() {
        let mut registry = CollidableRegistry::new();
        registry.add(body());
        registry.lock();
        registry.add(body());
        registry.close();
        assert!(registry.is_empty());
        assert!(!registry.is_locked());
        assert!(registry.flush().is_empty());
    }
}
