//! Handle types for collidables
//!
//! Collidables live in a slot map owned by the registry. The key doubles as
//! the collidable's identity: two registrations never share a key, even when
//! their shapes are identical, and a removed key is never handed out again
//! for a live collidable.

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Stable identity of a registered collidable
    pub struct CollidableId;
}

/// Slot map keyed by collidable identity
pub type CollidableMap<T> = SlotMap<CollidableId, T>;

/// Per-collidable side table (snapshots, caches)
pub type CollidableTable<T> = SecondaryMap<CollidableId, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_key_is_not_reused() {
        let mut map: CollidableMap<u32> = CollidableMap::with_key();
        let first = map.insert(1);
        map.remove(first);
        let second = map.insert(2);

        assert_ne!(first, second);
        assert!(map.get(first).is_none());
        assert_eq!(map.get(second), Some(&2));
    }
}
