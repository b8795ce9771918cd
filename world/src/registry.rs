//! Ordered entity arena with monotonically allocated identifiers.

use std::collections::{btree_map, BTreeMap};

use serpent_defence_core::{EnemyId, ProjectileId, TowerId};

/// Identifier types the world allocates.
pub(crate) trait EntityId: Copy + Ord {
    /// Identifier handed to the first entity.
    const FIRST: Self;

    /// Identifier handed out after `self`.
    fn successor(self) -> Self;
}

impl EntityId for TowerId {
    const FIRST: Self = TowerId::new(0);

    fn successor(self) -> Self {
        self.next()
    }
}

impl EntityId for EnemyId {
    const FIRST: Self = EnemyId::new(0);

    fn successor(self) -> Self {
        self.next()
    }
}

impl EntityId for ProjectileId {
    const FIRST: Self = ProjectileId::new(0);

    fn successor(self) -> Self {
        self.next()
    }
}

/// Registry that stores entities and manages identifier allocation.
///
/// Identifiers are never reused, so iteration order equals insertion order.
#[derive(Debug)]
pub(crate) struct Registry<I, T> {
    entries: BTreeMap<I, T>,
    next_id: I,
}

impl<I: EntityId, T> Registry<I, T> {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: I::FIRST,
        }
    }

    /// Allocates an identifier and stores the entity built for it.
    pub(crate) fn insert_with<F>(&mut self, build: F) -> I
    where
        F: FnOnce(I) -> T,
    {
        let id = self.next_id;
        self.next_id = id.successor();
        let _ = self.entries.insert(id, build(id));
        id
    }

    pub(crate) fn get(&self, id: I) -> Option<&T> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: I) -> Option<T> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> btree_map::Values<'_, I, T> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> btree_map::ValuesMut<'_, I, T> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
