// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sparse-set component storage
//!
//! One store owns every instance of one component type. Components are held
//! in a dense array parallel to an array of owning entity ids, with a sparse
//! slot-index lookup on top. Insert, remove, and lookup are O(1); removal is
//! swap-with-last, so dense order is not stable across removals.

use std::any::Any;

use crate::component::Component;
use crate::entity::{slot_index, EntityId};

/// Sparse sentinel for "no component".
const ABSENT: u32 = u32::MAX;

/// Dense storage for all components of type `T`.
pub struct ComponentStore<T> {
    dense: Vec<T>,
    entities: Vec<EntityId>,
    /// Slot index -> dense position, `ABSENT` where no component exists.
    sparse: Vec<u32>,
}

impl<T: Component> ComponentStore<T> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// Dense position of `id`'s component, if present.
    ///
    /// The full handle is checked against the owning-entity array, so a
    /// stale handle whose slot was recycled never resolves.
    fn position_of(&self, id: EntityId) -> Option<usize> {
        let slot = slot_index(id);
        let pos = *self.sparse.get(slot)?;
        if pos == ABSENT {
            return None;
        }
        let pos = pos as usize;
        if self.entities[pos] != id {
            return None;
        }
        Some(pos)
    }

    /// Insert or replace the component for `id`, returning the previous
    /// value on replace.
    pub fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        if let Some(pos) = self.position_of(id) {
            return Some(std::mem::replace(&mut self.dense[pos], value));
        }

        let slot = slot_index(id);
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, ABSENT);
        }
        self.sparse[slot] = self.dense.len() as u32;
        self.dense.push(value);
        self.entities.push(id);
        None
    }

    /// Remove the component for `id`, if present.
    ///
    /// Swap-with-last: the last dense entry moves into the vacated position
    /// and its sparse entry is patched.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let pos = self.position_of(id)?;
        let last = self.dense.len() - 1;

        self.entities.swap(pos, last);
        self.dense.swap(pos, last);

        let moved = self.entities[pos];
        self.sparse[slot_index(moved)] = pos as u32;
        self.sparse[slot_index(id)] = ABSENT;

        self.entities.pop();
        self.dense.pop()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.position_of(id).map(|pos| &self.dense[pos])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.position_of(id).map(|pos| &mut self.dense[pos])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Owning entity ids in dense order.
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Iterate `(EntityId, &T)` in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterate `(EntityId, &mut T)` in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    pub fn clear(&mut self) {
        self.dense.clear();
        self.entities.clear();
        self.sparse.clear();
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased store interface held by the registry.
///
/// Lets entity destruction sweep every store without knowing component types.
pub(crate) trait AnyStore: Any + Send + Sync {
    fn remove_entity(&mut self, id: EntityId);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStore for ComponentStore<T> {
    fn remove_entity(&mut self, id: EntityId) {
        self.remove(id);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<EntityId> {
        let mut map: SlotMap<EntityId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_insert_then_get() {
        let e = ids(2);
        let mut store = ComponentStore::new();
        assert!(store.insert(e[0], 10u32).is_none());
        assert!(store.insert(e[1], 20u32).is_none());

        assert_eq!(store.get(e[0]), Some(&10));
        assert_eq!(store.get(e[1]), Some(&20));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_replaces_and_returns_old() {
        let e = ids(1);
        let mut store = ComponentStore::new();
        store.insert(e[0], 1u32);
        assert_eq!(store.insert(e[0], 2u32), Some(1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(e[0]), Some(&2));
    }

    #[test]
    fn test_swap_remove_patches_moved_entity() {
        let e = ids(3);
        let mut store = ComponentStore::new();
        store.insert(e[0], 'a');
        store.insert(e[1], 'b');
        store.insert(e[2], 'c');

        // Removing the head moves the tail into its place.
        assert_eq!(store.remove(e[0]), Some('a'));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(e[1]), Some(&'b'));
        assert_eq!(store.get(e[2]), Some(&'c'));
        assert!(store.get(e[0]).is_none());
    }

    #[test]
    fn test_remove_absent_is_none() {
        let e = ids(1);
        let mut store: ComponentStore<u32> = ComponentStore::new();
        assert!(store.remove(e[0]).is_none());
    }

    #[test]
    fn test_stale_generation_does_not_resolve() {
        let mut map: SlotMap<EntityId, ()> = SlotMap::with_key();
        let old = map.insert(());
        map.remove(old);
        let new = map.insert(()); // same slot, new version

        let mut store = ComponentStore::new();
        store.insert(new, 7u32);

        assert!(store.get(old).is_none());
        assert!(!store.contains(old));
        assert_eq!(store.get(new), Some(&7));
    }

    #[test]
    fn test_iter_yields_dense_pairs() {
        let e = ids(3);
        let mut store = ComponentStore::new();
        for (i, &id) in e.iter().enumerate() {
            store.insert(id, i as u32);
        }

        let mut seen: Vec<_> = store.iter().map(|(id, v)| (id, *v)).collect();
        seen.sort_by_key(|&(_, v)| v);
        assert_eq!(seen, vec![(e[0], 0), (e[1], 1), (e[2], 2)]);
    }
}
