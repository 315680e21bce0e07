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

//! Registry: central entity and component storage
//!
//! The registry owns the set of live entities and one [`ComponentStore`] per
//! component type. It is the sole authority for entity allocation and
//! recycling. Mutation methods may reallocate or reorder a store's dense
//! arrays; callers must not hold component references across them.

use std::any::TypeId;

use ahash::AHashMap;
use slotmap::SlotMap;
use tracing::trace;

use crate::component::Component;
use crate::entity::EntityId;
use crate::error::{EcsError, Result};
use crate::store::{AnyStore, ComponentStore};
use crate::view::{View, ViewQuery};

/// Default cap on live entities: the full 32-bit slot range.
pub const DEFAULT_ENTITY_CAPACITY: usize = (u32::MAX - 1) as usize;

/// Central ECS registry
pub struct Registry {
    /// Liveness map keyed by generational ids
    entities: SlotMap<EntityId, ()>,

    /// One type-erased store per registered component type
    stores: AHashMap<TypeId, Box<dyn AnyStore>>,

    /// Maximum live entities before `create_entity` fails
    capacity: usize,

    /// Recycled id counter (for diagnostics)
    recycled: usize,
}

impl Registry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ENTITY_CAPACITY)
    }

    /// Create a registry with an explicit live-entity cap.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: SlotMap::with_key(),
            stores: AHashMap::new(),
            capacity,
            recycled: 0,
        }
    }

    /// Allocate a fresh or recycled entity id.
    ///
    /// Fails only with [`EcsError::CapacityExhausted`], which is fatal in
    /// practice.
    pub fn create_entity(&mut self) -> Result<EntityId> {
        if self.entities.len() >= self.capacity {
            return Err(EcsError::CapacityExhausted {
                live: self.entities.len(),
                capacity: self.capacity,
            });
        }
        let id = self.entities.insert(());
        trace!(?id, "entity created");
        Ok(id)
    }

    /// Destroy an entity and remove its components from every store.
    ///
    /// Returns [`EcsError::InvalidEntity`] if `id` is not live, so a
    /// double-destroy is reported rather than silently swallowed.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<()> {
        if self.entities.remove(id).is_none() {
            return Err(EcsError::InvalidEntity(id));
        }
        for store in self.stores.values_mut() {
            store.remove_entity(id);
        }
        self.recycled += 1;
        trace!(?id, "entity destroyed");
        Ok(())
    }

    /// Check if an entity handle is live.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of ids returned to the allocator over the registry's lifetime.
    pub fn recycled_count(&self) -> usize {
        self.recycled
    }

    /// Insert or replace component `T` for `id`, returning the previous
    /// value on replace.
    ///
    /// Fails with [`EcsError::InvalidEntity`] if `id` is not live; no store
    /// is touched in that case.
    pub fn add_component<T: Component>(&mut self, id: EntityId, value: T) -> Result<Option<T>> {
        if !self.entities.contains_key(id) {
            return Err(EcsError::InvalidEntity(id));
        }
        let store = self
            .stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStore::<T>::new()));
        let store = store
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .expect("store registered under mismatched TypeId");
        Ok(store.insert(id, value))
    }

    /// Remove component `T` from `id` if present; no-op otherwise.
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> Option<T> {
        self.store_mut::<T>()?.remove(id)
    }

    /// Component `T` of `id`, if present.
    ///
    /// The reference is valid until the next structural mutation of the `T`
    /// store. Absence is not an error.
    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.store::<T>()?.get(id)
    }

    /// Mutable component `T` of `id`, if present.
    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.store_mut::<T>()?.get_mut(id)
    }

    /// Whether `id` currently has a component of type `T`.
    pub fn has_component<T: Component>(&self, id: EntityId) -> bool {
        self.store::<T>().map_or(false, |s| s.contains(id))
    }

    /// Number of components of type `T` across all entities.
    pub fn store_len<T: Component>(&self) -> usize {
        self.store::<T>().map_or(0, ComponentStore::len)
    }

    /// Iterate entities possessing every component type named by `Q`.
    ///
    /// `Q` is `&T`, `&mut T`, or a tuple of such fetches. The smallest
    /// participating store drives iteration; the others are probed per
    /// entity. Order is unspecified but stable for one call.
    pub fn view<'r, Q: ViewQuery<'r>>(&'r mut self) -> View<'r, Q> {
        View::new(self)
    }

    pub(crate) fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.stores
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
    }

    pub(crate) fn store_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        self.stores
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
