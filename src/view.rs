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

//! Multi-component views
//!
//! A view iterates `(EntityId, ...)` over every entity possessing all the
//! component types named by its query. The smallest participating store
//! drives iteration and the others are probed per entity, so a view over a
//! rare component stays near-linear in the rare set. Queries are `&T`,
//! `&mut T`, or tuples of those up to [`MAX_VIEW_COMPONENTS`].

use std::any::TypeId;
use std::marker::PhantomData;

use smallvec::{smallvec, SmallVec};

use crate::component::Component;
use crate::entity::EntityId;
use crate::registry::Registry;

/// Maximum number of component fetches in one view query
pub const MAX_VIEW_COMPONENTS: usize = 4;

/// One component fetch within a view query: `&T` or `&mut T`.
pub trait ViewFetch<'r> {
    /// Borrow yielded per matching entity
    type Item;

    fn type_id() -> TypeId;

    /// Whether this fetch takes the component mutably
    fn mutates() -> bool;

    /// Dense length of the backing store (0 when unregistered)
    fn store_len(registry: &Registry) -> usize;

    /// Snapshot of the backing store's owning-entity ids
    fn entity_snapshot(registry: &Registry) -> Vec<EntityId>;

    /// Fetch the component borrow for `id`, or `None` if absent.
    ///
    /// # Safety
    /// `registry` must point to a registry exclusively borrowed for `'r`,
    /// and no two simultaneously live mutable fetches may target the same
    /// component type.
    unsafe fn fetch(registry: *mut Registry, id: EntityId) -> Option<Self::Item>;
}

impl<'r, T: Component> ViewFetch<'r> for &'r T {
    type Item = &'r T;

    fn type_id() -> TypeId {
        TypeId::of::<T>()
    }

    fn mutates() -> bool {
        false
    }

    fn store_len(registry: &Registry) -> usize {
        registry.store_len::<T>()
    }

    fn entity_snapshot(registry: &Registry) -> Vec<EntityId> {
        registry
            .store::<T>()
            .map(|s| s.entities().to_vec())
            .unwrap_or_default()
    }

    unsafe fn fetch(registry: *mut Registry, id: EntityId) -> Option<&'r T> {
        (*registry).store::<T>()?.get(id)
    }
}

impl<'r, T: Component> ViewFetch<'r> for &'r mut T {
    type Item = &'r mut T;

    fn type_id() -> TypeId {
        TypeId::of::<T>()
    }

    fn mutates() -> bool {
        true
    }

    fn store_len(registry: &Registry) -> usize {
        registry.store_len::<T>()
    }

    fn entity_snapshot(registry: &Registry) -> Vec<EntityId> {
        registry
            .store::<T>()
            .map(|s| s.entities().to_vec())
            .unwrap_or_default()
    }

    unsafe fn fetch(registry: *mut Registry, id: EntityId) -> Option<&'r mut T> {
        (*registry).store_mut::<T>()?.get_mut(id)
    }
}

/// Complete view query: a single fetch or a tuple of fetches.
pub trait ViewQuery<'r> {
    /// Item yielded per matching entity (alongside its [`EntityId`])
    type Item;

    /// Component types the query touches, in fetch order
    fn type_ids() -> SmallVec<[TypeId; MAX_VIEW_COMPONENTS]>;

    /// Subset of [`Self::type_ids`] taken mutably
    fn write_ids() -> SmallVec<[TypeId; MAX_VIEW_COMPONENTS]>;

    /// Entity snapshot of the smallest participating store
    fn driver_entities(registry: &Registry) -> Vec<EntityId>;

    /// Fetch all borrows for `id`, or `None` if any component is absent.
    ///
    /// # Safety
    /// Same contract as [`ViewFetch::fetch`].
    unsafe fn fetch(registry: *mut Registry, id: EntityId) -> Option<Self::Item>;
}

impl<'r, T: Component> ViewQuery<'r> for &'r T {
    type Item = &'r T;

    fn type_ids() -> SmallVec<[TypeId; MAX_VIEW_COMPONENTS]> {
        smallvec![TypeId::of::<T>()]
    }

    fn write_ids() -> SmallVec<[TypeId; MAX_VIEW_COMPONENTS]> {
        SmallVec::new()
    }

    fn driver_entities(registry: &Registry) -> Vec<EntityId> {
        <&T as ViewFetch>::entity_snapshot(registry)
    }

    unsafe fn fetch(registry: *mut Registry, id: EntityId) -> Option<Self::Item> {
        <&T as ViewFetch>::fetch(registry, id)
    }
}

impl<'r, T: Component> ViewQuery<'r> for &'r mut T {
    type Item = &'r mut T;

    fn type_ids() -> SmallVec<[TypeId; MAX_VIEW_COMPONENTS]> {
        smallvec![TypeId::of::<T>()]
    }

    fn write_ids() -> SmallVec<[TypeId; MAX_VIEW_COMPONENTS]> {
        smallvec![TypeId::of::<T>()]
    }

    fn driver_entities(registry: &Registry) -> Vec<EntityId> {
        <&mut T as ViewFetch>::entity_snapshot(registry)
    }

    unsafe fn fetch(registry: *mut Registry, id: EntityId) -> Option<Self::Item> {
        <&mut T as ViewFetch>::fetch(registry, id)
    }
}

// Tuple queries up to MAX_VIEW_COMPONENTS fetches
macro_rules! impl_view_query {
    ($($F:ident),+) => {
        impl<'r, $($F: ViewFetch<'r>),+> ViewQuery<'r> for ($($F,)+) {
            type Item = ($($F::Item,)+);

            fn type_ids() -> SmallVec<[TypeId; MAX_VIEW_COMPONENTS]> {
                smallvec![$($F::type_id()),+]
            }

            fn write_ids() -> SmallVec<[TypeId; MAX_VIEW_COMPONENTS]> {
                let mut ids = SmallVec::new();
                $(
                    if $F::mutates() {
                        ids.push($F::type_id());
                    }
                )+
                ids
            }

            fn driver_entities(registry: &Registry) -> Vec<EntityId> {
                let mut best: Option<(usize, Vec<EntityId>)> = None;
                $(
                    let len = $F::store_len(registry);
                    if best.as_ref().map_or(true, |(l, _)| len < *l) {
                        best = Some((len, $F::entity_snapshot(registry)));
                    }
                )+
                best.map(|(_, e)| e).unwrap_or_default()
            }

            unsafe fn fetch(registry: *mut Registry, id: EntityId) -> Option<Self::Item> {
                Some(($($F::fetch(registry, id)?,)+))
            }
        }
    };
}

impl_view_query!(A);
impl_view_query!(A, B);
impl_view_query!(A, B, C);
impl_view_query!(A, B, C, D);

/// Lazy iterator over entities matching a view query.
///
/// Created by [`Registry::view`]. Holds the registry exclusively for its
/// lifetime, so no structural mutation can interleave with iteration; call
/// `view()` again for a fresh pass.
pub struct View<'r, Q: ViewQuery<'r>> {
    registry: *mut Registry,
    entities: Vec<EntityId>,
    cursor: usize,
    _marker: PhantomData<(&'r mut Registry, Q)>,
}

impl<'r, Q: ViewQuery<'r>> View<'r, Q> {
    pub(crate) fn new(registry: &'r mut Registry) -> Self {
        let writes = Q::write_ids();
        if !writes.is_empty() {
            let ids = Q::type_ids();
            for (i, a) in ids.iter().enumerate() {
                if writes.contains(a) && ids.iter().skip(i + 1).any(|b| b == a) {
                    panic!(
                        "view requests the same component type more than once with mutable access"
                    );
                }
            }
        }

        let entities = Q::driver_entities(registry);
        Self {
            registry: registry as *mut Registry,
            entities,
            cursor: 0,
            _marker: PhantomData,
        }
    }
}

impl<'r, Q: ViewQuery<'r>> Iterator for View<'r, Q> {
    type Item = (EntityId, Q::Item);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.entities.len() {
            let id = self.entities[self.cursor];
            self.cursor += 1;

            // SAFETY:
            // 1. The view exclusively borrows the registry for 'r, so no
            //    structural mutation happens while it is live.
            // 2. Mutable fetches target pairwise-distinct component types
            //    (duplicates with mutable access are rejected in `new`).
            // 3. Each driver entity appears once, so yielded mutable borrows
            //    cover distinct dense slots.
            if let Some(item) = unsafe { Q::fetch(self.registry, id) } {
                return Some((id, item));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entities.len() - self.cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    #[test]
    fn test_single_view_matches_store() {
        let mut registry = Registry::new();
        for i in 0..4 {
            let e = registry.create_entity().unwrap();
            registry
                .add_component(e, Position { x: i as f32, y: 0.0 })
                .unwrap();
        }

        let count = registry.view::<&Position>().count();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_tuple_view_intersects() {
        let mut registry = Registry::new();
        let a = registry.create_entity().unwrap();
        let b = registry.create_entity().unwrap();
        let c = registry.create_entity().unwrap();

        for &e in &[a, b, c] {
            registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        }
        registry.add_component(b, Velocity { x: 1.0, y: 0.0 }).unwrap();

        let matched: Vec<EntityId> = registry
            .view::<(&Position, &Velocity)>()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(matched, vec![b]);
    }

    #[test]
    fn test_mut_view_writes_through() {
        let mut registry = Registry::new();
        let e = registry.create_entity().unwrap();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        registry.add_component(e, Velocity { x: 2.0, y: 3.0 }).unwrap();

        for (_, (pos, vel)) in registry.view::<(&mut Position, &Velocity)>() {
            pos.x += vel.x;
            pos.y += vel.y;
        }

        assert_eq!(
            registry.get_component::<Position>(e),
            Some(&Position { x: 2.0, y: 3.0 })
        );
    }

    #[test]
    #[should_panic(expected = "more than once with mutable access")]
    fn test_aliased_mut_view_panics() {
        let mut registry = Registry::new();
        let e = registry.create_entity().unwrap();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();

        let _ = registry.view::<(&mut Position, &mut Position)>();
    }

    #[test]
    fn test_view_over_unregistered_store_is_empty() {
        let mut registry = Registry::new();
        let e = registry.create_entity().unwrap();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();

        assert_eq!(registry.view::<(&Position, &Velocity)>().count(), 0);
    }
}
