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

//! Entity identifiers.

use slotmap::{new_key_type, Key};

new_key_type! {
    /// Unique entity handle backed by slotmap's generational keys.
    ///
    /// The registry is the sole allocator. Slots are recycled after
    /// destruction with a bumped version, so a stale handle never compares
    /// equal to the handle of the entity now occupying the slot.
    /// `EntityId::default()` is the null handle; it is live in no registry.
    pub struct EntityId;
}

/// Slot index of an entity handle, used to address sparse component arrays.
///
/// Distinct live entities always have distinct slot indices; a recycled slot
/// reuses the index of the destroyed entity under a new version.
pub(crate) fn slot_index(id: EntityId) -> usize {
    // slotmap packs the slot index into the low 32 bits of the ffi form.
    (id.data().as_ffi() & 0xffff_ffff) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_null_handle_is_never_live() {
        let mut map: SlotMap<EntityId, ()> = SlotMap::with_key();
        let id = map.insert(());
        assert!(map.contains_key(id));
        assert!(!map.contains_key(EntityId::default()));
    }

    #[test]
    fn test_recycled_slot_shares_index_not_handle() {
        let mut map: SlotMap<EntityId, ()> = SlotMap::with_key();
        let first = map.insert(());
        map.remove(first);
        let second = map.insert(());

        assert_ne!(first, second);
        assert_eq!(slot_index(first), slot_index(second));
        assert!(!map.contains_key(first));
        assert!(map.contains_key(second));
    }
}
