//! # Snapshots
//!
//! Save/load surface for external serializers. A [`WorldSnapshot`] is a
//! plain serde value: the slot table, generations, kinds, free-list head and
//! every holder's dense values as raw bytes. The manager knows nothing about
//! the wire format a serializer picks.

use serde::{Deserialize, Serialize};

use super::invariants::Tables;
use super::EntityManager;
use crate::ecs::component::ComponentTypeId;
use crate::ecs::entity::{EntityId, Signature, Slot};
use crate::error::{InvariantViolation, SnapshotError};

/// Dense storage of one component type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    /// Component type.
    pub id: ComponentTypeId,
    /// Diagnostic name at the time of the snapshot.
    pub name: String,
    /// Owners, in dense order.
    pub owners: Vec<EntityId>,
    /// Values, in dense order, as raw bytes.
    pub data: Vec<u8>,
}

/// Complete state of an [`EntityManager`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Slot table.
    pub slots: Vec<Slot>,
    /// Generation table.
    pub generations: Vec<u32>,
    /// Kind tags.
    pub kinds: Vec<u8>,
    /// Free-list head.
    pub next_free: Option<u32>,
    /// Live entity count.
    pub live_count: u32,
    /// One entry per registered component type, ascending by id.
    pub components: Vec<ComponentSnapshot>,
}

impl WorldSnapshot {
    /// Entity capacity of the manager the snapshot was taken from.
    #[must_use]
    pub fn max_entities(&self) -> u32 {
        self.slots.len() as u32
    }
}

impl EntityManager {
    /// Captures the complete state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let components = self
            .registered
            .iter()
            .map(|id| {
                let holder = self.erased(id);
                ComponentSnapshot {
                    id,
                    name: holder.name().to_owned(),
                    owners: holder.owners().to_vec(),
                    data: holder.dense_bytes().to_vec(),
                }
            })
            .collect();

        WorldSnapshot {
            slots: self.slots.to_vec(),
            generations: self.generations.to_vec(),
            kinds: self.kinds.to_vec(),
            next_free: self.next_free,
            live_count: self.live_count,
            components,
        }
    }

    /// Replaces the complete state with `snapshot`.
    ///
    /// The snapshot is checked in full before anything is written: shape
    /// (capacity, component set, payload sizes) first, then the same
    /// consistency rules as [`check_invariants`](Self::check_invariants).
    /// On error the manager is unchanged.
    ///
    /// # Errors
    ///
    /// See [`SnapshotError`].
    pub fn restore(&mut self, snapshot: &WorldSnapshot) -> Result<(), SnapshotError> {
        self.check_shape(snapshot)?;
        if let Err(violation) = self.check_contents(snapshot) {
            tracing::warn!(%violation, "rejected inconsistent snapshot");
            return Err(violation.into());
        }

        self.slots.copy_from_slice(&snapshot.slots);
        self.generations.copy_from_slice(&snapshot.generations);
        self.kinds.copy_from_slice(&snapshot.kinds);
        self.next_free = snapshot.next_free;
        self.live_count = snapshot.live_count;
        for component in &snapshot.components {
            self.erased_mut(component.id)
                .restore_dense(&component.owners, &component.data);
        }

        debug_assert_eq!(self.check_invariants(), Ok(()));

        tracing::debug!(live = self.live_count, "snapshot restored");
        Ok(())
    }

    fn check_shape(&self, snapshot: &WorldSnapshot) -> Result<(), SnapshotError> {
        let capacity = self.capacity();
        if snapshot.max_entities() != capacity {
            return Err(SnapshotError::EntityCapacityMismatch {
                expected: capacity,
                found: snapshot.max_entities(),
            });
        }
        for (table, found) in [
            ("generations", snapshot.generations.len()),
            ("kinds", snapshot.kinds.len()),
        ] {
            if found != capacity as usize {
                return Err(SnapshotError::TableLength {
                    table,
                    expected: capacity as usize,
                    found,
                });
            }
        }

        let found: Signature = snapshot.components.iter().map(|c| c.id).collect();
        if found != self.registered || snapshot.components.len() != self.registered.len() as usize {
            return Err(SnapshotError::ComponentSetMismatch {
                expected: self.registered.bits(),
                found: found.bits(),
            });
        }

        for component in &snapshot.components {
            let holder = self.erased(component.id);
            let count = component.owners.len();
            if count > holder.capacity() as usize {
                return Err(SnapshotError::ComponentOverflow {
                    component: holder.name(),
                    count,
                    capacity: holder.capacity(),
                });
            }

            let expected = count * holder.value_size();
            if component.data.len() != expected {
                return Err(SnapshotError::DataLength {
                    component: holder.name(),
                    expected,
                    found: component.data.len(),
                });
            }
        }

        Ok(())
    }

    /// Consistency of the snapshot's own tables, against this manager's
    /// registered types.
    fn check_contents(&self, snapshot: &WorldSnapshot) -> Result<(), InvariantViolation> {
        let tables = Tables {
            slots: &snapshot.slots,
            generations: &snapshot.generations,
            kinds: &snapshot.kinds,
            next_free: snapshot.next_free,
            live_count: snapshot.live_count,
            registered: self.registered,
        };
        tables.check_slots()?;
        for component in &snapshot.components {
            tables.check_owners(component.id, &component.owners)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Component;
    use crate::ecs::entity::MAX_GENERATION;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Heat(f32);

    impl Component for Heat {
        const ID: ComponentTypeId = ComponentTypeId::new(4);
        const NAME: &'static str = "heat";
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
    #[repr(C)]
    struct Owner(u32);

    impl Component for Owner {
        const ID: ComponentTypeId = ComponentTypeId::new(11);
        const NAME: &'static str = "owner";
    }

    fn manager() -> EntityManager {
        EntityManager::builder(8)
            .register::<Heat>()
            .register::<Owner>()
            .build()
            .unwrap()
    }

    #[test]
    fn test_restore_reproduces_state() {
        let mut manager = manager();
        let a = manager.create_entity().unwrap();
        let b = manager.create_entity_of_kind(2).unwrap();
        let c = manager.create_entity().unwrap();
        manager.add_component(a, Heat(1.5)).unwrap();
        manager.add_component(c, Heat(3.5)).unwrap();
        manager.add_component(b, Owner(7)).unwrap();
        manager.destroy_entity(a);

        let saved = manager.snapshot();
        assert_eq!(saved.max_entities(), 8);
        assert_eq!(saved.components.len(), 2);

        let d = manager.create_entity().unwrap();
        manager.add_component(d, Owner(9)).unwrap();
        manager.destroy_entity(c);

        manager.restore(&saved).unwrap();
        assert_eq!(manager.snapshot(), saved);
        assert!(manager.is_valid(c));
        assert!(!manager.is_valid(d));
        assert_eq!(manager.get::<Heat>(c), Some(&Heat(3.5)));
        assert_eq!(manager.get::<Owner>(b), Some(&Owner(7)));
        assert_eq!(manager.owners(Owner::ID), &[b]);

        // Free-list order survives: slot 0 is reused first.
        assert_eq!(manager.create_entity().unwrap().index(), a.index());
    }

    #[test]
    fn test_rejects_capacity_mismatch() {
        let saved = manager().snapshot();
        let mut other = EntityManager::builder(4)
            .register::<Heat>()
            .register::<Owner>()
            .build()
            .unwrap();
        assert_eq!(
            other.restore(&saved),
            Err(SnapshotError::EntityCapacityMismatch { expected: 4, found: 8 })
        );
    }

    #[test]
    fn test_rejects_component_set_mismatch() {
        let saved = manager().snapshot();
        let mut other = EntityManager::builder(8).register::<Heat>().build().unwrap();
        assert!(matches!(
            other.restore(&saved),
            Err(SnapshotError::ComponentSetMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let mut manager = manager();
        let e = manager.create_entity().unwrap();
        manager.add_component(e, Heat(2.0)).unwrap();

        let mut saved = manager.snapshot();
        saved.components[0].data.pop();
        assert_eq!(
            manager.restore(&saved),
            Err(SnapshotError::DataLength {
                component: "heat",
                expected: 4,
                found: 3
            })
        );
        assert_eq!(manager.get::<Heat>(e), Some(&Heat(2.0)));
    }

    #[test]
    fn test_inconsistent_snapshot_leaves_state() {
        let mut manager = manager();
        let e = manager.create_entity().unwrap();
        manager.add_component(e, Heat(2.0)).unwrap();
        let before = manager.snapshot();

        let mut saved = before.clone();
        saved.live_count = 5;
        assert!(matches!(
            manager.restore(&saved),
            Err(SnapshotError::Inconsistent(InvariantViolation::LiveCountMismatch { .. }))
        ));
        assert_eq!(manager.snapshot(), before);
        assert_eq!(manager.get::<Heat>(e), Some(&Heat(2.0)));
    }

    #[test]
    fn test_rejects_live_slot_off_free_list() {
        let mut manager = manager();
        let a = manager.create_entity().unwrap();
        manager.add_component(a, Heat(7.0)).unwrap();
        let before = manager.snapshot();

        // Slot 1 is the free-list head.
        let mut saved = before.clone();
        saved.slots[1] = Slot::Live {
            signature: Signature::EMPTY,
        };
        saved.live_count = 2;
        assert_eq!(
            manager.restore(&saved),
            Err(SnapshotError::Inconsistent(InvariantViolation::FreeListHitsLiveSlot(1)))
        );
        assert!(manager.is_valid(a));
        assert_eq!(manager.component_count(Heat::ID), 1);
        assert_eq!(manager.snapshot(), before);
    }

    #[test]
    fn test_rejects_generation_beyond_handle() {
        let mut manager = manager();
        let a = manager.create_entity().unwrap();
        let before = manager.snapshot();

        let mut saved = before.clone();
        saved.generations[a.index() as usize] = MAX_GENERATION + 2;
        assert_eq!(
            manager.restore(&saved),
            Err(SnapshotError::Inconsistent(InvariantViolation::GenerationOutOfRange {
                index: 0,
                generation: MAX_GENERATION + 2
            }))
        );
        assert_eq!(manager.snapshot(), before);

        // A free slot is held to the same range.
        saved = before.clone();
        saved.generations[5] = u32::MAX;
        assert!(matches!(
            manager.restore(&saved),
            Err(SnapshotError::Inconsistent(InvariantViolation::GenerationOutOfRange { index: 5, .. }))
        ));
    }

    #[test]
    fn test_rejects_duplicate_owner() {
        let mut manager = manager();
        let a = manager.create_entity().unwrap();
        manager.add_component(a, Heat(1.0)).unwrap();

        let mut saved = manager.snapshot();
        saved.components[0].owners.push(a);
        saved.components[0].data.extend_from_slice(&2.0f32.to_ne_bytes());
        assert!(matches!(
            manager.restore(&saved),
            Err(SnapshotError::Inconsistent(InvariantViolation::OwnerMismatch { index: 1, .. }))
        ));
        assert_eq!(manager.owners(Heat::ID), &[a]);
    }
}
