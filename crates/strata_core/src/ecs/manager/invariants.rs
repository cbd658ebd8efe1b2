//! Full consistency check of the manager's tables.
//!
//! O(capacity × registered types). Meant for tests, debug builds and for
//! vetting snapshots before they are loaded, not for every frame.

use super::EntityManager;
use crate::ecs::component::ComponentTypeId;
use crate::ecs::entity::{EntityId, Signature, Slot, MAX_GENERATION};
use crate::error::InvariantViolation;

/// Borrowed entity tables, from a live manager or from a snapshot that has
/// not been loaded yet.
#[derive(Clone, Copy)]
pub(super) struct Tables<'a> {
    pub(super) slots: &'a [Slot],
    pub(super) generations: &'a [u32],
    pub(super) kinds: &'a [u8],
    pub(super) next_free: Option<u32>,
    pub(super) live_count: u32,
    pub(super) registered: Signature,
}

impl Tables<'_> {
    /// Handle of whatever currently occupies (or last occupied) `index`.
    #[inline]
    pub(super) fn handle(&self, index: u32) -> EntityId {
        let slot = index as usize;
        EntityId::with_kind(index, self.generations[slot], self.kinds[slot])
    }

    /// Canonical handle and signature of a live entity.
    #[inline]
    pub(super) fn resolve(&self, id: EntityId) -> Option<(EntityId, Signature)> {
        let index = id.index() as usize;
        let signature = self.slots.get(index)?.signature()?;
        if self.generations[index] != id.generation() {
            return None;
        }
        Some((self.handle(id.index()), signature))
    }

    /// Free list, slot counts, generation ranges and signature bits.
    pub(super) fn check_slots(&self) -> Result<(), InvariantViolation> {
        let capacity = self.slots.len() as u32;

        let mut free = 0u32;
        let mut cursor = self.next_free;
        while let Some(index) = cursor {
            if free >= capacity {
                return Err(InvariantViolation::FreeListCycle);
            }
            match self.slots.get(index as usize) {
                None => return Err(InvariantViolation::FreeListOutOfRange(index)),
                Some(Slot::Live { .. }) => return Err(InvariantViolation::FreeListHitsLiveSlot(index)),
                Some(Slot::Free { next }) => cursor = *next,
            }
            free += 1;
        }

        let mut live = 0u32;
        for (index, slot) in (0u32..).zip(self.slots.iter()) {
            let generation = self.generations[index as usize];
            if generation > MAX_GENERATION {
                return Err(InvariantViolation::GenerationOutOfRange { index, generation });
            }

            let Some(signature) = slot.signature() else {
                continue;
            };
            live += 1;

            if generation == 0 {
                return Err(InvariantViolation::ZeroGeneration(index));
            }

            let stray = signature.bits() & !self.registered.bits();
            if stray != 0 {
                return Err(InvariantViolation::UnregisteredComponent {
                    entity: self.handle(index),
                    component: ComponentTypeId::new(stray.trailing_zeros() as u8),
                });
            }
        }

        if live != self.live_count {
            return Err(InvariantViolation::LiveCountMismatch {
                recorded: self.live_count,
                counted: live,
            });
        }
        if live + free != capacity {
            return Err(InvariantViolation::SlotCountMismatch { live, free, capacity });
        }
        Ok(())
    }

    /// Checks that `owners` lists every live entity carrying `component`'s
    /// bit exactly once, by its canonical handle.
    pub(super) fn check_owners(
        &self,
        component: ComponentTypeId,
        owners: &[EntityId],
    ) -> Result<(), InvariantViolation> {
        let mut seen = vec![false; self.slots.len()];
        for (index, &owner) in (0u32..).zip(owners) {
            let canonical = self.resolve(owner).filter(|&(canonical, _)| canonical == owner);
            let Some((_, signature)) = canonical else {
                return Err(InvariantViolation::OwnerMismatch { component, index, owner });
            };
            if !signature.matches(component) {
                return Err(InvariantViolation::SignatureMismatch { entity: owner, component });
            }

            let slot = owner.index() as usize;
            if seen[slot] {
                return Err(InvariantViolation::OwnerMismatch { component, index, owner });
            }
            seen[slot] = true;
        }

        for (index, slot) in (0u32..).zip(self.slots.iter()) {
            let carries = slot.signature().is_some_and(|s| s.matches(component));
            if carries && !seen[index as usize] {
                return Err(InvariantViolation::SignatureMismatch {
                    entity: self.handle(index),
                    component,
                });
            }
        }
        Ok(())
    }
}

impl EntityManager {
    /// Verifies every structural invariant.
    ///
    /// - the free list visits only free slots, exactly once each
    /// - live + free slots account for the whole table
    /// - generations stay within [`MAX_GENERATION`], and live slots never
    ///   hold generation zero
    /// - signatures only name registered types, and each bit agrees with
    ///   holder membership
    /// - every holder's two index maps are exact inverses over `[0, count)`
    ///   and every owner is a live entity
    ///
    /// # Errors
    ///
    /// The first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let tables = self.tables();
        tables.check_slots()?;

        for component in self.registered {
            let holder = self.erased(component);
            holder.check_maps(component)?;
            tables.check_owners(component, holder.owners())?;
        }
        Ok(())
    }
}
