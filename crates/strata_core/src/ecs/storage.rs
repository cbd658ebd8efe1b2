//! # Component Storage
//!
//! Pre-allocated, dense component storage with zero runtime allocations.
//!
//! Each holder keeps three fixed arrays:
//! - `components`: tightly packed values, the only array touched when
//!   iterating every component of a type
//! - `entity_to_component`: sparse map from entity slot to dense index
//! - `component_to_entity`: inverse map, so swap-removal can patch the
//!   moved value's owner
//!
//! ## Index stability
//!
//! Removal moves the last value into the vacated position. A raw
//! [`ComponentIndex`] is therefore invalidated by any removal of the same
//! type; only entity→component lookups are stable. Do not add or remove
//! components of a type while iterating `[0, count)` of that type.

use std::any::Any;
use std::mem::size_of;

use super::component::{Component, ComponentIndex, ComponentTypeId};
use super::entity::EntityId;
use crate::error::{ConfigError, EcsError, EcsResult, InvariantViolation};
use crate::memory::{Arena, ArenaLayout};

/// Empty entry of the entity-to-component map.
const NONE: u32 = u32::MAX;

/// Largest capacity a holder supports; [`NONE`] must stay unreachable.
pub const MAX_COMPONENT_CAPACITY: u32 = u32::MAX - 1;

/// Pre-allocated storage for a single component type.
///
/// # Type Parameters
///
/// * `C` - The component type to store
pub struct ComponentHolder<C: Component> {
    /// Dense values; `[0, count)` are live.
    components: Box<[C]>,
    /// Entity slot -> dense index, [`NONE`] when absent.
    entity_to_component: Box<[u32]>,
    /// Dense index -> owning entity.
    component_to_entity: Box<[EntityId]>,
    /// Number of live values.
    count: u32,
}

impl<C: Component> ComponentHolder<C> {
    /// Bytes a holder needs for `max_entities` slots and `capacity` values.
    pub(crate) fn push_layout(layout: &mut ArenaLayout, max_entities: u32, capacity: u32) {
        layout.push_slice::<C>(capacity as usize);
        layout.push_slice::<u32>(max_entities as usize);
        layout.push_slice::<EntityId>(capacity as usize);
    }

    /// Carves a holder out of `arena`.
    pub(crate) fn new_in(arena: &Arena, max_entities: u32, capacity: u32) -> Result<Self, ConfigError> {
        let too_small = || {
            let mut layout = ArenaLayout::new();
            Self::push_layout(&mut layout, max_entities, capacity);
            ConfigError::ArenaTooSmall {
                required: layout.size(),
                available: arena.remaining(),
            }
        };

        let components = arena.alloc_slice::<C>(capacity as usize).ok_or_else(too_small)?;
        let entity_to_component = arena
            .alloc_slice_with(max_entities as usize, |_| NONE)
            .ok_or_else(too_small)?;
        let component_to_entity = arena
            .alloc_slice::<EntityId>(capacity as usize)
            .ok_or_else(too_small)?;

        Ok(Self {
            components,
            entity_to_component,
            component_to_entity,
            count: 0,
        })
    }

    /// Boxed constructor used by the manager's registry.
    pub(crate) fn boxed_in(
        arena: &Arena,
        max_entities: u32,
        capacity: u32,
    ) -> Result<Box<dyn ErasedHolder>, ConfigError> {
        Ok(Box::new(Self::new_in(arena, max_entities, capacity)?))
    }

    /// Maximum number of values.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.components.len() as u32
    }

    /// Number of live values; the iteration bound.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Checks if no value is stored.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Checks if no further value fits.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Dense index of `entity`'s value.
    ///
    /// The stored owner must match the handle exactly, so a stale handle
    /// never resolves to the value of the slot's current occupant.
    #[inline]
    #[must_use]
    pub fn index_of(&self, entity: EntityId) -> Option<ComponentIndex> {
        let index = *self.entity_to_component.get(entity.index() as usize)?;
        if index == NONE || self.component_to_entity[index as usize] != entity {
            return None;
        }
        Some(ComponentIndex::new(index))
    }

    /// Owner of the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`; callers iterate `[0, count)` only.
    #[inline]
    #[must_use]
    pub fn owner(&self, index: ComponentIndex) -> EntityId {
        assert!(
            index.get() < self.count,
            "{} index {} out of bounds (count {})",
            C::NAME,
            index,
            self.count
        );
        self.component_to_entity[index.as_usize()]
    }

    /// Gets `entity`'s value.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&C> {
        let index = self.index_of(entity)?;
        Some(&self.components[index.as_usize()])
    }

    /// Gets `entity`'s value mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut C> {
        let index = self.index_of(entity)?;
        Some(&mut self.components[index.as_usize()])
    }

    /// Live values, densely packed.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.components[..self.count as usize]
    }

    /// Live values, densely packed, mutably.
    ///
    /// Values can be rewritten freely; membership cannot change through
    /// this slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.components[..self.count as usize]
    }

    /// Owners of the live values, parallel to [`as_slice`](Self::as_slice).
    #[inline]
    #[must_use]
    pub fn owners(&self) -> &[EntityId] {
        &self.component_to_entity[..self.count as usize]
    }

    /// Iterates `(owner, value)` pairs in dense order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &C)> {
        self.owners().iter().copied().zip(self.as_slice())
    }

    /// Iterates `(owner, value)` pairs in dense order, mutably.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut C)> {
        let count = self.count as usize;
        self.component_to_entity[..count]
            .iter()
            .copied()
            .zip(self.components[..count].iter_mut())
    }

    /// Appends `value` for `entity`.
    ///
    /// Fails if the entity already owns a value of this type or the holder
    /// is full. Nothing is mutated on failure.
    pub(crate) fn insert(&mut self, entity: EntityId, value: C) -> EcsResult<ComponentIndex> {
        let slot = entity.index() as usize;
        if self.entity_to_component[slot] != NONE {
            return Err(EcsError::ComponentAlreadyPresent {
                entity,
                component: C::NAME,
            });
        }
        if self.is_full() {
            tracing::warn!(component = C::NAME, capacity = self.capacity(), "component storage full");
            return Err(EcsError::ComponentCapacityExhausted {
                component: C::NAME,
                capacity: self.capacity(),
            });
        }

        let index = self.count;
        self.components[index as usize] = value;
        self.component_to_entity[index as usize] = entity;
        self.entity_to_component[slot] = index;
        self.count += 1;

        Ok(ComponentIndex::new(index))
    }

    /// Value at a dense index known to be live.
    #[inline]
    pub(crate) fn value_at_mut(&mut self, index: ComponentIndex) -> &mut C {
        &mut self.components[..self.count as usize][index.as_usize()]
    }

    /// Swap-removes `entity`'s value and returns it.
    pub(crate) fn remove(&mut self, entity: EntityId) -> Option<C> {
        let index = self.index_of(entity)?.as_usize();
        let last = self.count as usize - 1;
        let value = self.components[index];

        if index != last {
            let moved_owner = self.component_to_entity[last];
            self.components[index] = self.components[last];
            self.component_to_entity[index] = moved_owner;
            self.entity_to_component[moved_owner.index() as usize] = index as u32;
        }

        self.component_to_entity[last] = EntityId::NULL;
        self.components[last] = C::default();
        self.entity_to_component[entity.index() as usize] = NONE;
        self.count -= 1;

        Some(value)
    }
}

/// Type-erased view of a [`ComponentHolder`].
///
/// The manager keeps one boxed holder per registered type and reaches the
/// typed holder through [`as_any`](Self::as_any) when it knows `C`.
pub(crate) trait ErasedHolder: Any {
    fn name(&self) -> &'static str;
    fn count(&self) -> u32;
    fn capacity(&self) -> u32;
    fn value_size(&self) -> usize;
    fn index_of(&self, entity: EntityId) -> Option<ComponentIndex>;
    fn owners(&self) -> &[EntityId];
    fn remove_entity(&mut self, entity: EntityId) -> bool;
    fn dense_bytes(&self) -> &[u8];
    fn restore_dense(&mut self, owners: &[EntityId], bytes: &[u8]);
    fn clear(&mut self);
    fn check_maps(&self, id: ComponentTypeId) -> Result<(), InvariantViolation>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedHolder for ComponentHolder<C> {
    fn name(&self) -> &'static str {
        C::NAME
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn capacity(&self) -> u32 {
        ComponentHolder::capacity(self)
    }

    fn value_size(&self) -> usize {
        size_of::<C>()
    }

    fn index_of(&self, entity: EntityId) -> Option<ComponentIndex> {
        ComponentHolder::index_of(self, entity)
    }

    fn owners(&self) -> &[EntityId] {
        ComponentHolder::owners(self)
    }

    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.remove(entity).is_some()
    }

    fn dense_bytes(&self) -> &[u8] {
        // Tag types carry no bytes; bytemuck rejects zero-sized casts.
        if size_of::<C>() == 0 {
            return &[];
        }
        bytemuck::cast_slice(self.as_slice())
    }

    /// Caller has checked lengths against capacity and value size.
    fn restore_dense(&mut self, owners: &[EntityId], bytes: &[u8]) {
        self.clear();
        let count = owners.len();
        if size_of::<C>() != 0 {
            bytemuck::cast_slice_mut::<C, u8>(&mut self.components[..count]).copy_from_slice(bytes);
        }
        for (index, &owner) in owners.iter().enumerate() {
            self.component_to_entity[index] = owner;
            self.entity_to_component[owner.index() as usize] = index as u32;
        }
        self.count = count as u32;
    }

    fn clear(&mut self) {
        let count = self.count as usize;
        for owner in &mut self.component_to_entity[..count] {
            *owner = EntityId::NULL;
        }
        for value in &mut self.components[..count] {
            *value = C::default();
        }
        self.entity_to_component.fill(NONE);
        self.count = 0;
    }

    fn check_maps(&self, id: ComponentTypeId) -> Result<(), InvariantViolation> {
        for (index, &owner) in self.owners().iter().enumerate() {
            let mapped = self.entity_to_component.get(owner.index() as usize).copied();
            if mapped != Some(index as u32) {
                return Err(InvariantViolation::OwnerMismatch {
                    component: id,
                    index: index as u32,
                    owner,
                });
            }
        }

        let mapped = self.entity_to_component.iter().filter(|&&i| i != NONE).count() as u32;
        if mapped != self.count {
            return Err(InvariantViolation::MapCountMismatch {
                component: id,
                mapped,
                count: self.count,
            });
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
