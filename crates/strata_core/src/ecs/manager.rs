//! # Entity Manager
//!
//! Owns the slot table, the generation table and one component holder per
//! registered type. All memory is carved out of an [`Arena`](crate::Arena)
//! when the manager is built; nothing grows afterwards.
//!
//! The manager is driven by a single simulation thread. Every operation is
//! O(1), except [`EntityManager::destroy_entity`] which is O(attached
//! component types).

mod builder;
mod invariants;
mod snapshot;

pub use builder::EntityManagerBuilder;
pub use snapshot::{ComponentSnapshot, WorldSnapshot};

use invariants::Tables;

use super::component::{Component, ComponentIndex, ComponentTypeId};
use super::entity::{next_generation, EntityId, Signature, Slot, NEW_ENTITY_SIGNATURE};
use super::storage::{ComponentHolder, ErasedHolder};
use crate::error::{EcsError, EcsResult};

/// Slot `index` of a freshly initialised table of `len` slots.
///
/// Every slot points at its successor; the last one ends the list.
fn initial_slot(index: usize, len: usize) -> Slot {
    let next = index + 1;
    Slot::Free {
        next: (next < len).then_some(next as u32),
    }
}

/// Entity and component bookkeeping for one simulation.
///
/// # Example
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use strata_core::{Component, ComponentTypeId, EntityManager};
///
/// #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health(u32);
///
/// impl Component for Health {
///     const ID: ComponentTypeId = ComponentTypeId::new(0);
///     const NAME: &'static str = "health";
/// }
///
/// let mut manager = EntityManager::builder(128)
///     .register::<Health>()
///     .build()
///     .unwrap();
///
/// let entity = manager.create_entity().unwrap();
/// manager.add_component(entity, Health(10)).unwrap();
/// assert_eq!(manager.get::<Health>(entity), Some(&Health(10)));
///
/// manager.destroy_entity(entity);
/// assert!(!manager.is_valid(entity));
/// ```
pub struct EntityManager {
    /// Free-list node or live signature, per slot.
    slots: Box<[Slot]>,
    /// Generation of each slot's current or most recent occupant.
    generations: Box<[u32]>,
    /// Kind tag of each slot's current or most recent occupant.
    kinds: Box<[u8]>,
    /// Head of the free list.
    next_free: Option<u32>,
    /// Number of live slots.
    live_count: u32,
    /// One holder per registered type, indexed by type id.
    holders: Vec<Option<Box<dyn ErasedHolder>>>,
    /// Registered types.
    registered: Signature,
}

impl EntityManager {
    /// Starts configuring a manager with `max_entities` slots.
    #[must_use]
    pub fn builder(max_entities: u32) -> EntityManagerBuilder {
        EntityManagerBuilder::new(max_entities)
    }

    /// Maximum number of simultaneous entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> u32 {
        self.live_count
    }

    /// Checks if every slot is in use.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.next_free.is_none()
    }

    /// Registered component types.
    #[inline]
    #[must_use]
    pub const fn registered_components(&self) -> Signature {
        self.registered
    }

    /// Diagnostic name of a component type, `None` if it is not registered.
    #[must_use]
    pub fn component_name(&self, component: ComponentTypeId) -> Option<&'static str> {
        self.holders
            .get(component.index())
            .and_then(Option::as_deref)
            .map(ErasedHolder::name)
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Checks if `id` denotes a live entity.
    ///
    /// True iff the index is in range, the slot is live and its generation
    /// matches. The kind tag is not part of the check.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, id: EntityId) -> bool {
        self.resolve(id).is_some()
    }

    /// Component signature of a live entity.
    #[inline]
    #[must_use]
    pub fn entity_signature(&self, id: EntityId) -> Option<Signature> {
        self.resolve(id).map(|(_, signature)| signature)
    }

    /// Creates an entity with no components.
    ///
    /// The most recently freed slot is reused first.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityCapacityExhausted`] when every slot is live. The
    /// free list is left untouched.
    pub fn create_entity(&mut self) -> EcsResult<EntityId> {
        self.create_entity_of_kind(0)
    }

    /// Creates an entity whose handle carries `kind`.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityCapacityExhausted`] when every slot is live.
    pub fn create_entity_of_kind(&mut self, kind: u8) -> EcsResult<EntityId> {
        let Some(index) = self.next_free else {
            tracing::warn!(capacity = self.capacity(), "entity table full");
            return Err(EcsError::EntityCapacityExhausted {
                capacity: self.capacity(),
            });
        };

        let slot = index as usize;
        let next = match self.slots[slot] {
            Slot::Free { next } => next,
            Slot::Live { .. } => panic!("free list head {index} is a live slot"),
        };

        self.next_free = next;
        self.slots[slot] = Slot::Live {
            signature: NEW_ENTITY_SIGNATURE,
        };
        self.generations[slot] = next_generation(self.generations[slot]);
        self.kinds[slot] = kind;
        self.live_count += 1;

        let id = self.handle(index);
        tracing::trace!(entity = %id, "entity created");
        Ok(id)
    }

    /// Destroys an entity and every component attached to it.
    ///
    /// Components are removed in ascending type-id order. Stale or invalid
    /// handles are ignored, so destroying twice is harmless.
    ///
    /// Returns `true` if the entity was alive.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        let Some((owner, signature)) = self.resolve(id) else {
            tracing::trace!(entity = %id, "destroy ignored: entity not alive");
            return false;
        };

        for component in signature {
            let removed = self.detach(owner, component);
            debug_assert!(removed, "{owner} signature names {component} but storage disagrees");
        }

        let index = owner.index();
        self.slots[index as usize] = Slot::Free {
            next: self.next_free,
        };
        self.next_free = Some(index);
        self.live_count -= 1;

        tracing::trace!(entity = %owner, components = signature.len(), "entity destroyed");
        true
    }

    /// Destroys every live entity. Returns how many were destroyed.
    ///
    /// Generations are kept, so handles taken before the clear stay stale.
    pub fn clear(&mut self) -> u32 {
        let mut destroyed = 0;
        for index in 0..self.capacity() {
            if self.slots[index as usize].is_live() && self.destroy_entity(self.handle(index)) {
                destroyed += 1;
            }
        }
        destroyed
    }

    /// Iterates live entities with their signatures, in slot order.
    pub fn iter_live(&self) -> impl Iterator<Item = (EntityId, Signature)> + '_ {
        self.slots.iter().enumerate().filter_map(move |(index, slot)| {
            slot.signature()
                .map(|signature| (self.handle(index as u32), signature))
        })
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches `value` to a live entity.
    ///
    /// Returns the value's dense index and a reference for further
    /// initialisation.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the handle is not alive
    /// - [`EcsError::ComponentAlreadyPresent`] if the entity already has a
    ///   `C`; the existing value is kept
    /// - [`EcsError::ComponentCapacityExhausted`] if `C`'s storage is full
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    pub fn add_component<C: Component>(
        &mut self,
        id: EntityId,
        value: C,
    ) -> EcsResult<(ComponentIndex, &mut C)> {
        let (owner, signature) = self.resolve(id).ok_or(EcsError::InvalidEntity(id))?;
        let holder = self.holder_mut::<C>();
        if signature.matches(C::ID) {
            return Err(EcsError::ComponentAlreadyPresent {
                entity: owner,
                component: C::NAME,
            });
        }

        let index = holder.insert(owner, value)?;
        self.slots[owner.index() as usize] = Slot::Live {
            signature: signature.with(C::ID),
        };

        tracing::trace!(entity = %owner, component = C::NAME, index = index.get(), "component added");
        Ok((index, self.holder_mut::<C>().value_at_mut(index)))
    }

    /// Attaches `C::default()` to a live entity.
    ///
    /// # Errors
    ///
    /// As [`add_component`](Self::add_component).
    pub fn add_default<C: Component>(&mut self, id: EntityId) -> EcsResult<(ComponentIndex, &mut C)> {
        self.add_component(id, C::default())
    }

    /// Detaches and returns an entity's `C`.
    ///
    /// The last `C` in dense storage moves into the vacated index.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the handle is not alive
    /// - [`EcsError::ComponentMissing`] if the entity has no `C`
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    pub fn remove_component<C: Component>(&mut self, id: EntityId) -> EcsResult<C> {
        let (owner, signature) = self.resolve(id).ok_or(EcsError::InvalidEntity(id))?;
        let missing = EcsError::ComponentMissing {
            entity: owner,
            component: C::NAME,
        };
        let holder = self.holder_mut::<C>();
        if !signature.matches(C::ID) {
            return Err(missing);
        }

        let value = holder.remove(owner).ok_or(missing)?;
        self.slots[owner.index() as usize] = Slot::Live {
            signature: signature.without(C::ID),
        };

        tracing::trace!(entity = %owner, component = C::NAME, "component removed");
        Ok(value)
    }

    /// Detaches an entity's component of type `component`, discarding it.
    ///
    /// # Errors
    ///
    /// As [`remove_component`](Self::remove_component).
    ///
    /// # Panics
    ///
    /// Panics if `component` is not registered.
    pub fn remove_component_by_type(&mut self, id: EntityId, component: ComponentTypeId) -> EcsResult<()> {
        let (owner, signature) = self.resolve(id).ok_or(EcsError::InvalidEntity(id))?;
        let name = self.erased(component).name();
        if !signature.matches(component) || !self.detach(owner, component) {
            return Err(EcsError::ComponentMissing {
                entity: owner,
                component: name,
            });
        }

        tracing::trace!(entity = %owner, component = name, "component removed");
        Ok(())
    }

    /// Checks if a live entity has a `C`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    #[inline]
    #[must_use]
    pub fn has_component<C: Component>(&self, id: EntityId) -> bool {
        self.component_index(id, C::ID).is_some()
    }

    /// Gets a live entity's `C`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    #[must_use]
    pub fn get<C: Component>(&self, id: EntityId) -> Option<&C> {
        let (owner, _) = self.resolve(id)?;
        self.holder::<C>().get(owner)
    }

    /// Gets a live entity's `C` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    pub fn get_mut<C: Component>(&mut self, id: EntityId) -> Option<&mut C> {
        let (owner, _) = self.resolve(id)?;
        self.holder_mut::<C>().get_mut(owner)
    }

    /// Dense index of a live entity's component of type `component`.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not registered.
    #[must_use]
    pub fn component_index(&self, id: EntityId, component: ComponentTypeId) -> Option<ComponentIndex> {
        let holder = self.erased(component);
        let (owner, signature) = self.resolve(id)?;
        if !signature.matches(component) {
            return None;
        }
        holder.index_of(owner)
    }

    /// Entity owning the value at `index` of `component`'s dense storage.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not registered or `index` is not below
    /// [`component_count`](Self::component_count).
    #[must_use]
    pub fn owning_entity(&self, component: ComponentTypeId, index: ComponentIndex) -> EntityId {
        let owners = self.erased(component).owners();
        assert!(
            index.as_usize() < owners.len(),
            "{component} index {index} out of bounds (count {})",
            owners.len()
        );
        owners[index.as_usize()]
    }

    /// Number of live values of `component`; the iteration bound.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not registered.
    #[must_use]
    pub fn component_count(&self, component: ComponentTypeId) -> u32 {
        self.erased(component).count()
    }

    /// Maximum number of values of `component`.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not registered.
    #[must_use]
    pub fn component_capacity(&self, component: ComponentTypeId) -> u32 {
        self.erased(component).capacity()
    }

    /// Owners of `component`'s live values, in dense order.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not registered.
    #[must_use]
    pub fn owners(&self, component: ComponentTypeId) -> &[EntityId] {
        self.erased(component).owners()
    }

    /// All live `C` values, densely packed.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    #[must_use]
    pub fn components<C: Component>(&self) -> &[C] {
        self.holder::<C>().as_slice()
    }

    /// All live `C` values, densely packed, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    pub fn components_mut<C: Component>(&mut self) -> &mut [C] {
        self.holder_mut::<C>().as_mut_slice()
    }

    /// Iterates `(owner, value)` pairs of `C` in dense order.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    pub fn iter<C: Component>(&self) -> impl Iterator<Item = (EntityId, &C)> {
        self.holder::<C>().iter()
    }

    /// Iterates `(owner, value)` pairs of `C` in dense order, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    pub fn iter_mut<C: Component>(&mut self) -> impl Iterator<Item = (EntityId, &mut C)> {
        self.holder_mut::<C>().iter_mut()
    }

    /// Typed storage of `C`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered, or its id is registered to
    /// another type.
    #[must_use]
    pub fn holder<C: Component>(&self) -> &ComponentHolder<C> {
        let holder = self.erased(C::ID);
        match holder.as_any().downcast_ref() {
            Some(typed) => typed,
            None => panic!("{} is registered as {}, not {}", C::ID, holder.name(), C::NAME),
        }
    }

    /// Typed storage of `C`, mutably.
    ///
    /// Values can be rewritten; attaching and detaching goes through the
    /// manager so signatures stay in sync.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered, or its id is registered to
    /// another type.
    pub fn holder_mut<C: Component>(&mut self) -> &mut ComponentHolder<C> {
        let holder = self.erased_mut(C::ID);
        let registered = holder.name();
        match holder.as_any_mut().downcast_mut() {
            Some(typed) => typed,
            None => panic!("{} is registered as {registered}, not {}", C::ID, C::NAME),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Canonical handle and signature of a live entity.
    ///
    /// The canonical handle carries the kind recorded at creation, whatever
    /// kind bits the caller's copy has.
    #[inline]
    fn resolve(&self, id: EntityId) -> Option<(EntityId, Signature)> {
        self.tables().resolve(id)
    }

    /// Handle of whatever currently occupies (or last occupied) `index`.
    #[inline]
    fn handle(&self, index: u32) -> EntityId {
        self.tables().handle(index)
    }

    #[inline]
    fn tables(&self) -> Tables<'_> {
        Tables {
            slots: &self.slots,
            generations: &self.generations,
            kinds: &self.kinds,
            next_free: self.next_free,
            live_count: self.live_count,
            registered: self.registered,
        }
    }

    /// Removes `owner`'s component and clears its signature bit.
    fn detach(&mut self, owner: EntityId, component: ComponentTypeId) -> bool {
        let removed = self.erased_mut(component).remove_entity(owner);
        if let Slot::Live { signature } = &mut self.slots[owner.index() as usize] {
            *signature = signature.without(component);
        }
        removed
    }

    fn erased(&self, component: ComponentTypeId) -> &dyn ErasedHolder {
        match self.holders.get(component.index()).and_then(Option::as_deref) {
            Some(holder) => holder,
            None => panic!("{component} is not registered"),
        }
    }

    fn erased_mut(&mut self, component: ComponentTypeId) -> &mut (dyn ErasedHolder + 'static) {
        match self.holders.get_mut(component.index()).and_then(Option::as_deref_mut) {
            Some(holder) => holder,
            None => panic!("{component} is not registered"),
        }
    }
}

impl std::fmt::Debug for EntityManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityManager")
            .field("capacity", &self.capacity())
            .field("live_count", &self.live_count)
            .field("next_free", &self.next_free)
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Position {
        x: f32,
        y: f32,
    }

    impl Component for Position {
        const ID: ComponentTypeId = ComponentTypeId::new(0);
        const NAME: &'static str = "position";
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
    #[repr(C)]
    struct Health(u32);

    impl Component for Health {
        const ID: ComponentTypeId = ComponentTypeId::new(5);
        const NAME: &'static str = "health";
        const DEFAULT_CAPACITY: u32 = 2;
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
    #[repr(C)]
    struct Unregistered(u8);

    impl Component for Unregistered {
        const ID: ComponentTypeId = ComponentTypeId::new(9);
        const NAME: &'static str = "unregistered";
    }

    fn manager(max_entities: u32) -> EntityManager {
        EntityManager::builder(max_entities)
            .register::<Position>()
            .register::<Health>()
            .build()
            .unwrap()
    }

    #[test]
    fn test_manager_creation() {
        let manager = manager(16);
        assert_eq!(manager.capacity(), 16);
        assert_eq!(manager.live_count(), 0);
        assert!(!manager.is_full());
        assert_eq!(manager.component_name(Health::ID), Some("health"));
        assert_eq!(manager.component_name(Unregistered::ID), None);
        assert_eq!(manager.component_capacity(Health::ID), 2);
        assert!(manager.check_invariants().is_ok());
    }

    #[test]
    fn test_create_destroy_reuses_slot() {
        let mut manager = manager(4);
        let a = manager.create_entity().unwrap();
        let b = manager.create_entity().unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(a.generation(), 1);

        assert!(manager.destroy_entity(a));
        assert!(!manager.is_valid(a));
        assert_eq!(manager.live_count(), 1);

        let c = manager.create_entity().unwrap();
        assert_eq!(c.index(), a.index());
        assert_eq!(c.generation(), 2);
        assert!(!manager.is_valid(a));
        assert!(manager.is_valid(c));
    }

    #[test]
    fn test_null_and_out_of_range_never_valid() {
        let mut manager = manager(2);
        let _ = manager.create_entity().unwrap();
        assert!(!manager.is_valid(EntityId::NULL));
        assert!(!manager.is_valid(EntityId::new(7, 1)));
        assert!(!manager.destroy_entity(EntityId::new(7, 1)));
        assert_eq!(manager.entity_signature(EntityId::NULL), None);
    }

    #[test]
    fn test_add_get_remove() {
        let mut manager = manager(8);
        let e = manager.create_entity().unwrap();

        let (index, position) = manager.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(index.get(), 0);
        position.x = 10.0;

        assert!(manager.has_component::<Position>(e));
        assert!(!manager.has_component::<Health>(e));
        assert_eq!(manager.get::<Position>(e), Some(&Position { x: 10.0, y: 2.0 }));
        assert_eq!(manager.entity_signature(e), Some(Signature::EMPTY.with(Position::ID)));

        manager.get_mut::<Position>(e).unwrap().y = 20.0;
        assert_eq!(
            manager.remove_component::<Position>(e),
            Ok(Position { x: 10.0, y: 20.0 })
        );
        assert_eq!(manager.entity_signature(e), Some(Signature::EMPTY));
        assert_eq!(
            manager.remove_component::<Position>(e),
            Err(EcsError::ComponentMissing {
                entity: e,
                component: "position"
            })
        );
        assert!(manager.check_invariants().is_ok());
    }

    #[test]
    fn test_component_capacity_exhausted() {
        let mut manager = manager(8);
        let ids: Vec<_> = (0..3).map(|_| manager.create_entity().unwrap()).collect();
        manager.add_default::<Health>(ids[0]).unwrap();
        manager.add_default::<Health>(ids[1]).unwrap();

        let err = manager.add_default::<Health>(ids[2]).unwrap_err();
        assert_eq!(
            err,
            EcsError::ComponentCapacityExhausted {
                component: "health",
                capacity: 2
            }
        );
        assert!(!manager.has_component::<Health>(ids[2]));
        assert!(manager.check_invariants().is_ok());
    }

    #[test]
    fn test_remove_by_type() {
        let mut manager = manager(4);
        let e = manager.create_entity().unwrap();
        manager.add_component(e, Health(3)).unwrap();

        assert_eq!(manager.remove_component_by_type(e, Health::ID), Ok(()));
        assert_eq!(manager.component_count(Health::ID), 0);
        assert!(matches!(
            manager.remove_component_by_type(e, Health::ID),
            Err(EcsError::ComponentMissing { .. })
        ));
    }

    #[test]
    fn test_kind_tag_is_routing_only() {
        let mut manager = manager(4);
        let tower = manager.create_entity_of_kind(3).unwrap();
        assert_eq!(tower.kind(), 3);

        let untagged = EntityId::new(tower.index(), tower.generation());
        assert!(manager.is_valid(untagged));
        manager.add_component(untagged, Health(1)).unwrap();
        assert_eq!(manager.owners(Health::ID), &[tower]);
        assert_eq!(manager.get::<Health>(tower), Some(&Health(1)));
        assert_eq!(manager.iter_live().next(), Some((tower, Signature::EMPTY.with(Health::ID))));
    }

    #[test]
    fn test_clear_keeps_generations() {
        let mut manager = manager(4);
        let a = manager.create_entity().unwrap();
        let b = manager.create_entity().unwrap();
        manager.add_component(b, Position::default()).unwrap();

        assert_eq!(manager.clear(), 2);
        assert_eq!(manager.live_count(), 0);
        assert_eq!(manager.component_count(Position::ID), 0);
        assert!(!manager.is_valid(a));
        assert!(!manager.is_valid(b));
        assert!(manager.check_invariants().is_ok());

        let c = manager.create_entity().unwrap();
        assert!(c.generation() > 1);
    }

    #[test]
    fn test_typed_iteration() {
        let mut manager = manager(8);
        for i in 0..4u16 {
            let e = manager.create_entity().unwrap();
            manager
                .add_component(e, Position { x: f32::from(i), y: 0.0 })
                .unwrap();
        }
        for (_, position) in manager.iter_mut::<Position>() {
            position.y = position.x * 2.0;
        }
        let sum: f32 = manager.components::<Position>().iter().map(|p| p.y).sum();
        assert!((sum - 12.0).abs() < f32::EPSILON);
        assert_eq!(manager.iter::<Position>().count(), 4);
        manager.components_mut::<Position>()[0].x = -1.0;
        assert!((manager.holder::<Position>().as_slice()[0].x + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn test_unregistered_type_panics() {
        let mut manager = manager(4);
        let e = manager.create_entity().unwrap();
        let _ = manager.add_default::<Unregistered>(e);
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn test_has_component_unregistered_panics() {
        let mut manager = manager(4);
        let e = manager.create_entity().unwrap();
        let _ = manager.has_component::<Unregistered>(e);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_owning_entity_past_count_panics() {
        let manager = manager(4);
        let _ = manager.owning_entity(Position::ID, ComponentIndex::new(0));
    }

    #[test]
    fn test_debug_output() {
        let manager = manager(4);
        let debug = format!("{manager:?}");
        assert!(debug.contains("capacity: 4"));
    }
}
