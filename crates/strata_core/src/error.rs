//! # Error Types
//!
//! Runtime soft failures, configuration errors, snapshot errors and
//! consistency violations.
//!
//! Soft failures ([`EcsError`]) are expected gameplay races: an entity died
//! last frame and another system still holds its handle. They never corrupt
//! state; the operation is rejected before anything is mutated.

use thiserror::Error;

use crate::ecs::{ComponentTypeId, EntityId};

/// Recoverable failures of entity and component operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// The handle is null, out of range, freed, or from an older generation.
    #[error("entity {0} is not alive")]
    InvalidEntity(EntityId),

    /// Every entity slot is in use.
    #[error("entity table full: capacity {capacity}")]
    EntityCapacityExhausted {
        /// Configured maximum number of entities.
        capacity: u32,
    },

    /// The entity already owns a component of this type.
    #[error("entity {entity} already has component {component}")]
    ComponentAlreadyPresent {
        /// The entity.
        entity: EntityId,
        /// Component type name.
        component: &'static str,
    },

    /// The entity does not own a component of this type.
    #[error("entity {entity} has no component {component}")]
    ComponentMissing {
        /// The entity.
        entity: EntityId,
        /// Component type name.
        component: &'static str,
    },

    /// The component type's dense storage is full.
    #[error("component {component} storage full: capacity {capacity}")]
    ComponentCapacityExhausted {
        /// Component type name.
        component: &'static str,
        /// Configured maximum number of instances.
        capacity: u32,
    },
}

/// Result type for entity and component operations.
pub type EcsResult<T> = Result<T, EcsError>;

/// Static configuration mistakes, reported when a manager is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_entities` was zero.
    #[error("entity capacity must be greater than zero")]
    ZeroEntityCapacity,

    /// A component type was registered with zero capacity.
    #[error("component {0} registered with zero capacity")]
    ZeroComponentCapacity(&'static str),

    /// A component capacity exceeds what a component index can address.
    #[error("component {component} capacity {requested} exceeds maximum {max}")]
    ComponentCapacityTooLarge {
        /// Component type name.
        component: &'static str,
        /// Requested capacity.
        requested: u32,
        /// Largest supported capacity.
        max: u32,
    },

    /// Two component types share the same id.
    #[error("{id} registered twice: {first} and {second}")]
    DuplicateComponentId {
        /// The contested id.
        id: ComponentTypeId,
        /// Name of the first registration.
        first: &'static str,
        /// Name of the second registration.
        second: &'static str,
    },

    /// Configuration names a component that was never registered.
    #[error("configuration names unknown component {0:?}")]
    UnknownComponent(String),

    /// The backing arena cannot hold every table.
    #[error("arena too small: need {required} bytes, have {available}")]
    ArenaTooSmall {
        /// Bytes required by the full table layout.
        required: usize,
        /// Bytes left in the arena.
        available: usize,
    },

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// Ways a [`WorldSnapshot`](crate::WorldSnapshot) can fail to match a manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Entity capacity differs.
    #[error("snapshot has {found} entity slots, manager has {expected}")]
    EntityCapacityMismatch {
        /// The manager's capacity.
        expected: u32,
        /// The snapshot's capacity.
        found: u32,
    },

    /// A per-slot table has the wrong length.
    #[error("snapshot table {table} has {found} entries, expected {expected}")]
    TableLength {
        /// Which table.
        table: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// The snapshot and the manager register different component types.
    #[error("snapshot component set {found:#x} differs from registered set {expected:#x}")]
    ComponentSetMismatch {
        /// Registered types as a bitmask.
        expected: u64,
        /// Snapshot types as a bitmask.
        found: u64,
    },

    /// More instances than the holder can store.
    #[error("snapshot has {count} {component} instances, capacity is {capacity}")]
    ComponentOverflow {
        /// Component type name.
        component: &'static str,
        /// Instances in the snapshot.
        count: usize,
        /// Holder capacity.
        capacity: u32,
    },

    /// Dense byte payload length disagrees with owner count.
    #[error("snapshot {component} data is {found} bytes, expected {expected}")]
    DataLength {
        /// Component type name.
        component: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// The snapshot's tables fail the consistency check.
    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(#[from] InvariantViolation),
}

/// A broken internal invariant, reported by
/// [`EntityManager::check_invariants`](crate::EntityManager::check_invariants).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The free list visits a live slot.
    #[error("free list reaches live slot {0}")]
    FreeListHitsLiveSlot(u32),

    /// The free list points outside the table.
    #[error("free list points at out-of-range slot {0}")]
    FreeListOutOfRange(u32),

    /// The free list loops back on itself.
    #[error("free list contains a cycle")]
    FreeListCycle,

    /// Free and live slot counts disagree with the table.
    #[error("{live} live + {free} free slots != capacity {capacity}")]
    SlotCountMismatch {
        /// Live slots counted.
        live: u32,
        /// Free-list length.
        free: u32,
        /// Table capacity.
        capacity: u32,
    },

    /// The cached live count disagrees with the table.
    #[error("live count is {recorded}, table has {counted}")]
    LiveCountMismatch {
        /// Cached value.
        recorded: u32,
        /// Counted value.
        counted: u32,
    },

    /// A live slot holds generation zero.
    #[error("live slot {0} has generation zero")]
    ZeroGeneration(u32),

    /// A generation does not fit in a handle.
    #[error("slot {index} has generation {generation}, beyond the handle's range")]
    GenerationOutOfRange {
        /// Slot index.
        index: u32,
        /// Recorded generation.
        generation: u32,
    },

    /// A signature carries a bit for an unregistered type.
    #[error("entity {entity} carries unregistered {component}")]
    UnregisteredComponent {
        /// The entity.
        entity: EntityId,
        /// The stray type.
        component: ComponentTypeId,
    },

    /// A dense owner is dead, stale, or maps back to a different index.
    #[error("{component} index {index} has inconsistent owner {owner}")]
    OwnerMismatch {
        /// Component type.
        component: ComponentTypeId,
        /// Dense index.
        index: u32,
        /// Recorded owner.
        owner: EntityId,
    },

    /// The entity-to-component map has entries with no dense counterpart.
    #[error("{component} maps {mapped} entities but holds {count} values")]
    MapCountMismatch {
        /// Component type.
        component: ComponentTypeId,
        /// Non-empty map entries.
        mapped: u32,
        /// Dense count.
        count: u32,
    },

    /// Signature bit and holder membership disagree.
    #[error("entity {entity} signature disagrees with {component} storage")]
    SignatureMismatch {
        /// The entity.
        entity: EntityId,
        /// Component type.
        component: ComponentTypeId,
    },
}
