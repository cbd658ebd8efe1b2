//! # Entity Component System
//!
//! Entity identity and per-type component storage with fixed capacity.
//!
//! ## Design Philosophy
//!
//! - All storage is pre-allocated when the manager is built
//! - Components are stored in dense arrays for cache efficiency
//! - Entity IDs are slot indices with generation counters
//! - Signatures record which types each entity carries, one bit per type

mod component;
mod entity;
mod manager;
mod storage;

pub use component::{Component, ComponentIndex, ComponentTypeId, MAX_COMPONENT_TYPES};
pub use entity::{
    next_generation, EntityId, Signature, SignatureIter, Slot, GENERATION_BITS, MAX_GENERATION,
    NEW_ENTITY_SIGNATURE,
};
pub use manager::{ComponentSnapshot, EntityManager, EntityManagerBuilder, WorldSnapshot};
pub use storage::{ComponentHolder, MAX_COMPONENT_CAPACITY};
