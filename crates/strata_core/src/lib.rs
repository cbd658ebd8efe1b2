//! # Strata Core
//!
//! Entity/component storage core for a single-threaded simulation:
//! - Generational entity handles that detect slot reuse
//! - Dense, swap-removed component arrays, one per registered type
//! - Fixed capacities, all drawn from one arena at startup
//!
//! ## Architecture Rules
//!
//! 1. **No table growth after build** - Every array is sized once
//! 2. **Soft failures for gameplay races** - Stale handles return errors, never panic
//! 3. **Panics only for static misconfiguration** - Unregistered types, out-of-range ids
//!
//! ## Example
//!
//! ```rust
//! use bytemuck::{Pod, Zeroable};
//! use strata_core::{Component, ComponentTypeId, EntityManager};
//!
//! #[derive(Clone, Copy, Default, Pod, Zeroable)]
//! #[repr(C)]
//! struct Velocity {
//!     x: f32,
//!     y: f32,
//! }
//!
//! impl Component for Velocity {
//!     const ID: ComponentTypeId = ComponentTypeId::new(1);
//!     const NAME: &'static str = "velocity";
//! }
//!
//! let mut manager = EntityManager::builder(1024)
//!     .register::<Velocity>()
//!     .build()
//!     .unwrap();
//!
//! let entity = manager.create_entity().unwrap();
//! let (_, velocity) = manager.add_default::<Velocity>(entity).unwrap();
//! velocity.x = 2.0;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;

pub use config::EcsConfig;
pub use ecs::{
    Component, ComponentHolder, ComponentIndex, ComponentSnapshot, ComponentTypeId, EntityId,
    EntityManager, EntityManagerBuilder, Signature, Slot, WorldSnapshot,
};
pub use error::{ConfigError, EcsError, EcsResult, InvariantViolation, SnapshotError};
pub use memory::{Arena, ArenaLayout};
