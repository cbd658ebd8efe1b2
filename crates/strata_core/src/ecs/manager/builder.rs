//! Registration and sizing of an [`EntityManager`].

use std::collections::BTreeMap;

use super::{initial_slot, EntityManager};
use crate::config::EcsConfig;
use crate::ecs::component::{Component, ComponentTypeId, MAX_COMPONENT_TYPES};
use crate::ecs::entity::{Signature, Slot};
use crate::ecs::storage::{ComponentHolder, ErasedHolder, MAX_COMPONENT_CAPACITY};
use crate::error::ConfigError;
use crate::memory::{Arena, ArenaLayout};

type HolderFactory = fn(&Arena, u32, u32) -> Result<Box<dyn ErasedHolder>, ConfigError>;

/// One `register` call, monomorphised into function pointers.
struct Registration {
    id: ComponentTypeId,
    name: &'static str,
    capacity: u32,
    push_layout: fn(&mut ArenaLayout, u32, u32),
    create: HolderFactory,
}

/// Collects component registrations and capacities, then builds an
/// [`EntityManager`] whose tables are all drawn from one arena.
///
/// Each component type is registered with one explicit call. Capacities
/// given by an [`EcsConfig`] take precedence over the ones passed here.
///
/// # Example
///
/// ```rust
/// use strata_core::{EcsConfig, EntityManagerBuilder};
///
/// let config = EcsConfig::from_toml_str("max_entities = 64").unwrap();
/// let manager = EntityManagerBuilder::from_config(&config).build().unwrap();
/// assert_eq!(manager.capacity(), 64);
/// ```
pub struct EntityManagerBuilder {
    max_entities: u32,
    overrides: BTreeMap<String, u32>,
    registrations: Vec<Registration>,
}

impl EntityManagerBuilder {
    /// Starts a builder with `max_entities` slots and no component types.
    #[must_use]
    pub fn new(max_entities: u32) -> Self {
        Self {
            max_entities,
            overrides: BTreeMap::new(),
            registrations: Vec::new(),
        }
    }

    /// Starts a builder from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &EcsConfig) -> Self {
        Self {
            max_entities: config.max_entities,
            overrides: config.components.clone(),
            registrations: Vec::new(),
        }
    }

    /// Registers `C` with its default capacity.
    #[must_use]
    pub fn register<C: Component>(self) -> Self {
        self.register_with_capacity::<C>(C::DEFAULT_CAPACITY)
    }

    /// Registers `C` with an explicit capacity.
    #[must_use]
    pub fn register_with_capacity<C: Component>(mut self, capacity: u32) -> Self {
        self.registrations.push(Registration {
            id: C::ID,
            name: C::NAME,
            capacity,
            push_layout: ComponentHolder::<C>::push_layout,
            create: ComponentHolder::<C>::boxed_in,
        });
        self
    }

    /// Bytes of arena the manager will occupy.
    #[must_use]
    pub fn required_bytes(&self) -> usize {
        let slots = self.max_entities as usize;
        let mut layout = ArenaLayout::new();
        layout.push_slice::<Slot>(slots);
        layout.push_slice::<u32>(slots);
        layout.push_slice::<u8>(slots);
        for registration in &self.registrations {
            (registration.push_layout)(&mut layout, self.max_entities, self.capacity_of(registration));
        }
        layout.size()
    }

    /// Builds the manager in a private arena sized exactly.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for invalid capacities, duplicate type
    /// ids, or configuration naming unregistered types.
    pub fn build(self) -> Result<EntityManager, ConfigError> {
        self.validate()?;
        let arena = Arena::new(self.required_bytes());
        self.build_in(&arena)
    }

    /// Builds the manager in a caller-supplied arena.
    ///
    /// # Errors
    ///
    /// As [`build`](Self::build), plus [`ConfigError::ArenaTooSmall`] if
    /// `arena` cannot hold every table.
    pub fn build_in(self, arena: &Arena) -> Result<EntityManager, ConfigError> {
        self.validate()?;

        let required = self.required_bytes();
        let too_small = || ConfigError::ArenaTooSmall {
            required,
            available: arena.remaining(),
        };
        if arena.remaining() < required {
            return Err(too_small());
        }

        let len = self.max_entities as usize;
        let slots = arena
            .alloc_slice_with(len, |index| initial_slot(index, len))
            .ok_or_else(too_small)?;
        let generations = arena.alloc_slice::<u32>(len).ok_or_else(too_small)?;
        let kinds = arena.alloc_slice::<u8>(len).ok_or_else(too_small)?;

        let mut holders: Vec<Option<Box<dyn ErasedHolder>>> =
            (0..MAX_COMPONENT_TYPES).map(|_| None).collect();
        let mut registered = Signature::EMPTY;
        for registration in &self.registrations {
            let capacity = self.capacity_of(registration);
            let holder = (registration.create)(arena, self.max_entities, capacity)?;
            holders[registration.id.index()] = Some(holder);
            registered = registered.with(registration.id);
            tracing::debug!(
                component = registration.name,
                id = registration.id.get(),
                capacity,
                "component registered"
            );
        }

        tracing::debug!(
            max_entities = self.max_entities,
            components = registered.len(),
            bytes = required,
            "entity manager built"
        );

        Ok(EntityManager {
            slots,
            generations,
            kinds,
            next_free: Some(0),
            live_count: 0,
            holders,
            registered,
        })
    }

    fn capacity_of(&self, registration: &Registration) -> u32 {
        self.overrides
            .get(registration.name)
            .copied()
            .unwrap_or(registration.capacity)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entities == 0 {
            return Err(ConfigError::ZeroEntityCapacity);
        }

        let mut seen: [Option<&'static str>; MAX_COMPONENT_TYPES] = [None; MAX_COMPONENT_TYPES];
        for registration in &self.registrations {
            if let Some(first) = seen[registration.id.index()] {
                return Err(ConfigError::DuplicateComponentId {
                    id: registration.id,
                    first,
                    second: registration.name,
                });
            }
            seen[registration.id.index()] = Some(registration.name);

            let capacity = self.capacity_of(registration);
            if capacity == 0 {
                return Err(ConfigError::ZeroComponentCapacity(registration.name));
            }
            if capacity > MAX_COMPONENT_CAPACITY {
                return Err(ConfigError::ComponentCapacityTooLarge {
                    component: registration.name,
                    requested: capacity,
                    max: MAX_COMPONENT_CAPACITY,
                });
            }
        }

        if let Some(name) = self
            .overrides
            .keys()
            .find(|name| !self.registrations.iter().any(|r| r.name == name.as_str()))
        {
            return Err(ConfigError::UnknownComponent(name.clone()));
        }

        Ok(())
    }
}
