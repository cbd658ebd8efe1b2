//! # Manager Configuration
//!
//! Capacities are static configuration: they are read once at startup and
//! fix the size of every table for the manager's lifetime.
//!
//! ```toml
//! max_entities = 4096
//!
//! [components]
//! position = 4096
//! health = 512
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Entity and per-component capacities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcsConfig {
    /// Number of entity slots shared by every component type.
    pub max_entities: u32,
    /// Capacity overrides keyed by [`Component::NAME`](crate::Component::NAME).
    ///
    /// Types not listed here use their `DEFAULT_CAPACITY`.
    #[serde(default)]
    pub components: BTreeMap<String, u32>,
}

impl EcsConfig {
    /// Configuration with no per-component overrides.
    #[must_use]
    pub fn new(max_entities: u32) -> Self {
        Self {
            max_entities,
            components: BTreeMap::new(),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is malformed.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Sets the capacity override for a component name.
    #[must_use]
    pub fn with_component(mut self, name: &str, capacity: u32) -> Self {
        self.components.insert(name.to_owned(), capacity);
        self
    }
}
