//! # Component System
//!
//! Components are pure data containers with no behavior.
//! They must be Copy and have a fixed size so they can live in
//! pre-allocated dense arrays and be snapshotted as raw bytes.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Number of distinct component types a manager can register.
///
/// One bit per type in a [`Signature`](super::Signature).
pub const MAX_COMPONENT_TYPES: usize = 64;

/// Static identifier of a component type, `0..MAX_COMPONENT_TYPES`.
///
/// Doubles as the bit position in entity signatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Creates a component type id.
    ///
    /// # Panics
    ///
    /// Panics if `id >= MAX_COMPONENT_TYPES`. When used in a `const`
    /// context the mistake is reported at compile time.
    #[inline]
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(
            (id as usize) < MAX_COMPONENT_TYPES,
            "component type id out of range"
        );
        Self(id)
    }

    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Id as a table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Single-bit mask of this type inside a signature.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u64 {
        1 << self.0
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// Position of a component value inside its type's dense array.
///
/// Only meaningful until the next removal of a component of the same type:
/// swap-removal moves the last value into the vacated position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentIndex(u32);

impl ComponentIndex {
    /// Wraps a raw dense index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Index as a `usize` for slice access.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Copy`: No heap allocations, bitwise copyable
/// - `Pod`: Plain old data, safe to view as bytes
/// - `Zeroable`: Can be safely zeroed
/// - `Default`: Fills pre-allocated storage
///
/// # Example
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use strata_core::{Component, ComponentTypeId};
///
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health {
///     current: u32,
///     max: u32,
/// }
///
/// impl Component for Health {
///     const ID: ComponentTypeId = ComponentTypeId::new(3);
///     const NAME: &'static str = "health";
///     const DEFAULT_CAPACITY: u32 = 256;
/// }
/// ```
pub trait Component: Copy + Pod + Zeroable + Default + Send + Sync + 'static {
    /// Unique identifier for this component type.
    ///
    /// This ID is the component's bit in entity signatures.
    const ID: ComponentTypeId;

    /// Human-readable name, used in diagnostics and configuration files.
    const NAME: &'static str;

    /// Maximum number of simultaneous instances unless configuration overrides it.
    const DEFAULT_CAPACITY: u32 = 1024;
}
