//! # Entity Management
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into the slot table
//! - A generation counter for safe reuse
//! - An optional kind tag for routing to kind-specific behaviour
//!
//! The slot table itself is a tagged variant per slot: a free slot is a
//! node of the intrusive free list, a live slot carries the entity's
//! component [`Signature`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::component::ComponentTypeId;

/// Number of bits the handle spends on the generation counter.
pub const GENERATION_BITS: u32 = 24;

/// Largest generation value before it wraps.
pub const MAX_GENERATION: u32 = (1 << GENERATION_BITS) - 1;

const INDEX_BITS: u32 = 32;
const KIND_SHIFT: u32 = INDEX_BITS + GENERATION_BITS;

/// Returns the generation a slot takes on its next creation.
///
/// Wraps at [`MAX_GENERATION`], skipping zero so the null handle can never
/// validate.
#[inline]
#[must_use]
pub const fn next_generation(generation: u32) -> u32 {
    let next = generation.wrapping_add(1) & MAX_GENERATION;
    if next == 0 {
        1
    } else {
        next
    }
}

/// Unique identifier for an entity.
///
/// The ID is packed into 64 bits:
/// - Bits 0..32: slot index
/// - Bits 32..56: generation counter for detecting stale references
/// - Bits 56..64: kind tag (ignored by validation)
///
/// The all-zero value is [`EntityId::NULL`]. Live slots never hold
/// generation zero, so the null handle never validates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Null/invalid entity ID.
    pub const NULL: Self = Self(0);

    /// Creates a new entity ID from index and generation.
    ///
    /// Generation bits above [`GENERATION_BITS`] are discarded.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self::with_kind(index, generation, 0)
    }

    /// Creates a new entity ID carrying a kind tag.
    #[inline]
    #[must_use]
    pub const fn with_kind(index: u32, generation: u32, kind: u8) -> Self {
        Self(
            ((kind as u64) << KIND_SHIFT)
                | (((generation & MAX_GENERATION) as u64) << INDEX_BITS)
                | index as u64,
        )
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        ((self.0 >> INDEX_BITS) as u32) & MAX_GENERATION
    }

    /// Returns the kind tag.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> u8 {
        (self.0 >> KIND_SHIFT) as u8
    }

    /// Checks if this entity ID is the null handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Raw packed bits.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Rebuilds an ID from [`to_bits`](Self::to_bits) output.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("null");
        }
        write!(f, "{}v{}", self.index(), self.generation())?;
        if self.kind() != 0 {
            write!(f, "k{}", self.kind())?;
        }
        Ok(())
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({self})")
    }
}

/// Bitmask of the component types attached to a live entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(u64);

/// Signature of a freshly created entity: alive, no components.
pub const NEW_ENTITY_SIGNATURE: Signature = Signature::EMPTY;

impl Signature {
    /// No components.
    pub const EMPTY: Self = Self(0);

    /// Wraps a raw bitmask.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bitmask.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Checks if the component's bit is set.
    #[inline]
    #[must_use]
    pub const fn matches(self, component: ComponentTypeId) -> bool {
        self.0 & component.mask() != 0
    }

    /// Returns a copy with the component's bit set.
    #[inline]
    #[must_use]
    pub const fn with(self, component: ComponentTypeId) -> Self {
        Self(self.0 | component.mask())
    }

    /// Returns a copy with the component's bit cleared.
    #[inline]
    #[must_use]
    pub const fn without(self, component: ComponentTypeId) -> Self {
        Self(self.0 & !component.mask())
    }

    /// Checks if every bit of `other` is also set here.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Checks if no component is attached.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of attached components.
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates the attached component types in ascending bit order.
    #[inline]
    #[must_use]
    pub const fn iter(self) -> SignatureIter {
        SignatureIter(self.0)
    }
}

impl IntoIterator for Signature {
    type Item = ComponentTypeId;
    type IntoIter = SignatureIter;

    fn into_iter(self) -> SignatureIter {
        self.iter()
    }
}

impl FromIterator<ComponentTypeId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentTypeId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, component) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", component.get())?;
        }
        f.write_str("}")
    }
}

/// Iterator over the set bits of a [`Signature`], lowest first.
///
/// Each step extracts the lowest set bit and clears it, so the cost is
/// proportional to the number of attached components.
#[derive(Clone, Debug)]
pub struct SignatureIter(u64);

impl Iterator for SignatureIter {
    type Item = ComponentTypeId;

    #[inline]
    fn next(&mut self) -> Option<ComponentTypeId> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        #[allow(clippy::cast_possible_truncation)]
        let component = ComponentTypeId::new(bit as u8);
        Some(component)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for SignatureIter {}

/// One entry of the slot table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    /// Slot is on the free list.
    Free {
        /// Next free slot, `None` at the tail.
        next: Option<u32>,
    },
    /// Slot holds a live entity.
    Live {
        /// Attached component types.
        signature: Signature,
    },
}

impl Slot {
    /// Checks if the slot holds a live entity.
    #[inline]
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live { .. })
    }

    /// Signature of the live entity, `None` for a free slot.
    #[inline]
    #[must_use]
    pub const fn signature(self) -> Option<Signature> {
        match self {
            Self::Live { signature } => Some(signature),
            Self::Free { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::with_kind(12345, 67890, 9);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.generation(), 67890);
        assert_eq!(id.kind(), 9);
        assert_eq!(EntityId::from_bits(id.to_bits()), id);
    }

    #[test]
    fn test_null_is_zero() {
        assert!(EntityId::default().is_null());
        assert_eq!(EntityId::NULL.to_bits(), 0);
        assert!(!EntityId::new(0, 1).is_null());
    }

    #[test]
    fn test_generation_wraps_past_zero() {
        assert_eq!(next_generation(0), 1);
        assert_eq!(next_generation(41), 42);
        assert_eq!(next_generation(MAX_GENERATION), 1);
        assert_eq!(EntityId::new(3, MAX_GENERATION + 1).generation(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId::NULL.to_string(), "null");
        assert_eq!(EntityId::new(4, 2).to_string(), "4v2");
        assert_eq!(EntityId::with_kind(4, 2, 7).to_string(), "4v2k7");
    }

    #[test]
    fn test_signature_bits() {
        let a = ComponentTypeId::new(1);
        let b = ComponentTypeId::new(40);

        let sig = NEW_ENTITY_SIGNATURE.with(a).with(b);
        assert!(sig.matches(a));
        assert!(sig.matches(b));
        assert!(!sig.matches(ComponentTypeId::new(2)));
        assert_eq!(sig.len(), 2);

        let sig = sig.without(a);
        assert!(!sig.matches(a));
        assert!(sig.contains(Signature::EMPTY.with(b)));
        assert!(sig.without(b).is_empty());
    }

    #[test]
    fn test_signature_iterates_lowest_first() {
        let sig: Signature = [9, 0, 63, 17]
            .into_iter()
            .map(ComponentTypeId::new)
            .collect();
        let ids: Vec<u8> = sig.iter().map(ComponentTypeId::get).collect();
        assert_eq!(ids, vec![0, 9, 17, 63]);
        assert_eq!(sig.iter().len(), 4);
        assert_eq!(sig.to_string(), "{0, 9, 17, 63}");
    }

    #[test]
    fn test_slot_states() {
        let free = Slot::Free { next: Some(3) };
        assert!(!free.is_live());
        assert_eq!(free.signature(), None);

        let live = Slot::Live {
            signature: NEW_ENTITY_SIGNATURE,
        };
        assert!(live.is_live());
        assert_eq!(live.signature(), Some(Signature::EMPTY));
    }
}
