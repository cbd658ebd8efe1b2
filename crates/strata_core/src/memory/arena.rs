//! # Arena Allocator
//!
//! Bump-pointer budget that every fixed-capacity table of an
//! [`EntityManager`](crate::EntityManager) is drawn from.

use std::cell::Cell;
use std::mem::{align_of, size_of};

/// Rounds `offset` up to the next multiple of `align` (a power of two).
#[inline]
const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

/// Byte footprint of a sequence of slice allocations.
///
/// Replays the same alignment rules as [`Arena::alloc_slice`], so the
/// size of a layout is exactly what a fresh arena needs to serve the same
/// sequence of allocations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaLayout {
    size: usize,
}

impl ArenaLayout {
    /// Creates an empty layout.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { size: 0 }
    }

    /// Appends a slice of `count` values of `T`.
    #[inline]
    pub fn push_slice<T>(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.size = align_up(self.size, align_of::<T>()) + size_of::<T>() * count;
    }

    /// Total bytes required.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

/// A bump-pointer arena.
///
/// Allocations are fast (just bump an offset) and are released all at once
/// when the arena is reset. The arena enforces a byte budget: once it is
/// spent, further allocations fail.
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. Use one arena per thread.
///
/// # Example
///
/// ```rust
/// use strata_core::Arena;
///
/// let arena = Arena::new(1024);
/// let slots = arena.alloc_slice::<u32>(16).unwrap();
/// assert_eq!(slots.len(), 16);
/// assert_eq!(arena.used(), 64);
/// ```
#[derive(Debug)]
pub struct Arena {
    /// Current allocation offset.
    offset: Cell<usize>,
    /// Total capacity.
    capacity: usize,
}

impl Arena {
    /// Creates a new arena with the specified capacity in bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            offset: Cell::new(0),
            capacity,
        }
    }

    /// Creates an arena sized exactly for `layout`.
    #[must_use]
    pub fn with_layout(layout: ArenaLayout) -> Self {
        Self::new(layout.size())
    }

    /// Returns the total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current used space in bytes.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    /// Returns the remaining free space in bytes.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity - self.used()
    }

    /// Reserves space for `count` values of `T` and fills them with `T::default()`.
    ///
    /// Returns `None` if the arena does not have room left.
    pub fn alloc_slice<T: Default + Clone>(&self, count: usize) -> Option<Box<[T]>> {
        self.alloc_slice_with(count, |_| T::default())
    }

    /// Reserves space for `count` values of `T`, initialising slot `i` with `init(i)`.
    ///
    /// Returns `None` if the arena does not have room left. On failure the
    /// arena offset is left untouched.
    pub fn alloc_slice_with<T, F>(&self, count: usize, init: F) -> Option<Box<[T]>>
    where
        F: FnMut(usize) -> T,
    {
        if count > 0 {
            let offset = self.offset.get();
            let new_offset = size_of::<T>()
                .checked_mul(count)
                .and_then(|size| align_up(offset, align_of::<T>()).checked_add(size))?;
            if new_offset > self.capacity {
                return None;
            }
            self.offset.set(new_offset);
        }

        Some((0..count).map(init).collect())
    }

    /// Resets the arena, returning its whole budget.
    ///
    /// Previously handed out slices stay valid; they simply stop counting
    /// against the budget.
    #[inline]
    pub fn reset(&self) {
        self.offset.set(0);
    }
}
