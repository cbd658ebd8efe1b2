//! # Memory Management
//!
//! The byte budget every entity manager is carved from.
//!
//! ## Design Philosophy
//!
//! All memory is reserved once at startup. During gameplay:
//! - No table growth
//! - No reallocation
//! - Predictable, flat latency

mod arena;

pub use arena::{Arena, ArenaLayout};
