//! Integration test utilities for the voice presence API
//!
//! Spawns the full HTTP stack over the in-memory store with a manual clock
//! and drives it with `reqwest`.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
