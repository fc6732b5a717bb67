//! # Infrastructure Layer
//!
//! Everything that touches the outside world: provider adapters and
//! their HTTP plumbing, and the cache backends.

pub mod cache;
pub mod providers;
