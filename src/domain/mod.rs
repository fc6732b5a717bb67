//! # Domain Layer
//!
//! Pure business types: value objects, the corridor catalog, and the
//! entities flowing through the aggregation pipeline. No I/O here.

pub mod catalog;
pub mod entities;
pub mod value_objects;

pub use catalog::{Catalog, Country};
