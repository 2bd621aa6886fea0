//! Domain layer - Sensor readings and the shape of the store they live in
//!
//! This crate contains:
//! - Entities (SensorReading)
//! - Value Objects (WallId, IndexSpec, SeedPolicy)
//! - The `sensor_readings` collection definition and its seed set
//! - The storage port (`ReadingStore`)
//!
//! Principles:
//! - No dependencies on database drivers
//! - Invariants enforced when values are constructed
//! - Testable in isolation

pub mod error;
pub mod reading;
pub mod schema;
pub mod seed;

// Re-export commonly used types
pub use error::DomainError;
pub use reading::{ReadingStore, SensorReading, WallId};
pub use schema::{CollectionSpec, IndexKey, IndexSpec, SortDirection};
pub use seed::{SeedPolicy, SeedSet};
