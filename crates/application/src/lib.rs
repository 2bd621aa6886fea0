//! Application layer - Use cases and business workflows

pub mod bootstrap;

pub use bootstrap::{BootstrapReport, Bootstrapper, SchemaOutcome};
