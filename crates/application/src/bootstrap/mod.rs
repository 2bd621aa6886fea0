mod bootstrapper;
mod report;

pub use bootstrapper::Bootstrapper;
pub use report::{BootstrapReport, SchemaOutcome};
