use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// When the seed loader inserts its sample readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
    /// Insert on every run; a second run duplicates the documents
    #[default]
    Always,
    /// Insert only into an empty collection
    IfEmpty,
    /// Never insert
    Skip,
}

impl SeedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::IfEmpty => "if-empty",
            Self::Skip => "skip",
        }
    }
}

impl FromStr for SeedPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "if-empty" | "if_empty" => Ok(Self::IfEmpty),
            "skip" | "never" => Ok(Self::Skip),
            other => Err(DomainError::InvalidConfiguration(format!(
                "Unknown seed policy: {other} (expected always, if-empty or skip)"
            ))),
        }
    }
}

impl std::fmt::Display for SeedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
