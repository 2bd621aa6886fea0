use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Value object identifying a physical sensing location (a climbing wall)
///
/// Rules:
/// - Must be non-empty
/// - Must contain only ASCII alphanumerics, underscore, and hyphen
/// - Max length 100 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallId(String);

impl WallId {
    pub const MAX_LEN: usize = 100;

    /// Create a new WallId with validation
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if id.is_empty() {
            return Err(DomainError::InvalidWallId(
                "Wall ID cannot be empty".to_string(),
            ));
        }

        if id.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidWallId(format!(
                "Wall ID too long: {} chars (max {})",
                id.len(),
                Self::MAX_LEN
            )));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::InvalidWallId(format!(
                "Wall ID {id} must contain only alphanumeric, underscore, and hyphen"
            )));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WallId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<WallId> for String {
    fn from(id: WallId) -> Self {
        id.0
    }
}

impl std::fmt::Display for WallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
