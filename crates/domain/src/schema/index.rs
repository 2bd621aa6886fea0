use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Sort direction of one index key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Numeric form used in document-store key specs (`1` / `-1`)
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexKey {
    pub field: String,
    pub direction: SortDirection,
}

impl IndexKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A non-unique secondary index over one or more ordered keys
///
/// Key order matters: `(wall_id, server_timestamp)` and
/// `(server_timestamp, wall_id)` are different indexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIndexSpec")]
pub struct IndexSpec {
    keys: Vec<IndexKey>,
}

/// Unchecked wire shape of `IndexSpec`
#[derive(Deserialize)]
struct RawIndexSpec {
    keys: Vec<IndexKey>,
}

impl TryFrom<RawIndexSpec> for IndexSpec {
    type Error = DomainError;

    fn try_from(raw: RawIndexSpec) -> Result<Self> {
        Self::new(raw.keys)
    }
}

impl IndexSpec {
    pub fn new(keys: Vec<IndexKey>) -> Result<Self> {
        if keys.is_empty() {
            return Err(DomainError::InvalidIndex(
                "Index must have at least one key".to_string(),
            ));
        }

        if let Some(key) = keys.iter().find(|k| k.field.is_empty()) {
            return Err(DomainError::InvalidIndex(format!(
                "Index key has an empty field name ({:?})",
                key.direction
            )));
        }

        for (i, key) in keys.iter().enumerate() {
            if keys[..i].iter().any(|k| k.field == key.field) {
                return Err(DomainError::InvalidIndex(format!(
                    "Field {} appears twice in index",
                    key.field
                )));
            }
        }

        Ok(Self { keys })
    }

    pub fn single(key: IndexKey) -> Self {
        Self { keys: vec![key] }
    }

    /// Append a key. A field already in the index is left as it is.
    pub fn then(mut self, key: IndexKey) -> Self {
        if !self.keys.iter().any(|k| k.field == key.field) {
            self.keys.push(key);
        }
        self
    }

    pub fn keys(&self) -> &[IndexKey] {
        &self.keys
    }

    /// Default index name: `<field>_<dir>` pairs joined by `_`,
    /// e.g. `wall_id_1_server_timestamp_-1`.
    pub fn name(&self) -> String {
        self.keys
            .iter()
            .map(|k| format!("{}_{}", k.field, k.direction.as_i32()))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl std::fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
