//! Category domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kasir_core::CategoryId;

use super::{ValidationError, normalize_name};

/// A product grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryInput {
    /// Trim the name; blank descriptions become `None`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName` for a blank name.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let description = self
            .description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());
        Ok(Self {
            name: normalize_name(&self.name)?,
            description,
        })
    }
}
