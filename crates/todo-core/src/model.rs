//! # Persisted Models
//!
//! A [`Model`] describes the storage of one entity type: its name and the
//! SQL that creates and drops its table. Migrations are derived from these
//! descriptions, so adding an entity to the schema means
//! implementing [`Model`] for it and adding it to the migration set.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Schema description of a persisted entity.
pub trait Model {
    /// Entity name, also used as the migration name.
    const NAME: &'static str;
    /// DDL that creates the table. Must be safe to run on an empty schema.
    const CREATE_SQL: &'static str;
    /// DDL that drops the table.
    const DROP_SQL: &'static str;
}

/// A todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    /// Server-assigned identifier.
    pub id: i32,
    /// What needs doing.
    pub title: String,
}

impl Todo {
    /// Longest accepted title, in characters.
    pub const MAX_TITLE_LEN: usize = 255;

    /// Validate and normalise a title, returning it trimmed.
    pub fn validate_title(title: &str) -> Result<String, ValidationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        let len = trimmed.chars().count();
        if len > Self::MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: Self::MAX_TITLE_LEN,
                actual: len,
            });
        }
        Ok(trimmed.to_string())
    }
}

impl Model for Todo {
    const NAME: &'static str = "Todo";
    const CREATE_SQL: &'static str = "CREATE TABLE IF NOT EXISTS todos (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL
    )";
    const DROP_SQL: &'static str = "DROP TABLE IF EXISTS todos";
}
