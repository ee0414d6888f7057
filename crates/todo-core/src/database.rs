//! # Database Identifiers
//!
//! Names a configured database so that migrations and connection settings
//! can be matched to each other at bootstrap.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a database known to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseId {
    /// The primary PostgreSQL database.
    Psql,
}

impl DatabaseId {
    /// Stable string form used in logs and the route table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Psql => "psql",
        }
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
