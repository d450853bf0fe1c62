//! Repository models: the root container of one project's history.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `repositories` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Repository {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// Input for creating a repository.
#[derive(Debug, Deserialize)]
pub struct CreateRepository {
    pub name: String,
}
