//! Branch models.
//!
//! A branch is a named line of versions inside a repository. Creating one
//! records the name only; no versions are copied into it.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `branches` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Branch {
    pub id: DbId,
    pub repo_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// Input for creating a branch.
#[derive(Debug, Deserialize)]
pub struct CreateBranch {
    pub repo_id: DbId,
    pub name: String,
}
