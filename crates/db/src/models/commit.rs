//! Commit models and the composite save-and-commit DTOs.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::scene_version::SceneVersion;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `commits` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Commit {
    pub id: DbId,
    pub repo_id: DbId,
    pub branch_id: DbId,
    pub message: String,
    pub author: String,
    pub created_at: Timestamp,
}

/// A row from the `commit_items` join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CommitItem {
    pub commit_id: DbId,
    pub scene_version_id: DbId,
}

// ---------------------------------------------------------------------------
// Create DTOs
// ---------------------------------------------------------------------------

/// Input for grouping existing versions into a commit.
/// `author` falls back to the placeholder identity when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommit {
    pub repo_id: DbId,
    pub branch_id: DbId,
    pub message: String,
    pub author: Option<String>,
    pub scene_version_ids: Vec<DbId>,
}

/// Input for saving one version and committing it in the same transaction.
/// `message` is derived from the content when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveVersionWithCommit {
    pub scene_id: DbId,
    pub branch_id: DbId,
    pub parent_version_id: Option<DbId>,
    pub content_html: String,
    #[serde(default)]
    pub meta: serde_json::Value,
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Result of [`SaveVersionWithCommit`]: the new version and the single-item
/// commit wrapping it.
#[derive(Debug, Clone, Serialize)]
pub struct SavedVersion {
    pub version: SceneVersion,
    pub commit: Commit,
}
