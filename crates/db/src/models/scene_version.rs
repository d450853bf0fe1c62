//! Scene version models.
//!
//! Versions are immutable, so there is no update DTO.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scene_versions` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SceneVersion {
    pub id: DbId,
    pub scene_id: DbId,
    pub branch_id: DbId,
    pub parent_version_id: Option<DbId>,
    pub content_html: String,
    pub meta: serde_json::Value,
    pub created_at: Timestamp,
}

/// Input for saving a new version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSceneVersion {
    pub scene_id: DbId,
    pub branch_id: DbId,
    pub parent_version_id: Option<DbId>,
    pub content_html: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// One point of a scene's sentiment history on a branch.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentPoint {
    pub version_id: DbId,
    pub score: f64,
    pub created_at: Timestamp,
}
