//! Story hierarchy models: nodes (epics, chapters) and scenes.

use folio_core::error::CoreError;
use folio_core::story::NodeKind;
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Story nodes
// ---------------------------------------------------------------------------

/// A row from the `story_nodes` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StoryNode {
    pub id: DbId,
    pub repo_id: DbId,
    pub kind: String,
    pub title: String,
    pub parent_id: Option<DbId>,
    pub order_idx: i32,
    pub created_at: Timestamp,
}

impl StoryNode {
    /// Parse the stored kind.
    pub fn node_kind(&self) -> Result<NodeKind, CoreError> {
        NodeKind::from_str(&self.kind)
    }
}

/// Input for creating a story node. `order_idx` defaults to 0.
#[derive(Debug, Deserialize)]
pub struct CreateStoryNode {
    pub repo_id: DbId,
    pub kind: NodeKind,
    pub title: String,
    pub parent_id: Option<DbId>,
    pub order_idx: Option<i32>,
}

/// Input for updating a story node (all fields optional).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStoryNode {
    pub title: Option<String>,
    pub order_idx: Option<i32>,
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// A row from the `scenes` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Scene {
    pub id: DbId,
    pub node_id: DbId,
    pub title: String,
    pub order_idx: i32,
    pub created_at: Timestamp,
}

/// Input for creating a scene. `order_idx` defaults to 0.
#[derive(Debug, Deserialize)]
pub struct CreateScene {
    pub node_id: DbId,
    pub title: String,
    pub order_idx: Option<i32>,
}

/// Input for updating a scene (all fields optional).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateScene {
    pub title: Option<String>,
    pub order_idx: Option<i32>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Full hierarchy of a repository, each list in sibling order.
#[derive(Debug, Clone, Serialize)]
pub struct StoryStructure {
    pub nodes: Vec<StoryNode>,
    pub scenes: Vec<Scene>,
}
