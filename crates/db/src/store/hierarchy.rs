//! Story hierarchy operations: nodes and the scenes under them.
//!
//! A node's parent must exist when the node is created and cannot be
//! changed afterwards, so the hierarchy stays a forest. The parent is not
//! checked against the node's repository, and scenes may hang off any node
//! kind.

use folio_core::error::CoreError;
use folio_core::types::DbId;
use sqlx::PgPool;

use super::repository::ensure_repository;
use super::{classify_write_error, StoreResult};
use crate::models::story::{
    CreateScene, CreateStoryNode, Scene, StoryNode, StoryStructure, UpdateScene, UpdateStoryNode,
};
use crate::repositories::{SceneRepo, StoryNodeRepo};

/// Load a story node or fail with `NotFound`.
async fn ensure_node(pool: &PgPool, id: DbId) -> StoreResult<StoryNode> {
    Ok(StoryNodeRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("StoryNode", id))?)
}

/// Operations on story nodes and scenes.
pub struct HierarchyStore;

impl HierarchyStore {
    // ── Nodes ────────────────────────────────────────────────────────

    /// Create a node, optionally under an existing parent.
    pub async fn create_node(pool: &PgPool, input: &CreateStoryNode) -> StoreResult<StoryNode> {
        ensure_repository(pool, input.repo_id).await?;
        if let Some(parent_id) = input.parent_id {
            ensure_node(pool, parent_id).await?;
        }

        let node = StoryNodeRepo::create(pool, input)
            .await
            .map_err(classify_write_error)?;

        tracing::info!(
            node_id = %node.id,
            repo_id = %node.repo_id,
            kind = %node.kind,
            parent_id = ?node.parent_id,
            "Story node created"
        );
        Ok(node)
    }

    /// Fetch one node.
    pub async fn get_node(pool: &PgPool, id: DbId) -> StoreResult<StoryNode> {
        ensure_node(pool, id).await
    }

    /// Retitle or reorder a node.
    pub async fn update_node(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStoryNode,
    ) -> StoreResult<StoryNode> {
        let node = StoryNodeRepo::update(pool, id, input)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| CoreError::not_found("StoryNode", id))?;

        tracing::info!(node_id = %id, order_idx = node.order_idx, "Story node updated");
        Ok(node)
    }

    /// Delete a node with its descendants and their scenes.
    pub async fn delete_node(pool: &PgPool, id: DbId) -> StoreResult<()> {
        let deleted = StoryNodeRepo::delete(pool, id)
            .await
            .map_err(classify_write_error)?;
        if !deleted {
            return Err(CoreError::not_found("StoryNode", id).into());
        }

        tracing::info!(node_id = %id, "Story node deleted");
        Ok(())
    }

    // ── Scenes ───────────────────────────────────────────────────────

    /// Create a scene under an existing node.
    pub async fn create_scene(pool: &PgPool, input: &CreateScene) -> StoreResult<Scene> {
        ensure_node(pool, input.node_id).await?;

        let scene = SceneRepo::create(pool, input)
            .await
            .map_err(classify_write_error)?;

        tracing::info!(scene_id = %scene.id, node_id = %scene.node_id, "Scene created");
        Ok(scene)
    }

    /// Fetch one scene.
    pub async fn get_scene(pool: &PgPool, id: DbId) -> StoreResult<Scene> {
        Ok(SceneRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Scene", id))?)
    }

    /// Retitle or reorder a scene.
    pub async fn update_scene(pool: &PgPool, id: DbId, input: &UpdateScene) -> StoreResult<Scene> {
        let scene = SceneRepo::update(pool, id, input)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| CoreError::not_found("Scene", id))?;

        tracing::info!(scene_id = %id, order_idx = scene.order_idx, "Scene updated");
        Ok(scene)
    }

    /// Delete a scene with all of its versions.
    pub async fn delete_scene(pool: &PgPool, id: DbId) -> StoreResult<()> {
        let deleted = SceneRepo::delete(pool, id)
            .await
            .map_err(classify_write_error)?;
        if !deleted {
            return Err(CoreError::not_found("Scene", id).into());
        }

        tracing::info!(scene_id = %id, "Scene deleted");
        Ok(())
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Read the whole hierarchy of a repository for rendering.
    pub async fn get_structure(pool: &PgPool, repo_id: DbId) -> StoreResult<StoryStructure> {
        ensure_repository(pool, repo_id).await?;

        let nodes = StoryNodeRepo::list_by_repo(pool, repo_id).await?;
        let scenes = SceneRepo::list_by_repo(pool, repo_id).await?;

        tracing::debug!(
            repo_id = %repo_id,
            nodes = nodes.len(),
            scenes = scenes.len(),
            "Loaded story structure"
        );
        Ok(StoryStructure { nodes, scenes })
    }
}
