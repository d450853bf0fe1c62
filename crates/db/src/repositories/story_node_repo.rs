//! Repository for the `story_nodes` table.

use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::story::{CreateStoryNode, StoryNode, UpdateStoryNode};

/// Column list for story_nodes queries.
const COLUMNS: &str = "id, repo_id, kind, title, parent_id, order_idx, created_at";

/// Provides CRUD operations for story nodes.
pub struct StoryNodeRepo;

impl StoryNodeRepo {
    /// Insert a new node, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStoryNode) -> Result<StoryNode, sqlx::Error> {
        let query = format!(
            "INSERT INTO story_nodes (repo_id, kind, title, parent_id, order_idx)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoryNode>(&query)
            .bind(input.repo_id)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(input.parent_id)
            .bind(input.order_idx)
            .fetch_one(pool)
            .await
    }

    /// Find a node by its primary key.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<StoryNode>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM story_nodes WHERE id = $1");
        sqlx::query_as::<_, StoryNode>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List every node of a repository by `order_idx`, ties in creation order.
    pub async fn list_by_repo(pool: &PgPool, repo_id: DbId) -> Result<Vec<StoryNode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM story_nodes
             WHERE repo_id = $1
             ORDER BY order_idx ASC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, StoryNode>(&query)
            .bind(repo_id)
            .fetch_all(pool)
            .await
    }

    /// Update a node. Only non-`None` fields are applied.
    ///
    /// Returns `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStoryNode,
    ) -> Result<Option<StoryNode>, sqlx::Error> {
        let query = format!(
            "UPDATE story_nodes SET
                title = COALESCE($2, title),
                order_idx = COALESCE($3, order_idx)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoryNode>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.order_idx)
            .fetch_optional(pool)
            .await
    }

    /// Delete a node; child nodes and scenes cascade in the same statement.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM story_nodes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
