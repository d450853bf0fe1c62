//! Repository for the `scenes` table.

use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::story::{CreateScene, Scene, UpdateScene};

/// Column list for scenes queries.
const COLUMNS: &str = "id, node_id, title, order_idx, created_at";

/// Provides CRUD operations for scenes.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert a new scene, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateScene) -> Result<Scene, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenes (node_id, title, order_idx)
             VALUES ($1, $2, COALESCE($3, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(input.node_id)
            .bind(&input.title)
            .bind(input.order_idx)
            .fetch_one(pool)
            .await
    }

    /// Find a scene by its primary key.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Scene>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List every scene under any node of a repository, by `order_idx` with
    /// ties in creation order.
    pub async fn list_by_repo(pool: &PgPool, repo_id: DbId) -> Result<Vec<Scene>, sqlx::Error> {
        sqlx::query_as::<_, Scene>(
            "SELECT s.id, s.node_id, s.title, s.order_idx, s.created_at
             FROM scenes s
             JOIN story_nodes n ON n.id = s.node_id
             WHERE n.repo_id = $1
             ORDER BY s.order_idx ASC, s.created_at ASC, s.id ASC",
        )
        .bind(repo_id)
        .fetch_all(pool)
        .await
    }

    /// Update a scene. Only non-`None` fields are applied.
    ///
    /// Returns `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScene,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET
                title = COALESCE($2, title),
                order_idx = COALESCE($3, order_idx)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.order_idx)
            .fetch_optional(pool)
            .await
    }

    /// Delete a scene; its versions cascade in the same statement.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scenes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
