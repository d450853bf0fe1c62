//! Repository for the `scene_versions` table.
//!
//! Rows are append-only: there is no update method, and deletes happen only
//! through cascades from scenes and branches.

use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::scene_version::{CreateSceneVersion, SceneVersion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, scene_id, branch_id, parent_version_id, content_html, meta, created_at";

/// Provides insert and history queries for scene versions.
pub struct SceneVersionRepo;

impl SceneVersionRepo {
    /// Insert a new version. `meta` is stored verbatim.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateSceneVersion,
    ) -> Result<SceneVersion, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO scene_versions
                (scene_id, branch_id, parent_version_id, content_html, meta)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SceneVersion>(&query)
            .bind(input.scene_id)
            .bind(input.branch_id)
            .bind(input.parent_version_id)
            .bind(&input.content_html)
            .bind(&input.meta)
            .fetch_one(executor)
            .await
    }

    /// Find a version by its primary key.
    pub async fn find_by_id<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<SceneVersion>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM scene_versions WHERE id = $1");
        sqlx::query_as::<_, SceneVersion>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List the versions of a scene, newest first, optionally limited to one
    /// branch.
    pub async fn list_by_scene(
        pool: &PgPool,
        scene_id: DbId,
        branch_id: Option<DbId>,
    ) -> Result<Vec<SceneVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scene_versions
             WHERE scene_id = $1 AND ($2::uuid IS NULL OR branch_id = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SceneVersion>(&query)
            .bind(scene_id)
            .bind(branch_id)
            .fetch_all(pool)
            .await
    }

    /// List the versions of a scene on one branch, oldest first.
    pub async fn list_chronological(
        pool: &PgPool,
        scene_id: DbId,
        branch_id: DbId,
    ) -> Result<Vec<SceneVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scene_versions
             WHERE scene_id = $1 AND branch_id = $2
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, SceneVersion>(&query)
            .bind(scene_id)
            .bind(branch_id)
            .fetch_all(pool)
            .await
    }

    /// Find the most recent version of a scene on a branch.
    pub async fn find_latest(
        pool: &PgPool,
        scene_id: DbId,
        branch_id: DbId,
    ) -> Result<Option<SceneVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scene_versions
             WHERE scene_id = $1 AND branch_id = $2
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, SceneVersion>(&query)
            .bind(scene_id)
            .bind(branch_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the lineage of a version by following `parent_version_id`.
    ///
    /// The chain runs from the given version back to its root, most recent
    /// first. Parents may sit on other branches.
    pub async fn list_version_chain(
        pool: &PgPool,
        version_id: DbId,
    ) -> Result<Vec<SceneVersion>, sqlx::Error> {
        let query = format!(
            "WITH RECURSIVE chain AS (
                SELECT {COLUMNS}, 0 AS depth
                FROM scene_versions
                WHERE id = $1
                UNION ALL
                SELECT sv.id, sv.scene_id, sv.branch_id, sv.parent_version_id,
                       sv.content_html, sv.meta, sv.created_at, c.depth + 1
                FROM scene_versions sv
                INNER JOIN chain c ON sv.id = c.parent_version_id
            )
            SELECT {COLUMNS} FROM chain ORDER BY depth ASC"
        );
        sqlx::query_as::<_, SceneVersion>(&query)
            .bind(version_id)
            .fetch_all(pool)
            .await
    }

    /// Resolve `(id, branch_id)` for each of `ids` that exists, taking a
    /// share lock so the rows cannot be deleted before the transaction ends.
    pub async fn lock_branches_for<'e, E>(
        executor: E,
        ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT id, branch_id FROM scene_versions
             WHERE id = ANY($1)
             FOR SHARE",
        )
        .bind(ids)
        .fetch_all(executor)
        .await
    }

    /// List the versions bound to a commit, newest first.
    pub async fn list_by_commit(
        pool: &PgPool,
        commit_id: DbId,
    ) -> Result<Vec<SceneVersion>, sqlx::Error> {
        sqlx::query_as::<_, SceneVersion>(
            "SELECT sv.id, sv.scene_id, sv.branch_id, sv.parent_version_id,
                    sv.content_html, sv.meta, sv.created_at
             FROM scene_versions sv
             JOIN commit_items ci ON ci.scene_version_id = sv.id
             WHERE ci.commit_id = $1
             ORDER BY sv.created_at DESC, sv.id DESC",
        )
        .bind(commit_id)
        .fetch_all(pool)
        .await
    }
}
