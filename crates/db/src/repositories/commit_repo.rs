//! Repository for the `commits` and `commit_items` tables.

use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::commit::{Commit, CommitItem};

/// Column list for commits queries.
const COLUMNS: &str = "id, repo_id, branch_id, message, author, created_at";

/// Provides insert and query operations for commits.
///
/// Inserting a commit and its items is only meaningful as a pair; callers
/// run both inside one transaction.
pub struct CommitRepo;

impl CommitRepo {
    /// Insert a commit row, returning it.
    pub async fn create<'e, E>(
        executor: E,
        repo_id: DbId,
        branch_id: DbId,
        message: &str,
        author: &str,
    ) -> Result<Commit, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO commits (repo_id, branch_id, message, author)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Commit>(&query)
            .bind(repo_id)
            .bind(branch_id)
            .bind(message)
            .bind(author)
            .fetch_one(executor)
            .await
    }

    /// Bind versions to a commit with a single multi-row insert.
    ///
    /// Returns the number of items written.
    pub async fn add_items<'e, E>(
        executor: E,
        commit_id: DbId,
        scene_version_ids: &[DbId],
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "INSERT INTO commit_items (commit_id, scene_version_id)
             SELECT $1, UNNEST($2::uuid[])",
        )
        .bind(commit_id)
        .bind(scene_version_ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find a commit by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Commit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM commits WHERE id = $1");
        sqlx::query_as::<_, Commit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the commits of a branch, newest first.
    pub async fn list_by_branch(pool: &PgPool, branch_id: DbId) -> Result<Vec<Commit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM commits
             WHERE branch_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Commit>(&query)
            .bind(branch_id)
            .fetch_all(pool)
            .await
    }

    /// List the item rows of a commit.
    pub async fn list_items(pool: &PgPool, commit_id: DbId) -> Result<Vec<CommitItem>, sqlx::Error> {
        sqlx::query_as::<_, CommitItem>(
            "SELECT commit_id, scene_version_id FROM commit_items WHERE commit_id = $1",
        )
        .bind(commit_id)
        .fetch_all(pool)
        .await
    }
}
