//! Repository for the `pull_requests` table.

use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::pull_request::{CreatePullRequest, PullRequest};

/// Column list for pull_requests queries.
const COLUMNS: &str = "id, repo_id, source_branch_id, target_branch_id, title, \
    description, status, created_at, updated_at";

/// Provides CRUD operations for pull requests.
pub struct PullRequestRepo;

impl PullRequestRepo {
    /// Insert a new pull request with status `open`.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePullRequest,
    ) -> Result<PullRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO pull_requests
                (repo_id, source_branch_id, target_branch_id, title, description, status)
             VALUES ($1, $2, $3, $4, $5, 'open')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PullRequest>(&query)
            .bind(input.repo_id)
            .bind(input.source_branch_id)
            .bind(input.target_branch_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a pull request by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PullRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pull_requests WHERE id = $1");
        sqlx::query_as::<_, PullRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the pull requests of a repository, newest first, optionally
    /// filtered by status.
    pub async fn list_by_repo(
        pool: &PgPool,
        repo_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<PullRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pull_requests
             WHERE repo_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PullRequest>(&query)
            .bind(repo_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Move a pull request from `from` to `to`.
    ///
    /// The update only applies while the row still has status `from`;
    /// returns `None` if the row is missing or was changed concurrently.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<PullRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE pull_requests SET status = $3, updated_at = clock_timestamp()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PullRequest>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }
}
