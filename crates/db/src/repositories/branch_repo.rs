//! Repository for the `branches` table.

use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::branch::{Branch, CreateBranch};

/// Column list for branches queries.
const COLUMNS: &str = "id, repo_id, name, created_at";

/// Provides CRUD operations for branches.
pub struct BranchRepo;

impl BranchRepo {
    /// Insert a new branch, returning the created row.
    ///
    /// Fails with a unique violation on `uq_branches_repo_id_name` if the
    /// name is taken in this repository.
    pub async fn create(pool: &PgPool, input: &CreateBranch) -> Result<Branch, sqlx::Error> {
        let query = format!(
            "INSERT INTO branches (repo_id, name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Branch>(&query)
            .bind(input.repo_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a branch by its primary key.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Branch>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM branches WHERE id = $1");
        sqlx::query_as::<_, Branch>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a branch by name within a repository.
    pub async fn find_by_name(
        pool: &PgPool,
        repo_id: DbId,
        name: &str,
    ) -> Result<Option<Branch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM branches WHERE repo_id = $1 AND name = $2");
        sqlx::query_as::<_, Branch>(&query)
            .bind(repo_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all branches of a repository in creation order.
    pub async fn list_by_repo(pool: &PgPool, repo_id: DbId) -> Result<Vec<Branch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM branches
             WHERE repo_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Branch>(&query)
            .bind(repo_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a branch by ID. Its versions, commits (with their items) and
    /// pull requests go with it via `ON DELETE CASCADE`, in this one statement.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM branches WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
