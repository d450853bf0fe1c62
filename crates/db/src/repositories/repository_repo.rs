//! Repository for the `repositories` table.

use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::repository::{CreateRepository, Repository};

/// Column list for repositories queries.
const COLUMNS: &str = "id, name, created_at";

/// Provides CRUD operations for repositories.
pub struct RepositoryRepo;

impl RepositoryRepo {
    /// Insert a new repository, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRepository,
    ) -> Result<Repository, sqlx::Error> {
        let query = format!("INSERT INTO repositories (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Repository>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a repository by its primary key.
    pub async fn find_by_id<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Repository>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM repositories WHERE id = $1");
        sqlx::query_as::<_, Repository>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all repositories, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Repository>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM repositories ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, Repository>(&query).fetch_all(pool).await
    }

    /// Rename a repository. Returns `None` if not found.
    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Repository>, sqlx::Error> {
        let query = format!("UPDATE repositories SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Repository>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a repository and, through `ON DELETE CASCADE`, everything in it.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM repositories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
