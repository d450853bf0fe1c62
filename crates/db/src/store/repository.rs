//! Repository and branch operations.

use folio_core::branching::{validate_branch_name, validate_repository_name};
use folio_core::error::CoreError;
use folio_core::types::DbId;
use sqlx::PgPool;

use super::{classify_write_error, StoreResult};
use crate::models::branch::{Branch, CreateBranch};
use crate::models::repository::{CreateRepository, Repository};
use crate::repositories::{BranchRepo, RepositoryRepo};

/// Load a repository or fail with `NotFound`.
pub(crate) async fn ensure_repository(pool: &PgPool, id: DbId) -> StoreResult<Repository> {
    Ok(RepositoryRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Repository", id))?)
}

/// Load a branch or fail with `NotFound`.
pub(crate) async fn ensure_branch(pool: &PgPool, id: DbId) -> StoreResult<Branch> {
    Ok(BranchRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Branch", id))?)
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

/// Operations on repositories, the roots of project history.
pub struct RepositoryStore;

impl RepositoryStore {
    /// Create a repository with a fresh id.
    pub async fn create_repository(pool: &PgPool, name: &str) -> StoreResult<Repository> {
        validate_repository_name(name)?;

        let input = CreateRepository {
            name: name.trim().to_string(),
        };
        let repo = RepositoryRepo::create(pool, &input)
            .await
            .map_err(classify_write_error)?;

        tracing::info!(repo_id = %repo.id, name = %repo.name, "Repository created");
        Ok(repo)
    }

    /// Fetch one repository.
    pub async fn get_repository(pool: &PgPool, id: DbId) -> StoreResult<Repository> {
        ensure_repository(pool, id).await
    }

    /// List every repository, oldest first.
    pub async fn list_repositories(pool: &PgPool) -> StoreResult<Vec<Repository>> {
        let repos = RepositoryRepo::list(pool).await?;
        tracing::debug!(count = repos.len(), "Listed repositories");
        Ok(repos)
    }

    /// Rename a repository.
    pub async fn rename_repository(pool: &PgPool, id: DbId, name: &str) -> StoreResult<Repository> {
        validate_repository_name(name)?;

        let repo = RepositoryRepo::rename(pool, id, name.trim())
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| CoreError::not_found("Repository", id))?;

        tracing::info!(repo_id = %id, name = %repo.name, "Repository renamed");
        Ok(repo)
    }

    /// Delete a repository with all of its branches, story nodes, commits
    /// and pull requests. Irreversible.
    pub async fn delete_repository(pool: &PgPool, id: DbId) -> StoreResult<()> {
        let deleted = RepositoryRepo::delete(pool, id)
            .await
            .map_err(classify_write_error)?;
        if !deleted {
            return Err(CoreError::not_found("Repository", id).into());
        }

        tracing::info!(repo_id = %id, "Repository deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// Operations on branches.
pub struct BranchStore;

impl BranchStore {
    /// Create an empty branch in a repository.
    ///
    /// Fails with `NotFound` for an unknown repository and `Conflict` when
    /// the name is taken. Concurrent creators of the same name race on the
    /// `uq_branches_repo_id_name` constraint, so exactly one succeeds.
    pub async fn create_branch(pool: &PgPool, repo_id: DbId, name: &str) -> StoreResult<Branch> {
        validate_branch_name(name)?;
        ensure_repository(pool, repo_id).await?;

        if BranchRepo::find_by_name(pool, repo_id, name).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "Branch '{name}' already exists in repository {repo_id}"
            ))
            .into());
        }

        let input = CreateBranch {
            repo_id,
            name: name.to_string(),
        };
        let branch = BranchRepo::create(pool, &input)
            .await
            .map_err(classify_write_error)?;

        tracing::info!(branch_id = %branch.id, repo_id = %repo_id, name = %name, "Branch created");
        Ok(branch)
    }

    /// List the branches of a repository in creation order.
    pub async fn list_branches(pool: &PgPool, repo_id: DbId) -> StoreResult<Vec<Branch>> {
        let branches = BranchRepo::list_by_repo(pool, repo_id).await?;
        tracing::debug!(count = branches.len(), repo_id = %repo_id, "Listed branches");
        Ok(branches)
    }

    /// Fetch one branch.
    pub async fn get_branch(pool: &PgPool, id: DbId) -> StoreResult<Branch> {
        ensure_branch(pool, id).await
    }

    /// Delete a branch together with its versions, commits and pull
    /// requests. Other branches are untouched.
    pub async fn delete_branch(pool: &PgPool, id: DbId) -> StoreResult<()> {
        let deleted = BranchRepo::delete(pool, id)
            .await
            .map_err(classify_write_error)?;
        if !deleted {
            return Err(CoreError::not_found("Branch", id).into());
        }

        tracing::info!(branch_id = %id, "Branch deleted");
        Ok(())
    }
}
