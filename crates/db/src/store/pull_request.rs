//! Pull request operations.
//!
//! Pull requests record an intent to merge one branch into another. Status
//! moves only on request and no branch contents are ever merged.

use folio_core::error::CoreError;
use folio_core::pull_request::{validate_transition, PullRequestStatus};
use folio_core::types::DbId;
use sqlx::PgPool;

use super::repository::{ensure_branch, ensure_repository};
use super::{classify_write_error, StoreResult};
use crate::models::pull_request::{CreatePullRequest, PullRequest};
use crate::repositories::PullRequestRepo;

/// Operations on pull requests.
pub struct PullRequestStore;

impl PullRequestStore {
    /// Open a pull request between two branches of one repository.
    pub async fn create_pull_request(
        pool: &PgPool,
        input: &CreatePullRequest,
    ) -> StoreResult<PullRequest> {
        if input.source_branch_id == input.target_branch_id {
            return Err(CoreError::BadRequest(
                "Source and target branch must differ".to_string(),
            )
            .into());
        }

        ensure_repository(pool, input.repo_id).await?;
        for branch_id in [input.source_branch_id, input.target_branch_id] {
            let branch = ensure_branch(pool, branch_id).await?;
            if branch.repo_id != input.repo_id {
                return Err(CoreError::BadRequest(format!(
                    "Branch {branch_id} does not belong to repository {}",
                    input.repo_id
                ))
                .into());
            }
        }

        let pr = PullRequestRepo::create(pool, input)
            .await
            .map_err(classify_write_error)?;

        tracing::info!(
            pull_request_id = %pr.id,
            repo_id = %pr.repo_id,
            source_branch_id = %pr.source_branch_id,
            target_branch_id = %pr.target_branch_id,
            "Pull request opened"
        );
        Ok(pr)
    }

    /// Fetch one pull request.
    pub async fn get_pull_request(pool: &PgPool, id: DbId) -> StoreResult<PullRequest> {
        Ok(PullRequestRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("PullRequest", id))?)
    }

    /// List a repository's pull requests, newest first.
    pub async fn list_pull_requests(
        pool: &PgPool,
        repo_id: DbId,
        status: Option<PullRequestStatus>,
    ) -> StoreResult<Vec<PullRequest>> {
        let prs = PullRequestRepo::list_by_repo(pool, repo_id, status.map(|s| s.as_str())).await?;
        tracing::debug!(count = prs.len(), repo_id = %repo_id, "Listed pull requests");
        Ok(prs)
    }

    /// Move a pull request to `status`.
    ///
    /// Setting the current status returns the row unchanged. A forbidden
    /// transition, or a row whose status changed since it was read, fails
    /// with `Conflict`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: PullRequestStatus,
    ) -> StoreResult<PullRequest> {
        let current = Self::get_pull_request(pool, id).await?;
        let from = current.pr_status()?;
        if !validate_transition(from, status)? {
            return Ok(current);
        }

        let pr = PullRequestRepo::update_status(pool, id, from.as_str(), status.as_str())
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| {
                CoreError::Conflict(format!("Pull request {id} was changed concurrently"))
            })?;

        tracing::info!(
            pull_request_id = %id,
            from = from.as_str(),
            to = status.as_str(),
            "Pull request status updated"
        );
        Ok(pr)
    }
}
