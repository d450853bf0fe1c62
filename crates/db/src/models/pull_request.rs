//! Pull request models.

use folio_core::error::CoreError;
use folio_core::pull_request::PullRequestStatus;
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `pull_requests` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PullRequest {
    pub id: DbId,
    pub repo_id: DbId,
    pub source_branch_id: DbId,
    pub target_branch_id: DbId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PullRequest {
    /// Parse the stored status.
    pub fn pr_status(&self) -> Result<PullRequestStatus, CoreError> {
        PullRequestStatus::from_str(&self.status)
    }
}

/// Input for opening a pull request.
#[derive(Debug, Deserialize)]
pub struct CreatePullRequest {
    pub repo_id: DbId,
    pub source_branch_id: DbId,
    pub target_branch_id: DbId,
    pub title: Option<String>,
    pub description: Option<String>,
}
