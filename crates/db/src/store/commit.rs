//! Commit operations.
//!
//! A commit binds existing versions of one branch. Every check runs inside
//! the transaction that writes the commit, with the member versions locked,
//! so either the commit and all of its items are written or nothing is.

use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_core::versioning::{
    check_commit_members, normalize_meta, resolve_author, resolve_commit_message,
    validate_commit_request, DEFAULT_AUTHOR,
};
use sqlx::PgPool;

use super::version::check_version_refs;
use super::{classify_write_error, StoreResult};
use crate::models::commit::{Commit, CreateCommit, SaveVersionWithCommit, SavedVersion};
use crate::models::scene_version::{CreateSceneVersion, SceneVersion};
use crate::repositories::{BranchRepo, CommitRepo, SceneVersionRepo};

/// Operations on commits.
pub struct CommitStore;

impl CommitStore {
    /// Group existing versions of one branch into a commit.
    ///
    /// Fails with `BadRequest` when the id list is empty or repeats an id,
    /// when any id does not exist, when the versions span branches, or when
    /// their branch differs from `branch_id` or lies outside `repo_id`.
    pub async fn create_commit(pool: &PgPool, input: &CreateCommit) -> StoreResult<Commit> {
        validate_commit_request(&input.scene_version_ids)?;
        let author = resolve_author(input.author.as_deref());

        let mut tx = pool.begin().await?;

        let resolved = SceneVersionRepo::lock_branches_for(&mut *tx, &input.scene_version_ids).await?;
        check_commit_members(&input.scene_version_ids, &resolved, input.branch_id)?;

        let branch = BranchRepo::find_by_id(&mut *tx, input.branch_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Branch", input.branch_id))?;
        if branch.repo_id != input.repo_id {
            return Err(CoreError::BadRequest(format!(
                "Branch {} does not belong to repository {}",
                branch.id, input.repo_id
            ))
            .into());
        }

        let commit = CommitRepo::create(&mut *tx, input.repo_id, input.branch_id, &input.message, &author)
            .await
            .map_err(classify_write_error)?;
        let items = CommitRepo::add_items(&mut *tx, commit.id, &input.scene_version_ids)
            .await
            .map_err(classify_write_error)?;

        tx.commit().await?;

        tracing::info!(
            commit_id = %commit.id,
            branch_id = %commit.branch_id,
            items,
            author = %commit.author,
            "Commit created"
        );
        Ok(commit)
    }

    /// Save a version and wrap it in a single-item commit atomically.
    ///
    /// The commit's repository is the branch's repository. Without a
    /// message one is derived from the content.
    pub async fn save_version_with_commit(
        pool: &PgPool,
        input: SaveVersionWithCommit,
    ) -> StoreResult<SavedVersion> {
        let message = resolve_commit_message(input.message.as_deref(), &input.content_html);
        let version_input = CreateSceneVersion {
            scene_id: input.scene_id,
            branch_id: input.branch_id,
            parent_version_id: input.parent_version_id,
            content_html: input.content_html,
            meta: normalize_meta(input.meta)?,
        };

        let mut tx = pool.begin().await?;

        let branch = check_version_refs(
            &mut *tx,
            version_input.scene_id,
            version_input.branch_id,
            version_input.parent_version_id,
        )
        .await?;
        let version = SceneVersionRepo::create(&mut *tx, &version_input)
            .await
            .map_err(classify_write_error)?;
        let commit = CommitRepo::create(&mut *tx, branch.repo_id, branch.id, &message, DEFAULT_AUTHOR)
            .await
            .map_err(classify_write_error)?;
        CommitRepo::add_items(&mut *tx, commit.id, &[version.id])
            .await
            .map_err(classify_write_error)?;

        tx.commit().await?;

        tracing::info!(
            version_id = %version.id,
            commit_id = %commit.id,
            branch_id = %branch.id,
            "Scene version saved with commit"
        );
        Ok(SavedVersion { version, commit })
    }

    /// List a branch's commits, newest first.
    pub async fn list_commits(pool: &PgPool, branch_id: DbId) -> StoreResult<Vec<Commit>> {
        let commits = CommitRepo::list_by_branch(pool, branch_id).await?;
        tracing::debug!(count = commits.len(), branch_id = %branch_id, "Listed commits");
        Ok(commits)
    }

    /// Fetch one commit.
    pub async fn get_commit(pool: &PgPool, id: DbId) -> StoreResult<Commit> {
        Ok(CommitRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Commit", id))?)
    }

    /// The versions a commit binds, newest first.
    pub async fn list_commit_versions(pool: &PgPool, id: DbId) -> StoreResult<Vec<SceneVersion>> {
        Self::get_commit(pool, id).await?;
        Ok(SceneVersionRepo::list_by_commit(pool, id).await?)
    }
}
