//! Scene version operations.
//!
//! Saving validates the scene, branch and optional parent, then inserts one
//! immutable row. The parent is only required to exist: it may belong to
//! another scene or branch, which lets lineage cross branches.

use folio_core::collaborators::sentiment_score;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_core::versioning::normalize_meta;
use sqlx::{PgConnection, PgPool};

use super::{classify_write_error, StoreResult};
use crate::models::branch::Branch;
use crate::models::scene_version::{CreateSceneVersion, SceneVersion, SentimentPoint};
use crate::repositories::{BranchRepo, SceneRepo, SceneVersionRepo};

/// Check that the scene, branch and parent a new version refers to exist.
///
/// Runs on the caller's connection so it can share a transaction with the
/// insert. Returns the branch.
pub(crate) async fn check_version_refs(
    conn: &mut PgConnection,
    scene_id: DbId,
    branch_id: DbId,
    parent_version_id: Option<DbId>,
) -> StoreResult<Branch> {
    if SceneRepo::find_by_id(&mut *conn, scene_id).await?.is_none() {
        return Err(CoreError::not_found("Scene", scene_id).into());
    }

    let branch = BranchRepo::find_by_id(&mut *conn, branch_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Branch", branch_id))?;

    if let Some(parent_id) = parent_version_id {
        if SceneVersionRepo::find_by_id(&mut *conn, parent_id).await?.is_none() {
            return Err(CoreError::not_found("SceneVersion", parent_id).into());
        }
    }

    Ok(branch)
}

/// Operations on scene versions.
pub struct VersionStore;

impl VersionStore {
    /// Save a new immutable version of a scene on a branch.
    pub async fn save_version(pool: &PgPool, input: CreateSceneVersion) -> StoreResult<SceneVersion> {
        let input = CreateSceneVersion {
            meta: normalize_meta(input.meta)?,
            ..input
        };

        let mut tx = pool.begin().await?;
        check_version_refs(&mut *tx, input.scene_id, input.branch_id, input.parent_version_id)
            .await?;
        let version = SceneVersionRepo::create(&mut *tx, &input)
            .await
            .map_err(classify_write_error)?;
        tx.commit().await?;

        tracing::info!(
            version_id = %version.id,
            scene_id = %version.scene_id,
            branch_id = %version.branch_id,
            parent_version_id = ?version.parent_version_id,
            "Scene version saved"
        );
        Ok(version)
    }

    /// List a scene's versions newest first, across all branches unless one
    /// is given.
    pub async fn list_versions(
        pool: &PgPool,
        scene_id: DbId,
        branch_id: Option<DbId>,
    ) -> StoreResult<Vec<SceneVersion>> {
        let versions = SceneVersionRepo::list_by_scene(pool, scene_id, branch_id).await?;
        tracing::debug!(
            count = versions.len(),
            scene_id = %scene_id,
            branch_id = ?branch_id,
            "Listed scene versions"
        );
        Ok(versions)
    }

    /// The newest version of a scene on a branch.
    ///
    /// This is derived from `created_at` on every call, not a stored head
    /// pointer. Fails with `NotFound` when the branch has no version of the
    /// scene yet.
    pub async fn get_latest_version(
        pool: &PgPool,
        scene_id: DbId,
        branch_id: DbId,
    ) -> StoreResult<SceneVersion> {
        Ok(SceneVersionRepo::find_latest(pool, scene_id, branch_id)
            .await?
            .ok_or_else(|| CoreError::not_found("SceneVersion", scene_id))?)
    }

    /// Fetch one version.
    pub async fn get_version(pool: &PgPool, id: DbId) -> StoreResult<SceneVersion> {
        Ok(SceneVersionRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("SceneVersion", id))?)
    }

    /// Walk parent pointers from a version back to its root, newest first.
    pub async fn version_lineage(pool: &PgPool, id: DbId) -> StoreResult<Vec<SceneVersion>> {
        let chain = SceneVersionRepo::list_version_chain(pool, id).await?;
        if chain.is_empty() {
            return Err(CoreError::not_found("SceneVersion", id).into());
        }
        Ok(chain)
    }

    /// Sentiment scores of a scene's versions on a branch, oldest first.
    /// Versions without a numeric `meta.sentiment` score `0.0`.
    pub async fn sentiment_series(
        pool: &PgPool,
        scene_id: DbId,
        branch_id: DbId,
    ) -> StoreResult<Vec<SentimentPoint>> {
        let versions = SceneVersionRepo::list_chronological(pool, scene_id, branch_id).await?;
        Ok(versions
            .into_iter()
            .map(|v| SentimentPoint {
                version_id: v.id,
                score: sentiment_score(&v.meta),
                created_at: v.created_at,
            })
            .collect())
    }
}
