//! Integration tests for scene versions and commits.
//!
//! - Save / latest / list / lineage of versions
//! - Commit creation and its all-or-nothing guarantee
//! - Save-with-commit and derived commit messages
//! - Branch deletion isolating other branches' history

use assert_matches::assert_matches;
use folio_core::error::CoreError;
use folio_core::story::NodeKind;
use folio_core::versioning::DEFAULT_AUTHOR;
use folio_db::models::commit::{CreateCommit, SaveVersionWithCommit};
use folio_db::models::scene_version::{CreateSceneVersion, SceneVersion};
use folio_db::models::story::{CreateScene, CreateStoryNode};
use folio_db::repositories::CommitRepo;
use folio_db::store::{
    BranchStore, CommitStore, HierarchyStore, RepositoryStore, StoreError, VersionStore,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    repo_id: Uuid,
    main_id: Uuid,
    scene_id: Uuid,
}

/// Repository with a `main` branch and one scene under a chapter.
async fn setup(pool: &PgPool) -> Fixture {
    let repo = RepositoryStore::create_repository(pool, "Saga").await.unwrap();
    let main = BranchStore::create_branch(pool, repo.id, "main").await.unwrap();
    let chapter = HierarchyStore::create_node(
        pool,
        &CreateStoryNode {
            repo_id: repo.id,
            kind: NodeKind::Chapter,
            title: "Chapter 1".to_string(),
            parent_id: None,
            order_idx: None,
        },
    )
    .await
    .unwrap();
    let scene = HierarchyStore::create_scene(
        pool,
        &CreateScene {
            node_id: chapter.id,
            title: "Opening".to_string(),
            order_idx: None,
        },
    )
    .await
    .unwrap();
    Fixture {
        repo_id: repo.id,
        main_id: main.id,
        scene_id: scene.id,
    }
}

async fn save(
    pool: &PgPool,
    scene_id: Uuid,
    branch_id: Uuid,
    parent: Option<Uuid>,
    html: &str,
) -> SceneVersion {
    VersionStore::save_version(
        pool,
        CreateSceneVersion {
            scene_id,
            branch_id,
            parent_version_id: parent,
            content_html: html.to_string(),
            meta: json!({}),
        },
    )
    .await
    .unwrap()
}

fn new_commit(f: &Fixture, ids: Vec<Uuid>) -> CreateCommit {
    CreateCommit {
        repo_id: f.repo_id,
        branch_id: f.main_id,
        message: "msg".to_string(),
        author: Some("You".to_string()),
        scene_version_ids: ids,
    }
}

async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_then_commit_scenario(pool: PgPool) {
    let f = setup(&pool).await;

    let v1 = save(&pool, f.scene_id, f.main_id, None, "<p>A</p>").await;
    let v2 = save(&pool, f.scene_id, f.main_id, Some(v1.id), "<p>B</p>").await;

    let latest = VersionStore::get_latest_version(&pool, f.scene_id, f.main_id)
        .await
        .unwrap();
    assert_eq!(latest.id, v2.id);

    let commit = CommitStore::create_commit(&pool, &new_commit(&f, vec![v1.id, v2.id]))
        .await
        .unwrap();
    assert_eq!(commit.author, "You");

    let commits = CommitStore::list_commits(&pool, f.main_id).await.unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].id, commit.id);

    let items = CommitRepo::list_items(&pool, commit.id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.commit_id == commit.id));

    let members = CommitStore::list_commit_versions(&pool, commit.id).await.unwrap();
    let mut ids: Vec<Uuid> = members.iter().map(|v| v.id).collect();
    ids.sort();
    let mut expected = vec![v1.id, v2.id];
    expected.sort();
    assert_eq!(ids, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_latest_without_versions_not_found(pool: PgPool) {
    let f = setup(&pool).await;
    let err = VersionStore::get_latest_version(&pool, f.scene_id, f.main_id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        StoreError::Core(CoreError::NotFound { entity: "SceneVersion", .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_version_checks_references(pool: PgPool) {
    let f = setup(&pool).await;
    let input = CreateSceneVersion {
        scene_id: f.scene_id,
        branch_id: f.main_id,
        parent_version_id: None,
        content_html: "<p>x</p>".to_string(),
        meta: json!({}),
    };

    let err = VersionStore::save_version(
        &pool,
        CreateSceneVersion {
            scene_id: Uuid::new_v4(),
            ..input.clone()
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "Scene", .. }));

    let err = VersionStore::save_version(
        &pool,
        CreateSceneVersion {
            branch_id: Uuid::new_v4(),
            ..input.clone()
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "Branch", .. }));

    let err = VersionStore::save_version(
        &pool,
        CreateSceneVersion {
            parent_version_id: Some(Uuid::new_v4()),
            ..input
        },
    )
    .await
    .unwrap_err();
    assert_matches!(
        err,
        StoreError::Core(CoreError::NotFound { entity: "SceneVersion", .. })
    );

    assert_eq!(count_rows(&pool, "scene_versions").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_meta_must_be_object(pool: PgPool) {
    let f = setup(&pool).await;
    let base = CreateSceneVersion {
        scene_id: f.scene_id,
        branch_id: f.main_id,
        parent_version_id: None,
        content_html: "<p>x</p>".to_string(),
        meta: serde_json::Value::Null,
    };

    let saved = VersionStore::save_version(&pool, base.clone()).await.unwrap();
    assert_eq!(saved.meta, json!({}));

    let err = VersionStore::save_version(
        &pool,
        CreateSceneVersion {
            meta: json!("happy"),
            ..base
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::BadRequest(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_versions_filters_by_branch(pool: PgPool) {
    let f = setup(&pool).await;
    let alt = BranchStore::create_branch(&pool, f.repo_id, "alt").await.unwrap();

    let m1 = save(&pool, f.scene_id, f.main_id, None, "<p>main 1</p>").await;
    let a1 = save(&pool, f.scene_id, alt.id, Some(m1.id), "<p>alt 1</p>").await;
    let m2 = save(&pool, f.scene_id, f.main_id, Some(m1.id), "<p>main 2</p>").await;

    let all = VersionStore::list_versions(&pool, f.scene_id, None).await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![m2.id, a1.id, m1.id]);

    let main_only = VersionStore::list_versions(&pool, f.scene_id, Some(f.main_id))
        .await
        .unwrap();
    let ids: Vec<Uuid> = main_only.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![m2.id, m1.id]);

    let latest_alt = VersionStore::get_latest_version(&pool, f.scene_id, alt.id)
        .await
        .unwrap();
    assert_eq!(latest_alt.id, a1.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lineage_follows_parents_across_branches(pool: PgPool) {
    let f = setup(&pool).await;
    let alt = BranchStore::create_branch(&pool, f.repo_id, "alt").await.unwrap();

    let v1 = save(&pool, f.scene_id, f.main_id, None, "<p>1</p>").await;
    let v2 = save(&pool, f.scene_id, f.main_id, Some(v1.id), "<p>2</p>").await;
    let v3 = save(&pool, f.scene_id, alt.id, Some(v2.id), "<p>3</p>").await;

    let chain = VersionStore::version_lineage(&pool, v3.id).await.unwrap();
    let ids: Vec<Uuid> = chain.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![v3.id, v2.id, v1.id]);

    let err = VersionStore::version_lineage(&pool, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sentiment_series_defaults_to_zero(pool: PgPool) {
    let f = setup(&pool).await;
    let scored = VersionStore::save_version(
        &pool,
        CreateSceneVersion {
            scene_id: f.scene_id,
            branch_id: f.main_id,
            parent_version_id: None,
            content_html: "<p>Joy</p>".to_string(),
            meta: json!({"sentiment": 0.75}),
        },
    )
    .await
    .unwrap();
    let unscored = save(&pool, f.scene_id, f.main_id, Some(scored.id), "<p>Flat</p>").await;

    let series = VersionStore::sentiment_series(&pool, f.scene_id, f.main_id)
        .await
        .unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].version_id, scored.id);
    assert_eq!(series[0].score, 0.75);
    assert_eq!(series[1].version_id, unscored.id);
    assert_eq!(series[1].score, 0.0);
}

// ---------------------------------------------------------------------------
// Commits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commit_with_missing_version_writes_nothing(pool: PgPool) {
    let f = setup(&pool).await;
    let v1 = save(&pool, f.scene_id, f.main_id, None, "<p>A</p>").await;

    let err = CommitStore::create_commit(&pool, &new_commit(&f, vec![v1.id, Uuid::new_v4()]))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::BadRequest(ref msg)) if msg.contains("not found"));

    assert_eq!(count_rows(&pool, "commits").await, 0);
    assert_eq!(count_rows(&pool, "commit_items").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commit_across_branches_rejected(pool: PgPool) {
    let f = setup(&pool).await;
    let alt = BranchStore::create_branch(&pool, f.repo_id, "alt").await.unwrap();
    let on_main = save(&pool, f.scene_id, f.main_id, None, "<p>main</p>").await;
    let on_alt = save(&pool, f.scene_id, alt.id, None, "<p>alt</p>").await;

    let err = CommitStore::create_commit(&pool, &new_commit(&f, vec![on_main.id, on_alt.id]))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::BadRequest(ref msg)) if msg.contains("same branch"));

    assert_eq!(count_rows(&pool, "commits").await, 0);
    assert_eq!(count_rows(&pool, "commit_items").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commit_branch_mismatch_rejected(pool: PgPool) {
    let f = setup(&pool).await;
    let alt = BranchStore::create_branch(&pool, f.repo_id, "alt").await.unwrap();
    let on_alt = save(&pool, f.scene_id, alt.id, None, "<p>alt</p>").await;

    let err = CommitStore::create_commit(&pool, &new_commit(&f, vec![on_alt.id]))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::BadRequest(ref msg)) if msg.contains("mismatch"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commit_request_validation(pool: PgPool) {
    let f = setup(&pool).await;
    let v1 = save(&pool, f.scene_id, f.main_id, None, "<p>A</p>").await;

    let empty = CommitStore::create_commit(&pool, &new_commit(&f, vec![])).await;
    assert_matches!(empty, Err(StoreError::Core(CoreError::BadRequest(_))));

    let dup = CommitStore::create_commit(&pool, &new_commit(&f, vec![v1.id, v1.id])).await;
    assert_matches!(dup, Err(StoreError::Core(CoreError::BadRequest(_))));

    let other = RepositoryStore::create_repository(&pool, "Other").await.unwrap();
    let wrong_repo = CommitStore::create_commit(
        &pool,
        &CreateCommit {
            repo_id: other.id,
            ..new_commit(&f, vec![v1.id])
        },
    )
    .await;
    assert_matches!(wrong_repo, Err(StoreError::Core(CoreError::BadRequest(_))));

    let no_author = CommitStore::create_commit(
        &pool,
        &CreateCommit {
            author: None,
            ..new_commit(&f, vec![v1.id])
        },
    )
    .await
    .unwrap();
    assert_eq!(no_author.author, DEFAULT_AUTHOR);

    let empty_message = CommitStore::create_commit(
        &pool,
        &CreateCommit {
            message: String::new(),
            ..new_commit(&f, vec![v1.id])
        },
    )
    .await
    .unwrap();
    assert_eq!(empty_message.message, "");
    assert_eq!(count_rows(&pool, "commits").await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_version_with_commit(pool: PgPool) {
    let f = setup(&pool).await;
    let long_text = "word ".repeat(40);

    let saved = CommitStore::save_version_with_commit(
        &pool,
        SaveVersionWithCommit {
            scene_id: f.scene_id,
            branch_id: f.main_id,
            parent_version_id: None,
            content_html: format!("<p>{long_text}</p>"),
            meta: json!({}),
            message: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(saved.commit.repo_id, f.repo_id);
    assert_eq!(saved.commit.branch_id, f.main_id);
    assert_eq!(saved.commit.author, DEFAULT_AUTHOR);
    assert!(saved.commit.message.ends_with('…'));
    assert_eq!(saved.commit.message.chars().count(), 91);

    let members = CommitStore::list_commit_versions(&pool, saved.commit.id)
        .await
        .unwrap();
    assert_eq!(members, vec![saved.version.clone()]);

    let explicit = CommitStore::save_version_with_commit(
        &pool,
        SaveVersionWithCommit {
            scene_id: f.scene_id,
            branch_id: f.main_id,
            parent_version_id: Some(saved.version.id),
            content_html: "<p>Short</p>".to_string(),
            meta: json!({}),
            message: Some("Tighten opening".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(explicit.commit.message, "Tighten opening");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_version_with_commit_is_atomic(pool: PgPool) {
    let f = setup(&pool).await;

    let err = CommitStore::save_version_with_commit(
        &pool,
        SaveVersionWithCommit {
            scene_id: f.scene_id,
            branch_id: f.main_id,
            parent_version_id: Some(Uuid::new_v4()),
            content_html: "<p>x</p>".to_string(),
            meta: json!({}),
            message: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));

    assert_eq!(count_rows(&pool, "scene_versions").await, 0);
    assert_eq!(count_rows(&pool, "commits").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_unknown_commit_not_found(pool: PgPool) {
    let err = CommitStore::get_commit(&pool, Uuid::new_v4()).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "Commit", .. }));

    let err = CommitStore::list_commit_versions(&pool, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Scene deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_scene_removes_versions_and_items(pool: PgPool) {
    let f = setup(&pool).await;
    let scene = HierarchyStore::get_scene(&pool, f.scene_id).await.unwrap();
    let sibling = HierarchyStore::create_scene(
        &pool,
        &CreateScene {
            node_id: scene.node_id,
            title: "Sibling".to_string(),
            order_idx: None,
        },
    )
    .await
    .unwrap();

    let v1 = save(&pool, f.scene_id, f.main_id, None, "<p>A</p>").await;
    let v2 = save(&pool, f.scene_id, f.main_id, Some(v1.id), "<p>B</p>").await;
    let kept = save(&pool, sibling.id, f.main_id, None, "<p>Other</p>").await;
    let commit = CommitStore::create_commit(&pool, &new_commit(&f, vec![v1.id, v2.id]))
        .await
        .unwrap();
    let kept_commit = CommitStore::create_commit(&pool, &new_commit(&f, vec![kept.id]))
        .await
        .unwrap();

    HierarchyStore::delete_scene(&pool, f.scene_id).await.unwrap();

    let remaining = VersionStore::list_versions(&pool, f.scene_id, None).await.unwrap();
    assert!(remaining.is_empty());
    assert!(CommitRepo::list_items(&pool, commit.id).await.unwrap().is_empty());
    assert_eq!(count_rows(&pool, "scene_versions").await, 1);
    assert_eq!(count_rows(&pool, "commit_items").await, 1);

    VersionStore::get_version(&pool, kept.id).await.unwrap();
    let kept_items = CommitRepo::list_items(&pool, kept_commit.id).await.unwrap();
    assert_eq!(kept_items.len(), 1);

    let err = HierarchyStore::delete_scene(&pool, f.scene_id).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "Scene", .. }));
}

// ---------------------------------------------------------------------------
// Branch deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_branch_leaves_other_branches_intact(pool: PgPool) {
    let f = setup(&pool).await;
    let alt = BranchStore::create_branch(&pool, f.repo_id, "alt").await.unwrap();

    let m1 = save(&pool, f.scene_id, f.main_id, None, "<p>main</p>").await;
    let a1 = save(&pool, f.scene_id, alt.id, Some(m1.id), "<p>alt</p>").await;
    CommitStore::create_commit(&pool, &new_commit(&f, vec![m1.id]))
        .await
        .unwrap();
    let alt_commit = CommitStore::create_commit(
        &pool,
        &CreateCommit {
            branch_id: alt.id,
            ..new_commit(&f, vec![a1.id])
        },
    )
    .await
    .unwrap();

    BranchStore::delete_branch(&pool, f.main_id).await.unwrap();

    assert_eq!(count_rows(&pool, "commits").await, 1);
    assert_eq!(count_rows(&pool, "commit_items").await, 1);
    assert_matches!(
        VersionStore::get_version(&pool, m1.id).await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );

    let surviving = VersionStore::get_version(&pool, a1.id).await.unwrap();
    assert_eq!(surviving.parent_version_id, None, "parent pointer is cleared");
    let commits = CommitStore::list_commits(&pool, alt.id).await.unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].id, alt_commit.id);
}
