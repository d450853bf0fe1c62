//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async SQL methods.
//! Methods that the store layer also runs inside a transaction accept any
//! `PgExecutor` (a `&PgPool` or `&mut *tx`); the rest take `&PgPool`.

pub mod branch_repo;
pub mod commit_repo;
pub mod pull_request_repo;
pub mod repository_repo;
pub mod scene_repo;
pub mod scene_version_repo;
pub mod story_node_repo;

pub use branch_repo::BranchRepo;
pub use commit_repo::CommitRepo;
pub use pull_request_repo::PullRequestRepo;
pub use repository_repo::RepositoryRepo;
pub use scene_repo::SceneRepo;
pub use scene_version_repo::SceneVersionRepo;
pub use story_node_repo::StoryNodeRepo;
