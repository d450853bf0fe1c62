//! Invariant-checking layer over the repositories.
//!
//! Every operation validates its preconditions and reports failures as
//! [`CoreError`] variants before the first mutating statement. Multi-row
//! writes run inside one `sqlx` transaction; a failed precondition drops
//! the transaction, which rolls it back.

use folio_core::error::CoreError;

pub mod commit;
pub mod hierarchy;
pub mod pull_request;
pub mod repository;
pub mod version;

pub use commit::CommitStore;
pub use hierarchy::HierarchyStore;
pub use pull_request::PullRequestStore;
pub use repository::{BranchStore, RepositoryStore};
pub use version::VersionStore;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Error returned by every store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain-level rejection from `folio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An unexpected database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for store return values.
pub type StoreResult<T> = Result<T, StoreError>;

/// Classify a sqlx error raised by a write.
///
/// Unique violations on constraints named `uq_*` become `Conflict`; anything
/// else stays a database error and is logged.
pub(crate) fn classify_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return StoreError::Core(CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                )));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Database(err)
}
