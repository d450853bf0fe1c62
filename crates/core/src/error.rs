use crate::types::DbId;

/// Domain-level failures shared by every store.
///
/// All variants except `Internal` are definitive rejections of a request:
/// they are raised before any mutating statement runs.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }
}
