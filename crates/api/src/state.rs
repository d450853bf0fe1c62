use std::sync::Arc;

use folio_core::collaborators::InferenceConfig;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Settings handed to sentiment and extraction collaborators.
    pub inference: Arc<InferenceConfig>,
}
