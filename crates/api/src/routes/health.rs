//! Liveness check for the Folio service.
//!
//! The only HTTP route: version store operations are library calls on
//! `folio_db::store`, so this reports whether the pool can reach Postgres.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when Postgres answers, `degraded` otherwise.
    pub status: &'static str,
    /// `folio-api` package version.
    pub version: &'static str,
    pub db_healthy: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match folio_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Version store database unreachable");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Routes mounted at the root of the Folio router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
