use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_core::collaborators::InferenceConfig;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        database_max_connections: 5,
        request_timeout_secs: 30,
    }
}

/// Build the application router around the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        inference: Arc::new(InferenceConfig::default()),
    };
    build_app_router(state)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
