//! Top-level router assembly.

use axum::Router;

use crate::routes;
use crate::state::AppState;

/// Build the application router: health check at root level, the API
/// under `/api/v1`. Middleware layers are applied by the binary so
/// tests can drive the bare router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .with_state(state)
}
