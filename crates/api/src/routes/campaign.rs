//! Route definitions for the `/campaigns` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaign;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/toggle    -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaign::list).post(campaign::create))
        .route(
            "/{id}",
            get(campaign::get_by_id)
                .put(campaign::update)
                .delete(campaign::delete),
        )
        .route("/{id}/toggle", post(campaign::toggle))
}
