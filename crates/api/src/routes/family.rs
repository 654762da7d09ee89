//! Route definitions for the `/families` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::family;
use crate::state::AppState;

/// Routes mounted at `/families`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/renew     -> renew
/// POST   /{id}/history   -> add_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(family::list).post(family::create))
        .route(
            "/{id}",
            get(family::get_by_id)
                .put(family::update)
                .delete(family::delete),
        )
        .route("/{id}/renew", post(family::renew))
        .route("/{id}/history", post(family::add_history))
}
