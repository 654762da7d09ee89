//! Route definitions for the `/packages` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::package;
use crate::state::AppState;

/// Routes mounted at `/packages`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(package::list).post(package::create))
        .route(
            "/{id}",
            get(package::get_by_id)
                .put(package::update)
                .delete(package::delete),
        )
}
