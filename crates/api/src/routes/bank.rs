//! Route definitions for the `/bank-info` document.

use axum::routing::get;
use axum::Router;

use crate::handlers::bank;
use crate::state::AppState;

/// Routes mounted at `/bank-info`.
///
/// ```text
/// GET /   -> get
/// PUT /   -> put (full replace)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(bank::get).put(bank::put))
}
