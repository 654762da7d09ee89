//! Route definitions for the address lookup.

use axum::routing::get;
use axum::Router;

use crate::handlers::address;
use crate::state::AppState;

/// Routes mounted at `/address`.
///
/// ```text
/// GET /{postal_code}   -> lookup
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{postal_code}", get(address::lookup))
}
