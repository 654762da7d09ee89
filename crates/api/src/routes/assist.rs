//! Route definitions for the AI text-assist endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::assist;
use crate::state::AppState;

/// Routes mounted at `/assist`.
///
/// ```text
/// POST /campaign-description   -> campaign_description
/// POST /package-items          -> package_items
/// POST /family-extract         -> family_extract
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campaign-description", post(assist::campaign_description))
        .route("/package-items", post(assist::package_items))
        .route("/family-extract", post(assist::family_extract))
}
