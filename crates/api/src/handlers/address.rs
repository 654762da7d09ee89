//! Handler for the postal-code address lookup.

use axum::extract::{Path, State};
use axum::Json;

use crate::address::AddressInfo;
use crate::auth::OrgSession;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/address/{postal_code}
///
/// Resolves an 8-digit postal code to street/neighborhood/city/state
/// for form prefill. Unknown codes answer 404, malformed ones 400.
pub async fn lookup(
    _session: OrgSession,
    State(state): State<AppState>,
    Path(postal_code): Path<String>,
) -> AppResult<Json<DataResponse<AddressInfo>>> {
    let info = state.postal.lookup(&postal_code).await?;
    Ok(Json(DataResponse { data: info }))
}
