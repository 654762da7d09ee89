//! Handlers for the single `bank_info` document.

use amparo_core::bank::{self, BankInfo, UpdateBankInfo};
use amparo_store::repositories::BankRepo;
use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::auth::{MaybeSession, OrgSession};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/bank-info
///
/// Degrades to an empty record without a session.
pub async fn get(
    session: MaybeSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BankInfo>>> {
    let Some(ctx) = session.context() else {
        return Ok(Json(DataResponse {
            data: BankInfo::default(),
        }));
    };
    let info = BankRepo::get(state.store.as_ref(), &ctx).await?;
    Ok(Json(DataResponse { data: info }))
}

/// PUT /api/v1/bank-info
///
/// Replaces the whole document. Primary designations are normalized:
/// one primary account, at most one primary Pix key per account.
pub async fn put(
    session: OrgSession,
    State(state): State<AppState>,
    Json(input): Json<UpdateBankInfo>,
) -> AppResult<Json<DataResponse<BankInfo>>> {
    input.validate()?;
    bank::validate_pix_keys(&input)?;

    let info = BankInfo::from_update(input);
    BankRepo::save(state.store.as_ref(), &session.context(), &info).await?;
    Ok(Json(DataResponse { data: info }))
}
