//! Handlers for the `/campaigns` resource.

use amparo_core::campaign::{Campaign, CreateCampaign, UpdateCampaign};
use amparo_core::error::CoreError;
use amparo_core::types::RecordId;
use amparo_store::repositories::CampaignRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use validator::Validate;

use crate::auth::{MaybeSession, OrgSession};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: RecordId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Campaign",
        id: id.to_string(),
    })
}

/// GET /api/v1/campaigns
///
/// Campaigns past their end date are deactivated before returning.
pub async fn list(
    session: MaybeSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    let Some(ctx) = session.context() else {
        return Ok(Json(DataResponse { data: vec![] }));
    };
    let campaigns =
        CampaignRepo::list(state.store.as_ref(), &ctx, Utc::now().date_naive()).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// POST /api/v1/campaigns
///
/// Item targets are recomputed from the selected packages and families.
pub async fn create(
    session: OrgSession,
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<DataResponse<Campaign>>)> {
    input.validate()?;
    let created = CampaignRepo::create(
        state.store.as_ref(),
        &session.context(),
        input,
        Utc::now().date_naive(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    session: MaybeSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let Some(ctx) = session.context() else {
        return Err(not_found(id));
    };
    let campaign = CampaignRepo::get(state.store.as_ref(), &ctx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/campaigns/{id}
pub async fn update(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    input.validate()?;
    let updated = CampaignRepo::update(state.store.as_ref(), &session.context(), id, input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/campaigns/{id}
pub async fn delete(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    let deleted = CampaignRepo::delete(state.store.as_ref(), &session.context(), id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/campaigns/{id}/toggle
///
/// Flips `is_active`. A finished campaign stays inactive; the record
/// comes back unchanged in that case.
pub async fn toggle(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let campaign = CampaignRepo::toggle_active(
        state.store.as_ref(),
        &session.context(),
        id,
        Utc::now().date_naive(),
    )
    .await?
    .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: campaign }))
}
