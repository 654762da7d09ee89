//! Handlers for the `/events` resource, including delivery confirmation.

use amparo_core::error::CoreError;
use amparo_core::event::{CreateEvent, DistributionEvent, UpdateEvent};
use amparo_core::types::RecordId;
use amparo_store::repositories::EventRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::auth::{MaybeSession, OrgSession};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: RecordId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "DistributionEvent",
        id: id.to_string(),
    })
}

/// Request body for `POST /events/{id}/deliveries`.
///
/// The console offers only beneficiaries of campaigns linked to the
/// event; that candidate list is where the precondition is enforced.
#[derive(Debug, Deserialize)]
pub struct ConfirmDelivery {
    pub family_id: RecordId,
    pub campaign_id: RecordId,
}

/// GET /api/v1/events
pub async fn list(
    session: MaybeSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DistributionEvent>>>> {
    let Some(ctx) = session.context() else {
        return Ok(Json(DataResponse { data: vec![] }));
    };
    let events = EventRepo::list(state.store.as_ref(), &ctx).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
pub async fn create(
    session: OrgSession,
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<DistributionEvent>>)> {
    input.validate()?;
    let created = EventRepo::create(state.store.as_ref(), &session.context(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    session: MaybeSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<DistributionEvent>>> {
    let Some(ctx) = session.context() else {
        return Err(not_found(id));
    };
    let event = EventRepo::get(state.store.as_ref(), &ctx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/events/{id}
///
/// Newly linked campaigns must be active and end by the event day.
pub async fn update(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<DataResponse<DistributionEvent>>> {
    input.validate()?;
    let updated = EventRepo::update(state.store.as_ref(), &session.context(), id, input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/events/{id}
pub async fn delete(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    let deleted = EventRepo::delete(state.store.as_ref(), &session.context(), id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/events/{id}/deliveries
///
/// Records the handout on the event (idempotent) and in the family's
/// history; a registration-review event also renews the registration.
pub async fn confirm_delivery(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(input): Json<ConfirmDelivery>,
) -> AppResult<Json<DataResponse<DistributionEvent>>> {
    let event = EventRepo::confirm_delivery(
        state.store.as_ref(),
        &session.context(),
        id,
        input.family_id,
        input.campaign_id,
        &session.operator,
        Utc::now(),
    )
    .await?;
    Ok(Json(DataResponse { data: event }))
}
