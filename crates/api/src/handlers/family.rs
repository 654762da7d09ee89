//! Handlers for the `/families` resource.

use amparo_core::error::CoreError;
use amparo_core::family::{self, AddHistoryEntry, CreateFamily, Family, UpdateFamily};
use amparo_core::types::RecordId;
use amparo_store::repositories::FamilyRepo;
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
        entity: "Family",
        id: id.to_string(),
    })
}

/// GET /api/v1/families
///
/// Runs the registration-expiration check before returning. Without a
/// session the list degrades to empty.
pub async fn list(
    session: MaybeSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Family>>>> {
    let Some(ctx) = session.context() else {
        return Ok(Json(DataResponse { data: vec![] }));
    };
    let families = FamilyRepo::list(state.store.as_ref(), &ctx, Utc::now()).await?;
    Ok(Json(DataResponse { data: families }))
}

/// POST /api/v1/families
pub async fn create(
    session: OrgSession,
    State(state): State<AppState>,
    Json(input): Json<CreateFamily>,
) -> AppResult<(StatusCode, Json<DataResponse<Family>>)> {
    input.validate()?;
    family::validate_documents(input.cpf.as_deref(), input.nis.as_deref())?;

    let created = FamilyRepo::create(
        state.store.as_ref(),
        &session.context(),
        input,
        &session.operator,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/families/{id}
pub async fn get_by_id(
    session: MaybeSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<Family>>> {
    let Some(ctx) = session.context() else {
        return Err(not_found(id));
    };
    let family = FamilyRepo::get(state.store.as_ref(), &ctx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: family }))
}

/// PUT /api/v1/families/{id}
pub async fn update(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(input): Json<UpdateFamily>,
) -> AppResult<Json<DataResponse<Family>>> {
    input.validate()?;
    family::validate_documents(input.cpf.as_deref(), input.nis.as_deref())?;

    let updated = FamilyRepo::update(
        state.store.as_ref(),
        &session.context(),
        id,
        input,
        &session.operator,
        Utc::now(),
    )
    .await?
    .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/families/{id}
pub async fn delete(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    let deleted = FamilyRepo::delete(state.store.as_ref(), &session.context(), id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/families/{id}/renew
///
/// Force-renews the registration, reactivating a suspended family.
pub async fn renew(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<Family>>> {
    let renewed = FamilyRepo::renew(
        state.store.as_ref(),
        &session.context(),
        id,
        &session.operator,
        Utc::now(),
    )
    .await?
    .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: renewed }))
}

/// POST /api/v1/families/{id}/history
///
/// Appends a manual history entry (incident, visit, note).
pub async fn add_history(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(input): Json<AddHistoryEntry>,
) -> AppResult<Json<DataResponse<Family>>> {
    input.validate()?;
    let updated = FamilyRepo::add_history(
        state.store.as_ref(),
        &session.context(),
        id,
        input,
        &session.operator,
        Utc::now(),
    )
    .await?
    .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: updated }))
}
