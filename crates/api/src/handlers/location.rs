//! Handlers for the `/locations` resource.

use amparo_core::error::CoreError;
use amparo_core::location::{CreateLocation, OrganizationLocation, UpdateLocation};
use amparo_core::types::RecordId;
use amparo_store::repositories::LocationRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::auth::{MaybeSession, OrgSession};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: RecordId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "OrganizationLocation",
        id: id.to_string(),
    })
}

/// GET /api/v1/locations
pub async fn list(
    session: MaybeSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<OrganizationLocation>>>> {
    let Some(ctx) = session.context() else {
        return Ok(Json(DataResponse { data: vec![] }));
    };
    let locations = LocationRepo::list(state.store.as_ref(), &ctx).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// POST /api/v1/locations
pub async fn create(
    session: OrgSession,
    State(state): State<AppState>,
    Json(input): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<DataResponse<OrganizationLocation>>)> {
    input.validate()?;
    let created = LocationRepo::create(state.store.as_ref(), &session.context(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/locations/{id}
pub async fn get_by_id(
    session: MaybeSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<OrganizationLocation>>> {
    let Some(ctx) = session.context() else {
        return Err(not_found(id));
    };
    let location = LocationRepo::get(state.store.as_ref(), &ctx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: location }))
}

/// PUT /api/v1/locations/{id}
pub async fn update(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(input): Json<UpdateLocation>,
) -> AppResult<Json<DataResponse<OrganizationLocation>>> {
    input.validate()?;
    let updated = LocationRepo::update(state.store.as_ref(), &session.context(), id, input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/locations/{id}
pub async fn delete(
    session: OrgSession,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    let deleted = LocationRepo::delete(state.store.as_ref(), &session.context(), id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
