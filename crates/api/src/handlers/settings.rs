//! Handlers for the single `settings` document.

use amparo_core::settings::{OrganizationSettings, UpdateSettings};
use amparo_store::repositories::SettingsRepo;
use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::auth::{MaybeSession, OrgSession};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
///
/// Degrades to the defaults without a session.
pub async fn get(
    session: MaybeSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<OrganizationSettings>>> {
    let Some(ctx) = session.context() else {
        return Ok(Json(DataResponse {
            data: OrganizationSettings::default(),
        }));
    };
    let settings = SettingsRepo::get(state.store.as_ref(), &ctx).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
pub async fn put(
    session: OrgSession,
    State(state): State<AppState>,
    Json(input): Json<UpdateSettings>,
) -> AppResult<Json<DataResponse<OrganizationSettings>>> {
    input.validate()?;

    let ctx = session.context();
    let mut settings = SettingsRepo::get(state.store.as_ref(), &ctx).await?;
    settings.apply_update(input);
    SettingsRepo::save(state.store.as_ref(), &ctx, &settings).await?;
    Ok(Json(DataResponse { data: settings }))
}
