//! Handler for the dashboard summary.

use amparo_core::dashboard::{self, DashboardSummary};
use amparo_core::settings::OrganizationSettings;
use amparo_store::repositories::{CampaignRepo, FamilyRepo, SettingsRepo};
use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::auth::MaybeSession;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/summary
///
/// Read-only aggregates over the current families and campaigns. The
/// underlying list fetches run their usual consistency checks, so the
/// numbers reflect post-sweep state. Without a session everything is
/// zero.
pub async fn summary(
    session: MaybeSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let now = Utc::now();

    let Some(ctx) = session.context() else {
        let empty = dashboard::summarize(&[], &[], &OrganizationSettings::default(), now);
        return Ok(Json(DataResponse { data: empty }));
    };

    let store = state.store.as_ref();
    let settings = SettingsRepo::get(store, &ctx).await?;
    let families = FamilyRepo::list(store, &ctx, now).await?;
    let campaigns = CampaignRepo::list(store, &ctx, now.date_naive()).await?;

    let summary = dashboard::summarize(&families, &campaigns, &settings, now);
    Ok(Json(DataResponse { data: summary }))
}
