//! Handlers for the AI text-assist capabilities.
//!
//! Every response is a suggestion for the operator to review; nothing
//! here writes to the store. With no credential configured the
//! endpoints answer 503.

use amparo_assist::{FamilyDraft, SuggestedItem};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::auth::OrgSession;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /assist/campaign-description`.
#[derive(Debug, Deserialize, Validate)]
pub struct CampaignDescriptionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Request body for `POST /assist/package-items`.
#[derive(Debug, Deserialize, Validate)]
pub struct PackageItemsRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for `POST /assist/family-extract`.
#[derive(Debug, Deserialize, Validate)]
pub struct FamilyExtractRequest {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
}

/// POST /api/v1/assist/campaign-description
pub async fn campaign_description(
    _session: OrgSession,
    State(state): State<AppState>,
    Json(input): Json<CampaignDescriptionRequest>,
) -> AppResult<Json<DataResponse<String>>> {
    input.validate()?;
    let text = state
        .assist
        .campaign_description(&input.title, &input.kind, &input.items)
        .await?;
    Ok(Json(DataResponse { data: text }))
}

/// POST /api/v1/assist/package-items
pub async fn package_items(
    _session: OrgSession,
    State(state): State<AppState>,
    Json(input): Json<PackageItemsRequest>,
) -> AppResult<Json<DataResponse<Vec<SuggestedItem>>>> {
    input.validate()?;
    let items = state
        .assist
        .suggest_package_items(&input.name, &input.description)
        .await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/assist/family-extract
pub async fn family_extract(
    _session: OrgSession,
    State(state): State<AppState>,
    Json(input): Json<FamilyExtractRequest>,
) -> AppResult<Json<DataResponse<FamilyDraft>>> {
    input.validate()?;
    let draft = state.assist.extract_family(&input.text).await?;
    Ok(Json(DataResponse { data: draft }))
}
