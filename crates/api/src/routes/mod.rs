pub mod address;
pub mod assist;
pub mod bank;
pub mod campaign;
pub mod dashboard;
pub mod event;
pub mod family;
pub mod health;
pub mod location;
pub mod package;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /families                      list, create
/// /families/{id}                 get, update, delete
/// /families/{id}/renew           force-renew registration (POST)
/// /families/{id}/history         append history entry (POST)
///
/// /campaigns                     list, create
/// /campaigns/{id}                get, update, delete
/// /campaigns/{id}/toggle         manual activity toggle (POST)
///
/// /packages                      list, create
/// /packages/{id}                 get, update, delete
///
/// /events                        list, create
/// /events/{id}                   get, update, delete
/// /events/{id}/deliveries        confirm delivery (POST)
///
/// /locations                     list, create
/// /locations/{id}                get, update, delete
///
/// /bank-info                     get, replace (GET, PUT)
/// /settings                      get, update (GET, PUT)
///
/// /dashboard/summary             read-only aggregates (GET)
///
/// /assist/campaign-description   text suggestion (POST)
/// /assist/package-items          item-list suggestion (POST)
/// /assist/family-extract         free-text extraction (POST)
///
/// /address/{postal_code}         address prefill lookup (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/families", family::router())
        .nest("/campaigns", campaign::router())
        .nest("/packages", package::router())
        .nest("/events", event::router())
        .nest("/locations", location::router())
        .nest("/bank-info", bank::router())
        .nest("/settings", settings::router())
        .nest("/dashboard", dashboard::router())
        .nest("/assist", assist::router())
        .nest("/address", address::router())
}
