//! End-to-end route tests against the in-memory record store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use amparo_api::address::PostalClient;
use amparo_api::auth::jwt::{generate_access_token, JwtConfig};
use amparo_api::config::ServerConfig;
use amparo_api::router::app;
use amparo_api::state::AppState;
use amparo_assist::AssistClient;
use amparo_store::MemStore;

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

fn test_app() -> (Router, String) {
    let config = test_config();
    let token = generate_access_token("org-test", Some("Maria"), &config.jwt)
        .expect("token generation should succeed");

    let state = AppState {
        store: Arc::new(MemStore::new()),
        config: Arc::new(config),
        assist: Arc::new(AssistClient::disabled()),
        postal: Arc::new(PostalClient::from_env()),
    };
    (app(state), token)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

#[tokio::test]
async fn health_answers_ok() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unauthenticated_reads_degrade_to_empty() {
    let (app, _) = test_app();

    let (status, body) = send(&app, "GET", "/api/v1/families", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(&app, "GET", "/api/v1/settings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["validity_months"], 12);

    let (status, body) = send(&app, "GET", "/api/v1/dashboard/summary", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active_families"], 0);
}

#[tokio::test]
async fn unauthenticated_writes_are_rejected() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/families",
        None,
        Some(json!({ "name": "Silva" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn family_crud_round_trip() {
    let (app, token) = test_app();
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/families",
        token,
        Some(json!({
            "name": "Silva",
            "cpf": "529.982.247-25",
            "children": [{ "name": "Ana" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["history"][0]["kind"], "registration");
    assert_eq!(body["data"]["history"][0]["author"], "Maria");

    let (status, body) = send(&app, "GET", "/api/v1/families", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/families/{id}"),
        token,
        Some(json!({ "phone": "+55 11 91234-5678" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], "+55 11 91234-5678");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/families/{id}/renew"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/families/{id}"), token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/v1/families/{id}"), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_cpf_is_rejected_before_any_write() {
    let (app, token) = test_app();
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/families",
        token,
        Some(json!({ "name": "Silva", "cpf": "12345678901" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, body) = send(&app, "GET", "/api/v1/families", token, None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn campaign_targets_follow_package_and_family_selection() {
    let (app, token) = test_app();
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/packages",
        token,
        Some(json!({
            "name": "Basic Basket",
            "items": [{ "name": "Rice", "quantity": 5.0, "unit": "kg" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let package_id = body["data"]["id"].as_str().unwrap().to_string();

    let family_a = uuid::Uuid::new_v4();
    let family_b = uuid::Uuid::new_v4();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/campaigns",
        token,
        Some(json!({
            "title": "Winter drive",
            "kind": "food",
            "start_date": today(),
            "end_date": today(),
            "package_ids": [package_id],
            "beneficiary_family_ids": [family_a, family_b]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let campaign_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["items"][0]["name"], "Rice");
    assert_eq!(body["data"]["items"][0]["target_quantity"], 10.0);

    // Dropping one family halves the target; collected survives.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/campaigns/{campaign_id}"),
        token,
        Some(json!({ "beneficiary_family_ids": [family_a] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["target_quantity"], 5.0);
    assert_eq!(body["data"]["items"][0]["collected_quantity"], 0.0);
}

#[tokio::test]
async fn campaign_with_window_already_closed_is_rejected() {
    let (app, token) = test_app();
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/campaigns",
        token,
        Some(json!({
            "title": "Late",
            "kind": "food",
            "start_date": "2020-01-01",
            "end_date": "2020-02-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delivery_confirmation_is_idempotent_on_the_event() {
    let (app, token) = test_app();
    let token = Some(token.as_str());

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/families",
        token,
        Some(json!({ "name": "Silva" })),
    )
    .await;
    let family_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/campaigns",
        token,
        Some(json!({
            "title": "Basic Basket",
            "kind": "food",
            "start_date": today(),
            "end_date": today(),
            "beneficiary_family_ids": [family_id]
        })),
    )
    .await;
    let campaign_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/events",
        token,
        Some(json!({
            "title": "Handout",
            "date": today(),
            "is_delivery_event": true,
            "linked_campaign_ids": [campaign_id]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    let delivery = json!({ "family_id": family_id, "campaign_id": campaign_id });
    let uri = format!("/api/v1/events/{event_id}/deliveries");
    let (status, _) = send(&app, "POST", &uri, token, Some(delivery.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", &uri, token, Some(delivery)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["delivered_family_ids"].as_array().unwrap().len(), 1);

    // The family history now records the delivery.
    let (_, body) = send(&app, "GET", &format!("/api/v1/families/{family_id}"), token, None).await;
    assert_eq!(body["data"]["history"][0]["kind"], "delivery");
}

#[tokio::test]
async fn bank_info_primaries_are_normalized() {
    let (app, token) = test_app();
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/bank-info",
        token,
        Some(json!({
            "accounts": [
                { "bank_name": "Banco A", "branch": "0001", "account_number": "111-1" },
                { "bank_name": "Banco B", "branch": "0002", "account_number": "222-2" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accounts"][0]["is_primary"], true);
    assert_eq!(body["data"]["accounts"][1]["is_primary"], false);
}

#[tokio::test]
async fn assist_without_credential_answers_unavailable() {
    let (app, token) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/assist/campaign-description",
        Some(token.as_str()),
        Some(json!({ "title": "Winter drive", "kind": "clothing" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "ASSIST_UNAVAILABLE");
}

#[tokio::test]
async fn malformed_postal_code_is_rejected_locally() {
    let (app, token) = test_app();
    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/address/12ab",
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_POSTAL_CODE");
}

#[tokio::test]
async fn settings_update_round_trip() {
    let (app, token) = test_app();
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/settings",
        token,
        Some(json!({ "organization_name": "Casa Amparo", "validity_months": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["validity_months"], 6);

    let (_, body) = send(&app, "GET", "/api/v1/settings", token, None).await;
    assert_eq!(body["data"]["organization_name"], "Casa Amparo");
    assert_eq!(body["data"]["visit_interval_months"], 3);
}
