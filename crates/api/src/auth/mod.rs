//! Session extraction for Axum handlers.

pub mod jwt;

use std::convert::Infallible;

use amparo_core::error::CoreError;
use amparo_store::OrgContext;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Fallback author name when the token carries no operator name.
const DEFAULT_OPERATOR: &str = "Operator";

/// Authenticated session extracted from a JWT Bearer token in the
/// `Authorization` header. Use as an extractor parameter in any handler
/// that writes records; missing or invalid tokens reject with 401.
#[derive(Debug, Clone)]
pub struct OrgSession {
    /// The organization all store operations are scoped to.
    pub org_id: String,
    /// Operator display name, recorded as history-entry author.
    pub operator: String,
}

impl OrgSession {
    pub fn context(&self) -> OrgContext {
        OrgContext::new(self.org_id.clone())
    }
}

fn session_from_parts(parts: &Parts, state: &AppState) -> Result<OrgSession, AppError> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })?;

    let claims = jwt::validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(OrgSession {
        org_id: claims.sub,
        operator: claims.name.unwrap_or_else(|| DEFAULT_OPERATOR.to_string()),
    })
}

impl FromRequestParts<AppState> for OrgSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state)
    }
}

/// Optional session for read endpoints.
///
/// Unauthenticated reads degrade to an empty or default result rather
/// than rejecting, so the console can render before login completes.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<OrgSession>);

impl MaybeSession {
    /// The store context, when a session is present.
    pub fn context(&self) -> Option<OrgContext> {
        self.0.as_ref().map(OrgSession::context)
    }
}

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(session_from_parts(parts, state).ok()))
    }
}
