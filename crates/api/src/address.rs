//! Postal-code address lookup (ViaCEP-compatible).
//!
//! Consumed on field blur in the console to prefill address sub-fields.
//! A not-found postal code is an explicit signal, not a transport error.

use amparo_core::document;
use serde::Serialize;

/// Default lookup endpoint.
const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

/// Address fields returned for a postal code.
#[derive(Debug, Clone, Serialize)]
pub struct AddressInfo {
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Errors from the address-lookup layer.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The input is not an 8-digit postal code; rejected before any request.
    #[error("Invalid postal code: {0}")]
    InvalidCode(String),

    /// The service knows no address for this code.
    #[error("No address found for postal code {0}")]
    NotFound(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Address lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// HTTP client for the postal-code lookup service.
pub struct PostalClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostalClient {
    /// Build a client from environment variables.
    ///
    /// `ADDRESS_LOOKUP_URL` overrides the public ViaCEP endpoint.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("ADDRESS_LOOKUP_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Resolve an 8-digit postal code to address fields.
    pub async fn lookup(&self, postal_code: &str) -> Result<AddressInfo, LookupError> {
        if !document::validate_postal_code(postal_code) {
            return Err(LookupError::InvalidCode(postal_code.to_string()));
        }
        let digits = document::digits_of(postal_code);

        let url = format!("{}/{digits}/json/", self.base_url);
        let payload: serde_json::Value = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_lookup(&payload).ok_or_else(|| LookupError::NotFound(digits))
    }
}

/// Map a ViaCEP response body to [`AddressInfo`].
///
/// The service signals an unknown code with an `erro` field instead of
/// an HTTP error status.
fn parse_lookup(payload: &serde_json::Value) -> Option<AddressInfo> {
    if payload.get("erro").is_some() {
        return None;
    }
    let field = |name: &str| {
        payload
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    };
    Some(AddressInfo {
        street: field("logradouro"),
        neighborhood: field("bairro"),
        city: field("localidade"),
        state: field("uf"),
    })
}
