//! HTTP client for the generative language API.
//!
//! Talks to a Gemini-compatible `generateContent` endpoint using
//! [`reqwest`]. Structured capabilities ask for a JSON response body
//! and deserialize the model's text into the suggestion types.

use serde::de::DeserializeOwned;

use crate::types::{FamilyDraft, SuggestedItem};

/// Default endpoint of the generative language API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model used for all capabilities.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Errors from the assist layer.
#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    /// No credential is configured; the feature is off, not broken.
    #[error("No generative AI credential configured")]
    Unavailable,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Assist request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Assist API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response did not contain usable text or JSON.
    #[error("Could not parse assist response: {0}")]
    Parse(String),
}

/// Client for the text-assist capabilities.
pub struct AssistClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl AssistClient {
    /// Build a client from environment variables.
    ///
    /// | Env Var          | Default                              |
    /// |------------------|--------------------------------------|
    /// | `GENAI_API_KEY`  | unset -- assist reports unavailable  |
    /// | `GENAI_BASE_URL` | the public generative language API   |
    /// | `GENAI_MODEL`    | `gemini-2.0-flash`                   |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GENAI_API_KEY").ok().filter(|k| !k.is_empty());
        let base_url =
            std::env::var("GENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("GENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Build an unconfigured client; every capability reports
    /// unavailable. Used by tests and as a fallback.
    pub fn disabled() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn credential(&self) -> Result<&str, AssistError> {
        self.api_key.as_deref().ok_or(AssistError::Unavailable)
    }

    /// Generate a prose description for a campaign form.
    pub async fn campaign_description(
        &self,
        title: &str,
        kind: &str,
        items: &[String],
    ) -> Result<String, AssistError> {
        let prompt = campaign_description_prompt(title, kind, items);
        let text = self.generate(&prompt, false).await?;
        Ok(text.trim().to_string())
    }

    /// Suggest an item list for a package template.
    pub async fn suggest_package_items(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Vec<SuggestedItem>, AssistError> {
        let prompt = suggest_items_prompt(name, description);
        let text = self.generate(&prompt, true).await?;
        parse_json(&text)
    }

    /// Extract a partial family record from free text.
    pub async fn extract_family(&self, raw_text: &str) -> Result<FamilyDraft, AssistError> {
        let prompt = extract_family_prompt(raw_text);
        let text = self.generate(&prompt, true).await?;
        parse_json(&text)
    }

    /// One `generateContent` round trip, returning the model's text.
    async fn generate(&self, prompt: &str, json_response: bool) -> Result<String, AssistError> {
        let key = self.credential()?;

        let mut body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if json_response {
            body["generationConfig"] = serde_json::json!({ "responseMimeType": "application/json" });
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Assist API returned an error");
            return Err(AssistError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json().await?;
        extract_text(&payload)
    }
}

/// Pull the first candidate's text out of a `generateContent` response.
fn extract_text(payload: &serde_json::Value) -> Result<String, AssistError> {
    payload["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| AssistError::Parse("response contains no candidate text".to_string()))
}

/// Deserialize model-produced JSON, tolerating a fenced code block.
fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, AssistError> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(trimmed).map_err(|e| AssistError::Parse(e.to_string()))
}

fn campaign_description_prompt(title: &str, kind: &str, items: &[String]) -> String {
    format!(
        "Write a short, warm announcement text in Portuguese for a charity \
         donation campaign. Title: \"{title}\". Kind: {kind}. Items being \
         collected: {}. Two or three sentences, no headings, plain text only.",
        if items.is_empty() {
            "not specified".to_string()
        } else {
            items.join(", ")
        }
    )
}

fn suggest_items_prompt(name: &str, description: &str) -> String {
    format!(
        "Suggest the items of a charity aid package named \"{name}\". \
         Description: \"{description}\". Answer with a JSON array of objects \
         with fields name (string), quantity (number, per family), unit \
         (string, e.g. kg, l, unit) and average_price (number in BRL or \
         null). No other text."
    )
}

fn extract_family_prompt(raw_text: &str) -> String {
    format!(
        "Extract a family registration from the following text. Answer with \
         a single JSON object with the fields name, cpf, nis, phone, \
         postal_code, street, number, neighborhood, city, state, pregnant \
         (boolean), children (array of objects with name and birth_date as \
         YYYY-MM-DD) and notes. Use null for anything the text does not \
         mention. No other text.\n\nText:\n{raw_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_client_reports_unavailable() {
        let client = AssistClient::disabled();
        assert!(!client.is_configured());
        assert!(matches!(client.credential(), Err(AssistError::Unavailable)));
    }

    #[test]
    fn extract_text_reads_first_candidate() {
        let payload = serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "hello" }] } }
            ]
        });
        assert_eq!(extract_text(&payload).unwrap(), "hello");
    }

    #[test]
    fn extract_text_rejects_empty_response() {
        let payload = serde_json::json!({ "candidates": [] });
        assert!(matches!(extract_text(&payload), Err(AssistError::Parse(_))));
    }

    #[test]
    fn parse_json_accepts_fenced_block() {
        let text = "```json\n[{\"name\":\"Rice\",\"quantity\":5,\"unit\":\"kg\",\"average_price\":30.5}]\n```";
        let items: Vec<SuggestedItem> = parse_json(text).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Rice");
        assert_eq!(items[0].average_price, Some(30.5));
    }

    #[test]
    fn parse_json_reads_family_draft() {
        let text = r#"{
            "name": "Maria Souza",
            "cpf": "529.982.247-25",
            "children": [{ "name": "Ana", "birth_date": "2019-05-01" }],
            "pregnant": true
        }"#;
        let draft: FamilyDraft = parse_json(text).unwrap();
        assert_eq!(draft.name.as_deref(), Some("Maria Souza"));
        assert_eq!(draft.children.len(), 1);
        assert_eq!(draft.pregnant, Some(true));
    }

    #[test]
    fn prompts_carry_the_form_inputs() {
        let p = campaign_description_prompt("Winter drive", "clothing", &["Coats".to_string()]);
        assert!(p.contains("Winter drive"));
        assert!(p.contains("Coats"));

        let p = suggest_items_prompt("Basic Basket", "staple foods");
        assert!(p.contains("Basic Basket"));
        assert!(p.contains("average_price"));
    }
}
