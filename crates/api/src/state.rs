use std::sync::Arc;

use amparo_assist::AssistClient;
use amparo_store::RecordStore;

use crate::address::PostalClient;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The record
/// store is held behind the trait so tests and demos can swap in the
/// in-memory backend.
#[derive(Clone)]
pub struct AppState {
    /// The namespaced document store.
    pub store: Arc<dyn RecordStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Generative-AI text assist.
    pub assist: Arc<AssistClient>,
    /// Postal-code address lookup.
    pub postal: Arc<PostalClient>,
}
