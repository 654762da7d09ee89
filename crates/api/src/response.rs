//! Shared response envelope types for API handlers.
//!
//! Every successful response is wrapped in a `{ "data": ... }` envelope
//! so the console client can treat payloads uniformly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
