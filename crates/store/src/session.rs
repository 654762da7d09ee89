//! The organization scope threaded through every store operation.

/// Identifies whose records an operation touches.
///
/// Built from the authenticated session by the API layer and passed
/// explicitly into every repository call; nothing reads it from ambient
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgContext {
    pub org_id: String,
}

impl OrgContext {
    pub fn new(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
        }
    }
}
