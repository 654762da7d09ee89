//! Typed repositories over the record store.
//!
//! Each repository owns one collection: serialization to and from the
//! stored JSON documents, plus the entity's derived rules (expiration
//! sweep, activity window, delivery reconciliation). Mutating rules
//! write back only records whose state actually changed.

use amparo_core::error::CoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::StoreError;

pub mod bank_repo;
pub mod campaign_repo;
pub mod event_repo;
pub mod family_repo;
pub mod location_repo;
pub mod package_repo;
pub mod settings_repo;

pub use bank_repo::BankRepo;
pub use campaign_repo::CampaignRepo;
pub use event_repo::EventRepo;
pub use family_repo::FamilyRepo;
pub use location_repo::LocationRepo;
pub use package_repo::PackageRepo;
pub use settings_repo::SettingsRepo;

/// Error from domain-service operations that combine store access with
/// business rules.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub(crate) fn decode_all<T: DeserializeOwned>(
    docs: Vec<serde_json::Value>,
) -> Result<Vec<T>, StoreError> {
    docs.into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
        .collect()
}

pub(crate) fn decode_opt<T: DeserializeOwned>(
    doc: Option<serde_json::Value>,
) -> Result<Option<T>, StoreError> {
    doc.map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
        .transpose()
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(StoreError::from)
}
