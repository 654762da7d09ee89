//! Repository for the single `settings` document.

use amparo_core::settings::OrganizationSettings;

use crate::repositories::{decode_opt, encode};
use crate::session::OrgContext;
use crate::store::{Collection, RecordStore, StoreError, SETTINGS_DOC};

pub struct SettingsRepo;

impl SettingsRepo {
    /// The organization's settings, falling back to defaults when the
    /// document was never written.
    pub async fn get(
        store: &dyn RecordStore,
        ctx: &OrgContext,
    ) -> Result<OrganizationSettings, StoreError> {
        let doc = store.get(ctx, Collection::Settings, SETTINGS_DOC).await?;
        Ok(decode_opt(doc)?.unwrap_or_default())
    }

    pub async fn save(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        settings: &OrganizationSettings,
    ) -> Result<(), StoreError> {
        store
            .put(ctx, Collection::Settings, SETTINGS_DOC, encode(settings)?)
            .await
    }
}
