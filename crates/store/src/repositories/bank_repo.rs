//! Repository for the single `bank_info` document.

use amparo_core::bank::BankInfo;

use crate::repositories::{decode_opt, encode};
use crate::session::OrgContext;
use crate::store::{Collection, RecordStore, StoreError, BANK_INFO_DOC};

pub struct BankRepo;

impl BankRepo {
    /// The stored banking details, or an empty record when never written.
    pub async fn get(store: &dyn RecordStore, ctx: &OrgContext) -> Result<BankInfo, StoreError> {
        let doc = store.get(ctx, Collection::BankInfo, BANK_INFO_DOC).await?;
        Ok(decode_opt(doc)?.unwrap_or_default())
    }

    /// Replace the banking details. Callers build the record through
    /// [`BankInfo::from_update`], which normalizes primary designations.
    pub async fn save(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        info: &BankInfo,
    ) -> Result<(), StoreError> {
        store
            .put(ctx, Collection::BankInfo, BANK_INFO_DOC, encode(info)?)
            .await
    }
}
