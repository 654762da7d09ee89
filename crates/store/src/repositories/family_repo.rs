//! Repository for the `families` collection.
//!
//! Listing runs the registration-expiration check: Active families past
//! their validity window are suspended, the suspension is logged, and
//! campaigns referencing them as beneficiaries are updated. Only
//! records whose state changed are written back, so the check is
//! idempotent and cheap when nothing expired.

use amparo_core::campaign::Campaign;
use amparo_core::family::{self, AddHistoryEntry, CreateFamily, Family, UpdateFamily};
use amparo_core::types::{RecordId, Timestamp};

use crate::repositories::{decode_all, decode_opt, encode, CampaignRepo, SettingsRepo};
use crate::session::OrgContext;
use crate::store::{Collection, RecordStore, StoreError};

pub struct FamilyRepo;

impl FamilyRepo {
    /// Fetch all families, applying the expiration sweep first.
    ///
    /// Returned sorted by name.
    pub async fn list(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        now: Timestamp,
    ) -> Result<Vec<Family>, StoreError> {
        let settings = SettingsRepo::get(store, ctx).await?;
        let mut families: Vec<Family> =
            decode_all(store.list(ctx, Collection::Families).await?)?;

        let suspended = family::sweep_expired(&mut families, settings.validity_months, now);
        if !suspended.is_empty() {
            for family in families.iter().filter(|f| suspended.contains(&f.id)) {
                Self::save(store, ctx, family).await?;
            }
            Self::scrub_from_campaigns(store, ctx, &suspended).await?;
            tracing::info!(
                count = suspended.len(),
                validity_months = settings.validity_months,
                "Families past their validity window were suspended"
            );
        }

        families.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(families)
    }

    /// Remove families from campaign beneficiary lists, after a
    /// suspension or a delete.
    ///
    /// Stored item targets are left as last computed; they refresh the
    /// next time the campaign is edited.
    async fn scrub_from_campaigns(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        suspended: &[RecordId],
    ) -> Result<(), StoreError> {
        let mut campaigns: Vec<Campaign> =
            decode_all(store.list(ctx, Collection::Campaigns).await?)?;
        for campaign in campaigns.iter_mut() {
            let mut changed = false;
            for id in suspended {
                changed |= campaign.remove_beneficiary(*id);
            }
            if changed {
                CampaignRepo::save(store, ctx, campaign).await?;
            }
        }
        Ok(())
    }

    pub async fn get(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<Option<Family>, StoreError> {
        decode_opt(store.get(ctx, Collection::Families, &id.to_string()).await?)
    }

    pub async fn save(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        family: &Family,
    ) -> Result<(), StoreError> {
        store
            .put(
                ctx,
                Collection::Families,
                &family.id.to_string(),
                encode(family)?,
            )
            .await
    }

    /// Register a new family.
    pub async fn create(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        input: CreateFamily,
        author: &str,
        now: Timestamp,
    ) -> Result<Family, StoreError> {
        let created = Family::create(input, author, now);
        Self::save(store, ctx, &created).await?;
        Ok(created)
    }

    /// Apply a partial update. Returns `None` if the family is absent.
    pub async fn update(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
        input: UpdateFamily,
        author: &str,
        now: Timestamp,
    ) -> Result<Option<Family>, StoreError> {
        let Some(mut family) = Self::get(store, ctx, id).await? else {
            return Ok(None);
        };
        family.apply_update(input, author, now);
        Self::save(store, ctx, &family).await?;
        Ok(Some(family))
    }

    /// Delete a family and scrub it from campaign beneficiary lists.
    ///
    /// Returns `false` if no such family existed.
    pub async fn delete(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        if Self::get(store, ctx, id).await?.is_none() {
            return Ok(false);
        }
        store
            .delete(ctx, Collection::Families, &id.to_string())
            .await?;
        Self::scrub_from_campaigns(store, ctx, &[id]).await?;
        Ok(true)
    }

    /// Force-renew a registration. Returns `None` if the family is absent.
    pub async fn renew(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
        author: &str,
        now: Timestamp,
    ) -> Result<Option<Family>, StoreError> {
        let Some(mut family) = Self::get(store, ctx, id).await? else {
            return Ok(None);
        };
        family.renew(author, now);
        Self::save(store, ctx, &family).await?;
        Ok(Some(family))
    }

    /// Append a manual history entry (incident, visit, note).
    pub async fn add_history(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
        input: AddHistoryEntry,
        author: &str,
        now: Timestamp,
    ) -> Result<Option<Family>, StoreError> {
        let Some(mut family) = Self::get(store, ctx, id).await? else {
            return Ok(None);
        };
        family.prepend_history(input.kind, input.description, author, now);
        Self::save(store, ctx, &family).await?;
        Ok(Some(family))
    }
}
