//! Repository for the `campaigns` collection.
//!
//! Listing keeps `is_active` consistent with the end date; create and
//! update recompute the item targets from the selected packages and
//! beneficiary families.

use amparo_core::campaign::{self, Campaign, CreateCampaign, UpdateCampaign};
use amparo_core::package::Package;
use amparo_core::types::{Day, RecordId};

use crate::repositories::{decode_all, decode_opt, encode, ServiceError};
use crate::session::OrgContext;
use crate::store::{Collection, RecordStore, StoreError};

pub struct CampaignRepo;

impl CampaignRepo {
    /// Fetch all campaigns, deactivating any whose end date has passed.
    ///
    /// Returned newest window first.
    pub async fn list(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        today: Day,
    ) -> Result<Vec<Campaign>, StoreError> {
        let mut campaigns: Vec<Campaign> =
            decode_all(store.list(ctx, Collection::Campaigns).await?)?;

        for campaign in campaigns.iter_mut() {
            if campaign.refresh_activity(today) {
                Self::save(store, ctx, campaign).await?;
                tracing::debug!(campaign = %campaign.title, "Campaign past its end date was deactivated");
            }
        }

        campaigns.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(campaigns)
    }

    pub async fn get(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<Option<Campaign>, StoreError> {
        decode_opt(store.get(ctx, Collection::Campaigns, &id.to_string()).await?)
    }

    pub async fn save(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        campaign: &Campaign,
    ) -> Result<(), StoreError> {
        store
            .put(
                ctx,
                Collection::Campaigns,
                &campaign.id.to_string(),
                encode(campaign)?,
            )
            .await
    }

    /// Create a campaign, recomputing item targets from its selections.
    /// A window that already ended by `today` is rejected.
    pub async fn create(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        input: CreateCampaign,
        today: Day,
    ) -> Result<Campaign, ServiceError> {
        let mut created = Campaign::create(input, today)?;
        Self::recompute(store, ctx, &mut created).await?;
        Self::save(store, ctx, &created).await?;
        Ok(created)
    }

    /// Apply a partial update, then recompute item targets.
    ///
    /// Returns `Ok(None)` if the campaign is absent.
    pub async fn update(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
        input: UpdateCampaign,
    ) -> Result<Option<Campaign>, ServiceError> {
        let Some(mut campaign) = Self::get(store, ctx, id).await? else {
            return Ok(None);
        };
        campaign.apply_update(input)?;
        Self::recompute(store, ctx, &mut campaign).await?;
        Self::save(store, ctx, &campaign).await?;
        Ok(Some(campaign))
    }

    /// Re-derive the item list from the current package and family
    /// selection. Package ids that no longer resolve are skipped.
    async fn recompute(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        campaign: &mut Campaign,
    ) -> Result<(), StoreError> {
        let packages: Vec<Package> = decode_all(store.list(ctx, Collection::Packages).await?)?;
        let selected: Vec<Package> = campaign
            .package_ids
            .iter()
            .filter_map(|id| packages.iter().find(|p| p.id == *id).cloned())
            .collect();
        campaign.items = campaign::recompute_items(
            &campaign.items,
            &selected,
            campaign.beneficiary_family_ids.len(),
        );
        Ok(())
    }

    /// Manual activity toggle. A finished campaign stays inactive; the
    /// record is returned unchanged in that case.
    pub async fn toggle_active(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
        today: Day,
    ) -> Result<Option<Campaign>, StoreError> {
        let Some(mut campaign) = Self::get(store, ctx, id).await? else {
            return Ok(None);
        };
        if campaign.toggle_active(today) {
            Self::save(store, ctx, &campaign).await?;
        }
        Ok(Some(campaign))
    }

    /// Delete a campaign and unlink it from distribution events.
    pub async fn delete(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        use amparo_core::event::DistributionEvent;

        if Self::get(store, ctx, id).await?.is_none() {
            return Ok(false);
        }
        store
            .delete(ctx, Collection::Campaigns, &id.to_string())
            .await?;

        let mut events: Vec<DistributionEvent> =
            decode_all(store.list(ctx, Collection::Events).await?)?;
        for event in events.iter_mut() {
            let before = event.linked_campaign_ids.len();
            event.linked_campaign_ids.retain(|linked| *linked != id);
            if event.linked_campaign_ids.len() != before {
                store
                    .put(ctx, Collection::Events, &event.id.to_string(), encode(event)?)
                    .await?;
            }
        }
        Ok(true)
    }
}
