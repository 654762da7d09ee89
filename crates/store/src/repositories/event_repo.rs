//! Repository for the `events` collection, including delivery
//! reconciliation.

use amparo_core::campaign::Campaign;
use amparo_core::error::CoreError;
use amparo_core::event::{self, CreateEvent, DistributionEvent, UpdateEvent};
use amparo_core::types::{RecordId, Timestamp};

use crate::repositories::{decode_all, decode_opt, encode, FamilyRepo, ServiceError};
use crate::session::OrgContext;
use crate::store::{Collection, RecordStore, StoreError};

pub struct EventRepo;

impl EventRepo {
    /// Fetch all events, soonest first.
    pub async fn list(
        store: &dyn RecordStore,
        ctx: &OrgContext,
    ) -> Result<Vec<DistributionEvent>, StoreError> {
        let mut events: Vec<DistributionEvent> =
            decode_all(store.list(ctx, Collection::Events).await?)?;
        events.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(events)
    }

    pub async fn get(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<Option<DistributionEvent>, StoreError> {
        decode_opt(store.get(ctx, Collection::Events, &id.to_string()).await?)
    }

    pub async fn save(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        event: &DistributionEvent,
    ) -> Result<(), StoreError> {
        store
            .put(ctx, Collection::Events, &event.id.to_string(), encode(event)?)
            .await
    }

    /// Create an event. Newly linked campaigns must pass the linking
    /// guard: active, ending on or before the event day.
    pub async fn create(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        input: CreateEvent,
    ) -> Result<DistributionEvent, ServiceError> {
        let campaigns: Vec<Campaign> = decode_all(store.list(ctx, Collection::Campaigns).await?)?;
        event::validate_campaign_links(&input.linked_campaign_ids, &[], input.date, &campaigns)?;

        let created = DistributionEvent::create(input);
        Self::save(store, ctx, &created).await?;
        Ok(created)
    }

    /// Apply a partial update. Campaign links added by the edit are
    /// checked against the linking guard; links that were already
    /// present survive so they can be removed later.
    pub async fn update(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
        input: UpdateEvent,
    ) -> Result<Option<DistributionEvent>, ServiceError> {
        let Some(mut existing) = Self::get(store, ctx, id).await? else {
            return Ok(None);
        };

        if let Some(proposed) = &input.linked_campaign_ids {
            let campaigns: Vec<Campaign> =
                decode_all(store.list(ctx, Collection::Campaigns).await?)?;
            let event_date = input.date.unwrap_or(existing.date);
            event::validate_campaign_links(
                proposed,
                &existing.linked_campaign_ids,
                event_date,
                &campaigns,
            )?;
        }

        existing.apply_update(input);
        Self::save(store, ctx, &existing).await?;
        Ok(Some(existing))
    }

    pub async fn delete(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        if Self::get(store, ctx, id).await?.is_none() {
            return Ok(false);
        }
        store.delete(ctx, Collection::Events, &id.to_string()).await?;
        Ok(true)
    }

    /// Record that `family_id` received the goods of `campaign_id` at
    /// this event.
    ///
    /// The event write happens first and is idempotent; the family
    /// history entry is written per confirmation. The two writes are
    /// independent round trips with no transaction across them.
    pub async fn confirm_delivery(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        event_id: RecordId,
        family_id: RecordId,
        campaign_id: RecordId,
        author: &str,
        now: Timestamp,
    ) -> Result<DistributionEvent, ServiceError> {
        let mut event =
            Self::get(store, ctx, event_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "DistributionEvent",
                    id: event_id.to_string(),
                })?;
        let mut family = FamilyRepo::get(store, ctx, family_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Family",
                id: family_id.to_string(),
            })?;
        let campaign: Option<Campaign> =
            decode_opt(store.get(ctx, Collection::Campaigns, &campaign_id.to_string()).await?)?;
        let campaign_title = campaign
            .map(|c| c.title)
            .unwrap_or_else(|| campaign_id.to_string());

        if event.mark_delivered(family_id) {
            Self::save(store, ctx, &event).await?;
        }

        family.record_delivery(
            &event.title,
            &campaign_title,
            event.is_registration_review,
            author,
            now,
        );
        FamilyRepo::save(store, ctx, &family).await?;

        tracing::info!(
            event = %event.title,
            family = %family.name,
            campaign = %campaign_title,
            "Delivery confirmed"
        );
        Ok(event)
    }
}
