//! Distribution events: scheduling, campaign linkage, and delivery
//! bookkeeping.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::campaign::Campaign;
use crate::error::CoreError;
use crate::types::{Day, RecordId};

/// Scheduling status of a distribution event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Done,
    Cancelled,
}

/// A scheduled distribution (or registration review) event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionEvent {
    pub id: RecordId,
    pub title: String,
    pub date: Day,
    pub time: Option<chrono::NaiveTime>,
    pub location_id: Option<RecordId>,
    /// Physical handout to families happens at this event.
    #[serde(default)]
    pub is_delivery_event: bool,
    /// Attendance counts as renewing a family's registration validity.
    #[serde(default)]
    pub is_registration_review: bool,
    pub status: EventStatus,
    #[serde(default)]
    pub delivered_family_ids: Vec<RecordId>,
    #[serde(default)]
    pub linked_campaign_ids: Vec<RecordId>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub date: Day,
    pub time: Option<chrono::NaiveTime>,
    pub location_id: Option<RecordId>,
    #[serde(default)]
    pub is_delivery_event: bool,
    #[serde(default)]
    pub is_registration_review: bool,
    #[serde(default)]
    pub linked_campaign_ids: Vec<RecordId>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub date: Option<Day>,
    pub time: Option<chrono::NaiveTime>,
    pub location_id: Option<RecordId>,
    pub is_delivery_event: Option<bool>,
    pub is_registration_review: Option<bool>,
    pub status: Option<EventStatus>,
    pub linked_campaign_ids: Option<Vec<RecordId>>,
    pub notes: Option<String>,
}

/// Whether a campaign may be *newly* linked to an event on `event_date`.
///
/// The campaign must still be active and must finish collecting on or
/// before the event day. Campaigns that are already linked are exempt,
/// so a stale link can always be removed.
pub fn campaign_linkable(campaign: &Campaign, event_date: Day) -> bool {
    campaign.is_active && campaign.end_date <= event_date
}

/// Validate a proposed `linked_campaign_ids` list against the guard.
///
/// `previous` is the set of ids linked before the edit; `campaigns` the
/// current campaign list. Unknown ids and newly added campaigns that
/// fail [`campaign_linkable`] are rejected.
pub fn validate_campaign_links(
    proposed: &[RecordId],
    previous: &[RecordId],
    event_date: Day,
    campaigns: &[Campaign],
) -> Result<(), CoreError> {
    for id in proposed {
        if previous.contains(id) {
            continue;
        }
        let campaign = campaigns
            .iter()
            .find(|c| c.id == *id)
            .ok_or(CoreError::NotFound {
                entity: "Campaign",
                id: id.to_string(),
            })?;
        if !campaign_linkable(campaign, event_date) {
            return Err(CoreError::Validation(format!(
                "Campaign \"{}\" cannot be linked: it must be active and end by {event_date}",
                campaign.title
            )));
        }
    }
    Ok(())
}

impl DistributionEvent {
    pub fn create(input: CreateEvent) -> Self {
        Self {
            id: RecordId::new_v4(),
            title: input.title,
            date: input.date,
            time: input.time,
            location_id: input.location_id,
            is_delivery_event: input.is_delivery_event,
            is_registration_review: input.is_registration_review,
            status: EventStatus::Scheduled,
            delivered_family_ids: vec![],
            linked_campaign_ids: input.linked_campaign_ids,
            notes: input.notes,
        }
    }

    /// Apply a partial update. Only non-`None` fields are changed.
    /// Campaign links must have been validated by the caller against
    /// [`validate_campaign_links`] before this is applied.
    pub fn apply_update(&mut self, input: UpdateEvent) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(date) = input.date {
            self.date = date;
        }
        if input.time.is_some() {
            self.time = input.time;
        }
        if input.location_id.is_some() {
            self.location_id = input.location_id;
        }
        if let Some(v) = input.is_delivery_event {
            self.is_delivery_event = v;
        }
        if let Some(v) = input.is_registration_review {
            self.is_registration_review = v;
        }
        if let Some(status) = input.status {
            self.status = status;
        }
        if let Some(ids) = input.linked_campaign_ids {
            self.linked_campaign_ids = ids;
        }
        if input.notes.is_some() {
            self.notes = input.notes;
        }
    }

    /// Record a family as delivered to. Idempotent: re-confirming the
    /// same family is a no-op and returns `false`.
    pub fn mark_delivered(&mut self, family_id: RecordId) -> bool {
        if self.delivered_family_ids.contains(&family_id) {
            return false;
        }
        self.delivered_family_ids.push(family_id);
        true
    }
}
