//! Read-only dashboard aggregates over the fetched record set.

use chrono::Months;
use serde::Serialize;

use crate::campaign::Campaign;
use crate::family::{Family, FamilyStatus};
use crate::settings::OrganizationSettings;
use crate::types::{RecordId, Timestamp};

/// How many upcoming visits the dashboard surfaces.
const UPCOMING_VISIT_LIMIT: usize = 5;

/// Collection progress of one active campaign.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignProgress {
    pub campaign_id: RecordId,
    pub title: String,
    pub percent_complete: f64,
}

/// A family due (or overdue) for a visit.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingVisit {
    pub family_id: RecordId,
    pub family_name: String,
    pub next_visit: Timestamp,
    pub late: bool,
}

/// Everything the dashboard shows, computed in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub active_families: usize,
    pub total_children: usize,
    pub active_campaigns: usize,
    pub campaign_progress: Vec<CampaignProgress>,
    pub upcoming_visits: Vec<UpcomingVisit>,
}

/// Percent of a campaign's targets already collected.
///
/// Sum of collected over sum of target across all items; campaigns with
/// a zero target sum report 0%.
pub fn percent_complete(campaign: &Campaign) -> f64 {
    let target: f64 = campaign.items.iter().map(|i| i.target_quantity).sum();
    if target <= 0.0 {
        return 0.0;
    }
    let collected: f64 = campaign.items.iter().map(|i| i.collected_quantity).sum();
    (collected / target) * 100.0
}

/// The visit schedule for the active families.
///
/// Each family's next visit is its most recent Visit history entry
/// (falling back to the registration date) plus the configured
/// interval; entries already in the past are flagged late. The five
/// soonest are returned, ascending.
pub fn upcoming_visits(
    families: &[Family],
    visit_interval_months: u32,
    now: Timestamp,
) -> Vec<UpcomingVisit> {
    let mut visits: Vec<UpcomingVisit> = families
        .iter()
        .filter(|f| f.status == FamilyStatus::Active)
        .map(|f| {
            let base = f
                .last_visit()
                .map(|e| e.date)
                .unwrap_or(f.registration_date);
            let next_visit = base
                .checked_add_months(Months::new(visit_interval_months))
                .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
            UpcomingVisit {
                family_id: f.id,
                family_name: f.name.clone(),
                next_visit,
                late: next_visit < now,
            }
        })
        .collect();
    visits.sort_by_key(|v| v.next_visit);
    visits.truncate(UPCOMING_VISIT_LIMIT);
    visits
}

/// Compute the full dashboard from fetched families and campaigns.
/// Children are counted over active families only.
pub fn summarize(
    families: &[Family],
    campaigns: &[Campaign],
    settings: &OrganizationSettings,
    now: Timestamp,
) -> DashboardSummary {
    let active: Vec<&Family> = families
        .iter()
        .filter(|f| f.status == FamilyStatus::Active)
        .collect();

    let campaign_progress: Vec<CampaignProgress> = campaigns
        .iter()
        .filter(|c| c.is_active)
        .map(|c| CampaignProgress {
            campaign_id: c.id,
            title: c.title.clone(),
            percent_complete: percent_complete(c),
        })
        .collect();

    DashboardSummary {
        active_families: active.len(),
        total_children: active.iter().map(|f| f.children.len()).sum(),
        active_campaigns: campaign_progress.len(),
        campaign_progress,
        upcoming_visits: upcoming_visits(families, settings.visit_interval_months, now),
    }
}
