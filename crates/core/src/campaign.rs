//! Donation campaigns: item targets, beneficiary linkage, and the
//! activity window.
//!
//! Campaign item targets are derived data: the product of the selected
//! package templates and the number of selected beneficiary families,
//! merged by `(name, unit)`. Collected quantities are entered by hand
//! and survive recomputation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::package::Package;
use crate::types::{Day, RecordId};

/// One line of a campaign: what to collect and how much was collected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignItem {
    pub id: RecordId,
    pub name: String,
    pub unit: String,
    pub target_quantity: f64,
    #[serde(default)]
    pub collected_quantity: f64,
}

/// A donation campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: RecordId,
    pub title: String,
    /// Free-form kind, e.g. "food", "clothing", "fundraising".
    pub kind: String,
    pub description: Option<String>,
    pub start_date: Day,
    pub end_date: Day,
    pub is_active: bool,
    #[serde(default)]
    pub items: Vec<CampaignItem>,
    #[serde(default)]
    pub beneficiary_family_ids: Vec<RecordId>,
    #[serde(default)]
    pub package_ids: Vec<RecordId>,
}

/// DTO for creating a campaign.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaign {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub kind: String,
    pub description: Option<String>,
    pub start_date: Day,
    pub end_date: Day,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<CampaignItemInput>,
    #[serde(default)]
    pub beneficiary_family_ids: Vec<RecordId>,
    #[serde(default)]
    pub package_ids: Vec<RecordId>,
}

/// DTO for updating a campaign. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCampaign {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    #[validate(nested)]
    pub items: Option<Vec<CampaignItemInput>>,
    pub beneficiary_family_ids: Option<Vec<RecordId>>,
    pub package_ids: Option<Vec<RecordId>>,
}

/// A campaign item as submitted by the console form. An `id` is present
/// for items that already existed on the campaign.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CampaignItemInput {
    pub id: Option<RecordId>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
    pub target_quantity: f64,
    #[serde(default)]
    pub collected_quantity: f64,
}

impl From<CampaignItemInput> for CampaignItem {
    fn from(input: CampaignItemInput) -> Self {
        CampaignItem {
            id: input.id.unwrap_or_else(RecordId::new_v4),
            name: input.name,
            unit: input.unit,
            target_quantity: input.target_quantity,
            collected_quantity: input.collected_quantity,
        }
    }
}

/// The campaign window must not end before it starts.
pub fn validate_dates(start: Day, end: Day) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "Campaign end date {end} is before start date {start}"
        )));
    }
    Ok(())
}

/// A new campaign must not already be finished when it is created.
pub fn validate_new_window(start: Day, end: Day, today: Day) -> Result<(), CoreError> {
    validate_dates(start, end)?;
    if end < today {
        return Err(CoreError::Validation(format!(
            "Campaign end date {end} is already in the past"
        )));
    }
    Ok(())
}

/// Recompute campaign items from the selected packages and families.
///
/// - No packages selected: the existing items are returned untouched,
///   which is what keeps hand-written item lists working.
/// - Packages but no families: existing items are kept with every
///   target zeroed; collected amounts are untouched.
/// - Otherwise each package item contributes `quantity × family_count`
///   to the target of the `(name, unit)` it merges into. Items whose
///   `(name, unit)` already existed keep their identity and collected
///   quantity; new ones start at zero collected.
///
/// Two entries sharing a name but not a unit stay distinct targets.
pub fn recompute_items(
    existing: &[CampaignItem],
    selected_packages: &[Package],
    family_count: usize,
) -> Vec<CampaignItem> {
    if selected_packages.is_empty() {
        return existing.to_vec();
    }

    if family_count == 0 {
        return existing
            .iter()
            .map(|item| CampaignItem {
                target_quantity: 0.0,
                ..item.clone()
            })
            .collect();
    }

    // Merge package items by (name, unit), accumulating targets in
    // first-seen order.
    let mut merged: Vec<CampaignItem> = Vec::new();
    for package in selected_packages {
        for item in &package.items {
            let target = item.quantity * family_count as f64;
            match merged
                .iter_mut()
                .find(|m| m.name == item.name && m.unit == item.unit)
            {
                Some(entry) => entry.target_quantity += target,
                None => {
                    let carried = existing
                        .iter()
                        .find(|e| e.name == item.name && e.unit == item.unit);
                    merged.push(CampaignItem {
                        id: carried.map(|e| e.id).unwrap_or_else(RecordId::new_v4),
                        name: item.name.clone(),
                        unit: item.unit.clone(),
                        target_quantity: target,
                        collected_quantity: carried.map(|e| e.collected_quantity).unwrap_or(0.0),
                    });
                }
            }
        }
    }
    merged
}

impl Campaign {
    pub fn create(input: CreateCampaign, today: Day) -> Result<Self, CoreError> {
        validate_new_window(input.start_date, input.end_date, today)?;
        Ok(Self {
            id: RecordId::new_v4(),
            title: input.title,
            kind: input.kind,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            is_active: true,
            items: input.items.into_iter().map(CampaignItem::from).collect(),
            beneficiary_family_ids: input.beneficiary_family_ids,
            package_ids: input.package_ids,
        })
    }

    /// Apply a partial update. Only non-`None` fields are changed.
    pub fn apply_update(&mut self, input: UpdateCampaign) -> Result<(), CoreError> {
        let start = input.start_date.unwrap_or(self.start_date);
        let end = input.end_date.unwrap_or(self.end_date);
        validate_dates(start, end)?;

        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(kind) = input.kind {
            self.kind = kind;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        self.start_date = start;
        self.end_date = end;
        if let Some(items) = input.items {
            self.items = items.into_iter().map(CampaignItem::from).collect();
        }
        if let Some(ids) = input.beneficiary_family_ids {
            self.beneficiary_family_ids = ids;
        }
        if let Some(ids) = input.package_ids {
            self.package_ids = ids;
        }
        Ok(())
    }

    /// Flip `is_active` off when the end date has passed.
    ///
    /// Returns `true` if the record changed.
    pub fn refresh_activity(&mut self, today: Day) -> bool {
        if self.is_active && self.end_date < today {
            self.is_active = false;
            return true;
        }
        false
    }

    /// Manual activity toggle.
    ///
    /// Refused (returns `false`, record untouched) when the campaign is
    /// already inactive and its window has closed: a finished campaign
    /// cannot come back.
    pub fn toggle_active(&mut self, today: Day) -> bool {
        if !self.is_active && self.end_date < today {
            return false;
        }
        self.is_active = !self.is_active;
        true
    }

    /// Drop a family from the beneficiary list. Returns `true` if it
    /// was present. Stored item targets are intentionally left as last
    /// computed.
    pub fn remove_beneficiary(&mut self, family_id: RecordId) -> bool {
        let before = self.beneficiary_family_ids.len();
        self.beneficiary_family_ids.retain(|id| *id != family_id);
        self.beneficiary_family_ids.len() != before
    }
}
