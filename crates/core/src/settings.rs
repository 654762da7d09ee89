//! Organization-wide settings, a single stored document.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default registration validity in months.
pub const DEFAULT_VALIDITY_MONTHS: u32 = 12;
/// Default interval between family visits in months.
pub const DEFAULT_VISIT_INTERVAL_MONTHS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSettings {
    pub organization_name: String,
    /// Months a registration stays valid without re-review before the
    /// family is suspended automatically.
    pub validity_months: u32,
    /// Months between scheduled family visits.
    pub visit_interval_months: u32,
}

impl Default for OrganizationSettings {
    fn default() -> Self {
        Self {
            organization_name: String::new(),
            validity_months: DEFAULT_VALIDITY_MONTHS,
            visit_interval_months: DEFAULT_VISIT_INTERVAL_MONTHS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSettings {
    #[validate(length(max = 200))]
    pub organization_name: Option<String>,
    #[validate(range(min = 1, max = 120))]
    pub validity_months: Option<u32>,
    #[validate(range(min = 1, max = 120))]
    pub visit_interval_months: Option<u32>,
}

impl OrganizationSettings {
    /// Apply a partial update. Only non-`None` fields are changed.
    pub fn apply_update(&mut self, input: UpdateSettings) {
        if let Some(name) = input.organization_name {
            self.organization_name = name;
        }
        if let Some(months) = input.validity_months {
            self.validity_months = months;
        }
        if let Some(months) = input.visit_interval_months {
            self.visit_interval_months = months;
        }
    }
}
