//! Family records: registration, history log, and the lifecycle rules
//! around registration validity.
//!
//! A family's registration is valid for the organization's configured
//! number of months, counted from the last review (or from registration
//! if it was never reviewed). Active families past that window are
//! suspended automatically by [`sweep_expired`], which runs on every
//! list fetch rather than on a timer.

use chrono::Months;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::document;
use crate::error::CoreError;
use crate::location::Address;
use crate::types::{Day, RecordId, Timestamp};

/// Author recorded on history entries written by automatic rules.
pub const SYSTEM_AUTHOR: &str = "System";

/// Lifecycle status of a family registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyStatus {
    Active,
    Suspended,
    Inactive,
}

/// Kind of a family history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Registration,
    Update,
    Suspension,
    Reactivation,
    Incident,
    Delivery,
    Visit,
    Other,
}

/// One entry in a family's history log. The log is ordered newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: RecordId,
    pub kind: HistoryKind,
    pub date: Timestamp,
    pub description: String,
    pub author: String,
}

impl HistoryEntry {
    pub fn new(kind: HistoryKind, description: impl Into<String>, author: &str, date: Timestamp) -> Self {
        Self {
            id: RecordId::new_v4(),
            kind,
            date,
            description: description.into(),
            author: author.to_string(),
        }
    }
}

/// A child belonging to a registered family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
    pub id: RecordId,
    pub name: String,
    pub birth_date: Option<Day>,
    pub notes: Option<String>,
}

/// A registered family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    pub id: RecordId,
    pub name: String,
    /// Responsible person's CPF, check-digit validated on write.
    pub cpf: Option<String>,
    /// Social registry (NIS) number.
    pub nis: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    pub status: FamilyStatus,
    pub registration_date: Timestamp,
    pub last_review_date: Option<Timestamp>,
    #[serde(default)]
    pub pregnant: bool,
    pub pregnancy_due_date: Option<Day>,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub notes: Option<String>,
}

/// A child as submitted by the console form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChildInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub birth_date: Option<Day>,
    pub notes: Option<String>,
}

/// DTO for registering a family.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFamily {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub cpf: Option<String>,
    pub nis: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub pregnant: bool,
    pub pregnancy_due_date: Option<Day>,
    #[serde(default)]
    #[validate(nested)]
    pub children: Vec<ChildInput>,
    pub notes: Option<String>,
}

/// DTO for updating a family. All fields are optional; identity fields
/// that are present replace the stored value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFamily {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub nis: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub pregnant: Option<bool>,
    pub pregnancy_due_date: Option<Day>,
    #[validate(nested)]
    pub children: Option<Vec<ChildInput>>,
    pub notes: Option<String>,
}

/// DTO for appending a manual history entry (incident, visit, note).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddHistoryEntry {
    pub kind: HistoryKind,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
}

/// Check the document numbers of a create/update payload.
///
/// CPF numbers must pass the check-digit test; NIS numbers must be
/// eleven digits. Rejected before any write.
pub fn validate_documents(cpf: Option<&str>, nis: Option<&str>) -> Result<(), CoreError> {
    if let Some(cpf) = cpf {
        if !document::validate_cpf(cpf) {
            return Err(CoreError::Validation(format!("Invalid CPF: {cpf}")));
        }
    }
    if let Some(nis) = nis {
        if document::digits_of(nis).len() != 11 {
            return Err(CoreError::Validation(format!("Invalid NIS: {nis}")));
        }
    }
    Ok(())
}

fn children_from(inputs: Vec<ChildInput>) -> Vec<Child> {
    inputs
        .into_iter()
        .map(|c| Child {
            id: RecordId::new_v4(),
            name: c.name,
            birth_date: c.birth_date,
            notes: c.notes,
        })
        .collect()
}

impl Family {
    /// Register a new family. Starts Active with a Registration entry.
    pub fn create(input: CreateFamily, author: &str, now: Timestamp) -> Self {
        Self {
            id: RecordId::new_v4(),
            name: input.name,
            cpf: input.cpf,
            nis: input.nis,
            phone: input.phone,
            address: input.address,
            status: FamilyStatus::Active,
            registration_date: now,
            last_review_date: None,
            pregnant: input.pregnant,
            pregnancy_due_date: input.pregnancy_due_date,
            children: children_from(input.children),
            history: vec![HistoryEntry::new(
                HistoryKind::Registration,
                "Family registered",
                author,
                now,
            )],
            notes: input.notes,
        }
    }

    /// Apply a partial update and log it.
    pub fn apply_update(&mut self, input: UpdateFamily, author: &str, now: Timestamp) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if input.cpf.is_some() {
            self.cpf = input.cpf;
        }
        if input.nis.is_some() {
            self.nis = input.nis;
        }
        if input.phone.is_some() {
            self.phone = input.phone;
        }
        if let Some(address) = input.address {
            self.address = address;
        }
        if let Some(pregnant) = input.pregnant {
            self.pregnant = pregnant;
        }
        if input.pregnancy_due_date.is_some() {
            self.pregnancy_due_date = input.pregnancy_due_date;
        }
        if let Some(children) = input.children {
            self.children = children_from(children);
        }
        if input.notes.is_some() {
            self.notes = input.notes;
        }
        self.prepend_history(HistoryKind::Update, "Record updated", author, now);
    }

    /// Insert an entry at the front of the history log (newest first).
    pub fn prepend_history(
        &mut self,
        kind: HistoryKind,
        description: impl Into<String>,
        author: &str,
        date: Timestamp,
    ) {
        self.history
            .insert(0, HistoryEntry::new(kind, description, author, date));
    }

    /// The date this family's registration stops being valid.
    ///
    /// Counted from the last review, falling back to the registration
    /// date for families never reviewed.
    pub fn expiration_date(&self, validity_months: u32) -> Timestamp {
        let base = self.last_review_date.unwrap_or(self.registration_date);
        base.checked_add_months(Months::new(validity_months))
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC)
    }

    /// Suspend this family if Active and past its validity window.
    ///
    /// Returns `true` if the record changed. The suspension is logged
    /// with a system-authored history entry.
    pub fn check_expiration(&mut self, validity_months: u32, now: Timestamp) -> bool {
        if self.status != FamilyStatus::Active {
            return false;
        }
        if now <= self.expiration_date(validity_months) {
            return false;
        }
        self.status = FamilyStatus::Suspended;
        self.prepend_history(
            HistoryKind::Suspension,
            format!("Registration validity of {validity_months} months expired; suspended automatically"),
            SYSTEM_AUTHOR,
            now,
        );
        true
    }

    /// Force-renew the registration.
    ///
    /// Sets `last_review_date` to now and reactivates a Suspended or
    /// Inactive family. Exactly one history entry is written: a
    /// Reactivation when the status changed, otherwise an Update noting
    /// the renewal.
    pub fn renew(&mut self, author: &str, now: Timestamp) {
        self.last_review_date = Some(now);
        if self.status != FamilyStatus::Active {
            self.status = FamilyStatus::Active;
            self.prepend_history(
                HistoryKind::Reactivation,
                "Registration renewed; family reactivated",
                author,
                now,
            );
        } else {
            self.prepend_history(HistoryKind::Update, "Registration renewed", author, now);
        }
    }

    /// Record that this family received goods from a campaign at an event.
    ///
    /// Always logs a Delivery entry. When the event counts as a
    /// registration review, the review date is advanced and a
    /// previously non-Active family is reactivated, with the
    /// Reactivation entry inserted ahead of the Delivery entry.
    pub fn record_delivery(
        &mut self,
        event_title: &str,
        campaign_title: &str,
        registration_review: bool,
        author: &str,
        now: Timestamp,
    ) {
        self.prepend_history(
            HistoryKind::Delivery,
            format!("Received items from campaign \"{campaign_title}\" at event \"{event_title}\""),
            author,
            now,
        );
        if registration_review {
            self.last_review_date = Some(now);
            if self.status != FamilyStatus::Active {
                self.status = FamilyStatus::Active;
                self.prepend_history(
                    HistoryKind::Reactivation,
                    format!("Reactivated after attending registration review at \"{event_title}\""),
                    SYSTEM_AUTHOR,
                    now,
                );
            }
        }
    }

    /// The most recent Visit history entry, if any.
    pub fn last_visit(&self) -> Option<&HistoryEntry> {
        self.history.iter().find(|e| e.kind == HistoryKind::Visit)
    }
}

/// Run the expiration check over a fetched family list.
///
/// Mutates expired families in place and returns the ids of those that
/// changed, so callers can persist exactly the changed records.
pub fn sweep_expired(
    families: &mut [Family],
    validity_months: u32,
    now: Timestamp,
) -> Vec<RecordId> {
    families
        .iter_mut()
        .filter_map(|f| {
            if f.check_expiration(validity_months, now) {
                Some(f.id)
            } else {
                None
            }
        })
        .collect()
}
