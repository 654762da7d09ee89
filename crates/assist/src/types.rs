//! Suggestion payloads returned by the assist capabilities.

use serde::{Deserialize, Serialize};

/// One suggested package item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub average_price: Option<f64>,
}

/// A child mentioned in extracted free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildDraft {
    pub name: Option<String>,
    pub birth_date: Option<String>,
}

/// A partial family record extracted from free text.
///
/// Every field is optional: the extraction prefills the registration
/// form and the operator completes or corrects it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyDraft {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub nis: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pregnant: Option<bool>,
    #[serde(default)]
    pub children: Vec<ChildDraft>,
    pub notes: Option<String>,
}
