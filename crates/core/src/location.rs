//! Organization locations and the shared address record.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::RecordId;

/// A postal address, shared by families and organization locations.
///
/// Street/neighborhood/city/state are prefilled from the postal-code
/// lookup when available; every field remains user-editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// A place the organization operates from or distributes at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationLocation {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub address: Address,
    pub capacity: Option<u32>,
    pub notes: Option<String>,
}

/// DTO for creating a location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub address: Address,
    pub capacity: Option<u32>,
    pub notes: Option<String>,
}

/// DTO for updating a location. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLocation {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub address: Option<Address>,
    pub capacity: Option<u32>,
    pub notes: Option<String>,
}

impl OrganizationLocation {
    pub fn create(input: CreateLocation) -> Self {
        Self {
            id: RecordId::new_v4(),
            name: input.name,
            address: input.address,
            capacity: input.capacity,
            notes: input.notes,
        }
    }

    /// Apply a partial update. Only non-`None` fields are changed.
    pub fn apply_update(&mut self, input: UpdateLocation) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(address) = input.address {
            self.address = address;
        }
        if input.capacity.is_some() {
            self.capacity = input.capacity;
        }
        if input.notes.is_some() {
            self.notes = input.notes;
        }
    }
}
