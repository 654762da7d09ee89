//! Package templates: named item lists used to derive campaign targets.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::RecordId;

/// One item of a package template. `quantity` is per beneficiary family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// A reusable template of items, pure catalog data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<PackageItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PackageItemInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePackage {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<PackageItemInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePackage {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(nested)]
    pub items: Option<Vec<PackageItemInput>>,
}

fn items_from(inputs: Vec<PackageItemInput>) -> Vec<PackageItem> {
    inputs
        .into_iter()
        .map(|i| PackageItem {
            name: i.name,
            quantity: i.quantity,
            unit: i.unit,
        })
        .collect()
}

impl Package {
    pub fn create(input: CreatePackage) -> Self {
        Self {
            id: RecordId::new_v4(),
            name: input.name,
            description: input.description,
            items: items_from(input.items),
        }
    }

    /// Apply a partial update. Only non-`None` fields are changed.
    pub fn apply_update(&mut self, input: UpdatePackage) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(items) = input.items {
            self.items = items_from(items);
        }
    }
}
