// File: ./src/model/item.rs
use crate::model::category::normalize_category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_created_at() -> DateTime<Utc> {
    Utc::now()
}

fn default_category() -> String {
    crate::model::DEFAULT_CATEGORY.to_string()
}

/// A single shopping-list entry.
///
/// Every string field is present (possibly empty); only `name` and
/// `category` are guaranteed non-empty once the item is in a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default = "default_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub have: bool,
    #[serde(default)]
    pub checked: bool,
    #[serde(default = "default_created_at")]
    pub created_at: DateTime<Utc>,
}

/// Raw field values collected by an importer or typed by the user,
/// before trimming, category resolution and id assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    pub category: String,
    pub notes: String,
    pub have: bool,
    pub checked: bool,
}

impl ItemDraft {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Partial update applied by `ShoppingList::update_item`.
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub have: Option<bool>,
    pub checked: Option<bool>,
}

impl Item {
    /// Builds a fresh item from a draft. Returns `None` when the name is
    /// blank, since such a record may never enter a list.
    pub fn from_draft(draft: ItemDraft, categories: &[String]) -> Option<Self> {
        let name = draft.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            id: default_id(),
            name: name.to_string(),
            quantity: draft.quantity.trim().to_string(),
            unit: draft.unit.trim().to_string(),
            category: normalize_category(&draft.category, categories),
            notes: draft.notes.trim().to_string(),
            have: draft.have,
            checked: draft.checked,
            created_at: Utc::now(),
        })
    }

    pub fn new(name: &str, categories: &[String]) -> Option<Self> {
        Self::from_draft(ItemDraft::named(name), categories)
    }

    /// Applies a partial update. A blank name is ignored so the record
    /// stays valid.
    pub fn apply_patch(&mut self, patch: ItemPatch, categories: &[String]) {
        if let Some(name) = patch.name {
            let name = name.trim();
            if !name.is_empty() {
                self.name = name.to_string();
            }
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity.trim().to_string();
        }
        if let Some(unit) = patch.unit {
            self.unit = unit.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = normalize_category(&category, categories);
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(have) = patch.have {
            self.have = have;
        }
        if let Some(checked) = patch.checked {
            self.checked = checked;
        }
    }

    /// Quantity and unit as shown to the user, e.g. "2 lb".
    pub fn amount(&self) -> String {
        match (self.quantity.is_empty(), self.unit.is_empty()) {
            (false, false) => format!("{} {}", self.quantity, self.unit),
            (false, true) => self.quantity.clone(),
            (true, false) => self.unit.clone(),
            (true, true) => String::new(),
        }
    }

    /// Key under which duplicates are merged.
    pub fn merge_key(&self) -> (String, String) {
        (
            self.name.trim().to_lowercase(),
            self.category.trim().to_lowercase(),
        )
    }
}
