// JSON export/import of a whole list.
use crate::model::category::{dedup_categories, normalize_category};
use crate::model::csv::strip_bom;
use crate::model::Item;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `{ "items": [...], "categories": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListDocument {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ListDocument {
    pub fn new(items: Vec<Item>, categories: Vec<String>) -> Self {
        Self { items, categories }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses an exported document and repairs it so every item satisfies
    /// the list invariants. Nameless items are dropped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: ListDocument = serde_json::from_str(strip_bom(json))
            .context("Failed to parse list JSON")?;
        Ok(raw.sanitized())
    }

    /// Trims names, drops nameless items, fills missing ids and
    /// re-resolves categories against the document's own list.
    pub fn sanitized(self) -> Self {
        let categories = dedup_categories(self.categories);
        let items = self
            .items
            .into_iter()
            .filter_map(|mut item| {
                item.name = item.name.trim().to_string();
                if item.name.is_empty() {
                    return None;
                }
                if item.id.trim().is_empty() {
                    item.id = Uuid::new_v4().to_string();
                }
                item.category = normalize_category(&item.category, &categories);
                Some(item)
            })
            .collect();
        Self { items, categories }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_shape() {
        let cats = vec!["Dairy".to_string()];
        let item = Item::new("Milk", &cats).unwrap();
        let doc = ListDocument::new(vec![item], cats);
        let json = doc.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["categories"][0], "Dairy");
        assert_eq!(value["items"][0]["name"], "Milk");
        assert_eq!(value["items"][0]["have"], false);
        assert!(value["items"][0]["createdAt"].is_string());
        assert!(json.contains('\n'), "export should be pretty-printed");
    }

    #[test]
    fn test_import_repairs_items() {
        let json = r#"{
            "categories": ["Dairy", "dairy", "Produce"],
            "items": [
                {"id": "", "name": "  Cheese ", "category": "DAIRY"},
                {"name": "   "},
                {"id": "keep-me", "name": "Kale", "category": ""}
            ]
        }"#;
        let doc = ListDocument::from_json(json).unwrap();
        assert_eq!(doc.categories, vec!["Dairy", "Produce"]);
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].name, "Cheese");
        assert_eq!(doc.items[0].category, "Dairy");
        assert!(!doc.items[0].id.is_empty());
        assert_eq!(doc.items[1].id, "keep-me");
        assert_eq!(doc.items[1].category, "Other");
    }

    #[test]
    fn test_import_accepts_byte_order_mark() {
        let json = "\u{feff}{\"categories\": [\"Dairy\"], \"items\": [{\"name\": \"Milk\"}]}";
        let doc = ListDocument::from_json(json).unwrap();
        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.items[0].category, "Dairy");
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        assert!(ListDocument::from_json("{ not json").is_err());
        assert!(ListDocument::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let cats = vec!["Produce".to_string()];
        let mut item = Item::new("Leeks", &cats).unwrap();
        item.quantity = "3".to_string();
        item.checked = true;
        let doc = ListDocument::new(vec![item], cats);
        let back = ListDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }
}
