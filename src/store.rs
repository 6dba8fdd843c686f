// File: src/store.rs
use crate::model::category::{category_rank, dedup_categories, find_category};
use crate::model::{
    Item, ItemDraft, ItemFilter, ItemPatch, ListDocument, consolidate, csv, importer,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The working collection: items in display order plus the ordered
/// category list used for normalization and grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ShoppingList {
    pub fn new(categories: Vec<String>) -> Self {
        Self {
            items: Vec::new(),
            categories: dedup_categories(categories),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Looks an item up by full id or by an unambiguous id prefix.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Item> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return None;
        }
        if let Some(item) = self.get(prefix) {
            return Some(item);
        }
        let mut hits = self.items.iter().filter(|i| i.id.starts_with(prefix));
        match (hits.next(), hits.next()) {
            (Some(item), None) => Some(item),
            _ => None,
        }
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    // --- Item lifecycle ---

    /// Adds one item at the top of the list. Returns `None` (and adds
    /// nothing) when the draft has no usable name.
    pub fn add_item(&mut self, draft: ItemDraft) -> Option<&Item> {
        let item = Item::from_draft(draft, &self.categories)?;
        log::debug!("Adding item {} ({})", item.name, item.id);
        self.items.insert(0, item);
        self.items.first()
    }

    pub fn update_item(&mut self, id: &str, patch: ItemPatch) -> Option<&Item> {
        let categories = self.categories.clone();
        let item = self.get_mut(id)?;
        item.apply_patch(patch, &categories);
        Some(&*item)
    }

    pub fn toggle_checked(&mut self, id: &str) -> Option<&Item> {
        let item = self.get_mut(id)?;
        item.checked = !item.checked;
        Some(&*item)
    }

    pub fn toggle_have(&mut self, id: &str) -> Option<&Item> {
        let item = self.get_mut(id)?;
        item.have = !item.have;
        Some(&*item)
    }

    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Removes every checked item, returning how many were dropped.
    pub fn clear_checked(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|i| !i.checked);
        before - self.items.len()
    }

    pub fn clear_all(&mut self) {
        self.items.clear();
    }

    // --- Import / export ---

    // Imported blocks go on top, keeping their own order.
    fn prepend(&mut self, mut imported: Vec<Item>) -> usize {
        let count = imported.len();
        imported.append(&mut self.items);
        self.items = imported;
        count
    }

    /// Imports a freeform pasted block. Returns the number of new items.
    pub fn import_lines(&mut self, text: &str) -> usize {
        let imported = importer::parse_lines(text, &self.categories);
        log::debug!("Parsed {} item(s) from pasted text", imported.len());
        self.prepend(imported)
    }

    /// Imports CSV text using the column aliases. Returns the number of
    /// new items.
    pub fn import_csv(&mut self, text: &str) -> usize {
        let imported = csv::parse_items(text, &self.categories);
        log::debug!("Parsed {} item(s) from CSV", imported.len());
        self.prepend(imported)
    }

    pub fn export_csv(&self) -> String {
        csv::encode(&self.items)
    }

    pub fn to_document(&self) -> ListDocument {
        ListDocument::new(self.items.clone(), self.categories.clone())
    }

    pub fn export_json(&self) -> Result<String> {
        self.to_document().to_json()
    }

    /// Builds a list from an exported JSON document.
    pub fn import_json(json: &str) -> Result<Self> {
        let doc = ListDocument::from_json(json)?;
        Ok(Self::from(doc))
    }

    /// Merges duplicate items in place. Returns how many records were
    /// folded into others.
    pub fn consolidate(&mut self) -> usize {
        let before = self.items.len();
        self.items = consolidate(&self.items);
        let merged = before - self.items.len();
        if merged > 0 {
            log::debug!("Consolidated {} duplicate item(s)", merged);
        }
        merged
    }

    // --- Categories ---

    /// Appends a category unless blank or already present (any casing).
    pub fn add_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || find_category(name, &self.categories).is_some() {
            return false;
        }
        self.categories.push(name.to_string());
        true
    }

    /// Removes a category from the list. Items keep the label as a
    /// free-text category.
    pub fn remove_category(&mut self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        let before = self.categories.len();
        self.categories.retain(|c| c.trim().to_lowercase() != needle);
        self.categories.len() != before
    }

    /// Moves a category to `index` (clamped to the end of the list).
    pub fn move_category(&mut self, name: &str, index: usize) -> bool {
        let needle = name.trim().to_lowercase();
        let Some(from) = self
            .categories
            .iter()
            .position(|c| c.trim().to_lowercase() == needle)
        else {
            return false;
        };
        let cat = self.categories.remove(from);
        let to = index.min(self.categories.len());
        self.categories.insert(to, cat);
        true
    }

    // --- Views ---

    pub fn filtered(&self, filter: &ItemFilter) -> Vec<&Item> {
        self.items.iter().filter(|i| filter.matches(i)).collect()
    }

    /// Matching items grouped by category: configured categories first in
    /// list order, then unknown ones by name.
    pub fn grouped(&self, filter: &ItemFilter) -> Vec<(String, Vec<&Item>)> {
        let mut matching = self.filtered(filter);
        matching.sort_by_cached_key(|i| category_rank(&i.category, &self.categories));

        let mut groups: Vec<(String, Vec<&Item>)> = Vec::new();
        for item in matching {
            let key = item.category.to_lowercase();
            match groups.last_mut() {
                Some((cat, members)) if cat.to_lowercase() == key => members.push(item),
                _ => groups.push((item.category.clone(), vec![item])),
            }
        }
        groups
    }
}

impl From<ListDocument> for ShoppingList {
    fn from(doc: ListDocument) -> Self {
        Self {
            items: doc.items,
            categories: dedup_categories(doc.categories),
        }
    }
}
