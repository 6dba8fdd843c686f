// Search and filter logic for list views.
//
// A search string is split on whitespace; every term must occur
// (case-insensitively) in the item's name, notes, unit or category.
//   "milk"        -> any item mentioning milk
//   "green dairy" -> items mentioning both "green" and "dairy"

use crate::model::Item;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub search: String,
    pub category: Option<String>,
    pub hide_checked: bool,
    pub hide_have: bool,
}

impl ItemFilter {
    pub fn search(term: &str) -> Self {
        Self {
            search: term.to_string(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.category.is_none()
            && !self.hide_checked
            && !self.hide_have
    }

    pub fn matches(&self, item: &Item) -> bool {
        if self.hide_checked && item.checked {
            return false;
        }
        if self.hide_have && item.have {
            return false;
        }
        if let Some(cat) = &self.category
            && cat.trim().to_lowercase() != item.category.trim().to_lowercase()
        {
            return false;
        }
        item.matches_search(&self.search)
    }
}

impl Item {
    /// True when every whitespace-separated term appears in a text field.
    pub fn matches_search(&self, query: &str) -> bool {
        let haystacks = [
            self.name.to_lowercase(),
            self.notes.to_lowercase(),
            self.unit.to_lowercase(),
            self.category.to_lowercase(),
        ];
        query
            .split_whitespace()
            .map(str::to_lowercase)
            .all(|term| haystacks.iter().any(|h| h.contains(&term)))
    }
}
