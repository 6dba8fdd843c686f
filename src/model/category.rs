// Category resolution and ordering.
use std::cmp::Ordering;

pub const DEFAULT_CATEGORY: &str = "Other";

/// Resolves a free-text label against the configured categories.
///
/// Blank input falls back to `"Other"`. A case-insensitive hit returns the
/// list's own spelling; anything else is kept (trimmed) as a free-text
/// category without touching the list.
pub fn normalize_category(raw: &str, categories: &[String]) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_CATEGORY.to_string();
    }
    find_category(trimmed, categories)
        .map(|c| c.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Case-insensitive lookup returning the canonical entry.
pub fn find_category<'a>(label: &str, categories: &'a [String]) -> Option<&'a str> {
    let needle = label.trim().to_lowercase();
    categories
        .iter()
        .find(|c| c.trim().to_lowercase() == needle)
        .map(|c| c.as_str())
}

/// Sort position of a category: listed ones by index, unknown ones after.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CategoryRank {
    Known(usize),
    Unknown(String),
}

pub fn category_rank(category: &str, categories: &[String]) -> CategoryRank {
    let needle = category.trim().to_lowercase();
    match categories
        .iter()
        .position(|c| c.trim().to_lowercase() == needle)
    {
        Some(idx) => CategoryRank::Known(idx),
        None => CategoryRank::Unknown(needle),
    }
}

pub fn compare_categories(a: &str, b: &str, categories: &[String]) -> Ordering {
    category_rank(a, categories).cmp(&category_rank(b, categories))
}

/// Drops blanks and case-insensitive duplicates, keeping first spellings.
pub fn dedup_categories(categories: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(categories.len());
    for cat in categories {
        let cat = cat.trim();
        if cat.is_empty() || find_category(cat, &out).is_some() {
            continue;
        }
        out.push(cat.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_matches_case_insensitively() {
        let cats = list(&["Produce", "Dairy"]);
        assert_eq!(normalize_category("produce", &cats), "Produce");
        assert_eq!(normalize_category("  DAIRY ", &cats), "Dairy");
    }

    #[test]
    fn test_normalize_blank_is_other() {
        assert_eq!(normalize_category("", &list(&["Produce"])), "Other");
        assert_eq!(normalize_category(" \t ", &[]), "Other");
    }

    #[test]
    fn test_normalize_keeps_unknown_label() {
        let cats = list(&["Produce"]);
        assert_eq!(normalize_category(" Snacks ", &cats), "Snacks");
        assert_eq!(cats.len(), 1);
    }

    #[test]
    fn test_unknown_categories_sort_after_known() {
        let cats = list(&["Produce", "Dairy"]);
        assert_eq!(
            compare_categories("Dairy", "Produce", &cats),
            Ordering::Greater
        );
        assert_eq!(
            compare_categories("Snacks", "Dairy", &cats),
            Ordering::Greater
        );
        assert_eq!(
            compare_categories("bakery", "Snacks", &cats),
            Ordering::Less
        );
    }

    #[test]
    fn test_dedup_categories() {
        let cats = dedup_categories(list(&["Produce", " produce", "", "Dairy "]));
        assert_eq!(cats, list(&["Produce", "Dairy"]));
    }
}
