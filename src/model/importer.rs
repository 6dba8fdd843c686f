// File: ./src/model/importer.rs
// Freeform paste import.
//
// Each non-blank line becomes one item:
//
//   2 lb chicken breast | Meat   -> qty "2", unit "lb", name "chicken breast"
//   1/2 cup sugar                -> qty "1/2", unit "cup", name "sugar"
//   carrots                      -> name "carrots"
//
// The part after the first '|' is the category. The amount prefix is only
// recognised when quantity, unit and a remaining name are all present;
// otherwise the whole text is the name.

use crate::model::item::{Item, ItemDraft};

/// Result of splitting the descriptive part of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount<'a> {
    pub quantity: &'a str,
    pub unit: &'a str,
    pub name: &'a str,
}

/// Consumes a leading quantity token: an ASCII digit followed by digits,
/// '.' or '/'. Returns the token and the rest (starting at whitespace).
fn take_quantity(input: &str) -> Option<(&str, &str)> {
    if !input.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let end = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '/'))
        .unwrap_or(input.len());
    split_at_whitespace(input, end)
}

/// Consumes one ASCII-alphabetic word followed by whitespace.
fn take_unit(input: &str) -> Option<(&str, &str)> {
    let end = input
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    split_at_whitespace(input, end)
}

// The token must be followed by at least one whitespace character.
fn split_at_whitespace(input: &str, end: usize) -> Option<(&str, &str)> {
    let (token, rest) = input.split_at(end);
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((token, rest.trim_start()))
}

/// Tries `<quantity> <unit> <name>` on already-trimmed text.
pub fn split_amount(text: &str) -> Option<Amount<'_>> {
    let (quantity, rest) = take_quantity(text)?;
    let (unit, rest) = take_unit(rest)?;
    let name = rest.trim();
    if name.is_empty() {
        return None;
    }
    Some(Amount {
        quantity,
        unit,
        name,
    })
}

/// Turns one pasted line into a draft, or `None` for a blank line.
pub fn parse_line(line: &str) -> Option<ItemDraft> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (left, category) = match line.split_once('|') {
        Some((left, right)) => (left.trim(), right.trim()),
        None => (line, ""),
    };

    let mut draft = ItemDraft {
        category: category.to_string(),
        ..Default::default()
    };
    match split_amount(left) {
        Some(amount) => {
            draft.quantity = amount.quantity.to_string();
            draft.unit = amount.unit.to_string();
            draft.name = amount.name.to_string();
        }
        None => draft.name = left.to_string(),
    }
    Some(draft)
}

/// Parses a pasted block into fresh items, in line order. Lines without a
/// usable name are skipped.
pub fn parse_lines(text: &str, categories: &[String]) -> Vec<Item> {
    text.lines()
        .filter_map(parse_line)
        .filter_map(|draft| Item::from_draft(draft, categories))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<String> {
        vec!["Meat".to_string(), "Produce".to_string()]
    }

    #[test]
    fn test_full_line_with_category() {
        let items = parse_lines("2 lb chicken breast | Meat", &cats());
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.quantity, "2");
        assert_eq!(item.unit, "lb");
        assert_eq!(item.name, "chicken breast");
        assert_eq!(item.category, "Meat");
        assert!(!item.checked);
        assert!(!item.have);
    }

    #[test]
    fn test_plain_name() {
        let items = parse_lines("carrots", &cats());
        assert_eq!(items[0].name, "carrots");
        assert_eq!(items[0].quantity, "");
        assert_eq!(items[0].unit, "");
        assert_eq!(items[0].category, "Other");
    }

    #[test]
    fn test_fraction_and_decimal_quantities() {
        let a = split_amount("1/2 cup sugar").unwrap();
        assert_eq!((a.quantity, a.unit, a.name), ("1/2", "cup", "sugar"));
        let b = split_amount("1.5 kg flour, bread").unwrap();
        assert_eq!((b.quantity, b.unit, b.name), ("1.5", "kg", "flour, bread"));
    }

    #[test]
    fn test_amount_needs_all_three_parts() {
        assert_eq!(split_amount("2 apples"), None);
        assert_eq!(split_amount("2lb chicken"), None);
        assert_eq!(split_amount("lb 2 chicken"), None);
        assert_eq!(split_amount("2 x2 batteries"), None);

        let items = parse_lines("2 apples", &cats());
        assert_eq!(items[0].name, "2 apples");
        assert_eq!(items[0].quantity, "");
    }

    #[test]
    fn test_any_word_counts_as_unit() {
        let a = split_amount("3 large eggs").unwrap();
        assert_eq!(a.unit, "large");
        assert_eq!(a.name, "eggs");
    }

    #[test]
    fn test_only_first_pipe_splits() {
        let items = parse_lines("bread | Bakery | fresh", &cats());
        assert_eq!(items[0].name, "bread");
        assert_eq!(items[0].category, "Bakery | fresh");
    }

    #[test]
    fn test_blank_category_part_defaults() {
        let items = parse_lines("onions |   ", &cats());
        assert_eq!(items[0].category, "Other");
        let items = parse_lines("beef | meat", &cats());
        assert_eq!(items[0].category, "Meat");
    }

    #[test]
    fn test_blank_and_nameless_lines_are_skipped() {
        let text = "\n  \nmilk\r\n | Produce\n\t\nbutter\n";
        let items = parse_lines(text, &cats());
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["milk", "butter"]);
        assert!(parse_lines("", &cats()).is_empty());
    }

    #[test]
    fn test_each_item_gets_its_own_id() {
        let items = parse_lines("a\nb\nc", &cats());
        assert_eq!(items.len(), 3);
        assert_ne!(items[0].id, items[1].id);
        assert_ne!(items[1].id, items[2].id);
    }
}
