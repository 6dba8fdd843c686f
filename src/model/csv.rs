// File: ./src/model/csv.rs
//! Conversion between item lists and quoted, comma-separated text.
//!
//! Encoding always produces the fixed column set of [`Column`]. Decoding is
//! lenient: it yields header-keyed rows ([`CsvRow`]) and leaves the
//! interpretation of columns to [`rows_to_items`], which understands the
//! usual aliases exported by other list apps (`qty`, `aisle`, `product`...).

use crate::model::item::{Item, ItemDraft};
use std::collections::HashMap;
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

pub const CSV_MIME_TYPE: &str = "text/csv";
pub const CSV_EXTENSION: &str = "csv";

const NAME_ALIASES: &[&str] = &["name", "item", "product", "ingredient"];
const QUANTITY_ALIASES: &[&str] = &["qty", "quantity", "amount"];
const UNIT_ALIASES: &[&str] = &["unit", "units"];
const CATEGORY_ALIASES: &[&str] = &["category", "section", "aisle", "dept"];
const NOTES_ALIASES: &[&str] = &["notes", "note", "details"];

/// Exported columns, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Column {
    Name,
    Quantity,
    Unit,
    Category,
    Notes,
    Have,
    Checked,
}

impl Column {
    fn value(self, item: &Item) -> String {
        match self {
            Column::Name => item.name.clone(),
            Column::Quantity => item.quantity.clone(),
            Column::Unit => item.unit.clone(),
            Column::Category => item.category.clone(),
            Column::Notes => item.notes.clone(),
            Column::Have => bool_cell(item.have).to_string(),
            Column::Checked => bool_cell(item.checked).to_string(),
        }
    }
}

fn bool_cell(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Serializes items under the fixed header. Rows are `\n`-joined with no
/// trailing newline; every data cell is quoted.
pub fn encode(items: &[Item]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(
        Column::iter()
            .map(|c| c.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(","),
    );
    for item in items {
        let cells: Vec<String> = Column::iter().map(|c| quote(&c.value(item))).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// One decoded data row, keyed by lowercased, trimmed header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow(HashMap<String, String>);

impl CsvRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(|s| s.as_str())
    }

    /// Value of the first alias holding non-blank text, trimmed.
    pub fn first_of(&self, aliases: &[&str]) -> &str {
        aliases
            .iter()
            .filter_map(|a| self.get(a))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }

    /// `true|yes|y|1`, case-insensitive.
    pub fn flag(&self, column: &str) -> bool {
        self.get(column).is_some_and(is_truthy)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// Single-pass splitter state.
#[derive(Debug, Default)]
struct RowSplitter {
    field: String,
    row: Vec<String>,
    rows: Vec<Vec<String>>,
    in_quotes: bool,
    quoted: bool,
}

impl RowSplitter {
    fn end_field(&mut self) {
        self.row.push(std::mem::take(&mut self.field));
        self.quoted = false;
    }

    // A terminator only closes the row once a row has been completed
    // before, or when the row already spans several fields. Until then the
    // fields keep accumulating into the first row. Empty lines before the
    // first row carry no token and are dropped.
    fn end_line(&mut self) {
        if self.rows.is_empty() && self.row.is_empty() && self.field.is_empty() && !self.quoted {
            return;
        }
        self.end_field();
        if !self.rows.is_empty() || self.row.len() > 1 {
            self.rows.push(std::mem::take(&mut self.row));
        }
    }

    fn finish(mut self) -> Vec<Vec<String>> {
        if !self.field.is_empty() || !self.row.is_empty() {
            self.end_field();
            self.rows.push(std::mem::take(&mut self.row));
        }
        self.rows
    }
}

fn split_rows(text: &str) -> Vec<Vec<String>> {
    let mut state = RowSplitter::default();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if state.in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    state.field.push('"');
                }
                '"' => state.in_quotes = false,
                _ => state.field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                state.in_quotes = true;
                state.quoted = true;
            }
            ',' => state.end_field(),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                state.end_line();
            }
            '\n' => state.end_line(),
            _ => state.field.push(c),
        }
    }

    state.finish()
}

/// Drops a leading UTF-8 byte-order mark, as written by spreadsheet exports.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Parses CSV text into header-keyed rows. The first non-blank row is the
/// header; blank rows are dropped; text without a header yields nothing.
pub fn decode(text: &str) -> Vec<CsvRow> {
    let text = strip_bom(text);
    let mut rows = split_rows(text)
        .into_iter()
        .filter(|row| row.iter().any(|f| !f.trim().is_empty()));

    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let keys: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

    rows.map(|row| {
        let map = keys.iter().cloned().zip(row).collect::<HashMap<_, _>>();
        CsvRow(map)
    })
    .collect()
}

/// Resolves a decoded row through the column aliases.
pub fn row_to_draft(row: &CsvRow) -> ItemDraft {
    ItemDraft {
        name: row.first_of(NAME_ALIASES).to_string(),
        quantity: row.first_of(QUANTITY_ALIASES).to_string(),
        unit: row.first_of(UNIT_ALIASES).to_string(),
        category: row.first_of(CATEGORY_ALIASES).to_string(),
        notes: row.first_of(NOTES_ALIASES).to_string(),
        have: row.flag("have"),
        checked: row.flag("checked"),
    }
}

/// Converts decoded rows into fresh items, skipping nameless rows.
pub fn rows_to_items(rows: &[CsvRow], categories: &[String]) -> Vec<Item> {
    rows.iter()
        .filter_map(|row| Item::from_draft(row_to_draft(row), categories))
        .collect()
}

/// Decode and resolve in one step.
pub fn parse_items(text: &str, categories: &[String]) -> Vec<Item> {
    rows_to_items(&decode(text), categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<String> {
        vec!["Produce".to_string(), "Dairy".to_string()]
    }

    #[test]
    fn test_encode_header_and_quoting() {
        let mut item = Item::new("Milk", &cats()).unwrap();
        item.quantity = "1".to_string();
        item.unit = "gal".to_string();
        item.category = "Dairy".to_string();
        item.notes = "the \"good\" one".to_string();
        item.have = true;

        let csv = encode(&[item]);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines[0], "name,quantity,unit,category,notes,have,checked");
        assert_eq!(
            lines[1],
            r#""Milk","1","gal","Dairy","the ""good"" one","TRUE","FALSE""#
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_encode_empty_list_is_header_only() {
        assert_eq!(encode(&[]), "name,quantity,unit,category,notes,have,checked");
    }

    #[test]
    fn test_decode_quoted_comma_and_newline() {
        let text = "name,notes\n\"Apples\",\"red, crisp\nfrom the market\"\nPears,ripe";
        let rows = decode(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some("Apples"));
        assert_eq!(rows[0].get("notes"), Some("red, crisp\nfrom the market"));
        assert_eq!(rows[1].get("name"), Some("Pears"));
        assert_eq!(rows[1].get("notes"), Some("ripe"));
    }

    #[test]
    fn test_decode_crlf_matches_lf() {
        let lf = "Name,Qty\nEggs,12\nButter,1\n";
        let crlf = "Name,Qty\r\nEggs,12\r\nButter,1\r\n";
        assert_eq!(decode(lf), decode(crlf));
        assert_eq!(decode(lf).len(), 2);
    }

    #[test]
    fn test_decode_doubled_quotes() {
        let rows = decode("name,notes\n\"Tea\",\"say \"\"hi\"\"\"");
        assert_eq!(rows[0].get("notes"), Some("say \"hi\""));
    }

    #[test]
    fn test_decode_headers_are_lowercased_and_trimmed() {
        let rows = decode(" Product , AISLE \nBread,Bakery");
        assert_eq!(rows[0].get("product"), Some("Bread"));
        assert_eq!(rows[0].get("aisle"), Some("Bakery"));
    }

    #[test]
    fn test_decode_drops_blank_rows() {
        let rows = decode("name,qty\n , \nCheese,1\n,\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Cheese"));
    }

    #[test]
    fn test_decode_without_header_is_empty() {
        assert!(decode("").is_empty());
        assert!(decode("\n\n").is_empty());
        assert!(decode("name,qty").is_empty());
    }

    #[test]
    fn test_single_column_first_break_is_not_a_row() {
        // The first terminator of a one-field row does not close it.
        let rows = decode("name\nmilk\neggs");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("eggs"), None);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0].get("name"), Some("eggs"));
    }

    #[test]
    fn test_leading_blank_line_does_not_shift_columns() {
        let rows = decode("\nname,qty\nMilk,1");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Milk"));
        assert_eq!(rows[0].get("qty"), Some("1"));

        let rows = decode("\r\n\nname\nmilk\neggs");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("eggs"));
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let rows = decode("\u{feff}Name,Qty\nMilk,1");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Milk"));
        assert_eq!(strip_bom("plain"), "plain");
    }

    #[test]
    fn test_aliases_resolve_to_items() {
        let text = "Item,Amount,Units,Aisle,Details,Have,Checked\n\
                    Carrots,3,lb,produce,organic,yes,no\n\
                    ,2,,Dairy,,,\n\
                    Chips,,,Snacks,,Y,1";
        let items = parse_items(text, &cats());
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].name, "Carrots");
        assert_eq!(items[0].quantity, "3");
        assert_eq!(items[0].unit, "lb");
        assert_eq!(items[0].category, "Produce");
        assert_eq!(items[0].notes, "organic");
        assert!(items[0].have);
        assert!(!items[0].checked);

        assert_eq!(items[1].name, "Chips");
        assert_eq!(items[1].category, "Snacks");
        assert!(items[1].have);
        assert!(items[1].checked);
    }

    #[test]
    fn test_first_non_blank_alias_wins() {
        let rows = decode("name,item,qty,quantity\n,Bagels,,6");
        let draft = row_to_draft(&rows[0]);
        assert_eq!(draft.name, "Bagels");
        assert_eq!(draft.quantity, "6");
    }

    #[test]
    fn test_truthy_values() {
        for v in ["true", "TRUE", " yes ", "Y", "1"] {
            assert!(is_truthy(v), "{v} should be truthy");
        }
        for v in ["", "no", "false", "0", "2", "yess"] {
            assert!(!is_truthy(v), "{v} should be falsy");
        }
    }
}
