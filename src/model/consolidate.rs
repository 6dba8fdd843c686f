// File: ./src/model/consolidate.rs
use crate::model::Item;
use std::collections::HashMap;

const NOTE_SEPARATOR: &str = "; ";

/// Collapses items sharing a (name, category) key, case-insensitively.
///
/// The first item seen for a key is kept (id, name, category, creation time)
/// and later duplicates are folded into it with [`merge_into`]. Output order
/// follows the first occurrence of each key.
pub fn consolidate(items: &[Item]) -> Vec<Item> {
    let mut merged: Vec<Item> = Vec::with_capacity(items.len());
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for item in items {
        let key = item.merge_key();
        match index.get(&key).copied() {
            Some(pos) => merge_into(&mut merged[pos], item),
            None => {
                index.insert(key, merged.len());
                merged.push(item.clone());
            }
        }
    }
    merged
}

/// Folds `incoming` into `kept`.
///
/// Quantities are only added when both are numeric and the units match
/// exactly. Anything that cannot be added ends up in `kept.notes` instead of
/// being dropped. Status flags stay set only if set on both.
pub fn merge_into(kept: &mut Item, incoming: &Item) {
    let both_quantified = !kept.quantity.is_empty() && !incoming.quantity.is_empty();

    if both_quantified && kept.unit == incoming.unit {
        match (
            parse_quantity(&kept.quantity),
            parse_quantity(&incoming.quantity),
        ) {
            (Some(a), Some(b)) => kept.quantity = format_quantity(a + b),
            _ => append_notes(&mut kept.notes, &[incoming.quantity.as_str()]),
        }
    } else {
        append_notes(
            &mut kept.notes,
            &[incoming.amount().as_str(), incoming.notes.as_str()],
        );
    }

    kept.have = kept.have && incoming.have;
    kept.checked = kept.checked && incoming.checked;
}

fn parse_quantity(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// Plain decimal, never exponent form; `-0` prints as `0`.
fn format_quantity(sum: f64) -> String {
    if sum == 0.0 {
        return "0".to_string();
    }
    sum.to_string()
}

fn append_notes(notes: &mut String, pieces: &[&str]) {
    let joined = std::iter::once(notes.as_str())
        .chain(pieces.iter().copied())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(NOTE_SEPARATOR);
    *notes = joined;
}
