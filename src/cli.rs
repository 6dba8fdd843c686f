// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing, help text and
//! plain-text rendering of the list.

use crate::model::ItemFilter;
use crate::store::ShoppingList;
use anyhow::{Result, bail};
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryAction {
    Show,
    Add(String),
    Remove(String),
    Move(String, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List(ItemFilter),
    Add(String),
    Paste,
    Import(PathBuf),
    Export { json: bool },
    Check(String),
    Have(String),
    Remove(String),
    ClearChecked,
    Merge,
    Categories(CategoryAction),
}

impl Command {
    /// Whether running the command can change the saved list.
    pub fn modifies_list(&self) -> bool {
        !matches!(
            self,
            Command::Help
                | Command::List(_)
                | Command::Export { .. }
                | Command::Categories(CategoryAction::Show)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

fn take_value(args: &[String], i: usize, flag: &str) -> Result<String> {
    match args.get(i + 1) {
        Some(v) => Ok(v.clone()),
        None => bail!("Missing value for {}", flag),
    }
}

fn take_id(rest: &[String], command: &str) -> Result<String> {
    match rest.first() {
        Some(id) => Ok(id.clone()),
        None => bail!("'{}' needs an item id", command),
    }
}

fn parse_list_flags(rest: &[String]) -> Result<ItemFilter> {
    let mut filter = ItemFilter::default();
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--search" | "-s" => {
                filter.search = take_value(rest, i, "--search")?;
                i += 1;
            }
            "--category" | "-c" => {
                filter.category = Some(take_value(rest, i, "--category")?);
                i += 1;
            }
            "--hide-checked" => filter.hide_checked = true,
            "--hide-have" => filter.hide_have = true,
            other => bail!("Unknown option for 'list': {}", other),
        }
        i += 1;
    }
    Ok(filter)
}

fn parse_categories(rest: &[String]) -> Result<CategoryAction> {
    let name = |idx: usize| -> Result<String> {
        match rest.get(idx) {
            Some(n) if !n.trim().is_empty() => Ok(n.clone()),
            _ => bail!("'categories {}' needs a category name", rest[0]),
        }
    };
    match rest.first().map(|s| s.as_str()) {
        None => Ok(CategoryAction::Show),
        Some("add") => Ok(CategoryAction::Add(name(1)?)),
        Some("remove") => Ok(CategoryAction::Remove(name(1)?)),
        Some("move") => {
            let cat = name(1)?;
            let Some(pos) = rest.get(2).and_then(|p| p.parse::<usize>().ok()) else {
                bail!("'categories move' needs a numeric position");
            };
            Ok(CategoryAction::Move(cat, pos))
        }
        Some(other) => bail!("Unknown categories action: {}", other),
    }
}

/// Parses `args` (including the binary name at index 0).
pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut root = None;
    let mut verbose = false;
    let mut i = 1;

    // Global flags come before the command.
    while i < args.len() {
        match args[i].as_str() {
            "--root" | "-r" => {
                root = Some(PathBuf::from(take_value(args, i, "--root")?));
                i += 1;
            }
            "--verbose" | "-v" => verbose = true,
            _ => break,
        }
        i += 1;
    }

    let Some(name) = args.get(i) else {
        return Ok(Invocation {
            root,
            verbose,
            command: Command::List(ItemFilter::default()),
        });
    };
    let rest = &args[i + 1..];

    let command = match name.as_str() {
        "help" | "--help" | "-h" => Command::Help,
        "list" | "ls" => Command::List(parse_list_flags(rest)?),
        "add" => {
            let text = rest.join(" ");
            if text.trim().is_empty() {
                bail!("'add' needs an item, e.g. basket add 2 lb chicken breast | Meat");
            }
            Command::Add(text)
        }
        "paste" => Command::Paste,
        "import" => match rest.first() {
            Some(path) => Command::Import(PathBuf::from(path)),
            None => bail!("'import' needs a file path"),
        },
        "export" => Command::Export {
            json: rest.iter().any(|a| a == "--json"),
        },
        "check" => Command::Check(take_id(rest, "check")?),
        "have" => Command::Have(take_id(rest, "have")?),
        "remove" | "rm" => Command::Remove(take_id(rest, "remove")?),
        "clear-checked" => Command::ClearChecked,
        "merge" => Command::Merge,
        "categories" => Command::Categories(parse_categories(rest)?),
        other => bail!("Unknown command: {} (see 'basket help')", other),
    };

    Ok(Invocation {
        root,
        verbose,
        command,
    })
}

/// Renders the grouped list the way `basket list` prints it.
pub fn render_list(list: &ShoppingList, filter: &ItemFilter) -> String {
    let mut out = String::new();
    let groups = list.grouped(filter);
    if groups.is_empty() {
        out.push_str("(no items)\n");
        return out;
    }
    for (category, items) in groups {
        let _ = writeln!(out, "{}:", category);
        for item in items {
            let mark = if item.checked { "x" } else { " " };
            let mut line = format!("  [{}] {}", mark, item.name);
            let amount = item.amount();
            if !amount.is_empty() {
                let _ = write!(line, " ({})", amount);
            }
            if item.have {
                line.push_str(" [have]");
            }
            if !item.notes.is_empty() {
                let _ = write!(line, " - {}", item.notes.replace('\n', " "));
            }
            let _ = writeln!(out, "{}  {}", line, short_id(&item.id));
        }
    }
    out
}

/// First block of a UUID, enough to address an item from the shell.
pub fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

pub fn print_help(binary_name: &str) {
    println!(
        "Basket v{} - A fast and simple shopping list manager",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [-v] <command>", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Print debug logs to stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("COMMANDS:");
    println!("    list [--search <text>] [--category <name>] [--hide-checked] [--hide-have]");
    println!("    add <text>                Add one item (freeform syntax, see below)");
    println!("    paste                     Add one item per line read from stdin");
    println!("    import <file.csv>         Append items from a CSV file");
    println!("    import <file.json>        Replace the list with an exported JSON list");
    println!("    export [--json]           Print the list as CSV (or JSON) to stdout");
    println!("    check <id>                Toggle the checked flag");
    println!("    have <id>                 Toggle the 'already have' flag");
    println!("    remove <id>               Remove an item");
    println!("    clear-checked             Remove all checked items");
    println!("    merge                     Merge duplicate items (same name and category)");
    println!("    categories [add <name> | remove <name> | move <name> <pos>]");
    println!();
    println!("FREEFORM SYNTAX:");
    println!("    <qty> <unit> <name> | <category>");
    println!("    2 lb chicken breast | Meat");
    println!("    1/2 cup sugar");
    println!("    carrots | Produce");
    println!();
    println!("CSV COLUMNS (import, case-insensitive):");
    println!("    name|item|product|ingredient, qty|quantity|amount, unit|units,");
    println!("    category|section|aisle|dept, notes|note|details, have, checked");
    println!();
    println!("EXAMPLES:");
    println!("    {} add 3 large eggs | Dairy", binary_name);
    println!("    pbpaste | {} paste", binary_name);
    println!("    {} export > list.csv", binary_name);
}
