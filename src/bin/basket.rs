use anyhow::{Context, Result, anyhow};
use basket::cli::{self, CategoryAction, Command};
use basket::config::Config;
use basket::context::StandardContext;
use basket::model::ItemDraft;
use basket::model::importer;
use basket::storage::LocalStorage;
use basket::store::ShoppingList;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::Path;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let invocation = cli::parse_args(&args)?;

    let level = if invocation.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        ConfigBuilder::new().build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    if invocation.command == Command::Help {
        cli::print_help("basket");
        return Ok(());
    }

    let ctx = StandardContext::new(invocation.root.clone());
    let config = Config::load_or_default(&ctx)?;
    let mut list = LocalStorage::load(&ctx)?
        .unwrap_or_else(|| ShoppingList::new(config.default_categories.clone()));

    // Input is read up front; the list operations themselves are synchronous.
    let input = match &invocation.command {
        Command::Paste => Some(read_stdin().await?),
        Command::Import(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        _ => None,
    };

    run(&invocation.command, input.as_deref(), &mut list, &config)?;

    if invocation.command.modifies_list() {
        LocalStorage::save(&ctx, &list)?;
    }
    Ok(())
}

async fn read_stdin() -> Result<String> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read stdin")?;
    Ok(text)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn resolve_id(list: &ShoppingList, prefix: &str) -> Result<String> {
    list.find_by_prefix(prefix)
        .map(|item| item.id.clone())
        .ok_or_else(|| anyhow!("No unique item matches id '{}'", prefix))
}

fn after_import(list: &mut ShoppingList, config: &Config, added: usize) {
    println!("Imported {} item(s)", added);
    if config.merge_on_import {
        let merged = list.consolidate();
        if merged > 0 {
            println!("Merged {} duplicate item(s)", merged);
        }
    }
}

fn run(
    command: &Command,
    input: Option<&str>,
    list: &mut ShoppingList,
    config: &Config,
) -> Result<()> {
    match command {
        Command::Help => cli::print_help("basket"),
        Command::List(filter) => {
            let mut filter = filter.clone();
            filter.hide_checked |= config.hide_checked;
            print!("{}", cli::render_list(list, &filter));
        }
        Command::Add(text) => {
            let draft: ItemDraft = importer::parse_line(text)
                .ok_or_else(|| anyhow!("Nothing to add"))?;
            let item = list
                .add_item(draft)
                .ok_or_else(|| anyhow!("Item needs a name"))?;
            println!("Added {} ({})", item.name, cli::short_id(&item.id));
        }
        Command::Paste => {
            let added = list.import_lines(input.unwrap_or_default());
            after_import(list, config, added);
        }
        Command::Import(path) => {
            let text = input.unwrap_or_default();
            if is_json(path) {
                *list = ShoppingList::import_json(text)?;
                println!("Loaded {} item(s) from {}", list.len(), path.display());
            } else {
                let added = list.import_csv(text);
                after_import(list, config, added);
            }
        }
        Command::Export { json } => {
            if *json {
                println!("{}", list.export_json()?);
            } else {
                println!("{}", list.export_csv());
            }
        }
        Command::Check(prefix) => {
            let id = resolve_id(list, prefix)?;
            if let Some(item) = list.toggle_checked(&id) {
                let state = if item.checked { "checked" } else { "unchecked" };
                println!("{} {}", item.name, state);
            }
        }
        Command::Have(prefix) => {
            let id = resolve_id(list, prefix)?;
            if let Some(item) = list.toggle_have(&id) {
                let state = if item.have { "have" } else { "need" };
                println!("{}: {}", item.name, state);
            }
        }
        Command::Remove(prefix) => {
            let id = resolve_id(list, prefix)?;
            if let Some(item) = list.remove_item(&id) {
                println!("Removed {}", item.name);
            }
        }
        Command::ClearChecked => {
            println!("Removed {} checked item(s)", list.clear_checked());
        }
        Command::Merge => {
            println!("Merged {} duplicate item(s)", list.consolidate());
        }
        Command::Categories(action) => match action {
            CategoryAction::Show => {
                for (i, cat) in list.categories.iter().enumerate() {
                    println!("{:>3}  {}", i, cat);
                }
            }
            CategoryAction::Add(name) => {
                if !list.add_category(name) {
                    anyhow::bail!("Category '{}' already exists", name.trim());
                }
            }
            CategoryAction::Remove(name) => {
                if !list.remove_category(name) {
                    anyhow::bail!("No category named '{}'", name.trim());
                }
            }
            CategoryAction::Move(name, pos) => {
                if !list.move_category(name, *pos) {
                    anyhow::bail!("No category named '{}'", name.trim());
                }
            }
        },
    }
    Ok(())
}
