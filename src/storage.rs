// Manages local file storage for the shopping list.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the Item struct serialization require incrementing
// LIST_STORAGE_VERSION below. Older builds then refuse the newer file
// instead of silently dropping fields.
use crate::context::AppContext;
use crate::model::ListDocument;
use crate::model::csv::strip_bom;
use crate::store::ShoppingList;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: items + categories
const LIST_STORAGE_VERSION: u32 = 1;

/// On-disk wrapper around the list.
#[derive(Serialize, Deserialize)]
struct StoredList {
    #[serde(default)]
    version: u32,
    #[serde(flatten)]
    list: ShoppingList,
}

pub struct LocalStorage;

impl LocalStorage {
    /// Sidecar lock file next to `file_path` (`list.json` -> `list.json.lock`).
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive lock on the sidecar file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn parse(json: &str) -> Result<ShoppingList> {
        let stored: StoredList =
            serde_json::from_str(strip_bom(json)).context("Saved list is not valid JSON")?;
        if stored.version > LIST_STORAGE_VERSION {
            log::warn!(
                "Refusing list file version {} (supported: {})",
                stored.version,
                LIST_STORAGE_VERSION
            );
            anyhow::bail!(
                "List file was written by a newer version (v{}, supported v{})",
                stored.version,
                LIST_STORAGE_VERSION
            );
        }
        // Hand-edited files get the same repairs as a JSON import.
        let doc = ListDocument::new(stored.list.items, stored.list.categories);
        Ok(ShoppingList::from(doc.sanitized()))
    }

    /// Loads the list at `path`. A missing file yields `None`.
    pub fn load_from_path(path: &Path) -> Result<Option<ShoppingList>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::with_lock(path, || {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read list file {:?}", path))?;
            let list = Self::parse(&json)?;
            log::info!("Loaded {} item(s) from {:?}", list.len(), path);
            Ok(Some(list))
        })
    }

    pub fn save_to_path(path: &Path, list: &ShoppingList) -> Result<()> {
        Self::with_lock(path, || {
            let data = StoredList {
                version: LIST_STORAGE_VERSION,
                list: list.clone(),
            };
            let json = serde_json::to_string_pretty(&data)?;
            Self::atomic_write(path, json)?;
            log::info!("Saved {} item(s) to {:?}", list.len(), path);
            Ok(())
        })
    }

    /// Loads the saved list, or `None` when nothing has been saved yet.
    pub fn load(ctx: &dyn AppContext) -> Result<Option<ShoppingList>> {
        Self::load_from_path(&ctx.get_list_path()?)
    }

    pub fn save(ctx: &dyn AppContext, list: &ShoppingList) -> Result<()> {
        Self::save_to_path(&ctx.get_list_path()?, list)
    }
}
