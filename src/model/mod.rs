// File: ./src/model/mod.rs
pub mod category;
pub mod consolidate;
pub mod csv;
pub mod document;
pub mod importer;
pub mod item;
pub mod matcher;

pub use category::{DEFAULT_CATEGORY, normalize_category};
pub use consolidate::consolidate;
pub use document::ListDocument;
pub use item::{Item, ItemDraft, ItemPatch};
pub use matcher::ItemFilter;
