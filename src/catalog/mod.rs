// 名前空間カタログモジュール
pub mod catalog;
pub mod types;

pub use catalog::{CatalogError, CatalogResult, NamespaceCatalog};
pub use types::{EntryId, EntryKind, EntrySummary, NamespaceEntry, StripeLayout, ROOT_ENTRY_ID};
