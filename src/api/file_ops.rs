/// File operations for StripeFS
///
/// This module provides the high-level operations served to thin
/// collaborators: path resolution, directory listing, upload with
/// inherited striping, layout inspection and mutation, reconstruction
/// on download, and storage-free placement visualization.
use std::path::Path;
use std::rc::Rc;

use tracing::instrument;

use crate::api::types::{ApiError, ApiResult};
use crate::catalog::{EntryId, EntryKind, EntrySummary, NamespaceCatalog, StripeLayout};
use crate::storage::{StripeStore, TargetSet};
use crate::striping::{placement_of, StripingEngine, TargetPlacement};

/// StripeFS facade
///
/// This is the main entry point for filesystem operations. It wires the
/// namespace catalog, the striping engine and the fixed target set
/// together. Single-threaded per request; callers sequence their own
/// operations.
pub struct StripeFs {
    /// Namespace catalog
    catalog: NamespaceCatalog,

    /// Striping engine
    engine: StripingEngine,

    /// Fixed, ordered target set
    targets: Rc<TargetSet>,
}

impl StripeFs {
    /// Create a new StripeFS instance with an empty namespace
    ///
    /// # Arguments
    /// * `targets` - Fixed target set (injected at startup)
    /// * `store` - Stripe store backend
    /// * `default_layout` - Layout applied to the root directory, inherited
    ///   by everything created under it until overridden
    pub fn new(
        targets: Rc<TargetSet>,
        store: Rc<dyn StripeStore>,
        default_layout: StripeLayout,
    ) -> Self {
        Self {
            catalog: NamespaceCatalog::new(default_layout),
            engine: StripingEngine::new(store),
            targets,
        }
    }

    /// Create a StripeFS instance from a previously saved catalog snapshot
    pub fn with_catalog(
        targets: Rc<TargetSet>,
        store: Rc<dyn StripeStore>,
        catalog: NamespaceCatalog,
    ) -> Self {
        Self {
            catalog,
            engine: StripingEngine::new(store),
            targets,
        }
    }

    /// Number of configured targets
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Resolve a path to an entry id
    pub fn resolve(&self, path: &str) -> ApiResult<EntryId> {
        Ok(self.catalog.resolve(path)?)
    }

    /// List the children of a directory path
    pub fn list_children(&self, path: &str) -> ApiResult<Vec<EntrySummary>> {
        let id = self.catalog.resolve(path)?;
        Ok(self.catalog.list_children(id)?)
    }

    /// Create a directory under an existing directory path
    ///
    /// The new directory snapshots the parent's current layout as its own
    /// inheritance default. Catalog-only; directories own no stripes.
    #[instrument(level = "debug", name = "create_directory", skip(self))]
    pub fn create_directory(&self, path: &str, name: &str) -> ApiResult<EntryId> {
        let parent = self.catalog.resolve(path)?;
        let layout = self.catalog.layout_of(parent)?;

        let id = self
            .catalog
            .create_entry(parent, name, EntryKind::Directory, 0, layout)?;

        Ok(id)
    }

    /// Create a file under an existing directory path and stripe its bytes
    ///
    /// The file snapshots the destination directory's *current* layout;
    /// later changes to the directory do not affect it. The catalog row is
    /// inserted before the stripes are written; if a stripe write fails the
    /// row is left in place, matching the no-rollback write contract.
    #[instrument(level = "debug", name = "create_file", skip(self, data), fields(len = data.len()))]
    pub fn create_file(&self, path: &str, name: &str, data: &[u8]) -> ApiResult<EntryId> {
        let parent = self.catalog.resolve(path)?;
        let layout = self.catalog.layout_of(parent)?;

        let id = self.catalog.create_entry(
            parent,
            name,
            EntryKind::File,
            data.len() as u64,
            layout,
        )?;

        self.engine.write_striped(id, data, layout)?;

        tracing::info!(
            "Uploaded file {} under {} (id={}, {} bytes)",
            name,
            path,
            id,
            data.len()
        );

        Ok(id)
    }

    /// Get the stripe layout of a path
    pub fn get_layout(&self, path: &str) -> ApiResult<StripeLayout> {
        let id = self.catalog.resolve(path)?;
        Ok(self.catalog.layout_of(id)?)
    }

    /// Set the stripe layout of a path
    ///
    /// Rejected with `InvalidLayout` before any metadata mutation when the
    /// stripe count exceeds the configured target count. For a file this is
    /// a metadata-only update: already-written stripes are not rewritten,
    /// so file-level layout changes are only safe on empty files.
    #[instrument(level = "debug", name = "set_layout", skip(self))]
    pub fn set_layout(&self, path: &str, layout: StripeLayout) -> ApiResult<()> {
        if layout.stripe_count as usize > self.targets.len() {
            return Err(ApiError::InvalidLayout {
                requested: layout.stripe_count,
                available: self.targets.len(),
            });
        }

        let id = self.catalog.resolve(path)?;
        let entry = self.catalog.get_entry(id)?;

        if !entry.is_directory() && entry.size > 0 {
            tracing::warn!(
                "Layout change on non-empty file {} (id={}) updates metadata only; \
                 existing stripes are not rewritten",
                entry.name,
                id
            );
        }

        self.catalog.update_layout(id, layout)?;

        Ok(())
    }

    /// Reconstruct a file's bytes from its stripes
    ///
    /// Fails with `NotFound` for missing stripes (no partial result) and
    /// with `ReassemblyMismatch` when the reconstructed length disagrees
    /// with the recorded size.
    #[instrument(level = "debug", name = "download_file", skip(self))]
    pub fn download_file(&self, id: EntryId) -> ApiResult<Vec<u8>> {
        let entry = self.catalog.get_entry(id)?;

        if entry.is_directory() {
            return Err(ApiError::NotAFile(entry.name));
        }

        let data = self.engine.read_striped(id, entry.size, entry.layout)?;

        if data.len() as u64 != entry.size {
            return Err(ApiError::ReassemblyMismatch {
                expected: entry.size,
                actual: data.len() as u64,
            });
        }

        Ok(data)
    }

    /// Compute the per-target stripe distribution of a path
    ///
    /// Pure metadata computation; touches no storage. Every configured
    /// target appears in the result, including targets receiving zero
    /// stripes. Directories yield an empty placement.
    pub fn visualize(&self, path: &str) -> ApiResult<Vec<TargetPlacement>> {
        let id = self.catalog.resolve(path)?;
        let entry = self.catalog.get_entry(id)?;

        if entry.is_directory() {
            return Ok(Vec::new());
        }

        Ok(placement_of(entry.size, entry.layout, &self.targets.names()))
    }

    /// Save the catalog to a snapshot file
    pub fn save_catalog(&self, path: &Path) -> ApiResult<()> {
        Ok(self.catalog.save_snapshot(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ROOT_ENTRY_ID;
    use crate::storage::InMemoryStripeStore;
    use std::path::PathBuf;

    const MB: u64 = 1024 * 1024;

    fn test_fs(default_layout: StripeLayout) -> StripeFs {
        let names: Vec<String> = (1..=4).map(|i| format!("ost{}", i)).collect();
        let targets = Rc::new(TargetSet::with_names(PathBuf::from("/unused"), names));
        let store = Rc::new(InMemoryStripeStore::new(targets.len()));
        StripeFs::new(targets, store, default_layout)
    }

    #[test]
    fn test_resolve_root_is_fixed() {
        let fs = test_fs(StripeLayout::default());
        assert_eq!(fs.resolve("/").unwrap(), ROOT_ENTRY_ID);
    }

    #[test]
    fn test_resolve_missing_has_no_side_effects() {
        let fs = test_fs(StripeLayout::default());

        assert!(matches!(fs.resolve("/missing"), Err(ApiError::NotFound(_))));
        assert!(fs.list_children("/").unwrap().is_empty());
    }

    #[test]
    fn test_upload_download_roundtrip() {
        let fs = test_fs(StripeLayout::new(3, 1024));

        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 256) as u8).collect();
        let id = fs.create_file("/", "blob.bin", &data).unwrap();

        assert_eq!(fs.download_file(id).unwrap(), data);
    }

    #[test]
    fn test_create_file_inherits_directory_layout() {
        let fs = test_fs(StripeLayout::new(2, MB));

        fs.create_directory("/", "data").unwrap();
        fs.create_file("/data", "a.bin", &[1, 2, 3]).unwrap();

        assert_eq!(fs.get_layout("/data/a.bin").unwrap().stripe_count, 2);

        // ディレクトリのレイアウト変更は既存ファイルに波及しない
        fs.set_layout("/data", StripeLayout::new(4, MB)).unwrap();
        assert_eq!(fs.get_layout("/data/a.bin").unwrap().stripe_count, 2);
        assert_eq!(fs.get_layout("/data").unwrap().stripe_count, 4);
    }

    #[test]
    fn test_set_layout_rejects_excess_stripe_count() {
        let fs = test_fs(StripeLayout::new(2, MB));

        // 4ターゲットに対してstripe_count=5は拒否
        let result = fs.set_layout("/", StripeLayout::new(5, MB));
        assert!(matches!(
            result,
            Err(ApiError::InvalidLayout {
                requested: 5,
                available: 4
            })
        ));

        // 保存済みレイアウトは変更されない
        assert_eq!(fs.get_layout("/").unwrap(), StripeLayout::new(2, MB));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let fs = test_fs(StripeLayout::default());

        fs.create_file("/", "a.txt", b"one").unwrap();
        let result = fs.create_file("/", "a.txt", b"two");

        assert!(matches!(result, Err(ApiError::AlreadyExists(_))));
    }

    #[test]
    fn test_list_children() {
        let fs = test_fs(StripeLayout::default());

        fs.create_directory("/", "docs").unwrap();
        let file_id = fs.create_file("/", "a.txt", b"hello").unwrap();

        let children = fs.list_children("/").unwrap();
        assert_eq!(children.len(), 2);

        let file = children.iter().find(|c| c.name == "a.txt").unwrap();
        assert_eq!(file.id, file_id);
        assert!(!file.is_directory);
        assert_eq!(file.size, 5);

        let dir = children.iter().find(|c| c.name == "docs").unwrap();
        assert!(dir.is_directory);
        assert_eq!(dir.size, 0);
    }

    #[test]
    fn test_download_directory_fails() {
        let fs = test_fs(StripeLayout::default());

        let id = fs.create_directory("/", "docs").unwrap();
        assert!(matches!(fs.download_file(id), Err(ApiError::NotAFile(_))));
    }

    #[test]
    fn test_download_empty_file() {
        let fs = test_fs(StripeLayout::default());

        let id = fs.create_file("/", "empty", b"").unwrap();
        assert!(fs.download_file(id).unwrap().is_empty());
    }

    #[test]
    fn test_visualize_scenario() {
        let fs = test_fs(StripeLayout::new(3, MB));

        // 2.5MBファイル -> 3ストライプ、ost1:[0] ost2:[1] ost3:[2] ost4:[]
        let data = vec![0u8; (2 * MB + 512 * 1024) as usize];
        fs.create_file("/", "big.bin", &data).unwrap();

        let placement = fs.visualize("/big.bin").unwrap();
        assert_eq!(placement.len(), 4);
        assert_eq!(placement[0].stripes, vec![0]);
        assert_eq!(placement[1].stripes, vec![1]);
        assert_eq!(placement[2].stripes, vec![2]);
        assert!(placement[3].stripes.is_empty());
    }

    #[test]
    fn test_visualize_directory_is_empty() {
        let fs = test_fs(StripeLayout::new(3, MB));

        fs.create_directory("/", "docs").unwrap();
        assert!(fs.visualize("/docs").unwrap().is_empty());
        assert!(fs.visualize("/").unwrap().is_empty());
    }

    #[test]
    fn test_layout_change_on_nonempty_file_is_metadata_only() {
        let fs = test_fs(StripeLayout::new(2, 1024));

        let data = vec![9u8; 4096];
        fs.create_file("/", "a.bin", &data).unwrap();

        // メタデータのみ更新される (ストライプは再配置されない)
        fs.set_layout("/a.bin", StripeLayout::new(4, 1024)).unwrap();
        assert_eq!(fs.get_layout("/a.bin").unwrap().stripe_count, 4);
    }
}
