use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::instrument;

use super::error::{StorageError, StorageResult};
use super::target::TargetSet;

/// Stripe store trait for different storage backends
///
/// A stripe is addressed by (target index, object id, stripe index).
/// Each stripe is written and read as a single unit; there is no
/// sub-stripe addressing and no atomicity across stripes.
pub trait StripeStore {
    fn write_stripe(
        &self,
        target_index: usize,
        object_id: u64,
        stripe_index: u64,
        data: &[u8],
    ) -> StorageResult<()>;

    fn read_stripe(
        &self,
        target_index: usize,
        object_id: u64,
        stripe_index: u64,
    ) -> StorageResult<Vec<u8>>;

    fn has_stripe(&self, target_index: usize, object_id: u64, stripe_index: u64) -> bool;
}

/// Stripe key for identifying stripes in memory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StripeKey {
    pub target_index: usize,
    pub object_id: u64,
    pub stripe_index: u64,
}

impl StripeKey {
    pub fn new(target_index: usize, object_id: u64, stripe_index: u64) -> Self {
        Self {
            target_index,
            object_id,
            stripe_index,
        }
    }
}

/// Filesystem-backed stripe store
///
/// Stores each stripe as one file under the owning target's directory,
/// named `{object_id}_stripe_{stripe_index}`.
pub struct FsStripeStore {
    /// Target set (fixed, ordered)
    targets: Rc<TargetSet>,
}

impl FsStripeStore {
    /// Create a new filesystem-backed stripe store
    pub fn new(targets: Rc<TargetSet>) -> Self {
        Self { targets }
    }

    /// Build the on-disk path of a stripe
    fn stripe_path(
        &self,
        target_index: usize,
        object_id: u64,
        stripe_index: u64,
    ) -> StorageResult<PathBuf> {
        let target = self
            .targets
            .get(target_index)
            .ok_or(StorageError::InvalidTarget(target_index))?;

        Ok(target
            .path
            .join(format!("{}_stripe_{}", object_id, stripe_index)))
    }
}

impl StripeStore for FsStripeStore {
    #[instrument(level = "trace", name = "fs_write_stripe", skip(self, data), fields(len = data.len()))]
    fn write_stripe(
        &self,
        target_index: usize,
        object_id: u64,
        stripe_index: u64,
        data: &[u8],
    ) -> StorageResult<()> {
        let path = self.stripe_path(target_index, object_id, stripe_index)?;
        std::fs::write(&path, data)?;

        tracing::trace!(
            "Wrote stripe {} of object {} to {}",
            stripe_index,
            object_id,
            path.display()
        );

        Ok(())
    }

    #[instrument(level = "trace", name = "fs_read_stripe", skip(self))]
    fn read_stripe(
        &self,
        target_index: usize,
        object_id: u64,
        stripe_index: u64,
    ) -> StorageResult<Vec<u8>> {
        let path = self.stripe_path(target_index, object_id, stripe_index)?;

        match std::fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::StripeNotFound {
                    object_id,
                    stripe_index,
                })
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn has_stripe(&self, target_index: usize, object_id: u64, stripe_index: u64) -> bool {
        self.stripe_path(target_index, object_id, stripe_index)
            .map(|p| p.exists())
            .unwrap_or(false)
    }
}

/// In-memory stripe store
///
/// Simple implementation that stores stripes in memory, used by tests and
/// as a reference for the on-disk behavior.
pub struct InMemoryStripeStore {
    /// Stripe data storage (key -> data)
    stripes: RefCell<HashMap<StripeKey, Vec<u8>>>,

    /// Number of configured targets
    target_count: usize,
}

impl InMemoryStripeStore {
    /// Create a new in-memory stripe store
    pub fn new(target_count: usize) -> Self {
        Self {
            stripes: RefCell::new(HashMap::new()),
            target_count,
        }
    }

    /// Number of stored stripes (across all targets)
    pub fn stripe_count(&self) -> usize {
        self.stripes.borrow().len()
    }
}

impl StripeStore for InMemoryStripeStore {
    fn write_stripe(
        &self,
        target_index: usize,
        object_id: u64,
        stripe_index: u64,
        data: &[u8],
    ) -> StorageResult<()> {
        if target_index >= self.target_count {
            return Err(StorageError::InvalidTarget(target_index));
        }

        let key = StripeKey::new(target_index, object_id, stripe_index);
        self.stripes.borrow_mut().insert(key, data.to_vec());

        Ok(())
    }

    fn read_stripe(
        &self,
        target_index: usize,
        object_id: u64,
        stripe_index: u64,
    ) -> StorageResult<Vec<u8>> {
        if target_index >= self.target_count {
            return Err(StorageError::InvalidTarget(target_index));
        }

        let key = StripeKey::new(target_index, object_id, stripe_index);
        self.stripes
            .borrow()
            .get(&key)
            .cloned()
            .ok_or(StorageError::StripeNotFound {
                object_id,
                stripe_index,
            })
    }

    fn has_stripe(&self, target_index: usize, object_id: u64, stripe_index: u64) -> bool {
        let key = StripeKey::new(target_index, object_id, stripe_index);
        self.stripes.borrow().contains_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_write_read() {
        let store = InMemoryStripeStore::new(4);

        store.write_stripe(0, 1, 0, b"hello").unwrap();
        assert!(store.has_stripe(0, 1, 0));
        assert_eq!(store.read_stripe(0, 1, 0).unwrap(), b"hello");
    }

    #[test]
    fn test_in_memory_missing_stripe() {
        let store = InMemoryStripeStore::new(4);

        assert!(!store.has_stripe(0, 1, 0));
        assert!(matches!(
            store.read_stripe(0, 1, 0),
            Err(StorageError::StripeNotFound {
                object_id: 1,
                stripe_index: 0
            })
        ));
    }

    #[test]
    fn test_in_memory_invalid_target() {
        let store = InMemoryStripeStore::new(2);

        assert!(matches!(
            store.write_stripe(2, 1, 0, b"x"),
            Err(StorageError::InvalidTarget(2))
        ));
        assert!(matches!(
            store.read_stripe(5, 1, 0),
            Err(StorageError::InvalidTarget(5))
        ));
    }

    #[test]
    fn test_fs_store_write_read() {
        let temp_dir = TempDir::new().unwrap();
        let targets = Rc::new(TargetSet::with_names(
            temp_dir.path().to_path_buf(),
            vec!["ost1".to_string(), "ost2".to_string()],
        ));
        targets.ensure_directories().unwrap();

        let store = FsStripeStore::new(targets);

        store.write_stripe(1, 7, 3, b"stripe data").unwrap();

        // ストライプはターゲットディレクトリ配下に {id}_stripe_{index} で置かれる
        assert!(temp_dir.path().join("ost2").join("7_stripe_3").is_file());

        assert!(store.has_stripe(1, 7, 3));
        assert_eq!(store.read_stripe(1, 7, 3).unwrap(), b"stripe data");
    }

    #[test]
    fn test_fs_store_missing_stripe() {
        let temp_dir = TempDir::new().unwrap();
        let targets = Rc::new(TargetSet::with_names(
            temp_dir.path().to_path_buf(),
            vec!["ost1".to_string()],
        ));
        targets.ensure_directories().unwrap();

        let store = FsStripeStore::new(targets);

        assert!(!store.has_stripe(0, 1, 0));
        assert!(matches!(
            store.read_stripe(0, 1, 0),
            Err(StorageError::StripeNotFound { .. })
        ));
    }

    #[test]
    fn test_fs_store_invalid_target() {
        let temp_dir = TempDir::new().unwrap();
        let targets = Rc::new(TargetSet::with_names(
            temp_dir.path().to_path_buf(),
            vec!["ost1".to_string()],
        ));

        let store = FsStripeStore::new(targets);
        assert!(matches!(
            store.write_stripe(3, 1, 0, b"x"),
            Err(StorageError::InvalidTarget(3))
        ));
    }
}
