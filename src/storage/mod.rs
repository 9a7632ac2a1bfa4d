// ストレージ層モジュール
pub mod error;
pub mod stripe_store;
pub mod target;

pub use error::{StorageError, StorageResult};
pub use stripe_store::{FsStripeStore, InMemoryStripeStore, StripeKey, StripeStore};
pub use target::{StorageTarget, TargetSet};
