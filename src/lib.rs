//! StripeFS - A Small-Scale Striped Filesystem Emulator
//!
//! StripeFS emulates the metadata/object-storage split of a parallel
//! filesystem (Lustre-style) at a small scale. A hierarchical namespace is
//! kept by a metadata catalog, file bytes are split into fixed-size stripes,
//! and stripes are distributed round-robin across a fixed set of object
//! storage targets (OSTs). It features:
//!
//! - **Namespace Catalog**: directory/file tree stored as an arena of
//!   entries keyed by id, with parent links resolved by keyed lookup
//! - **Layout Policy**: per-entry `(stripe_count, stripe_size)` pair,
//!   inherited from the containing directory at creation time
//! - **Striping Engine**: deterministic round-robin placement of stripe
//!   `i` on target `i % stripe_count`, with reconstruction on read and a
//!   storage-free placement visualization
//! - **Target Set**: fixed, ordered list of targets injected from
//!   configuration at startup, each a directory-like byte store
//!
//! # Architecture
//!
//! StripeFS consists of several key components:
//!
//! - **Catalog** ([`catalog`]): namespace entries, path resolution and
//!   layout bookkeeping
//! - **Striping** ([`striping`]): stripe math, placement and the
//!   write/read engine
//! - **Storage** ([`storage`]): the target set and stripe stores
//!   (filesystem-backed and in-memory)
//! - **API** ([`api`]): the high-level facade served to thin collaborators
//!   (HTTP frontends, the bundled CLI)
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use stripefs::api::file_ops::StripeFs;
//! use stripefs::catalog::StripeLayout;
//! use stripefs::storage::{InMemoryStripeStore, TargetSet};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let targets = Rc::new(TargetSet::with_names(
//!     "/tmp/stripefs".into(),
//!     vec!["ost1".into(), "ost2".into(), "ost3".into(), "ost4".into()],
//! ));
//! let store = Rc::new(InMemoryStripeStore::new(targets.len()));
//! let fs = StripeFs::new(targets, store, StripeLayout::new(2, 1024 * 1024));
//!
//! let id = fs.create_file("/", "hello.txt", b"Hello, StripeFS!")?;
//! let bytes = fs.download_file(id)?;
//! assert_eq!(bytes, b"Hello, StripeFS!");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod storage;
pub mod striping;
