//! # filemap
//!
//! A `String -> T` map that lives in a directory: every value is one file named
//! after its key, and an in-memory mirror serves reads and enumeration.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  FileMap<T> (store/file_map.rs)                             │
//! │  - get / keys / values / len served from the mirror         │
//! │  - set / remove / clear write through to disk first         │
//! │  - rebuilds the mirror from disk on open (recovery)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  FsBackend (store/fs_backend.rs)                            │
//! │  - one file per key, atomic temp-file + rename writes       │
//! │  - directory listing, deletion                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are encoded with a [`Codec`] (JSON). The directory lives under a
//! [`StorageRoot`], which the caller constructs explicitly, either from a path or
//! from a [`MapConfig`].
//!
//! ## Usage
//!
//! ```no_run
//! use filemap::{FileMap, StorageRoot};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Resource {
//!     name: String,
//!     value: i64,
//!     quantity: i64,
//! }
//!
//! # fn main() -> filemap::Result<()> {
//! let root = StorageRoot::from_project_dirs("com", "example", "inventory")?;
//! let mut resources: FileMap<Resource> = FileMap::open(&root, "resources")?;
//!
//! resources.set("apples", Resource { name: "apples".into(), value: 1, quantity: 1 })?;
//! assert_eq!(resources.keys().collect::<Vec<_>>(), vec!["apples"]);
//!
//! resources.remove("apples")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Ownership
//!
//! One [`FileMap`] instance owns its directory. Nothing is locked: two instances
//! over the same directory will drift apart until one of them reloads.

pub mod codec;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use codec::Codec;
pub use config::MapConfig;
pub use error::{ErrorKind, FileMapError, Result};
pub use storage::StorageRoot;
pub use store::{delete_directory, ClearReport, ConsistencyReport, FileMap, RecoveryReport};
