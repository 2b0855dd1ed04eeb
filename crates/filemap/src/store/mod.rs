//! # Storage Layer
//!
//! A [`FileMap`] keeps a `String -> T` map in two places at once:
//! 1. **Disk**: one file per key in the map's directory, named exactly as the key.
//! 2. **Mirror**: an in-memory `BTreeMap` that serves every read.
//!
//! ### Philosophy
//! - **Write Through**: every mutation hits disk first; the mirror only changes
//!   once the file operation succeeded (or, for removals, unconditionally).
//! - **Atomic Files**: values are written to a hidden temp file and renamed into
//!   place, so a crash never leaves a half-written value under a key's name.
//! - **Best-Effort Recovery**: on open, every visible file is decoded. Files that
//!   fail are reported and skipped; the map still opens.
//!
//! ## Recovery
//!
//! Runs at [`FileMap::open`] and [`FileMap::reload`]:
//!
//! 1. **Hidden entries** (leading `.`, including stale temp files) are ignored.
//! 2. **Subdirectories** are ignored.
//! 3. **Files** are read and decoded; the file name becomes the key.
//! 4. **Failures** are logged and collected in a [`RecoveryReport`].
//!
//! ## Keys
//!
//! A key must be usable unmodified as one file name. Keys containing a path
//! separator, `.`/`..`, the empty string, or a leading `.` are refused by the
//! storage layer: `set` returns a write error and the mirror stays unchanged.
//!
//! ## Storage Layout
//!
//! ```text
//! resources/
//! ├── apples              # {"name":"apples","value":1,"quantity":1}
//! ├── mangos
//! └── .entry-{uuid}.tmp   # only while a write is in flight
//! ```

use crate::error::FileMapError;

pub mod file_map;
pub(crate) mod fs_backend;

pub use file_map::{delete_directory, FileMap};

/// Outcome of rebuilding the mirror from disk.
#[derive(Debug, Default)]
pub struct RecoveryReport {
    pub recovered: usize,
    pub ignored_entries: usize,
    pub failures: Vec<FileMapError>,
}

impl RecoveryReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of [`FileMap::clear`].
#[derive(Debug, Default)]
pub struct ClearReport {
    pub removed: usize,
    pub failures: Vec<FileMapError>,
}

impl ClearReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Differences between the mirror and the directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Keys in the mirror with no backing file.
    pub missing_files: Vec<String>,
    /// Visible files with no mirror entry.
    pub untracked_files: Vec<String>,
    /// Hidden entries, usually temp files from an interrupted write.
    pub hidden_entries: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_files.is_empty() && self.untracked_files.is_empty()
    }
}
