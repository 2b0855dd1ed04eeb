use super::fs_backend::{self, is_storable_key, FsBackend};
use super::{ClearReport, ConsistencyReport, RecoveryReport};
use crate::codec::Codec;
use crate::error::{FileMapError, Result};
use crate::storage::StorageRoot;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A `String -> T` map persisted as one file per key.
///
/// Reads are served from memory. Writes go to disk first and only touch the
/// in-memory mirror once the file is in place.
///
/// The map assumes it is the only writer of its directory. Changes made behind
/// its back are picked up by [`FileMap::reload`] or by reopening.
#[derive(Debug)]
pub struct FileMap<T> {
    backend: FsBackend,
    codec: Codec,
    mirror: BTreeMap<String, T>,
    last_recovery: RecoveryReport,
}

impl<T: Serialize + DeserializeOwned> FileMap<T> {
    /// Open (creating if needed) the map directory `name` under `root` and load
    /// every stored value.
    ///
    /// Fails if the directory cannot be created or the path is taken by
    /// something that is not a directory. Files that cannot be decoded do not
    /// fail the open; see [`FileMap::last_recovery`].
    pub fn open(root: &StorageRoot, name: &str) -> Result<Self> {
        Self::open_with_codec(root, name, Codec::default())
    }

    pub fn open_with_codec(root: &StorageRoot, name: &str, codec: Codec) -> Result<Self> {
        Self::open_at(root.dir(name)?, codec)
    }

    /// Open a map at an explicit directory path.
    pub fn open_at(dir: impl Into<PathBuf>, codec: Codec) -> Result<Self> {
        let backend = FsBackend::open(dir.into())?;
        let mut map = Self {
            backend,
            codec,
            mirror: BTreeMap::new(),
            last_recovery: RecoveryReport::default(),
        };
        map.recover();
        Ok(map)
    }

    /// Drop the mirror and rebuild it from the directory.
    pub fn reload(&mut self) -> &RecoveryReport {
        self.recover();
        &self.last_recovery
    }

    fn recover(&mut self) {
        let mut report = RecoveryReport::default();
        let mut mirror = BTreeMap::new();

        match self.backend.list() {
            Ok(entries) => {
                for entry in entries {
                    if entry.is_hidden() || !entry.is_file || !is_storable_key(&entry.name) {
                        report.ignored_entries += 1;
                        continue;
                    }
                    match self.load(&entry.name) {
                        Ok(value) => {
                            mirror.insert(entry.name, value);
                            report.recovered += 1;
                        }
                        Err(e) => {
                            warn!(dir = %self.backend.dir().display(), "skipping entry: {}", e);
                            report.failures.push(e);
                        }
                    }
                }
            }
            Err(e) => {
                warn!("recovery could not list directory: {}", e);
                report.failures.push(e);
            }
        }

        debug!(
            dir = %self.backend.dir().display(),
            recovered = report.recovered,
            ignored = report.ignored_entries,
            failed = report.failures.len(),
            "recovered map from disk"
        );
        self.mirror = mirror;
        self.last_recovery = report;
    }

    fn load(&self, key: &str) -> Result<T> {
        let bytes = self.backend.read(key)?;
        self.codec
            .decode(&bytes)
            .map_err(|source| FileMapError::Decode {
                key: key.to_string(),
                source,
            })
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// The encoded bytes are decoded again before anything is written, and the
    /// decoded value is what the mirror keeps, so memory always matches what a
    /// later open would read. A value that does not survive encoding (for
    /// example a NaN float) fails with a decode error.
    ///
    /// Returns the previous value. On error nothing changes in memory, and the
    /// file for `key`, if any, still holds the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: T) -> Result<Option<T>> {
        let key = key.into();
        let bytes = self
            .codec
            .encode(&value)
            .map_err(|source| FileMapError::Encode {
                key: key.clone(),
                source,
            })?;
        let stored: T = self
            .codec
            .decode(&bytes)
            .map_err(|source| FileMapError::Decode {
                key: key.clone(),
                source,
            })?;
        self.backend.write(&key, &bytes)?;
        debug!(key = %key, bytes = bytes.len(), "stored value");
        Ok(self.mirror.insert(key, stored))
    }

    /// `Some` stores, `None` removes.
    pub fn set_or_remove(&mut self, key: impl Into<String>, value: Option<T>) -> Result<Option<T>> {
        match value {
            Some(value) => self.set(key, value),
            None => {
                let key: String = key.into();
                self.remove(&key)
            }
        }
    }

    /// Remove `key` and its file. Removing an absent key is a no-op.
    ///
    /// The in-memory entry is dropped even when the file cannot be deleted; the
    /// error is still returned so the caller knows the file is left behind.
    pub fn remove(&mut self, key: &str) -> Result<Option<T>> {
        let previous = self.mirror.remove(key);
        if !is_storable_key(key) {
            return Ok(previous);
        }
        if self.backend.delete(key)? {
            debug!(key = %key, "removed value");
        }
        Ok(previous)
    }

    /// Delete every entry in the directory and empty the mirror.
    ///
    /// Individual deletion failures are collected in the report and do not stop
    /// the sweep. `Err` means the directory could not be listed at all.
    pub fn clear(&mut self) -> Result<ClearReport> {
        self.mirror.clear();
        let mut report = ClearReport::default();
        for entry in self.backend.list()? {
            match self.backend.delete_entry(&entry) {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    warn!("clear: {}", e);
                    report.failures.push(e);
                }
            }
        }
        debug!(
            removed = report.removed,
            failed = report.failures.len(),
            "cleared map"
        );
        Ok(report)
    }
}

impl<T> FileMap<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.mirror.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.mirror.contains_key(key)
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.mirror.keys().map(String::as_str)
    }

    /// Values in the order of [`FileMap::keys`].
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.mirror.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.mirror.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.mirror.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.is_empty()
    }

    pub fn path(&self) -> &Path {
        self.backend.dir()
    }

    /// Where the value for `key` is (or would be) stored.
    pub fn file_path(&self, key: &str) -> PathBuf {
        self.backend.path_for(key)
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn last_recovery(&self) -> &RecoveryReport {
        &self.last_recovery
    }

    /// Names of all entries actually present in the directory, sorted.
    pub fn file_names(&self) -> Result<Vec<String>> {
        Ok(self
            .backend
            .list()?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Compare the mirror with the directory without changing either.
    pub fn check(&self) -> Result<ConsistencyReport> {
        let mut report = ConsistencyReport::default();
        let mut on_disk = BTreeSet::new();

        for entry in self.backend.list()? {
            if entry.is_hidden() {
                report.hidden_entries.push(entry.name);
            } else if !entry.is_file || !self.mirror.contains_key(&entry.name) {
                report.untracked_files.push(entry.name);
            } else {
                on_disk.insert(entry.name);
            }
        }

        report.missing_files = self
            .mirror
            .keys()
            .filter(|key| !on_disk.contains(*key))
            .cloned()
            .collect();
        Ok(report)
    }
}

/// Remove the map directory `name` under `root` with everything in it.
///
/// Any open [`FileMap`] on that directory is stale afterwards.
pub fn delete_directory(root: &StorageRoot, name: &str) -> Result<()> {
    let dir = root.dir(name)?;
    fs_backend::remove_dir(&dir)?;
    debug!(dir = %dir.display(), "deleted map directory");
    Ok(())
}
