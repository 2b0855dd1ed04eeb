use crate::error::{FileMapError, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// One entry found while listing the backing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub name: String,
    pub is_file: bool,
}

impl Entry {
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Raw file I/O for a single map directory.
///
/// Knows nothing about values: it moves bytes in and out of files named after
/// keys. The map layer owns encoding and the mirror.
#[derive(Debug, Clone)]
pub(crate) struct FsBackend {
    dir: PathBuf,
}

impl FsBackend {
    /// Ensure `dir` exists as a directory, creating it with its parents.
    pub fn open(dir: PathBuf) -> Result<Self> {
        match fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(FileMapError::NotADirectory { path: dir }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&dir).map_err(|source| FileMapError::CreateDir {
                    path: dir.clone(),
                    source,
                })?;
            }
            Err(source) => return Err(FileMapError::CreateDir { path: dir, source }),
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        if !is_storable_key(key) {
            return Err(FileMapError::Write {
                key: key.to_string(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "key is not usable as a plain file name",
                ),
            });
        }
        self.write_atomic(key, bytes)
            .map_err(|source| FileMapError::Write {
                key: key.to_string(),
                source,
            })
    }

    /// Write to a hidden temp file in the same directory, then rename it over
    /// the target. Readers see either the old file or the new one.
    ///
    /// The temp name is fixed-width so any key that fits as a file name can be
    /// written.
    fn write_atomic(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let tmp_path = self.dir.join(format!(".entry-{}.tmp", Uuid::new_v4()));
        let result = (|| {
            {
                let mut file = File::create(&tmp_path)?;
                file.write_all(bytes)?;
                file.sync_all()?;
            }
            fs::rename(&tmp_path, self.path_for(key))
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    pub fn read(&self, key: &str) -> Result<Vec<u8>> {
        fs::read(self.path_for(key)).map_err(|source| FileMapError::Read {
            key: key.to_string(),
            source,
        })
    }

    /// Delete the file for `key`. Returns `false` when there was nothing to delete.
    pub fn delete(&self, key: &str) -> Result<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(FileMapError::Delete {
                name: key.to_string(),
                source,
            }),
        }
    }

    /// Delete any listed entry. Subdirectories are never created by the map,
    /// so only empty ones are removed; anything else is reported.
    pub fn delete_entry(&self, entry: &Entry) -> Result<()> {
        let path = self.path_for(&entry.name);
        let result = if entry.is_file {
            fs::remove_file(&path)
        } else {
            fs::remove_dir(&path)
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileMapError::Delete {
                name: entry.name.clone(),
                source,
            }),
        }
    }

    /// List the directory, sorted by name. Names that are not valid UTF-8 can
    /// never be keys and are reported lossily.
    pub fn list(&self) -> Result<Vec<Entry>> {
        let list_err = |source| FileMapError::List {
            path: self.dir.clone(),
            source,
        };
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.dir).map_err(list_err)? {
            let dir_entry = dir_entry.map_err(list_err)?;
            let is_file = dir_entry
                .file_type()
                .map(|t| t.is_file())
                .map_err(list_err)?;
            entries.push(Entry {
                name: os_name_to_string(dir_entry.file_name()),
                is_file,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

fn os_name_to_string(name: OsString) -> String {
    name.into_string()
        .unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
}

/// A key is storable when it names exactly one visible entry directly inside
/// the map directory.
pub(crate) fn is_storable_key(key: &str) -> bool {
    if key.is_empty() || key.starts_with('.') || key.contains('\0') {
        return false;
    }
    let mut components = Path::new(key).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == key
    )
}

/// Remove a whole map directory. A directory that is already gone is fine.
pub(crate) fn remove_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(FileMapError::Delete {
            name: dir.display().to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_storable_keys() {
        assert!(is_storable_key("apples"));
        assert!(is_storable_key("resource_1"));
        assert!(is_storable_key("with space"));
        assert!(is_storable_key("v1.json"));

        assert!(!is_storable_key(""));
        assert!(!is_storable_key("."));
        assert!(!is_storable_key(".."));
        assert!(!is_storable_key(".hidden"));
        assert!(!is_storable_key("a/b"));
        assert!(!is_storable_key("/abs"));
        assert!(!is_storable_key("trailing/"));
        assert!(!is_storable_key("nul\0byte"));
    }

    #[test]
    fn test_open_creates_nested_dir() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        let backend = FsBackend::open(dir.clone()).unwrap();
        assert!(dir.is_dir());
        assert_eq!(backend.dir(), dir.as_path());
    }

    #[test]
    fn test_open_rejects_plain_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("occupied");
        fs::write(&path, "x").unwrap();
        let err = FsBackend::open(path).unwrap_err();
        assert!(matches!(err, FileMapError::NotADirectory { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_write_replaces_and_leaves_no_temp_files() {
        let tmp = tempdir().unwrap();
        let backend = FsBackend::open(tmp.path().to_path_buf()).unwrap();

        backend.write("k", b"one").unwrap();
        backend.write("k", b"two").unwrap();

        assert_eq!(backend.read("k").unwrap(), b"two");
        let names: Vec<_> = backend.list().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["k"]);
    }

    #[test]
    fn test_write_accepts_long_key() {
        let tmp = tempdir().unwrap();
        let backend = FsBackend::open(tmp.path().to_path_buf()).unwrap();
        let key = "k".repeat(250);
        fs::write(tmp.path().join(&key), b"x").unwrap();
        fs::remove_file(tmp.path().join(&key)).unwrap();

        backend.write(&key, b"1").unwrap();
        assert_eq!(backend.read(&key).unwrap(), b"1");
        let names: Vec<_> = backend.list().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec![key]);
    }

    #[test]
    fn test_delete_entry_keeps_non_empty_subdir() {
        let tmp = tempdir().unwrap();
        let backend = FsBackend::open(tmp.path().to_path_buf()).unwrap();
        fs::create_dir(tmp.path().join("empty")).unwrap();
        fs::create_dir(tmp.path().join("full")).unwrap();
        fs::write(tmp.path().join("full").join("x"), "1").unwrap();

        let entries = backend.list().unwrap();
        backend.delete_entry(&entries[0]).unwrap();
        let err = backend.delete_entry(&entries[1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Delete);
        assert_eq!(err.key(), Some("full"));
        assert!(!tmp.path().join("empty").exists());
        assert!(tmp.path().join("full").join("x").exists());
    }

    #[test]
    fn test_write_rejects_nested_key() {
        let tmp = tempdir().unwrap();
        let backend = FsBackend::open(tmp.path().to_path_buf()).unwrap();
        fs::create_dir(tmp.path().join("a")).unwrap();

        let err = backend.write("a/b", b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
        assert!(!tmp.path().join("a").join("b").exists());
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let tmp = tempdir().unwrap();
        let backend = FsBackend::open(tmp.path().to_path_buf()).unwrap();
        assert!(!backend.delete("ghost").unwrap());

        backend.write("real", b"1").unwrap();
        assert!(backend.delete("real").unwrap());
        assert!(!backend.path_for("real").exists());
    }

    #[test]
    fn test_list_marks_hidden_and_dirs() {
        let tmp = tempdir().unwrap();
        let backend = FsBackend::open(tmp.path().to_path_buf()).unwrap();
        fs::write(tmp.path().join(".DS_Store"), "").unwrap();
        fs::write(tmp.path().join("b"), "").unwrap();
        fs::create_dir(tmp.path().join("a")).unwrap();

        let entries = backend.list().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, ".DS_Store");
        assert!(entries[0].is_hidden());
        assert_eq!(entries[1].name, "a");
        assert!(!entries[1].is_file);
        assert_eq!(entries[2].name, "b");
        assert!(entries[2].is_file);
    }

    #[test]
    fn test_remove_dir_tolerates_absence() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("gone");
        remove_dir(&dir).unwrap();

        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("x"), "1").unwrap();
        remove_dir(&dir).unwrap();
        assert!(!dir.exists());
    }
}
