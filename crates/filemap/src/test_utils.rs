use crate::storage::StorageRoot;
use crate::store::FileMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub root: StorageRoot,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = StorageRoot::new(temp_dir.path());
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn open<T: Serialize + DeserializeOwned>(&self, name: &str) -> FileMap<T> {
        FileMap::open(&self.root, name).expect("failed to open map")
    }
}

/// Sample value type used across tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub value: i64,
    pub quantity: i64,
}

impl Resource {
    pub fn new(name: &str, value: i64, quantity: i64) -> Self {
        Self {
            name: name.to_string(),
            value,
            quantity,
        }
    }
}
