//! # Configuration
//!
//! Configuration is resolved by [`confique`], layered in priority order:
//! 1. **Environment variables**: `FILEMAP_BASE_DIR`, `FILEMAP_PRETTY`.
//! 2. **Config file**: an optional `filemap.toml` passed by the caller.
//! 3. **Compiled defaults**: built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `base_dir` | platform data dir | Root under which map directories are created |
//! | `pretty` | `false` | Write indented JSON instead of compact JSON |
//!
//! Nothing here is global: callers load a [`MapConfig`] and hand it to
//! [`StorageRoot::from_config`](crate::storage::StorageRoot::from_config).

use crate::codec::Codec;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for filemap, stored in `filemap.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MapConfig {
    /// Root directory for map directories. When absent, the platform data
    /// directory is used.
    #[config(env = "FILEMAP_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Write indented JSON files.
    #[config(env = "FILEMAP_PRETTY", default = false)]
    pub pretty: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            pretty: false,
        }
    }
}

impl MapConfig {
    /// Load from the environment, then from `file` if given and present.
    pub fn load_layered(file: Option<&Path>) -> Result<Self, confique::Error> {
        let mut builder = MapConfig::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder.load()
    }

    pub fn codec(&self) -> Codec {
        Codec::from_pretty(self.pretty)
    }
}
