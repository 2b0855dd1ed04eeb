//! # Storage Root
//!
//! Every map lives in its own directory beneath a [`StorageRoot`]. The root is an
//! ordinary value the caller builds once and passes around; there is no shared
//! default instance.
//!
//! ```text
//! <root>/
//! ├── resources/       # FileMap<Resource>
//! │   ├── apples
//! │   └── mangos
//! └── settings/        # FileMap<Setting>
//! ```

use crate::config::MapConfig;
use crate::error::{FileMapError, Result};
use directories::ProjectDirs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot {
    path: PathBuf,
}

impl StorageRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The platform data directory for an application, e.g.
    /// `~/.local/share/<application>` on Linux.
    pub fn from_project_dirs(
        qualifier: &str,
        organization: &str,
        application: &str,
    ) -> Result<Self> {
        let dirs = ProjectDirs::from(qualifier, organization, application)
            .ok_or(FileMapError::NoStorageRoot)?;
        Ok(Self::new(dirs.data_dir()))
    }

    pub fn from_config(config: &MapConfig) -> Result<Self> {
        match &config.base_dir {
            Some(dir) => Ok(Self::new(dir)),
            None => Self::from_project_dirs("com", "filemap", "filemap"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory backing the map called `name`. Nested names such as
    /// `cache/images` are allowed; anything that would escape the root is not.
    pub fn dir(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components().peekable();
        if components.peek().is_none() || !components.all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(FileMapError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.path.join(name))
    }
}
