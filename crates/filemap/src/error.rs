use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`FileMapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The backing directory could not be established.
    Configuration,
    /// A value could not be serialized.
    Encoding,
    /// Serialized bytes could not be written under the key's name.
    Write,
    /// A stored file could not be read or decoded.
    Read,
    /// A stored file could not be removed.
    Delete,
}

#[derive(Error, Debug)]
pub enum FileMapError {
    #[error("{} exists and is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No platform data directory available")]
    NoStorageRoot,

    #[error("Invalid map directory name {name:?}")]
    InvalidName { name: String },

    #[error("Failed to encode value for key {key:?}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[error("Failed to write key {key:?}: {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },

    #[error("Failed to read key {key:?}: {source}")]
    Read {
        key: String,
        source: std::io::Error,
    },

    #[error("Failed to decode key {key:?}: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },

    #[error("Failed to delete {name:?}: {source}")]
    Delete {
        name: String,
        source: std::io::Error,
    },

    #[error("Failed to list {}: {source}", path.display())]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FileMapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotADirectory { .. }
            | Self::CreateDir { .. }
            | Self::NoStorageRoot
            | Self::InvalidName { .. } => ErrorKind::Configuration,
            Self::Encode { .. } => ErrorKind::Encoding,
            Self::Write { .. } => ErrorKind::Write,
            Self::Read { .. } | Self::Decode { .. } | Self::List { .. } => ErrorKind::Read,
            Self::Delete { .. } => ErrorKind::Delete,
        }
    }

    /// The key (or entry name) the failure is about, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Encode { key, .. }
            | Self::Write { key, .. }
            | Self::Read { key, .. }
            | Self::Decode { key, .. } => Some(key),
            Self::Delete { name, .. } => Some(name),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FileMapError>;
