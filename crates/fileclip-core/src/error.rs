//! Error types for the attribute engine.

use std::io;

/// Result type for attribute operations.
pub type AttrResult<T> = Result<T, AttrError>;

/// Error type shared by stores, snapshots, and sessions.
#[derive(Debug, thiserror::Error)]
pub enum AttrError {
    #[error("target not found")]
    NotFound,
    #[error("no attribute named {name}")]
    AttributeNotFound { name: String },
    #[error("permission denied")]
    PermissionDenied,
    #[error("extended attributes not supported here")]
    Unsupported,
    #[error("invalid attribute name {name:?}")]
    InvalidName { name: String },
    #[error("attribute value too large")]
    ValueTooLarge,
    #[error("no space left")]
    NoSpace,
    #[error("read-only filesystem")]
    ReadOnlyFilesystem,
    #[error("attribute {name} already exists")]
    DuplicateName { name: String },
    #[error("attribute {name} changed by another writer")]
    RaceLost { name: String },
    #[error("snapshot failed at {name}: {source}")]
    Snapshot {
        name: String,
        #[source]
        source: Box<AttrError>,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl AttrError {
    /// Wrap an error as a snapshot-build failure carrying the offending name.
    pub(crate) fn snapshot(name: impl Into<String>, source: AttrError) -> Self {
        Self::Snapshot {
            name: name.into(),
            source: Box::new(source),
        }
    }
}
