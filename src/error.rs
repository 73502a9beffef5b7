use std::path::PathBuf;
use thiserror::Error;

/// Failures of the archive-backed filesystem.
///
/// Only [`FsError::ArchiveUnreadable`] is fatal: without a readable table of
/// contents there is nothing to browse. Everything else is reported once to the
/// user and the session carries on.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("cannot read archive {}: {reason}", .path.display())]
    ArchiveUnreadable { path: PathBuf, reason: String },

    #[error("no such directory: {0}")]
    PathNotFound(String),

    #[error("no such file: {0}")]
    EntryNotFound(String),

    #[error("not a text file: {0}")]
    EntryNotText(String),

    #[error("{0}")]
    Usage(String),
}

impl FsError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, FsError::ArchiveUnreadable { .. })
    }
}
