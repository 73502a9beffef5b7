use crate::archive::{ArchiveIndex, ArchiveSource, ZipSource};
use crate::error::FsError;
use std::path::PathBuf;

/// Read-only filesystem view over an archive.
///
/// The table of contents is read once in [`ArchiveFs::open`]; file contents are
/// fetched from the source on demand. Directory listing lives in `listing.rs`,
/// tree rendering in `tree.rs` and text access in `content.rs`.
pub struct ArchiveFs {
    pub(crate) index: ArchiveIndex,
    pub(crate) source: Box<dyn ArchiveSource>,
}

impl ArchiveFs {
    pub fn open(source: impl ArchiveSource + 'static) -> Result<Self, FsError> {
        let index = ArchiveIndex::load(&source)?;
        Ok(Self {
            index,
            source: Box::new(source),
        })
    }

    pub fn open_zip(path: impl Into<PathBuf>) -> Result<Self, FsError> {
        Self::open(ZipSource::new(path))
    }

    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }
}
