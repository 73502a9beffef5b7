use crate::path::{NormalizedPath, SEPARATOR};
use crate::vfs::ArchiveFs;
use std::collections::BTreeSet;

impl ArchiveFs {
    /// Names of the immediate children of `dir`, deduplicated and sorted.
    ///
    /// A directory's own marker entry contributes nothing. An empty result means
    /// either an empty directory or no directory at all; see [`ArchiveFs::exists`].
    pub fn list(&self, dir: &NormalizedPath) -> Vec<String> {
        let prefix = dir.entry_prefix();
        let children: BTreeSet<&str> = self
            .index
            .with_prefix(prefix)
            .filter_map(|entry| entry[prefix.len()..].split(SEPARATOR).next())
            .filter(|name| !name.is_empty())
            .collect();
        children.into_iter().map(str::to_owned).collect()
    }

    /// Whether some entry is `dir`'s marker or lives below it.
    pub fn is_dir(&self, dir: &NormalizedPath) -> bool {
        self.index.with_prefix(dir.entry_prefix()).next().is_some()
    }

    /// Whether `dir` can be entered: the root, or any path [`ArchiveFs::is_dir`] accepts.
    pub fn exists(&self, dir: &NormalizedPath) -> bool {
        dir.is_root() || self.is_dir(dir)
    }
}
