//! Path normalization inside the archive.
//!
//! Archive entries are plain relative names (`docs/readme.txt`). The shell shows
//! them as absolute paths rooted at `/` and always addresses directories with a
//! trailing separator, so `/docs/` corresponds to every entry starting with
//! `docs/`.

use std::fmt;

/// The only separator the shell understands.
pub const SEPARATOR: char = '/';

/// An absolute, separator-terminated path with no `.`, `..` or empty segments.
///
/// Obtained from [`resolve`] (or [`NormalizedPath::root`]); there is no way to
/// build one from an arbitrary string without normalizing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Path segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Last segment, `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Prefix shared by every archive entry under this directory.
    ///
    /// The root maps to the empty prefix, which every entry starts with.
    pub fn entry_prefix(&self) -> &str {
        &self.0[1..]
    }

    /// Archive name of the file this path points to.
    pub fn entry_name(&self) -> &str {
        self.entry_prefix().trim_end_matches(SEPARATOR)
    }

    /// Path of a direct child. `name` must be a single segment.
    pub fn join(&self, name: &str) -> Self {
        debug_assert!(!name.contains(SEPARATOR));
        Self(format!("{}{}{}", self.0, name, SEPARATOR))
    }

    /// The path as a user would type it for a file: no trailing separator.
    pub fn display_name(&self) -> &str {
        if self.is_root() {
            &self.0
        } else {
            self.0.trim_end_matches(SEPARATOR)
        }
    }

    fn from_segments(segments: &[&str]) -> Self {
        let mut path = String::from(SEPARATOR);
        for segment in segments {
            path.push_str(segment);
            path.push(SEPARATOR);
        }
        Self(path)
    }
}

impl Default for NormalizedPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve `input` against `current`.
///
/// Absolute input ignores `current`. `.` and empty segments vanish, `..` drops
/// the previous segment and stops at the root.
pub fn resolve(current: &NormalizedPath, input: &str) -> NormalizedPath {
    let mut segments: Vec<&str> = if input.starts_with(SEPARATOR) {
        Vec::new()
    } else {
        current.segments().collect()
    };

    for segment in input.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    NormalizedPath::from_segments(&segments)
}
