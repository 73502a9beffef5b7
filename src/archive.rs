use crate::error::FsError;
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

/// A read-only container of named entries.
///
/// This is the only thing the filesystem layer needs from an archive format:
/// the table of contents, and the bytes behind one name.
pub trait ArchiveSource {
    /// All entry names, in the order the container stores them.
    fn entry_names(&self) -> Result<Vec<String>, FsError>;

    /// Bytes of the entry stored under `name` exactly as listed by
    /// [`ArchiveSource::entry_names`].
    fn read_entry(&self, name: &str) -> Result<Vec<u8>, FsError>;
}

/// A ZIP file on disk.
///
/// The file is opened anew for every call and closed before returning, so
/// holding a `ZipSource` does not keep a descriptor alive.
#[derive(Debug, Clone)]
pub struct ZipSource {
    path: PathBuf,
}

impl ZipSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<ZipArchive<File>, FsError> {
        let file = File::open(&self.path).map_err(|e| self.unreadable(e))?;
        ZipArchive::new(file).map_err(|e| self.unreadable(e))
    }

    fn unreadable(&self, reason: impl Display) -> FsError {
        FsError::ArchiveUnreadable {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl ArchiveSource for ZipSource {
    fn entry_names(&self) -> Result<Vec<String>, FsError> {
        let mut archive = self.open()?;
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i).map_err(|e| self.unreadable(e))?;
            names.push(file.name().to_string());
        }
        Ok(names)
    }

    fn read_entry(&self, name: &str) -> Result<Vec<u8>, FsError> {
        let mut archive = self.open()?;
        let mut file = match archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(FsError::EntryNotFound(name.to_string())),
            Err(e) => return Err(self.unreadable(e)),
        };
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(|e| self.unreadable(e))?;
        Ok(buf)
    }
}

/// An archive held entirely in memory.
///
/// Handy for tests and for embedding a fixed tree into a program.
#[derive(Debug, Clone, Default)]
pub struct MemSource {
    entries: Vec<(String, Vec<u8>)>,
}

impl MemSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory marker. A trailing `/` is appended when missing.
    pub fn with_dir(mut self, name: impl Into<String>) -> Self {
        let mut name = name.into();
        if !name.ends_with('/') {
            name.push('/');
        }
        self.entries.push((name, Vec::new()));
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.entries.push((name.into(), content.into()));
        self
    }
}

impl ArchiveSource for MemSource {
    fn entry_names(&self) -> Result<Vec<String>, FsError> {
        Ok(self.entries.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_entry(&self, name: &str) -> Result<Vec<u8>, FsError> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| FsError::EntryNotFound(name.to_string()))
    }
}

/// Flat table of contents of an archive.
///
/// Names are canonicalized on load: `\` becomes `/`, empty and `.` segments
/// are dropped, and names left empty are skipped. A sorted copy backs prefix
/// queries so that every entry under a directory forms one contiguous run.
#[derive(Debug, Clone)]
pub struct ArchiveIndex {
    entries: Vec<String>,
    sorted: Vec<String>,
    /// Canonical name -> name as stored in the archive, for rewritten names only.
    aliases: HashMap<String, String>,
}

impl ArchiveIndex {
    pub fn load(source: &dyn ArchiveSource) -> Result<Self, FsError> {
        let index = Self::from_names(source.entry_names()?);
        debug!("indexed {} archive entries", index.len());
        Ok(index)
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = Vec::new();
        let mut aliases = HashMap::new();
        for raw in names {
            let raw = raw.into();
            let name = canonical_name(&raw);
            if name.is_empty() {
                trace!("skipping empty entry name {raw:?}");
                continue;
            }
            if name != raw {
                aliases.insert(name.clone(), raw);
            }
            entries.push(name);
        }

        let mut sorted = entries.clone();
        sorted.sort();
        sorted.dedup();

        Self {
            entries,
            sorted,
            aliases,
        }
    }

    /// Entry names in archive order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sorted
            .binary_search_by(|entry| entry.as_str().cmp(name))
            .is_ok()
    }

    /// Entries starting with `prefix`, in lexicographic order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let start = self.sorted.partition_point(|entry| entry.as_str() < prefix);
        self.sorted[start..]
            .iter()
            .map(String::as_str)
            .take_while(move |entry| entry.starts_with(prefix))
    }

    /// The name to hand back to the [`ArchiveSource`] for a canonical entry name.
    pub fn source_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }
}

fn canonical_name(raw: &str) -> String {
    let raw = raw.replace('\\', "/");
    let mut name = raw
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    if !name.is_empty() && raw.ends_with('/') {
        name.push('/');
    }
    name
}
