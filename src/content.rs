use crate::error::FsError;
use crate::path::NormalizedPath;
use crate::vfs::ArchiveFs;
use log::debug;

/// Lines printed by `head` when no count is given.
pub const DEFAULT_HEAD_LINES: usize = 10;

impl ArchiveFs {
    /// Decode the file at `path` as UTF-8 text.
    ///
    /// Directory paths and names missing from the index are `EntryNotFound`.
    pub fn read_text(&self, path: &NormalizedPath) -> Result<String, FsError> {
        let name = path.entry_name();
        if name.is_empty() || !self.index.contains(name) {
            return Err(FsError::EntryNotFound(path.display_name().to_string()));
        }

        debug!("reading entry {name}");
        let bytes = self.source.read_entry(self.index.source_name(name))?;
        String::from_utf8(bytes).map_err(|_| FsError::EntryNotText(path.display_name().to_string()))
    }

    /// First `lines` lines of the file, line terminators included.
    pub fn head(&self, path: &NormalizedPath, lines: usize) -> Result<String, FsError> {
        let text = self.read_text(path)?;
        Ok(head_lines(&text, lines).to_string())
    }

    /// The file with the characters of every line reversed.
    pub fn reverse_lines(&self, path: &NormalizedPath) -> Result<String, FsError> {
        let text = self.read_text(path)?;
        Ok(reverse_lines(&text))
    }
}

/// Prefix of `text` holding its first `n` lines.
pub fn head_lines(text: &str, n: usize) -> &str {
    let end: usize = text.split_inclusive('\n').take(n).map(str::len).sum();
    &text[..end]
}

/// Reverse the characters within each line.
///
/// Line order and terminators (`\n` or `\r\n`) stay in place, which makes the
/// operation its own inverse.
pub fn reverse_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);
        out.extend(body.chars().rev());
        out.push_str(ending);
    }
    out
}

fn split_line_ending(line: &str) -> (&str, &str) {
    let body = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line);
    line.split_at(body.len())
}
