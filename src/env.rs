use crate::path::{self, NormalizedPath};

/// Session state the interpreter carries between commands.
///
/// The environment contains:
/// - `current_dir`: the directory relative paths are resolved against.
/// - `should_exit`: set by `exit`; the front-end checks it to end the session.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub current_dir: NormalizedPath,
    pub should_exit: bool,
}

impl Environment {
    /// A fresh session positioned at the archive root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_dir(current_dir: NormalizedPath) -> Self {
        Self {
            current_dir,
            should_exit: false,
        }
    }

    /// Resolve user input against the current directory.
    pub fn resolve(&self, input: &str) -> NormalizedPath {
        path::resolve(&self.current_dir, input)
    }
}
