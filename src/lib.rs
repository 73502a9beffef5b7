//! Browse a read-only archive as if it were a filesystem, without extracting it.
//!
//! The archive only carries a flat list of entry names, so every directory is
//! inferred from name prefixes. [`ArchiveFs`] wraps that list and answers the
//! questions a shell needs: what lives in a directory, what a bounded-depth tree
//! looks like, and what text a file holds.
//!
//! [`Interpreter`] sits on top of it. It keeps the current directory across calls
//! and dispatches `ls`, `cd`, `tree`, `head`, `rev`, `pwd` and `exit` to built-in
//! commands that write to any [`std::io::Write`] sink.
//!
//! ```
//! use archive_shell::{ArchiveFs, Interpreter, MemSource};
//!
//! let source = MemSource::new()
//!     .with_dir("docs/")
//!     .with_file("docs/readme.txt", "hello\nworld\n");
//! let mut sh = Interpreter::with_builtins(ArchiveFs::open(source).unwrap());
//!
//! let mut out = Vec::new();
//! sh.execute_line("cd docs", &mut out).unwrap();
//! sh.execute_line("head readme.txt 1", &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "hello\n");
//! ```

mod archive;
mod builtin;
pub mod command;
mod content;
pub mod env;
mod error;
mod interpreter;
mod lexer;
mod listing;
pub mod path;
mod tree;
mod vfs;

pub use archive::{ArchiveIndex, ArchiveSource, MemSource, ZipSource};
pub use content::{DEFAULT_HEAD_LINES, head_lines, reverse_lines};
pub use error::FsError;
pub use interpreter::Interpreter;
pub use path::NormalizedPath;
pub use tree::{DEFAULT_TREE_DEPTH, RenderedTree};
pub use vfs::ArchiveFs;
