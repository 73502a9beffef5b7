use crate::env::Environment;
use crate::vfs::ArchiveFs;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Exit code reported for a verb no factory recognizes.
pub const EXIT_UNKNOWN_COMMAND: ExitCode = 127;

/// Object-safe trait for any command that can be executed by the shell.
///
/// Output and error messages both go to `stdout`, the display sink; the shell
/// never decides how that text is finally shown.
pub trait ExecutableCommand {
    /// Executes the command against the archive.
    fn execute(
        self: Box<Self>,
        fs: &ArchiveFs,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
