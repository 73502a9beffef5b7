use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::content::DEFAULT_HEAD_LINES;
use crate::env::Environment;
use crate::error::FsError;
use crate::interpreter::Factory;
use crate::path::NormalizedPath;
use crate::tree::DEFAULT_TREE_DEPTH;
use crate::vfs::ArchiveFs;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use log::debug;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and run directly
/// against the archive.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "ls" or "cd".
    fn name() -> &'static str;

    /// Executes the command, writing its output to `stdout`.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, fs: &ArchiveFs, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        fs: &ArchiveFs,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match <T as BuiltinCommand>::execute(*self, fs, stdout, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                debug!("{} failed: {e:#}", T::name());
                writeln!(stdout, "{}: {e:#}", T::name())?;
                Ok(1)
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _fs: &ArchiveFs,
        stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        stdout.write_all(self.output.as_bytes())?;
        if !self.output.ends_with('\n') {
            writeln!(stdout)?;
        }
        Ok(if self.is_error { 1 } else { 0 })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

/// Resolve an optional directory argument and make sure it exists.
fn existing_dir(fs: &ArchiveFs, env: &Environment, target: Option<&str>) -> Result<NormalizedPath, FsError> {
    let dir = match target {
        Some(t) => env.resolve(t),
        None => env.current_dir.clone(),
    };
    if fs.exists(&dir) {
        Ok(dir)
    } else {
        Err(FsError::PathNotFound(dir.display_name().to_string()))
    }
}

/// Write `text`, making sure the output ends on a fresh line.
fn write_text(stdout: &mut dyn Write, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

#[derive(FromArgs)]
/// List the entries of a directory in the archive.
pub struct Ls {
    #[argh(positional)]
    /// directory to list; absolute or relative to the current directory. Defaults to the current directory.
    pub path: Option<String>,
}

impl BuiltinCommand for Ls {
    fn name() -> &'static str {
        "ls"
    }

    fn execute(self, fs: &ArchiveFs, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let dir = existing_dir(fs, env, self.path.as_deref())?;
        let children = fs.list(&dir);
        if children.is_empty() {
            writeln!(stdout, "Directory is empty.")?;
        }
        for child in children {
            writeln!(stdout, "{child}")?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current directory inside the archive.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, fs: &ArchiveFs, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let dir = existing_dir(fs, env, Some(self.target.as_str()))?;
        debug!("cd: {} -> {}", env.current_dir, dir);
        env.current_dir = dir;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the current directory.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(self, _fs: &ArchiveFs, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{}", env.current_dir)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Show the entries below a directory, two levels deep.
pub struct Tree {
    #[argh(positional)]
    /// root of the tree; defaults to the current directory.
    pub path: Option<String>,
}

impl BuiltinCommand for Tree {
    fn name() -> &'static str {
        "tree"
    }

    fn execute(self, fs: &ArchiveFs, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let dir = existing_dir(fs, env, self.path.as_deref())?;
        let tree = fs.tree(&dir, DEFAULT_TREE_DEPTH);
        if tree.is_empty() {
            writeln!(stdout, "No files or directories found.")?;
            return Ok(0);
        }
        stdout.write_all(tree.text().as_bytes())?;
        if tree.is_truncated() {
            writeln!(stdout, "(directories deeper than {DEFAULT_TREE_DEPTH} levels are not expanded)")?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the first lines of a text file.
pub struct Head {
    #[argh(positional)]
    /// file to read; absolute or relative to the current directory.
    pub path: String,

    #[argh(positional)]
    /// number of lines to print (default 10).
    pub lines: Option<usize>,
}

impl BuiltinCommand for Head {
    fn name() -> &'static str {
        "head"
    }

    fn execute(self, fs: &ArchiveFs, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let text = fs.head(&env.resolve(&self.path), self.lines.unwrap_or(DEFAULT_HEAD_LINES))?;
        write_text(stdout, &text)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print a text file with the characters of every line reversed.
pub struct Rev {
    #[argh(positional)]
    /// file to read; absolute or relative to the current directory.
    pub path: String,
}

impl BuiltinCommand for Rev {
    fn name() -> &'static str {
        "rev"
    }

    fn execute(self, fs: &ArchiveFs, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let text = fs.reverse_lines(&env.resolve(&self.path))?;
        write_text(stdout, &text)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// End the session.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _fs: &ArchiveFs, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemSource;

    fn fs_image() -> ArchiveFs {
        let source = MemSource::new()
            .with_dir("fs_image/")
            .with_dir("fs_image/dir1/")
            .with_file("fs_image/dir1/test1.txt", "first\nsecond\nthird\n")
            .with_dir("fs_image/dir1/deep/")
            .with_file("fs_image/dir1/deep/hidden.txt", "")
            .with_dir("fs_image/dir2/")
            .with_file("fs_image/dir2/test2.txt", "abc\ndef")
            .with_dir("fs_image/empty/")
            .with_file("fs_image/test.txt", "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n11\n12\n");
        ArchiveFs::open(source).unwrap()
    }

    fn env_at(path: &str) -> Environment {
        Environment::with_current_dir(Environment::new().resolve(path))
    }

    fn output(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_ls_current_directory() {
        let fs = fs_image();
        let mut env = env_at("/fs_image");
        let mut out = Vec::new();

        let code = BuiltinCommand::execute(Ls { path: None }, &fs, &mut out, &mut env).unwrap();

        assert_eq!(code, 0);
        assert_eq!(output(out), "dir1\ndir2\nempty\ntest.txt\n");
    }

    #[test]
    fn test_ls_relative_path() {
        let fs = fs_image();
        let mut env = env_at("/fs_image");
        let mut out = Vec::new();

        let ls = Ls {
            path: Some("dir2".to_string()),
        };
        BuiltinCommand::execute(ls, &fs, &mut out, &mut env).unwrap();

        assert_eq!(output(out), "test2.txt\n");
    }

    #[test]
    fn test_ls_empty_directory() {
        let fs = fs_image();
        let mut env = env_at("/fs_image/empty");
        let mut out = Vec::new();

        BuiltinCommand::execute(Ls { path: None }, &fs, &mut out, &mut env).unwrap();

        assert_eq!(output(out), "Directory is empty.\n");
    }

    #[test]
    fn test_ls_missing_directory_errors() {
        let fs = fs_image();
        let mut env = Environment::new();
        let ls = Ls {
            path: Some("non_existent_dir".to_string()),
        };

        let err = BuiltinCommand::execute(ls, &fs, &mut Vec::new(), &mut env).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FsError>(),
            Some(FsError::PathNotFound(p)) if p == "/non_existent_dir"
        ));
    }

    #[test]
    fn test_cd_valid_directory() {
        let fs = fs_image();
        let mut env = Environment::new();
        let mut out = Vec::new();

        let cd = Cd {
            target: "fs_image/dir1".to_string(),
        };
        let code = BuiltinCommand::execute(cd, &fs, &mut out, &mut env).unwrap();

        assert_eq!(code, 0);
        assert_eq!(env.current_dir.as_str(), "/fs_image/dir1/");
        assert!(out.is_empty());
    }

    #[test]
    fn test_cd_invalid_directory_keeps_current_dir() {
        let fs = fs_image();
        let mut env = env_at("/fs_image");

        let cd = Cd {
            target: "non_existent_dir".to_string(),
        };
        let res = BuiltinCommand::execute(cd, &fs, &mut Vec::new(), &mut env);

        assert!(res.is_err());
        assert_eq!(env.current_dir.as_str(), "/fs_image/");
    }

    #[test]
    fn test_cd_into_file_is_rejected() {
        let fs = fs_image();
        let mut env = env_at("/fs_image");

        let cd = Cd {
            target: "test.txt".to_string(),
        };

        assert!(BuiltinCommand::execute(cd, &fs, &mut Vec::new(), &mut env).is_err());
        assert_eq!(env.current_dir.as_str(), "/fs_image/");
    }

    #[test]
    fn test_cd_back_to_root_and_above() {
        let fs = fs_image();
        let mut env = env_at("/fs_image/dir1");

        let cd = Cd {
            target: "/".to_string(),
        };
        BuiltinCommand::execute(cd, &fs, &mut Vec::new(), &mut env).unwrap();
        assert!(env.current_dir.is_root());

        let cd = Cd {
            target: "..".to_string(),
        };
        let code = BuiltinCommand::execute(cd, &fs, &mut Vec::new(), &mut env).unwrap();
        assert_eq!(code, 0);
        assert!(env.current_dir.is_root());
    }

    #[test]
    fn test_pwd_prints_current_dir() {
        let fs = fs_image();
        let mut env = env_at("/fs_image/dir2");
        let mut out = Vec::new();

        BuiltinCommand::execute(Pwd {}, &fs, &mut out, &mut env).unwrap();

        assert_eq!(output(out), "/fs_image/dir2/\n");
    }

    #[test]
    fn test_tree_reports_truncation() {
        let fs = fs_image();
        let mut env = env_at("/fs_image");
        let mut out = Vec::new();

        BuiltinCommand::execute(Tree { path: None }, &fs, &mut out, &mut env).unwrap();

        let s = output(out);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[..4], ["dir1", "dir2", "empty", "test.txt"]);
        assert!(!s.contains("test1.txt"));
        assert_eq!(lines.len(), 5);
        assert!(lines[4].starts_with("(directories deeper than 2 levels"));
    }

    #[test]
    fn test_tree_of_empty_directory() {
        let fs = fs_image();
        let mut env = Environment::new();
        let mut out = Vec::new();

        let tree = Tree {
            path: Some("/fs_image/empty".to_string()),
        };
        BuiltinCommand::execute(tree, &fs, &mut out, &mut env).unwrap();

        assert_eq!(output(out), "No files or directories found.\n");
    }

    #[test]
    fn test_tree_of_leaves_has_no_note() {
        let fs = fs_image();
        let mut env = Environment::new();
        let mut out = Vec::new();

        let tree = Tree {
            path: Some("fs_image/dir2".to_string()),
        };
        BuiltinCommand::execute(tree, &fs, &mut out, &mut env).unwrap();

        assert_eq!(output(out), "test2.txt\n");
    }

    #[test]
    fn test_head_default_and_explicit_count() {
        let fs = fs_image();
        let mut env = env_at("/fs_image");

        let mut out = Vec::new();
        let head = Head {
            path: "test.txt".to_string(),
            lines: None,
        };
        BuiltinCommand::execute(head, &fs, &mut out, &mut env).unwrap();
        assert_eq!(output(out).lines().count(), DEFAULT_HEAD_LINES);

        let mut out = Vec::new();
        let head = Head {
            path: "dir1/test1.txt".to_string(),
            lines: Some(2),
        };
        BuiltinCommand::execute(head, &fs, &mut out, &mut env).unwrap();
        assert_eq!(output(out), "first\nsecond\n");
    }

    #[test]
    fn test_rev_adds_final_newline() {
        let fs = fs_image();
        let mut env = Environment::new();
        let mut out = Vec::new();

        let rev = Rev {
            path: "/fs_image/dir2/test2.txt".to_string(),
        };
        BuiltinCommand::execute(rev, &fs, &mut out, &mut env).unwrap();

        assert_eq!(output(out), "cba\nfed\n");
    }

    #[test]
    fn test_error_is_reported_once_to_sink() {
        let fs = fs_image();
        let mut env = Environment::new();
        let mut out = Vec::new();

        let cmd: Box<dyn ExecutableCommand> = Box::new(Rev {
            path: "missing.txt".to_string(),
        });
        let code = cmd.execute(&fs, &mut out, &mut env).unwrap();

        assert_eq!(code, 1);
        assert_eq!(output(out), "rev: no such file: /missing.txt\n");
    }

    #[test]
    fn test_exit_sets_flag() {
        let fs = fs_image();
        let mut env = Environment::new();

        let exit = Exit { _args: Vec::new() };
        BuiltinCommand::execute(exit, &fs, &mut Vec::new(), &mut env).unwrap();

        assert!(env.should_exit);
    }

    #[test]
    fn test_factory_reports_missing_argument() {
        let fs = fs_image();
        let mut env = Environment::new();
        let mut out = Vec::new();

        let cmd = Factory::<Cd>::default()
            .try_create(&env, "cd", &[])
            .expect("cd is recognized");
        let code = cmd.execute(&fs, &mut out, &mut env).unwrap();

        assert_eq!(code, 1);
        assert!(output(out).contains("target"));
        assert!(env.current_dir.is_root());
    }

    #[test]
    fn test_factory_ignores_other_names() {
        let env = Environment::new();
        assert!(Factory::<Ls>::default().try_create(&env, "dir", &[]).is_none());
    }
}
