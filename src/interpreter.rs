use crate::command::{CommandFactory, EXIT_UNKNOWN_COMMAND, ExitCode};
use crate::env::Environment;
use crate::error::FsError;
use crate::lexer;
use crate::path::NormalizedPath;
use crate::vfs::ArchiveFs;
use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate, see `builtin.rs`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell over an archive.
///
/// The interpreter owns the [`ArchiveFs`], the [`Environment`] (current
/// directory and exit flag) and a list of [`CommandFactory`] objects queried in
/// order to create commands by name. See [`Interpreter::with_builtins`] for the
/// commands included out of the box.
///
/// Example
/// ```
/// use archive_shell::{ArchiveFs, Interpreter, MemSource};
/// let fs = ArchiveFs::open(MemSource::new().with_file("a/b.txt", "hi")).unwrap();
/// let mut sh = Interpreter::with_builtins(fs);
/// let mut out = Vec::new();
/// let code = sh.run("ls", &["a"], &mut out).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(out, b"b.txt\n");
/// ```
pub struct Interpreter {
    fs: ArchiveFs,
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(fs: ArchiveFs, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            fs,
            env: Environment::new(),
            commands,
        }
    }

    /// Create an interpreter with the default set of commands:
    /// `ls`, `cd`, `pwd`, `tree`, `head`, `rev`, `exit`.
    pub fn with_builtins(fs: ArchiveFs) -> Self {
        use crate::builtin::*;
        Self::new(
            fs,
            vec![
                Box::new(Factory::<Ls>::default()),
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Pwd>::default()),
                Box::new(Factory::<Tree>::default()),
                Box::new(Factory::<Head>::default()),
                Box::new(Factory::<Rev>::default()),
                Box::new(Factory::<Exit>::default()),
            ],
        )
    }

    pub fn fs(&self) -> &ArchiveFs {
        &self.fs
    }

    pub fn current_dir(&self) -> &NormalizedPath {
        &self.env.current_dir
    }

    /// Whether `exit` has been run; the front-end should stop reading input.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Move to `target` without going through a command, e.g. for a start directory.
    pub fn change_dir(&mut self, target: &str) -> std::result::Result<(), FsError> {
        let dir = self.env.resolve(target);
        if !self.fs.exists(&dir) {
            return Err(FsError::PathNotFound(dir.display_name().to_string()));
        }
        self.env.current_dir = dir;
        Ok(())
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Unknown names print one `unknown command` line and change nothing. Errors
    /// are returned only when writing to `stdout` fails.
    pub fn run(&mut self, name: &str, args: &[&str], stdout: &mut dyn Write) -> anyhow::Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                debug!("dispatching {name} {args:?} in {}", self.env.current_dir);
                return cmd.execute(&self.fs, stdout, &mut self.env);
            }
        }
        writeln!(stdout, "unknown command: {name}")?;
        Ok(EXIT_UNKNOWN_COMMAND)
    }

    /// Split a raw command line into words and run it.
    ///
    /// Blank lines do nothing. A line that cannot be split (say, an unterminated
    /// quote) is a usage error reported to `stdout`.
    pub fn execute_line(&mut self, line: &str, stdout: &mut dyn Write) -> anyhow::Result<ExitCode> {
        let words = match lexer::split_into_words(line) {
            Ok(words) => words,
            Err(e) => {
                writeln!(stdout, "{}", FsError::Usage(e.to_string()))?;
                return Ok(1);
            }
        };

        let Some((name, args)) = words.split_first() else {
            return Ok(0);
        };
        let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(name, &args_ref, stdout)
    }

    /// Interactive Read-Eval-Print Loop until `exit`, Ctrl-C or end of input.
    pub fn repl(&mut self, user: &str) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            let prompt = format!("{user}@shell:{}$ ", self.env.current_dir);
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    let mut stdout = std::io::stdout().lock();
                    if let Err(err) = self.execute_line(&line, &mut stdout) {
                        warn!("failed to write command output: {err:#}");
                        break;
                    }
                    stdout.flush()?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}
