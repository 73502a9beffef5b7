use anyhow::{Context, Result};
use archive_shell::{ArchiveFs, Interpreter};
use argh::FromArgs;
use log::info;
use std::io::Write;
use std::path::PathBuf;

#[derive(FromArgs)]
/// Browse a ZIP archive like a directory tree, without extracting it.
struct Args {
    #[argh(option)]
    /// path to the ZIP archive.
    zip: PathBuf,

    #[argh(option)]
    /// name shown in the prompt. Defaults to $USER.
    user: Option<String>,

    #[argh(option)]
    /// directory inside the archive to start in.
    cwd: Option<String>,

    #[argh(option, short = 'c')]
    /// run this command line and exit instead of starting a session; may be repeated.
    command: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();

    let fs = ArchiveFs::open_zip(&args.zip)?;
    info!("opened {} ({} entries)", args.zip.display(), fs.index().len());

    let mut shell = Interpreter::with_builtins(fs);
    if let Some(cwd) = &args.cwd {
        shell
            .change_dir(cwd)
            .with_context(|| format!("invalid start directory {cwd:?}"))?;
    }

    if !args.command.is_empty() {
        let mut stdout = std::io::stdout().lock();
        let mut code = 0;
        for line in &args.command {
            code = shell.execute_line(line, &mut stdout)?;
            if shell.should_exit() {
                break;
            }
        }
        stdout.flush()?;
        if code != 0 {
            std::process::exit(code);
        }
        return Ok(());
    }

    let user = args
        .user
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "user".to_string());
    shell.repl(&user)?;
    Ok(())
}
