use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

use super::Output;
use crate::project;

pub mod check;
pub mod config;
pub mod hooks;
pub mod status;
pub mod version;

#[derive(Parser)]
#[command(
    name = "quality-gate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Pre-commit code quality gate for PHP projects",
    long_about = "Runs syntax, coding standard, mess detection, custom lint and test checks \
                  over the files of a commit, stopping at the first failing stage."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the quality checks
    Check(check::CheckArgs),
    /// Manage the git pre-commit hook
    Hooks(hooks::HooksArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show project, configuration, hook and tool status
    Status(status::StatusArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Cannot change directory to {}", dir.display()))?;
        }

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);
        let config = self.config.as_deref();

        match self.command {
            Some(Commands::Check(args)) => check::execute(args, &output, config).await,
            Some(Commands::Hooks(args)) => hooks::execute(args, &output).await,
            Some(Commands::Config(args)) => config::execute(args, &output, config).await,
            Some(Commands::Status(args)) => status::execute(args, &output, config).await,
            Some(Commands::Version(args)) => version::execute(args, &output).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // try_init: a subscriber may already be set when driven from tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The working directory the command runs in
pub(crate) fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Cannot determine the current directory")
}

/// Project root above `dir`, or `dir` itself when there is none
pub(crate) fn project_root_or(dir: &Path) -> PathBuf {
    project::project_directory(dir).unwrap_or_else(|_| dir.to_path_buf())
}
