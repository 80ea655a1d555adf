//! Git hook management commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::Output;
use crate::git::{GitRepo, HookInstall, HookState, MANUAL_MARKER};

#[derive(Args)]
pub struct HooksArgs {
    #[command(subcommand)]
    pub command: HooksCommand,
}

#[derive(Subcommand)]
pub enum HooksCommand {
    /// Install the pre-commit hook
    Install {
        /// Replace the hook even when hooks are managed manually
        #[arg(short, long)]
        force: bool,
    },
    /// Remove the pre-commit hook installed by quality-gate
    Remove,
    /// Show whether the pre-commit hook is installed
    Status,
}

pub async fn execute(args: HooksArgs, output: &Output) -> Result<()> {
    let repo = GitRepo::discover(super::working_dir()?)?;

    match args.command {
        HooksCommand::Install { force } => install(&repo, force, output),
        HooksCommand::Remove => remove(&repo, output),
        HooksCommand::Status => status(&repo, output),
    }
}

fn install(repo: &GitRepo, force: bool, output: &Output) -> Result<()> {
    match repo.install_pre_commit(force)? {
        HookInstall::Installed(path) => {
            output.info("Copying git hooks...");
            output.success(&format!("Installed pre-commit hook at {}", path.display()));
        }
        HookInstall::KeptManual(path) => {
            output.warning(&format!(
                "Found {MANUAL_MARKER} marker, keeping {} (use --force to replace it)",
                path.display()
            ));
        }
    }
    output.success("Git hooks ok!");
    Ok(())
}

fn remove(repo: &GitRepo, output: &Output) -> Result<()> {
    if repo.remove_pre_commit()? {
        output.success("Removed pre-commit hook");
    } else {
        output.info("No pre-commit hook installed");
    }
    Ok(())
}

fn status(repo: &GitRepo, output: &Output) -> Result<()> {
    let path = repo.hook_path();
    match repo.pre_commit_state()? {
        HookState::Installed => {
            output.status_indicator("INSTALLED", &path.display().to_string(), true)
        }
        HookState::Foreign => output.status_indicator(
            "FOREIGN",
            &format!("{} exists but is not managed by quality-gate", path.display()),
            false,
        ),
        HookState::Missing => {
            output.status_indicator("MISSING", "Run 'quality-gate hooks install'", false)
        }
    }
    if repo.is_manual() {
        output.info(&format!("Hooks are managed manually ({MANUAL_MARKER} marker present)"));
    }
    Ok(())
}
