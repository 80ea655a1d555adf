use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::checker::CustomCheck;
use crate::cli::Output;
use crate::config::{self, RunOptions};
use crate::git::{GitRepo, HookState};
use crate::project;
use crate::tools::{self, ToolStatus};

#[derive(Args, Default)]
pub struct StatusArgs {}

pub async fn execute(
    _args: StatusArgs,
    output: &Output,
    custom_config: Option<&Path>,
) -> Result<()> {
    let cwd = super::working_dir()?;
    output.header("Quality Gate Status");

    output.category("Project");
    let project_dir = match project::project_directory(&cwd) {
        Ok(dir) => {
            output.key_value("Root:", &dir.display().to_string(), true);
            dir
        }
        Err(e) => {
            output.status_indicator("MISSING", &e.to_string(), false);
            cwd.clone()
        }
    };
    match project::bin_directory(&project_dir) {
        Ok(dir) => output.key_value("Bin dir:", &dir.display().to_string(), true),
        Err(e) => output.status_indicator("MISSING", &e.to_string(), false),
    }

    output.category("Configuration");
    let config_file = custom_config
        .map(Path::to_path_buf)
        .or_else(|| config::find_config_file(&project_dir));
    match &config_file {
        Some(path) => output.key_value("File:", &path.display().to_string(), true),
        None => output.key_value("File:", "none, using defaults", false),
    }
    let custom_checks = match config::load(&project_dir, custom_config, &RunOptions::default()) {
        Ok(config) => {
            output.key_value(
                "Standards:",
                &config.coding_standards().map_or("disabled".to_string(), |s| s.join(", ")),
                false,
            );
            output.key_value(
                "Mess rules:",
                &config.mess_rules_joined().unwrap_or_else(|| "disabled".to_string()),
                false,
            );
            output.key_value(
                "Tests:",
                if config.exclude_tests() { "excluded" } else { "included" },
                false,
            );
            config
                .custom_checks()
                .iter()
                .filter_map(|spec| CustomCheck::try_from(spec).ok())
                .collect()
        }
        Err(e) => {
            output.status_indicator("INVALID", &e.to_string(), false);
            Vec::new()
        }
    };

    output.category("Git hook");
    match GitRepo::discover(&project_dir) {
        Ok(repo) => match repo.pre_commit_state()? {
            HookState::Installed => output.status_indicator("INSTALLED", "pre-commit", true),
            HookState::Foreign => {
                output.status_indicator("FOREIGN", "pre-commit not managed by quality-gate", false)
            }
            HookState::Missing => {
                output.status_indicator("MISSING", "run 'quality-gate hooks install'", false)
            }
        },
        Err(_) => output.status_indicator("MISSING", "not in a git repository", false),
    }

    output.category("Tools");
    for report in tools::probe(&project_dir, &custom_checks) {
        match report.status {
            ToolStatus::Available(path) => {
                output.status_indicator(&report.name, &path.display().to_string(), true)
            }
            ToolStatus::Missing => output.status_indicator(&report.name, "not found", false),
        }
    }

    Ok(())
}
