use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use crate::cli::Output;
use crate::config::{self, CustomCheckSpec, OneOrMany, RunOptions};
use crate::fileset::FileSet;
use crate::git::GitRepo;
use crate::pipeline::CodeQualityTool;
use crate::process::SystemRunner;
use crate::project;

#[derive(Args, Default, Debug)]
pub struct CheckArgs {
    /// Files to check; the whole project when none are given
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Check the files staged for commit
    #[arg(long, conflicts_with = "files")]
    pub staged: bool,

    /// Skip phpunit and behat
    #[arg(long)]
    pub exclude_tests: bool,

    /// phpcs standard, repeat to check several in order
    #[arg(long, value_name = "STANDARD", conflicts_with = "no_coding_standard")]
    pub coding_standard: Vec<String>,

    /// Disable the coding standards stage
    #[arg(long)]
    pub no_coding_standard: bool,

    /// phpmd rule sets, comma separated or repeated
    #[arg(long, value_name = "RULES", value_delimiter = ',', conflicts_with = "no_mess_rules")]
    pub mess_rules: Vec<String>,

    /// Disable the mess detection stage
    #[arg(long)]
    pub no_mess_rules: bool,

    /// Extra linter as `CMD:EXT`, replaces the configured custom checks
    #[arg(long = "custom", value_name = "CMD:EXT")]
    pub custom: Vec<String>,

    /// Seconds each external tool may run, 0 for no limit
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl CheckArgs {
    /// Only the flags actually given
    pub fn overrides(&self) -> RunOptions {
        RunOptions {
            exclude_tests: self.exclude_tests.then_some(true),
            coding_standard: list_override(self.no_coding_standard, &self.coding_standard),
            mess_rules: list_override(self.no_mess_rules, &self.mess_rules),
            timeout: self.timeout,
            custom_checks: (!self.custom.is_empty()).then(|| {
                self.custom
                    .iter()
                    .map(|value| CustomCheckSpec::parse_cli(value))
                    .collect()
            }),
        }
    }

    fn file_set(&self, cwd: &Path, project_dir: &Path) -> Result<Option<FileSet>> {
        if !self.files.is_empty() {
            return Ok(Some(FileSet::resolve(cwd, &self.files)));
        }
        if self.staged {
            return Ok(Some(GitRepo::discover(project_dir)?.staged_files()?));
        }
        Ok(None)
    }
}

fn list_override(disabled: bool, values: &[String]) -> Option<Option<OneOrMany>> {
    if disabled {
        Some(None)
    } else if values.is_empty() {
        None
    } else {
        Some(Some(values.to_vec().into()))
    }
}

pub async fn execute(args: CheckArgs, output: &Output, custom_config: Option<&Path>) -> Result<()> {
    let cwd = super::working_dir()?;
    let project_dir = project::project_directory(&cwd)?;
    let config = config::load(&project_dir, custom_config, &args.overrides())?;
    let files = args.file_set(&cwd, &project_dir)?;

    let runner = SystemRunner::new(config.timeout());
    let gate = CodeQualityTool::new(files, config, runner)?;

    output.header("Code Quality Tool");
    output.verbose(&format!(
        "Checking {} file(s) in {}",
        gate.files().len(),
        project_dir.display()
    ));

    let report = gate.run(output).await?;
    if report.has_warnings() {
        output.success("Code quality checks passed with warnings");
    } else {
        output.success("Code quality checks passed");
    }
    Ok(())
}
