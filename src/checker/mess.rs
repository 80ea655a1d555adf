use std::path::{Path, PathBuf};

use super::{CheckContext, Checker, PHP_EXTENSION};
use crate::error::Result;
use crate::fileset::FileSet;
use crate::process::{CommandSpec, ProcessRunner};
use crate::project;

/// Runs phpmd with a comma separated rule set
pub struct MessDetector<'a, R> {
    ctx: CheckContext<'a, R>,
    bin_dir: PathBuf,
}

impl<'a, R: ProcessRunner> MessDetector<'a, R> {
    pub fn new(ctx: CheckContext<'a, R>) -> Result<Self> {
        let bin_dir = project::bin_directory(ctx.project_dir)?;
        Ok(Self { ctx, bin_dir })
    }

    fn command(&self, rules: &str, file: &Path) -> CommandSpec {
        self.ctx
            .command("php")
            .arg(self.bin_dir.join("phpmd"))
            .arg(file)
            .arg("text")
            .arg(rules)
    }
}

impl<R: ProcessRunner> Checker for MessDetector<'_, R> {
    /// Rule names joined with commas, no spaces
    type Options = str;

    async fn check(&self, files: &FileSet, rules: &str) -> Result<bool> {
        let label = format!("PHPMD {rules}");
        Ok(self
            .ctx
            .check_each(files.existing_with_extension(PHP_EXTENSION), &label, |file| {
                self.command(rules, file)
            })
            .await)
    }
}
