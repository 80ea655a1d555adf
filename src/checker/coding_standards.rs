use std::path::{Path, PathBuf};

use super::{CheckContext, Checker, PHP_EXTENSION};
use crate::error::Result;
use crate::fileset::FileSet;
use crate::process::{CommandSpec, ProcessRunner};
use crate::project;

/// Runs phpcs against one coding standard
pub struct CodingStandardsChecker<'a, R> {
    ctx: CheckContext<'a, R>,
    bin_dir: PathBuf,
}

impl<'a, R: ProcessRunner> CodingStandardsChecker<'a, R> {
    /// Fails with a configuration error when the bin directory is missing
    pub fn new(ctx: CheckContext<'a, R>) -> Result<Self> {
        let bin_dir = project::bin_directory(ctx.project_dir)?;
        Ok(Self { ctx, bin_dir })
    }

    fn command(&self, standard: &str, file: &Path) -> CommandSpec {
        self.ctx
            .command("php")
            .arg(self.bin_dir.join("phpcs"))
            .arg(format!("--standard={standard}"))
            .arg("--ignore=*/vendor/*")
            .arg(file)
    }
}

impl<R: ProcessRunner> Checker for CodingStandardsChecker<'_, R> {
    type Options = str;

    async fn check(&self, files: &FileSet, standard: &str) -> Result<bool> {
        let label = format!("{standard} coding standard");
        Ok(self
            .ctx
            .check_each(files.existing_with_extension(PHP_EXTENSION), &label, |file| {
                self.command(standard, file)
            })
            .await)
    }
}
