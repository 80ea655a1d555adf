use std::path::Path;

use super::{CheckContext, Checker, PHP_EXTENSION};
use crate::error::Result;
use crate::fileset::FileSet;
use crate::process::{CommandSpec, ProcessRunner};

/// Lints PHP files with `php -l`
pub struct SyntaxErrorChecker<'a, R> {
    ctx: CheckContext<'a, R>,
}

impl<'a, R: ProcessRunner> SyntaxErrorChecker<'a, R> {
    pub fn new(ctx: CheckContext<'a, R>) -> Self {
        Self { ctx }
    }

    fn command(&self, file: &Path) -> CommandSpec {
        self.ctx.command("php").arg("-l").arg(file)
    }
}

impl<R: ProcessRunner> Checker for SyntaxErrorChecker<'_, R> {
    type Options = ();

    async fn check(&self, files: &FileSet, _options: &()) -> Result<bool> {
        Ok(self
            .ctx
            .check_each(files.existing_with_extension(PHP_EXTENSION), "syntax", |file| {
                self.command(file)
            })
            .await)
    }
}
