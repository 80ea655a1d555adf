//! Checkers wrap one external analysis tool each
//!
//! A checker filters the [`FileSet`] down to the files it applies to, builds
//! one command per file (or one for the whole project), runs it through the
//! [`ProcessRunner`] and reports a single aggregate result. A failing file
//! never stops the batch; every file is checked so the user sees all of them.
//!
//! ## Variants
//!
//! - [`SyntaxErrorChecker`] - `php -l`
//! - [`CodingStandardsChecker`] - phpcs, once per standard
//! - [`MessDetector`] - phpmd with a rule set
//! - [`CustomChecker`] - any `{cmd, ext}` pair from the configuration
//! - [`TestsChecker`] - phpunit and behat, located by config file probing

use std::ffi::OsStr;
use std::path::Path;

use crate::error::Result;
use crate::fileset::FileSet;
use crate::process::{CommandResult, CommandSpec, ProcessRunner};
use crate::sink::OutputSink;

mod coding_standards;
mod custom;
mod mess;
mod syntax;
mod tests_runner;

pub use coding_standards::CodingStandardsChecker;
pub use custom::{CustomCheck, CustomChecker};
pub use mess::MessDetector;
pub use syntax::SyntaxErrorChecker;
pub use tests_runner::{TestRunner, TestsChecker};

/// Extension of the files the PHP tools look at
pub const PHP_EXTENSION: &str = "php";

/// Common contract of all checkers
///
/// `Options` is whatever the variant needs per invocation: a standard name,
/// a rule list, a custom check descriptor, or nothing.
#[allow(async_fn_in_trait)]
pub trait Checker {
    type Options: ?Sized;

    /// Run the tool and return whether every relevant file passed
    async fn check(&self, files: &FileSet, options: &Self::Options) -> Result<bool>;
}

/// What every checker gets from the orchestrator
pub struct CheckContext<'a, R> {
    pub project_dir: &'a Path,
    pub runner: &'a R,
    pub sink: &'a dyn OutputSink,
}

impl<R> Clone for CheckContext<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for CheckContext<'_, R> {}

impl<'a, R: ProcessRunner> CheckContext<'a, R> {
    pub fn new(project_dir: &'a Path, runner: &'a R, sink: &'a dyn OutputSink) -> Self {
        Self {
            project_dir,
            runner,
            sink,
        }
    }

    /// A command rooted in the project directory
    pub fn command(&self, program: impl AsRef<OsStr>) -> CommandSpec {
        CommandSpec::new(program, self.project_dir)
    }

    /// Run one command per file, logging a line for each
    ///
    /// `label` names the tool in log lines: `"<label> ok for <file>"` on
    /// success, `"<label> failed for <file>"` followed by the tool output on
    /// failure.
    pub(crate) async fn check_each<'f>(
        &self,
        files: impl IntoIterator<Item = &'f Path>,
        label: &str,
        build: impl Fn(&Path) -> CommandSpec,
    ) -> bool {
        let mut succeed = true;

        for file in files {
            let command = build(file);
            tracing::debug!(file = %file.display(), command = %command, "checking file");
            let result = self.runner.run(&command).await;
            if result.success() {
                self.sink.info(&format!("{label} ok for {}", file.display()));
            } else {
                succeed = false;
                self.report_failure(&format!("{label} failed for {}", file.display()), &result);
            }
        }

        succeed
    }

    /// Log a failed command, keeping spawn failures and timeouts distinct
    /// from ordinary non-zero exits
    pub(crate) fn report_failure(&self, headline: &str, result: &CommandResult) {
        self.sink.error(&format!("{headline} ({})", result.describe()));
        let output = result.output.trim_end();
        if !output.is_empty() {
            self.sink.error(output);
        }
    }
}
