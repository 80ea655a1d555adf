//! The gate itself: an ordered, fail-fast run of every check stage
//!
//! Stages run in a fixed order. The first failing stage ends the run with a
//! [`GateError::CheckFailed`] naming it; later stages are never started. A
//! disabled stage counts as passed. The composer lock check only ever warns.

use std::fmt;

use crate::checker::{
    CheckContext, Checker, CodingStandardsChecker, CustomCheck, CustomChecker, MessDetector,
    PHP_EXTENSION, SyntaxErrorChecker, TestsChecker,
};
use crate::config::RunConfiguration;
use crate::error::{GateError, Result};
use crate::fileset::FileSet;
use crate::process::ProcessRunner;
use crate::project;
use crate::sink::OutputSink;

const COMPOSER_LOCK: &str = "composer.lock";

/// One step of the gate, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Syntax,
    CodingStandards,
    Mess,
    Custom,
    Tests,
    ComposerLock,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Syntax,
        Stage::CodingStandards,
        Stage::Mess,
        Stage::Custom,
        Stage::Tests,
        Stage::ComposerLock,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Syntax => "syntax",
            Stage::CodingStandards => "coding standards",
            Stage::Mess => "mess rules",
            Stage::Custom => "custom checks",
            Stage::Tests => "tests",
            Stage::ComposerLock => "composer lock",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a stage ended when it did not fail the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Passed,
    Skipped,
    Warned,
}

/// Outcome of a run that got through every stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    stages: Vec<(Stage, StageStatus)>,
}

impl PipelineReport {
    fn record(&mut self, stage: Stage, status: StageStatus) {
        tracing::debug!(stage = %stage, status = ?status, "stage finished");
        self.stages.push((stage, status));
    }

    pub fn stages(&self) -> &[(Stage, StageStatus)] {
        &self.stages
    }

    pub fn status(&self, stage: Stage) -> Option<StageStatus> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, status)| *status)
    }

    pub fn has_warnings(&self) -> bool {
        self.stages
            .iter()
            .any(|(_, status)| *status == StageStatus::Warned)
    }
}

/// Runs every stage against one file set
pub struct CodeQualityTool<R> {
    config: RunConfiguration,
    files: FileSet,
    custom_checks: Vec<CustomCheck>,
    runner: R,
}

impl<R: ProcessRunner> CodeQualityTool<R> {
    /// Build the gate for `files`, or for the whole project when `files` is
    /// `None` or empty
    ///
    /// Custom check entries are validated here, so a malformed one is a
    /// configuration error before anything has been spawned.
    pub fn new(files: Option<FileSet>, config: RunConfiguration, runner: R) -> Result<Self> {
        let custom_checks = config
            .custom_checks()
            .iter()
            .map(CustomCheck::try_from)
            .collect::<Result<Vec<_>>>()?;

        let files = match files {
            Some(files) if !files.is_empty() => files,
            _ => {
                let mut extensions = vec![PHP_EXTENSION];
                extensions.extend(custom_checks.iter().map(CustomCheck::extension));
                project::project_files(config.project_dir(), &extensions)?
            }
        };
        tracing::debug!(files = files.len(), "quality gate prepared");

        Ok(Self {
            config,
            files,
            custom_checks,
            runner,
        })
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// Run all stages in order, stopping at the first failure
    pub async fn run(&self, sink: &dyn OutputSink) -> Result<PipelineReport> {
        let ctx = CheckContext::new(self.config.project_dir(), &self.runner, sink);
        let mut report = PipelineReport::default();

        report.record(Stage::Syntax, self.check_syntax(ctx).await?);
        report.record(Stage::CodingStandards, self.check_coding_standards(ctx).await?);
        report.record(Stage::Mess, self.check_mess_rules(ctx).await?);
        report.record(Stage::Custom, self.check_custom(ctx).await?);
        report.record(Stage::Tests, self.check_tests(ctx).await?);
        report.record(Stage::ComposerLock, self.check_composer(sink));

        Ok(report)
    }

    async fn check_syntax(&self, ctx: CheckContext<'_, R>) -> Result<StageStatus> {
        ctx.sink.info("Checking for syntax errors...");
        if !SyntaxErrorChecker::new(ctx).check(&self.files, &()).await? {
            return Err(GateError::check_failed(Stage::Syntax, "There are syntax errors!"));
        }
        Ok(StageStatus::Passed)
    }

    async fn check_coding_standards(&self, ctx: CheckContext<'_, R>) -> Result<StageStatus> {
        let Some(standards) = self.config.coding_standards() else {
            ctx.sink.info("Skipping coding standards...");
            return Ok(StageStatus::Skipped);
        };

        ctx.sink.info("Checking coding standards...");
        let checker = CodingStandardsChecker::new(ctx)?;

        // Every standard is evaluated so the report names all that fail
        let mut failing = Vec::new();
        for standard in standards {
            if !checker.check(&self.files, standard.as_str()).await? {
                failing.push(standard.as_str());
            }
        }

        if !failing.is_empty() {
            return Err(GateError::check_failed(
                Stage::CodingStandards,
                format!("There are {} coding standard violations!", failing.join(", ")),
            ));
        }
        Ok(StageStatus::Passed)
    }

    async fn check_mess_rules(&self, ctx: CheckContext<'_, R>) -> Result<StageStatus> {
        let Some(rules) = self.config.mess_rules_joined() else {
            ctx.sink.info("Skipping mess rules...");
            return Ok(StageStatus::Skipped);
        };

        ctx.sink.info("Checking code for php mess rules...");
        if !MessDetector::new(ctx)?.check(&self.files, rules.as_str()).await? {
            return Err(GateError::check_failed(
                Stage::Mess,
                "There are php mess code violations!",
            ));
        }
        Ok(StageStatus::Passed)
    }

    async fn check_custom(&self, ctx: CheckContext<'_, R>) -> Result<StageStatus> {
        if self.custom_checks.is_empty() {
            ctx.sink.info("No custom checks...");
            return Ok(StageStatus::Skipped);
        }

        let checker = CustomChecker::new(ctx);
        for check in &self.custom_checks {
            ctx.sink.info(&format!("Checking {}...", check.command()));
            if !checker.check(&self.files, check).await? {
                return Err(GateError::check_failed(
                    Stage::Custom,
                    format!("There are {} violations!", check.command()),
                ));
            }
        }
        Ok(StageStatus::Passed)
    }

    async fn check_tests(&self, ctx: CheckContext<'_, R>) -> Result<StageStatus> {
        if self.config.exclude_tests() {
            ctx.sink.info("Skipping tests...");
            return Ok(StageStatus::Skipped);
        }

        ctx.sink.info("Checking tests...");
        if !TestsChecker::new(ctx)?.check(&self.files, &()).await? {
            return Err(GateError::check_failed(Stage::Tests, "Tests are failing!"));
        }
        Ok(StageStatus::Passed)
    }

    fn check_composer(&self, sink: &dyn OutputSink) -> StageStatus {
        let root = self.config.project_dir();
        let manifest_changed = self.files.contains(&root.join(project::PROJECT_MANIFEST));
        let lock_included = self.files.contains(&root.join(COMPOSER_LOCK));

        if manifest_changed && !lock_included {
            sink.warning("WARNING: Composer.json has changed and lock file is not included");
            return StageStatus::Warned;
        }
        StageStatus::Passed
    }
}
