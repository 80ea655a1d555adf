use std::fmt;
use std::path::{Path, PathBuf};

use super::{CheckContext, Checker};
use crate::error::Result;
use crate::fileset::FileSet;
use crate::process::{CommandSpec, ProcessRunner};
use crate::project;

/// Test runners the gate knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestRunner {
    PhpUnit,
    Behat,
}

impl TestRunner {
    pub const ALL: [TestRunner; 2] = [TestRunner::PhpUnit, TestRunner::Behat];

    /// Base name of the binary and of its configuration files
    pub fn name(self) -> &'static str {
        match self {
            TestRunner::PhpUnit => "phpunit",
            TestRunner::Behat => "behat",
        }
    }

    fn config_flag(self) -> &'static str {
        match self {
            TestRunner::PhpUnit => "-c",
            TestRunner::Behat => "--config",
        }
    }

    /// Candidate configuration files, most preferred first
    ///
    /// No-coverage configs beat regular ones and local files beat `.dist`
    /// files, so a fast local setup always wins.
    pub fn config_candidates(self, project_dir: &Path) -> Vec<PathBuf> {
        let name = self.name();
        let mut candidates = Vec::with_capacity(24);

        for ext in ["xml", "yml"] {
            for dir in [
                project_dir.to_path_buf(),
                project_dir.join("app"),
                project_dir.join("tests"),
            ] {
                candidates.push(dir.join(format!("{name}.nocoverage.{ext}")));
                candidates.push(dir.join(format!("{name}.nocoverage.{ext}.dist")));
                candidates.push(dir.join(format!("{name}.{ext}")));
                candidates.push(dir.join(format!("{name}.{ext}.dist")));
            }
        }

        candidates
    }

    /// First candidate that exists on disk
    pub fn locate_config(self, project_dir: &Path) -> Option<PathBuf> {
        let found = self
            .config_candidates(project_dir)
            .into_iter()
            .find(|candidate| candidate.is_file());
        tracing::debug!(runner = self.name(), config = ?found, "probed test configuration");
        found
    }
}

impl fmt::Display for TestRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs the project's phpunit and behat suites
///
/// Works from configuration files, not from the file set. A runner without
/// a configuration file is skipped with a warning rather than failed.
pub struct TestsChecker<'a, R> {
    ctx: CheckContext<'a, R>,
    bin_dir: PathBuf,
}

impl<'a, R: ProcessRunner> TestsChecker<'a, R> {
    pub fn new(ctx: CheckContext<'a, R>) -> Result<Self> {
        let bin_dir = project::bin_directory(ctx.project_dir)?;
        Ok(Self { ctx, bin_dir })
    }

    fn command(&self, runner: TestRunner, config: &Path) -> CommandSpec {
        self.ctx
            .command(self.bin_dir.join(runner.name()))
            .arg(runner.config_flag())
            .arg(config)
    }

    async fn run_suite(&self, runner: TestRunner) -> bool {
        let Some(config) = runner.locate_config(self.ctx.project_dir) else {
            self.ctx.sink.warning(&format!("No {runner} conf found"));
            return true;
        };

        self.ctx.sink.info(&format!("Found {runner} config file: {}", config.display()));
        let result = self.ctx.runner.run(&self.command(runner, &config)).await;

        if result.success() {
            let output = result.output.trim_end();
            if !output.is_empty() {
                self.ctx.sink.info(output);
            }
            true
        } else {
            self.ctx.report_failure(&format!("{runner} tests failed"), &result);
            false
        }
    }
}

impl<R: ProcessRunner> Checker for TestsChecker<'_, R> {
    type Options = ();

    async fn check(&self, _files: &FileSet, _options: &()) -> Result<bool> {
        // Both suites always run so a phpunit failure still shows behat results
        let mut succeed = true;
        for runner in TestRunner::ALL {
            succeed &= self.run_suite(runner).await;
        }
        Ok(succeed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::fixtures::Project;
    use crate::process::testing::RecordingRunner;
    use crate::sink::{Level, MemorySink};
    use std::fs;

    fn write(project: &Project, relative: &str) -> PathBuf {
        let path = project.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_candidate_order() {
        let root = Path::new("/p");
        let candidates = TestRunner::PhpUnit.config_candidates(root);
        assert_eq!(candidates.len(), 24);
        assert_eq!(candidates[0], root.join("phpunit.nocoverage.xml"));
        assert_eq!(candidates[1], root.join("phpunit.nocoverage.xml.dist"));
        assert_eq!(candidates[2], root.join("phpunit.xml"));
        assert_eq!(candidates[3], root.join("phpunit.xml.dist"));
        assert_eq!(candidates[4], root.join("app/phpunit.nocoverage.xml"));
        assert_eq!(candidates[8], root.join("tests/phpunit.nocoverage.xml"));
        assert_eq!(candidates[12], root.join("phpunit.nocoverage.yml"));
        assert_eq!(candidates[23], root.join("tests/phpunit.yml.dist"));
    }

    #[test]
    fn test_nocoverage_config_beats_dist() {
        let project = Project::new();
        write(&project, "phpunit.xml.dist");
        write(&project, "phpunit.xml");
        let preferred = write(&project, "phpunit.nocoverage.xml");

        assert_eq!(TestRunner::PhpUnit.locate_config(project.root()), Some(preferred));
    }

    #[test]
    fn test_root_dist_beats_app_local() {
        let project = Project::new();
        write(&project, "app/phpunit.xml");
        let root_dist = write(&project, "phpunit.xml.dist");

        assert_eq!(TestRunner::PhpUnit.locate_config(project.root()), Some(root_dist));
    }

    #[tokio::test]
    async fn test_runs_both_suites_with_located_configs() {
        let project = Project::new();
        let phpunit = write(&project, "app/phpunit.xml.dist");
        let behat = write(&project, "behat.yml");
        let runner = RecordingRunner::passing();
        let sink = MemorySink::default();

        let checker = TestsChecker::new(CheckContext::new(project.root(), &runner, &sink)).unwrap();
        assert!(checker.check(&FileSet::default(), &()).await.unwrap());

        assert_eq!(
            runner.command_lines(),
            vec![
                format!("{} -c {}", project.bin().join("phpunit").display(), phpunit.display()),
                format!("{} --config {}", project.bin().join("behat").display(), behat.display()),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_configs_is_skip_as_pass_with_warnings() {
        let project = Project::new();
        let runner = RecordingRunner::failing_when("");
        let sink = MemorySink::default();

        let checker = TestsChecker::new(CheckContext::new(project.root(), &runner, &sink)).unwrap();
        assert!(checker.check(&FileSet::default(), &()).await.unwrap());
        assert!(runner.calls().is_empty());
        assert_eq!(
            sink.at(Level::Warning),
            vec!["No phpunit conf found".to_string(), "No behat conf found".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failing_suite_fails_check_but_other_suite_still_runs() {
        let project = Project::new();
        write(&project, "phpunit.xml");
        write(&project, "behat.yml");
        let runner = RecordingRunner::failing_when("phpunit");
        let sink = MemorySink::default();

        let checker = TestsChecker::new(CheckContext::new(project.root(), &runner, &sink)).unwrap();
        assert!(!checker.check(&FileSet::default(), &()).await.unwrap());
        assert_eq!(runner.calls().len(), 2);
        assert!(sink.contains("phpunit tests failed"));
    }
}
