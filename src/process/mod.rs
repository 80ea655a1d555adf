//! External process execution
//!
//! Every checker delegates to a [`ProcessRunner`]. The runner executes one
//! command in a fixed working directory, waits for it to exit and hands back
//! the exit status plus combined output. Nothing is parsed; output is kept
//! verbatim so it can be shown to the user on failure.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

#[cfg(test)]
pub(crate) mod testing;

/// One external command: program, arguments and working directory
///
/// Arguments are OS strings so file paths reach the tool byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub working_dir: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl AsRef<OsStr>, working_dir: &Path) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Full argument vector, program first, for display and logging
    pub fn argv(&self) -> Vec<Cow<'_, str>> {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|arg| arg.to_string_lossy())
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// How a process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    /// The process ran to completion. `None` when killed by a signal.
    Exited(Option<i32>),
    /// The program could not be started at all
    SpawnFailed(String),
    /// The process outlived its time limit and was killed
    TimedOut(Duration),
}

/// Everything the gate keeps from a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: ProcessStatus,
    /// stdout followed by stderr
    pub output: String,
}

impl CommandResult {
    pub fn exited(code: i32, output: impl Into<String>) -> Self {
        Self {
            status: ProcessStatus::Exited(Some(code)),
            output: output.into(),
        }
    }

    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self {
            status: ProcessStatus::SpawnFailed(reason.into()),
            output: String::new(),
        }
    }

    pub fn timed_out(limit: Duration) -> Self {
        Self {
            status: ProcessStatus::TimedOut(limit),
            output: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self.status, ProcessStatus::Exited(Some(0)))
    }

    /// Short description of a failure, suitable for a log line
    pub fn describe(&self) -> String {
        match &self.status {
            ProcessStatus::Exited(Some(code)) => format!("exit code {code}"),
            ProcessStatus::Exited(None) => "terminated by signal".to_string(),
            ProcessStatus::SpawnFailed(reason) => format!("could not be started: {reason}"),
            ProcessStatus::TimedOut(limit) => {
                format!("timed out after {}s and was killed", limit.as_secs_f32())
            }
        }
    }
}

/// Executes external commands on behalf of checkers
#[allow(async_fn_in_trait)]
pub trait ProcessRunner {
    async fn run(&self, command: &CommandSpec) -> CommandResult;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    async fn run(&self, command: &CommandSpec) -> CommandResult {
        (**self).run(command).await
    }
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ProcessRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> CommandResult {
        tracing::debug!(
            command = %command,
            dir = %command.working_dir.display(),
            "spawning"
        );

        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let pending = cmd.output();
        let finished = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, pending).await {
                Ok(finished) => finished,
                Err(_) => {
                    tracing::warn!(command = %command, "process timed out");
                    return CommandResult::timed_out(limit);
                }
            },
            None => pending.await,
        };

        match finished {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                tracing::trace!(command = %command, status = ?output.status, "process finished");
                CommandResult {
                    status: ProcessStatus::Exited(output.status.code()),
                    output: combined,
                }
            }
            Err(e) => {
                tracing::debug!(command = %command, error = %e, "spawn failed");
                CommandResult::spawn_failed(e.to_string())
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn in_tmp(program: &str) -> CommandSpec {
        CommandSpec::new(program, &std::env::temp_dir())
    }

    #[tokio::test]
    async fn test_successful_command() {
        let result = SystemRunner::default().run(&in_tmp("true")).await;
        assert!(result.success());
        assert_eq!(result.status, ProcessStatus::Exited(Some(0)));
    }

    #[tokio::test]
    async fn test_failing_command() {
        let result = SystemRunner::default().run(&in_tmp("false")).await;
        assert!(!result.success());
        assert_eq!(result.describe(), "exit code 1");
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_failure() {
        let result = SystemRunner::default()
            .run(&in_tmp("definitely-not-a-real-binary-4821"))
            .await;
        assert!(!result.success());
        assert!(matches!(result.status, ProcessStatus::SpawnFailed(_)));
    }

    #[tokio::test]
    async fn test_output_combines_stdout_and_stderr() {
        let command = in_tmp("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let result = SystemRunner::default().run(&command).await;
        assert_eq!(result.status, ProcessStatus::Exited(Some(3)));
        assert_eq!(result.output, "out\nerr\n");
    }

    #[tokio::test]
    async fn test_working_directory_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();

        let command = CommandSpec::new("ls", dir.path());
        let result = SystemRunner::default().run(&command).await;
        assert!(result.success());
        assert!(result.output.contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let runner = SystemRunner::new(Some(Duration::from_millis(100)));
        let result = runner.run(&in_tmp("sleep").arg("5")).await;
        assert_eq!(result.status, ProcessStatus::TimedOut(Duration::from_millis(100)));
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_non_utf8_path_reaches_the_process_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(OsStr::from_bytes(b"caf\xe9.php"));
        std::fs::write(&file, "<?php\n").unwrap();

        let command = CommandSpec::new("test", dir.path()).arg("-f").arg(&file);
        assert_eq!(command.args[1].as_os_str(), file.as_os_str());

        let result = SystemRunner::default().run(&command).await;
        assert!(result.success(), "{}", result.describe());
    }

    #[test]
    fn test_display_joins_argv() {
        let command = in_tmp("php").args(["-l", "src/a.php"]);
        assert_eq!(command.to_string(), "php -l src/a.php");
    }
}
