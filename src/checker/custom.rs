use std::fmt;

use super::{CheckContext, Checker};
use crate::config::CustomCheckSpec;
use crate::error::{GateError, Result};
use crate::fileset::FileSet;
use crate::process::ProcessRunner;

/// A validated custom check: command tokens plus the extension it targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCheck {
    command: String,
    tokens: Vec<String>,
    extension: String,
}

impl CustomCheck {
    pub fn new(command: &str, extension: &str) -> Result<Self> {
        let tokens: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return Err(GateError::config(format!(
                "Invalid custom check configuration: empty command for extension '{extension}'"
            )));
        }

        let extension = extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            return Err(GateError::config(format!(
                "Invalid custom check configuration: empty extension for command '{command}'"
            )));
        }

        Ok(Self {
            command: command.trim().to_string(),
            tokens,
            extension: extension.to_string(),
        })
    }

    /// The command as configured
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl TryFrom<&CustomCheckSpec> for CustomCheck {
    type Error = GateError;

    fn try_from(spec: &CustomCheckSpec) -> Result<Self> {
        match (&spec.cmd, &spec.ext) {
            (Some(cmd), Some(ext)) => Self::new(cmd, ext),
            _ => Err(GateError::config(format!(
                "Invalid custom check configuration {spec}: both 'cmd' and 'ext' are required"
            ))),
        }
    }
}

impl fmt::Display for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (*.{})", self.command, self.extension)
    }
}

/// Runs a user supplied linter such as scss-lint or jscs
pub struct CustomChecker<'a, R> {
    ctx: CheckContext<'a, R>,
}

impl<'a, R: ProcessRunner> CustomChecker<'a, R> {
    pub fn new(ctx: CheckContext<'a, R>) -> Self {
        Self { ctx }
    }
}

impl<R: ProcessRunner> Checker for CustomChecker<'_, R> {
    type Options = CustomCheck;

    async fn check(&self, files: &FileSet, check: &CustomCheck) -> Result<bool> {
        let (program, args) = check
            .tokens
            .split_first()
            .ok_or_else(|| GateError::config("Invalid custom check configuration: empty command"))?;

        Ok(self
            .ctx
            .check_each(
                files.existing_with_extension(&check.extension),
                &check.command,
                |file| {
                    self.ctx
                        .command(program.as_str())
                        .args(args)
                        .arg(file)
                },
            )
            .await)
    }
}
