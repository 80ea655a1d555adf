//! Availability of the external tools the gate drives
//!
//! Used by `status` to tell the user what is missing before a commit fails
//! on it. The interpreter is looked up on `PATH`; the PHP tools live in the
//! project's bin directory; custom checks may be either.

use std::path::{Path, PathBuf};

use crate::checker::{CustomCheck, TestRunner};
use crate::project;

/// Tools installed into the bin directory by composer
const BIN_TOOLS: &[&str] = &["phpcs", "phpmd"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    Available(PathBuf),
    Missing,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ToolStatus::Available(_))
    }
}

/// One probed tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReport {
    pub name: String,
    pub status: ToolStatus,
}

/// Look `program` up the way the runner would resolve it
///
/// Paths with a separator are taken relative to `project_dir`, bare names
/// are searched on `PATH`.
pub fn locate(program: &str, project_dir: &Path) -> ToolStatus {
    if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        let path = project_dir.join(program);
        return if path.is_file() {
            ToolStatus::Available(path)
        } else {
            ToolStatus::Missing
        };
    }

    match which::which(program) {
        Ok(path) => ToolStatus::Available(path),
        Err(_) => ToolStatus::Missing,
    }
}

/// Probe the interpreter, the bin directory tools and every custom check
pub fn probe(project_dir: &Path, custom_checks: &[CustomCheck]) -> Vec<ToolReport> {
    let mut reports = vec![ToolReport {
        name: "php".to_string(),
        status: locate("php", project_dir),
    }];

    let bin_dir = project::bin_directory(project_dir).ok();
    let bin_tools = BIN_TOOLS
        .iter()
        .copied()
        .chain(TestRunner::ALL.iter().map(|runner| runner.name()));
    for tool in bin_tools {
        let status = bin_dir
            .as_ref()
            .map(|dir| dir.join(tool))
            .filter(|path| path.is_file())
            .map_or(ToolStatus::Missing, ToolStatus::Available);
        reports.push(ToolReport {
            name: tool.to_string(),
            status,
        });
    }

    for check in custom_checks {
        if let Some(program) = check.command().split_whitespace().next() {
            reports.push(ToolReport {
                name: program.to_string(),
                status: locate(program, project_dir),
            });
        }
    }

    tracing::debug!(count = reports.len(), "probed external tools");
    reports
}
