//! Configuration for a gate run
//!
//! [`RunOptions`] is the layered, user-facing shape: every field optional so
//! that each layer (defaults, config file, environment, CLI) only overrides
//! what it actually sets. [`RunConfiguration`] is the resolved, immutable
//! result the pipeline runs against.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

mod core;
mod smart_load;

pub use self::core::{CONFIG_BASENAME, ENV_PREFIX, find_config_file, load};

pub const DEFAULT_CODING_STANDARD: &str = "PSR2";
pub const DEFAULT_MESS_RULES: &str = "controversial";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// A single name or a list of names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Non-blank entries, or `None` when nothing is left
    pub fn into_list(self) -> Option<Vec<String>> {
        let list: Vec<String> = match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();

        (!list.is_empty()).then_some(list)
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Many(values)
    }
}

/// A custom check exactly as written in the configuration
///
/// Both fields are optional here so that a malformed entry surfaces as a
/// configuration error from the gate rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCheckSpec {
    #[serde(default, alias = "command", skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,

    #[serde(default, alias = "extension", skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
}

impl CustomCheckSpec {
    pub fn new(cmd: &str, ext: &str) -> Self {
        Self {
            cmd: Some(cmd.to_string()),
            ext: Some(ext.to_string()),
        }
    }

    /// Parse the CLI form `CMD:EXT`, splitting on the last colon
    pub fn parse_cli(value: &str) -> Self {
        match value.rsplit_once(':') {
            Some((cmd, ext)) => Self::new(cmd, ext),
            None => Self {
                cmd: Some(value.to_string()),
                ext: None,
            },
        }
    }
}

impl fmt::Display for CustomCheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{cmd: {}, ext: {}}}",
            self.cmd.as_deref().unwrap_or("<missing>"),
            self.ext.as_deref().unwrap_or("<missing>")
        )
    }
}

/// Layered options; `None` means "not set at this layer"
///
/// The stage lists are double options: `Some(None)` is an explicit `null`,
/// which disables the stage just like an empty string or list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_tests: Option<bool>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub coding_standard: Option<Option<OneOrMany>>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub mess_rules: Option<Option<OneOrMany>>,

    /// Seconds per external process, 0 disables the limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_checks: Option<Vec<CustomCheckSpec>>,
}

/// Only called for keys that are present, so `null` becomes `Some(None)`
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<OneOrMany>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<OneOrMany>::deserialize(deserializer).map(Some)
}

/// Stage list after layering: unset falls back to `default`
fn stage_list(value: Option<Option<OneOrMany>>, default: &str) -> Option<Vec<String>> {
    match value {
        None => Some(vec![default.to_string()]),
        Some(None) => None,
        Some(Some(value)) => value.into_list(),
    }
}

/// Resolved configuration of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    project_dir: PathBuf,
    exclude_tests: bool,
    coding_standard: Option<Vec<String>>,
    mess_rules: Option<Vec<String>>,
    custom_checks: Vec<CustomCheckSpec>,
    timeout: Option<Duration>,
}

impl RunConfiguration {
    /// Defaults only
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self::resolve(project_dir, RunOptions::default())
    }

    /// Apply `overrides` on top of the defaults
    ///
    /// This is the only place defaults are filled in, so an explicit `null`
    /// from any layer still reaches it as `Some(None)`.
    pub fn resolve(project_dir: impl Into<PathBuf>, overrides: RunOptions) -> Self {
        let timeout = Some(overrides.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            project_dir: project_dir.into(),
            exclude_tests: overrides.exclude_tests.unwrap_or(false),
            coding_standard: stage_list(overrides.coding_standard, DEFAULT_CODING_STANDARD),
            mess_rules: stage_list(overrides.mess_rules, DEFAULT_MESS_RULES),
            custom_checks: overrides.custom_checks.unwrap_or_default(),
            timeout,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn exclude_tests(&self) -> bool {
        self.exclude_tests
    }

    /// Standards in configured order, `None` when the stage is disabled
    pub fn coding_standards(&self) -> Option<&[String]> {
        self.coding_standard.as_deref()
    }

    pub fn mess_rules(&self) -> Option<&[String]> {
        self.mess_rules.as_deref()
    }

    /// Mess rules flattened to the comma separated form phpmd expects
    pub fn mess_rules_joined(&self) -> Option<String> {
        self.mess_rules.as_ref().map(|rules| rules.join(","))
    }

    pub fn custom_checks(&self) -> &[CustomCheckSpec] {
        &self.custom_checks
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Back to the layered shape, e.g. for `config show`
    pub fn to_options(&self) -> RunOptions {
        RunOptions {
            exclude_tests: Some(self.exclude_tests),
            coding_standard: Some(Some(OneOrMany::Many(
                self.coding_standard.clone().unwrap_or_default(),
            ))),
            mess_rules: Some(Some(OneOrMany::Many(self.mess_rules.clone().unwrap_or_default()))),
            timeout: Some(self.timeout.map_or(0, |t| t.as_secs())),
            custom_checks: Some(self.custom_checks.clone()),
        }
    }
}
