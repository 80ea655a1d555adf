use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};

use super::smart_load;
use super::{RunConfiguration, RunOptions};
use crate::error::{GateError, Result};

/// Base name of the project configuration file
pub const CONFIG_BASENAME: &str = "quality-gate";

/// Prefix of environment overrides, e.g. `QUALITY_GATE_EXCLUDE_TESTS=true`
pub const ENV_PREFIX: &str = "QUALITY_GATE_";

const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// First `quality-gate.{toml,yaml,yml,json}` in the project directory
pub fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| project_dir.join(format!("{CONFIG_BASENAME}.{ext}")))
        .find(|path| path.is_file())
}

/// Build the layered configuration chain
///
/// 1. project config file, or `custom_config` when given (lowest)
/// 2. `QUALITY_GATE_*` environment variables
/// 3. CLI overrides (highest, unset flags are skipped)
///
/// Built-in defaults are applied afterwards by [`RunConfiguration::resolve`].
pub fn figment(
    project_dir: &Path,
    custom_config: Option<&Path>,
    cli_overrides: &RunOptions,
) -> Figment {
    tracing::trace!("CONFIG LOAD: Starting");

    let mut figment = Figment::new();

    let config_file = custom_config
        .map(Path::to_path_buf)
        .or_else(|| find_config_file(project_dir));
    if let Some(path) = config_file {
        tracing::debug!(path = %path.display(), "using config file");
        figment = figment.merge(smart_load::auto(path));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(cli_overrides))
}

/// Load and resolve the configuration for `project_dir`
pub fn load(
    project_dir: &Path,
    custom_config: Option<&Path>,
    cli_overrides: &RunOptions,
) -> Result<RunConfiguration> {
    if let Some(path) = custom_config.filter(|path| !path.is_file()) {
        return Err(GateError::config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let options: RunOptions = figment(project_dir, custom_config, cli_overrides)
        .extract()
        .map_err(|e| GateError::config(format!("Invalid configuration: {e}")))?;

    tracing::trace!(options = ?options, "CONFIG LOAD: Final options");
    Ok(RunConfiguration::resolve(project_dir, options))
}
