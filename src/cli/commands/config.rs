use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use crate::cli::Output;
use crate::config::{self, CONFIG_BASENAME, RunOptions};

/// Written by `config init`; every value is the built-in default
pub const STARTER_CONFIG: &str = r#"# quality-gate configuration
# Every key is optional. The values below are the defaults.

# Skip phpunit and behat
exclude_tests = false

# phpcs standard, or a list checked in order. Empty disables the stage.
coding_standard = "PSR2"

# phpmd rule sets, comma separated or a list. Empty disables the stage.
mess_rules = "controversial"

# Seconds each external tool may run, 0 for no limit
timeout = 300

# Extra linters, run once per staged file with a matching extension
# [[custom_checks]]
# cmd = "vendor/bin/scss-lint"
# ext = "scss"
"#;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Create a starter quality-gate.toml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Display the merged configuration
    Show {
        /// Output format: toml, json
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
}

pub async fn execute(
    args: ConfigArgs,
    output: &Output,
    custom_config: Option<&Path>,
) -> Result<()> {
    let project_dir = super::project_root_or(&super::working_dir()?);

    match args.command {
        ConfigCommand::Init { force } => {
            let path = project_dir.join(format!("{CONFIG_BASENAME}.toml"));
            if path.exists() && !force {
                bail!("{} already exists, use --force to overwrite", path.display());
            }
            std::fs::write(&path, STARTER_CONFIG)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(&format!("Created {} with default settings", path.display()));
        }
        ConfigCommand::Show { format } => {
            let config = config::load(&project_dir, custom_config, &RunOptions::default())?;
            let options = config.to_options();
            let rendered = match format.to_lowercase().as_str() {
                "toml" => toml::to_string(&options)?,
                "json" => serde_json::to_string_pretty(&options)?,
                _ => bail!("Unsupported format: {format}. Use toml or json"),
            };
            println!("{}", rendered.trim_end());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfiguration;

    #[test]
    fn test_starter_config_matches_defaults() {
        let options: RunOptions = toml::from_str(STARTER_CONFIG).unwrap();
        assert_eq!(
            RunConfiguration::resolve("/project", options),
            RunConfiguration::new("/project")
        );
    }
}
