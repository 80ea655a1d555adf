use anyhow::Result;
use clap::Args;

use crate::cli::Output;
use crate::config::{DEFAULT_CODING_STANDARD, DEFAULT_MESS_RULES};

#[derive(Args, Default)]
pub struct VersionArgs {}

pub async fn execute(_args: VersionArgs, output: &Output) -> Result<()> {
    output.header("Quality Gate Version Information");
    output.status_indicator(
        "VERSION",
        &format!("{} v{}", crate::PKG_NAME, crate::VERSION),
        true,
    );
    output.blank_line();

    output.category("About");
    output.key_value("Description:", crate::PKG_DESCRIPTION, false);
    output.key_value(
        "Defaults:",
        &format!("{DEFAULT_CODING_STANDARD}, {DEFAULT_MESS_RULES}"),
        false,
    );

    output.category("Build Information");
    output.key_value("Target:", std::env::consts::ARCH, false);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
        false,
    );
    output.blank_line();

    if output.is_quiet() {
        println!("{}", crate::VERSION);
    }
    Ok(())
}
