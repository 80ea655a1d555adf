use std::process::ExitCode;

use clap::Parser;
use quality_gate::GateError;
use quality_gate::cli::{Cli, Output};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            Output::new(false, quiet).error(&format!("{err:#}"));
            // check failures exit 1, everything else is a configuration problem
            let code = err
                .downcast_ref::<GateError>()
                .map_or(2, GateError::exit_code);
            ExitCode::from(code)
        }
    }
}
