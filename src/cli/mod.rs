//! Command-line interface
//!
//! clap definitions live in [`commands`], one module per subcommand; the
//! console [`Output`] doubles as the checkers' output sink.

pub mod commands;
mod output;

pub use commands::Cli;
pub use output::Output;
