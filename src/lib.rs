//! # quality-gate
//!
//! A pre-commit code quality gate for PHP projects. Given the files of a
//! commit (or the whole project) it runs, in order:
//!
//! 1. `php -l` syntax checks
//! 2. phpcs against one or more coding standards
//! 3. phpmd mess detection
//! 4. user configured custom linters
//! 5. the phpunit and behat suites
//!
//! and stops at the first stage that fails. A `composer.json` change
//! without its lock file only produces a warning.
//!
//! ```no_run
//! use quality_gate::{CodeQualityTool, RunConfiguration, SystemRunner, sink::NullSink};
//!
//! # async fn demo() -> quality_gate::Result<()> {
//! let config = RunConfiguration::new("/path/to/project");
//! let runner = SystemRunner::new(config.timeout());
//! let gate = CodeQualityTool::new(None, config, runner)?;
//! gate.run(&NullSink).await?;
//! # Ok(())
//! # }
//! ```

pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod fileset;
pub mod git;
pub mod pipeline;
pub mod process;
pub mod project;
pub mod sink;
pub mod tools;

pub use config::RunConfiguration;
pub use error::{GateError, Result};
pub use fileset::FileSet;
pub use pipeline::{CodeQualityTool, PipelineReport, Stage};
pub use process::{ProcessRunner, SystemRunner};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
