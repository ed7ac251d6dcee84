//! # Hooksmith - Language-aware pre-commit configuration management
//!
//! Hooksmith detects the programming languages used in a repository,
//! assembles a pre-commit hook configuration tailored to those languages
//! from a vendored template library, and keeps that configuration current
//! across runs. User policy (hook suppression, argument overrides, file
//! exclusions) is layered on top of the templates from a `.hooksmith.yaml`
//! settings file, and the synthesized configuration is content-hashed so
//! repeat runs can tell "already installed" from "needs an update".
//!
//! On top of the configuration engine, hooksmith ships built-in scans for
//! secrets-adjacent content: PII detection and user-supplied regex
//! detection over staged or full repository contents.
//!
//! ## Quick Start
//!
//! ```bash
//! # Set up hooksmith in your repository
//! hooksmith init
//!
//! # Scan the files you are about to commit
//! hooksmith scan
//! ```

pub mod cli;
pub mod config;
pub mod git;
pub mod hooks;
pub mod install;
pub mod language;
pub mod scan;
pub mod settings;
pub mod shared;

pub use cli::{Cli, Output};
pub use settings::Settings;

/// Result type alias for hooksmith operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize the global tracing subscriber.
///
/// Verbosity is controlled through the `HOOKSMITH_LOG` environment variable
/// (standard `tracing_subscriber::EnvFilter` syntax). Diagnostics go to
/// stderr so they never interleave with command output.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("HOOKSMITH_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
