//! Stencil: template rendering driven by datasources
//!
//! Entry point for the stencil application.

use stencil_config::config::{Cli, Resolved};
use std::process::ExitCode;

mod app;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    // Load, merge, validate and default the configuration
    let resolved = match Resolved::load(&cli) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    tracing::debug!(
        datasources = resolved.config.datasources.len(),
        context = resolved.config.context.len(),
        plugins = resolved.config.plugins.len(),
        "configuration resolved"
    );

    print!("{}", resolved.config);
    exit_code::SUCCESS
}
