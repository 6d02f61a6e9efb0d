//! End-to-end configuration resolution.
//!
//! File config is the base, flags are the override. The merged result is
//! completed with defaults and then validated, so options that defaults
//! supply (stdin/stdout, `outputDir: .`) count toward input/output pairing.

use std::path::Path;

use super::ConfigError;
use super::cli::Cli;
use super::document::Config;
use super::runtime::Streams;
use super::source_url::current_dir;

/// A validated, fully-defaulted configuration and its runtime streams.
#[derive(Debug)]
pub struct Resolved {
    /// The effective configuration
    pub config: Config,
    /// Streams the renderer and post-exec command use
    pub streams: Streams,
}

impl Resolved {
    /// Loads the config file named by `cli`, applies the flags on top of it
    /// and finalizes the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded, a flag is
    /// malformed, or the merged configuration is invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::load_in(cli, &current_dir()?)
    }

    /// Same as [`Resolved::load`], with relative paths taken from `cwd`.
    ///
    /// # Errors
    ///
    /// See [`Resolved::load`].
    pub fn load_in(cli: &Cli, cwd: &Path) -> Result<Self, ConfigError> {
        let base = load_file_config(cli, cwd)?;
        let overrides = cli.to_config(cwd)?;
        Self::from_parts(base, &overrides)
    }

    /// Merges `overrides` into `base`, applies defaults, and validates.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn from_parts(mut base: Config, overrides: &Config) -> Result<Self, ConfigError> {
        base.merge_from(overrides);
        let streams = base.apply_defaults();
        base.validate()?;
        tracing::debug!("configuration is valid");

        Ok(Self {
            config: base,
            streams,
        })
    }
}

/// Reads the config file, or an empty config if the default file is absent.
///
/// A config file named explicitly with `--config` must exist.
fn load_file_config(cli: &Cli, cwd: &Path) -> Result<Config, ConfigError> {
    let (path, explicit) = cli.config_path();
    let path = cwd.join(path);

    if !explicit && !path.is_file() {
        tracing::debug!(path = %path.display(), "no config file, using flags only");
        return Ok(Config::default());
    }

    tracing::debug!(path = %path.display(), "loading config file");
    Config::load_in(&path, cwd)
}
