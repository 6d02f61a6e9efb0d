//! CLI argument parsing using clap.
//!
//! Flags are collected as raw strings here and translated into a
//! [`Config`] override by [`Cli::to_config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use super::ConfigError;
use super::defaults;
use super::document::Config;
use super::duration::parse_duration;

/// Stencil: template rendering driven by datasources
///
/// Resolves the render configuration from a YAML config file and
/// command-line flags, then prints the effective configuration.
#[derive(Debug, Parser)]
#[command(name = "stencil")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Inline template text
    #[arg(long = "in", short = 'i', value_name = "TEXT")]
    pub input: Option<String>,

    /// Template file to render (can be specified multiple times)
    #[arg(long = "file", short = 'f', value_name = "PATH")]
    pub input_files: Vec<String>,

    /// Directory of templates to render
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: Option<String>,

    /// Glob pattern to skip in the input directory (can be specified multiple times)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Output file, one per input (can be specified multiple times)
    #[arg(long = "out", short = 'o', value_name = "PATH")]
    pub output_files: Vec<String>,

    /// Directory to write rendered templates to
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Template computing each output path from its input path
    #[arg(long = "output-map", value_name = "TEMPLATE")]
    pub output_map: Option<String>,

    /// Octal file mode for output files, e.g. 644
    #[arg(long, value_name = "MODE")]
    pub chmod: Option<String>,

    /// Left template delimiter
    #[arg(long = "left-delim", value_name = "DELIM")]
    pub left_delim: Option<String>,

    /// Right template delimiter
    #[arg(long = "right-delim", value_name = "DELIM")]
    pub right_delim: Option<String>,

    /// Datasource in 'alias=location' or 'file.ext' format (can be specified multiple times)
    #[arg(long = "datasource", short = 'd', value_name = "ALIAS=URL")]
    pub datasources: Vec<String>,

    /// Context datasource in 'alias=location' format (can be specified multiple times)
    #[arg(long = "context", short = 'c', value_name = "ALIAS=URL")]
    pub contexts: Vec<String>,

    /// HTTP header for a datasource in 'alias=Name: value' format (can be specified multiple times)
    #[arg(long = "datasource-header", short = 'H', value_name = "ALIAS=HEADER")]
    pub headers: Vec<String>,

    /// Plugin in 'name=path' format (can be specified multiple times)
    #[arg(long = "plugin", value_name = "NAME=PATH")]
    pub plugins: Vec<String>,

    /// Maximum time a plugin may run, e.g. 5s or 1m30s
    #[arg(long = "plugin-timeout", value_name = "DURATION", value_parser = parse_duration)]
    pub plugin_timeout: Option<Duration>,

    /// Auxiliary template file (can be specified multiple times)
    #[arg(long = "template", short = 't', value_name = "PATH")]
    pub templates: Vec<String>,

    /// Pipe rendered output into the post-exec command
    #[arg(long = "exec-pipe")]
    pub exec_pipe: bool,

    /// Do not write output files that render empty
    #[arg(long = "suppress-empty")]
    pub suppress_empty: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Command to run after rendering
    #[arg(last = true, value_name = "COMMAND")]
    pub post_exec: Vec<String>,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Config file to load and whether it was named explicitly.
    #[must_use]
    pub fn config_path(&self) -> (PathBuf, bool) {
        self.config.as_ref().map_or_else(
            || (PathBuf::from(defaults::CONFIG_FILE), false),
            |path| (path.clone(), true),
        )
    }

    /// Translates the flags into a configuration override.
    ///
    /// Relative datasource paths are resolved against `cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed datasource, context, header or plugin
    /// flags.
    pub fn to_config(&self, cwd: &Path) -> Result<Config, ConfigError> {
        let mut config = Config {
            input: self.input.clone().unwrap_or_default(),
            input_files: self.input_files.clone(),
            input_dir: self.input_dir.clone().unwrap_or_default(),
            exclude_globs: self.excludes.clone(),
            output_files: self.output_files.clone(),
            output_dir: self.output_dir.clone().unwrap_or_default(),
            output_map: self.output_map.clone().unwrap_or_default(),
            suppress_empty: self.suppress_empty,
            exec_pipe: self.exec_pipe,
            post_exec: self.post_exec.clone(),
            out_mode: self.chmod.clone().unwrap_or_default(),
            left_delim: self.left_delim.clone().unwrap_or_default(),
            right_delim: self.right_delim.clone().unwrap_or_default(),
            plugin_timeout: self.plugin_timeout.unwrap_or_default(),
            templates: self.templates.clone(),
            ..Config::default()
        };

        config.parse_datasource_flags(&self.datasources, &self.contexts, &self.headers, cwd)?;
        config.parse_plugin_flags(&self.plugins)?;
        Ok(config)
    }
}
