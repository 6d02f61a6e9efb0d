//! Configuration layer for stencil.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`])
//! - YAML configuration documents ([`Config`], [`DataSource`])
//! - Datasource location resolution ([`resolve_source_url`])
//! - Flag value parsers for datasources, headers and plugins
//! - Merging, validation and defaults ([`Resolved`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **YAML config file** - Values from `.stencil.yaml` or `--config`
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! # Option Groups
//!
//! Input options (`in`, `inputFiles`, `inputDir`) replace each other as a
//! group: choosing one on the command line discards whichever the config
//! file chose. Output options (`outputFiles`, `outputDir`, `outputMap`)
//! behave the same way.
//!
//! Datasources and context entries merge per alias. A flag datasource with
//! the same alias as a file datasource replaces its URL and adds to its
//! headers.
//!
//! # Boolean Flag Semantics
//!
//! Boolean flags (`--exec-pipe`, `--suppress-empty`) only enable: once set
//! `true` in the config file, the command line cannot turn them off.

mod args;
mod cli;
pub mod defaults;
pub mod duration;
mod document;
mod error;
mod merge;
mod resolve;
mod runtime;
mod source_url;
mod validate;

#[cfg(test)]
mod args_tests;

pub use args::{
    HeaderArg, parse_datasource_arg, parse_datasource_args, parse_header_arg, parse_header_args,
    parse_plugin_args,
};
pub use cli::Cli;
pub use document::{Config, DataSource, DataSources, Headers, OutputMode, canonical_header_key};
pub use error::{ConfigError, option};
pub use resolve::Resolved;
pub use runtime::{OutputWriter, PipeBuffer, PostExecInput, Streams};
pub use source_url::{current_dir, resolve_file_url, resolve_source_url};
