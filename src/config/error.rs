//! Error types for configuration parsing and validation.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Every variant is terminal for the current invocation: the caller is
/// expected to report the message and exit non-zero.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode the YAML configuration document.
    #[error("Failed to parse YAML config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Failed to encode the configuration document.
    #[error("Failed to encode config: {0}")]
    YamlEncode(#[source] serde_yaml::Error),

    /// The current working directory could not be determined.
    #[error("Can't get working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    /// A datasource location could not be resolved to an absolute URL.
    #[error("Can't parse datasource URL '{value}': {source}")]
    InvalidUrl {
        /// The raw location string
        value: String,
        /// Underlying URL parse error
        #[source]
        source: url::ParseError,
    },

    /// A bare datasource reference pointed outside the working directory.
    #[error(
        "Invalid datasource ({value}): must provide an alias with files not in working directory"
    )]
    MissingAlias {
        /// The datasource argument as given
        value: String,
    },

    /// A datasource-header argument lacked the `alias=` prefix.
    #[error("Invalid datasource-header option '{value}'")]
    InvalidHeaderArg {
        /// The header argument as given
        value: String,
    },

    /// A header specification lacked the `Name: value` separator.
    #[error("Invalid HTTP Header format '{value}'")]
    InvalidHeader {
        /// The header specification as given
        value: String,
    },

    /// Invalid header name.
    #[error("Invalid header name '{name}': {reason}")]
    InvalidHeaderName {
        /// The invalid header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A plugin argument lacked the `name=path` separator.
    #[error("Plugin requires both name and path: '{value}'")]
    InvalidPlugin {
        /// The plugin argument as given
        value: String,
    },

    /// The `chmod` value is not an octal file mode.
    #[error("Invalid file mode '{value}': {source}")]
    InvalidMode {
        /// The mode string as configured
        value: String,
        /// Underlying integer parse error
        #[source]
        source: ParseIntError,
    },

    /// Invalid duration value.
    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration {
        /// The duration string as given
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Two mutually exclusive options were both set.
    #[error("only one of these options is supported at a time: '{first}', '{second}'")]
    NotTogether {
        /// The first option found set
        first: &'static str,
        /// The conflicting option
        second: &'static str,
    },

    /// An option was set without the option it depends on.
    #[error("these options must be set together: '{left}', '{right}'")]
    MustTogether {
        /// The option that was set
        left: &'static str,
        /// The option it requires
        right: &'static str,
    },

    /// Number of outputs does not match the number of inputs.
    #[error(
        "must provide same number of 'outputFiles' ({outputs}) as 'in' or 'inputFiles' ({inputs}) options"
    )]
    OutputCountMismatch {
        /// Number of output files
        outputs: usize,
        /// Number of inputs
        inputs: usize,
    },

    /// `execPipe` was enabled without a command to pipe into.
    #[error("execPipe may only be used with a postExec command")]
    ExecPipeWithoutPostExec,

    /// `execPipe` was combined with real output files.
    #[error("must not set 'outputFiles' when using 'execPipe'")]
    ExecPipeWithOutputFiles,
}

/// Option names as they appear in the config document.
///
/// Use these constants for compile-time safety when matching validation errors.
pub mod option {
    /// Inline template input.
    pub const IN: &str = "in";
    /// Input file list.
    pub const INPUT_FILES: &str = "inputFiles";
    /// Input directory.
    pub const INPUT_DIR: &str = "inputDir";
    /// Output file list.
    pub const OUTPUT_FILES: &str = "outputFiles";
    /// Output directory.
    pub const OUTPUT_DIR: &str = "outputDir";
    /// Output path-mapping expression.
    pub const OUTPUT_MAP: &str = "outputMap";
    /// Pipe output into the post-exec command.
    pub const EXEC_PIPE: &str = "execPipe";
}

impl ConfigError {
    /// Creates an `InvalidUrl` error for a raw location string.
    #[must_use]
    pub fn invalid_url(value: &str, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            value: value.to_string(),
            source,
        }
    }

    /// Returns true if this error came from the validation stage.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NotTogether { .. }
                | Self::MustTogether { .. }
                | Self::OutputCountMismatch { .. }
                | Self::ExecPipeWithoutPostExec
                | Self::ExecPipeWithOutputFiles
        )
    }
}
