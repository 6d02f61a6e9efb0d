//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Path used for stdin/stdout in input and output file lists.
pub const STDIO: &str = "-";

/// Default left template delimiter.
pub const LEFT_DELIM: &str = "{{";

/// Default right template delimiter.
pub const RIGHT_DELIM: &str = "}}";

/// Default output directory when rendering an input directory.
pub const OUTPUT_DIR: &str = ".";

/// Default config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".stencil.yaml";

/// Default plugin invocation timeout in seconds.
pub const PLUGIN_TIMEOUT_SECS: u64 = 5;

/// File mode applied to output rendered from an inline template.
pub const INLINE_OUTPUT_MODE: u32 = 0o644;

/// Default plugin invocation timeout as Duration.
#[must_use]
pub const fn plugin_timeout() -> Duration {
    Duration::from_secs(PLUGIN_TIMEOUT_SECS)
}

/// The stdin/stdout file list (`["-"]`).
#[must_use]
pub fn stdio_files() -> Vec<String> {
    vec![STDIO.to_string()]
}

/// Returns true if `files` is exactly the stdin/stdout list.
#[must_use]
pub fn is_stdio(files: &[String]) -> bool {
    matches!(files, [only] if only == STDIO)
}
