//! The configuration document.
//!
//! [`Config`] mirrors the YAML config file one-to-one. The same type is
//! produced from command-line flags, so file and flag configuration can be
//! merged field by field before validation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use url::Url;

use super::ConfigError;
use super::defaults;
use super::source_url::{current_dir, resolve_source_url};

/// HTTP headers: canonical header name to ordered list of values.
pub type Headers = BTreeMap<String, Vec<String>>;

/// Named datasources, keyed by alias.
pub type DataSources = BTreeMap<String, DataSource>;

/// Root configuration document.
///
/// Strings, lists and booleans are "unset" when empty or `false`; merge,
/// validation and defaulting all rely on that.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Config {
    /// Inline template text
    #[serde(rename = "in", skip_serializing_if = "String::is_empty")]
    pub input: String,

    /// Template files to render, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input_files: Vec<String>,

    /// Directory of templates to render
    #[serde(skip_serializing_if = "String::is_empty")]
    pub input_dir: String,

    /// Glob patterns excluded from directory input
    #[serde(rename = "excludes", skip_serializing_if = "Vec::is_empty")]
    pub exclude_globs: Vec<String>,

    /// Output files, one per input
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output_files: Vec<String>,

    /// Directory receiving rendered templates
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output_dir: String,

    /// Expression computing each output path from its input path
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output_map: String,

    /// Skip writing outputs that render empty
    #[serde(skip_serializing_if = "is_false")]
    pub suppress_empty: bool,

    /// Pipe rendered output into the post-exec command
    #[serde(skip_serializing_if = "is_false")]
    pub exec_pipe: bool,

    /// Command (and arguments) run after rendering
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post_exec: Vec<String>,

    /// Octal file mode override for outputs
    #[serde(rename = "chmod", skip_serializing_if = "String::is_empty")]
    pub out_mode: String,

    /// Left template delimiter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub left_delim: String,

    /// Right template delimiter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub right_delim: String,

    /// Datasources available to templates
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub datasources: DataSources,

    /// Datasources bound to top-level template variables
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: DataSources,

    /// Plugin name to executable path
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub plugins: BTreeMap<String, String>,

    /// Maximum time a plugin invocation may run
    #[serde(with = "super::duration", skip_serializing_if = "Duration::is_zero")]
    pub plugin_timeout: Duration,

    /// Auxiliary template files
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,

    /// Headers for datasources the templates define themselves, keyed by alias.
    ///
    /// Only ever set from flags; never read from or written to YAML.
    #[serde(skip)]
    pub extra_headers: BTreeMap<String, Headers>,
}

/// A single datasource: where it lives and which headers to send.
///
/// Serialized as `{url: <string>, header: {Name: [values]}}`. Decoding
/// expects an absolute URL; [`Config::parse_in`] resolves relative
/// locations before the entry is decoded.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDataSource", into = "RawDataSource")]
pub struct DataSource {
    /// Absolute location. `None` only for entries that add headers without
    /// naming a location.
    pub url: Option<Url>,

    /// Headers sent when fetching the datasource
    pub header: Headers,
}

/// On-disk shape of a [`DataSource`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawDataSource {
    #[serde(skip_serializing_if = "String::is_empty")]
    url: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    header: Headers,
}

impl TryFrom<RawDataSource> for DataSource {
    type Error = ConfigError;

    fn try_from(raw: RawDataSource) -> Result<Self, Self::Error> {
        let url = if raw.url.is_empty() {
            None
        } else {
            Some(Url::parse(&raw.url).map_err(|e| ConfigError::invalid_url(&raw.url, e))?)
        };

        let mut header = Headers::new();
        for (name, values) in raw.header {
            header
                .entry(canonical_header_key(&name))
                .or_default()
                .extend(values);
        }

        Ok(Self { url, header })
    }
}

impl From<DataSource> for RawDataSource {
    fn from(ds: DataSource) -> Self {
        Self {
            url: ds.url.map(String::from).unwrap_or_default(),
            header: ds.header,
        }
    }
}

impl DataSource {
    /// Creates a datasource for `url` with no headers.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url: Some(url),
            header: Headers::new(),
        }
    }
}

/// Resolved output file mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputMode {
    /// Permission bits; `0` means "leave the default".
    pub mode: u32,
    /// Whether the mode was set explicitly with `chmod`.
    pub is_override: bool,
}

impl Config {
    /// Loads a configuration document from a YAML file, resolving relative
    /// datasource locations against the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_in(path, &current_dir()?)
    }

    /// Loads a configuration document from a YAML file, resolving relative
    /// datasource locations against `cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_in(path: &Path, cwd: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse_in(&content, cwd)
    }

    /// Parses a configuration document from a YAML string, resolving
    /// relative datasource locations against the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or names unknown options.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_in(content, &current_dir()?)
    }

    /// Parses a configuration document from a YAML string, resolving
    /// relative datasource locations against `cwd`.
    ///
    /// Only the first document of a multi-document stream is read. An empty
    /// (or comment-only) document yields the empty configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid, names unknown options, or
    /// holds a datasource location that cannot be resolved.
    pub fn parse_in(content: &str, cwd: &Path) -> Result<Self, ConfigError> {
        if is_empty_document(content) {
            return Ok(Self::default());
        }
        let Some(document) = serde_yaml::Deserializer::from_str(content).next() else {
            return Ok(Self::default());
        };

        let mut value = Value::deserialize(document)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        for key in ["datasources", "context"] {
            if let Some(Value::Mapping(sources)) = value.get_mut(key) {
                for entry in sources.values_mut() {
                    resolve_location(entry, cwd)?;
                }
            }
        }

        serde_yaml::from_value(value).map_err(ConfigError::from)
    }

    /// Encodes the document as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::YamlEncode)
    }

    /// Parses the `chmod` option into a file mode.
    ///
    /// The value is octal with an implicit leading zero. Output rendered
    /// from an inline `in` template defaults to `0644`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMode`] if `chmod` is not octal.
    pub fn output_mode(&self) -> Result<OutputMode, ConfigError> {
        let is_override = !self.out_mode.is_empty();
        let mut mode = u32::from_str_radix(&format!("0{}", self.out_mode), 8).map_err(|e| {
            ConfigError::InvalidMode {
                value: self.out_mode.clone(),
                source: e,
            }
        })?;

        if mode == 0 && !self.input.is_empty() {
            mode = defaults::INLINE_OUTPUT_MODE;
        }

        Ok(OutputMode { mode, is_override })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut shown = self.clone();
        if shown.input.chars().count() >= 11 {
            shown.input = shown.input.chars().take(8).collect::<String>() + "...";
        }

        match shown.to_yaml() {
            Ok(yaml) => write!(f, "---\n{yaml}"),
            Err(e) => write!(f, "{e}"),
        }
    }
}

/// Canonicalizes an HTTP header name: `x-api-key` becomes `X-Api-Key`.
///
/// Names containing characters outside the header token set are returned
/// unchanged.
#[must_use]
pub fn canonical_header_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            mapped
        })
        .collect()
}

const fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if passes by reference
const fn is_false(value: &bool) -> bool {
    !*value
}

/// Rewrites a datasource entry's `url` as an absolute URL.
fn resolve_location(entry: &mut Value, cwd: &Path) -> Result<(), ConfigError> {
    let Some(Value::String(location)) = entry.get_mut("url") else {
        return Ok(());
    };
    if !location.is_empty() {
        *location = resolve_source_url(location, cwd)?.into();
    }
    Ok(())
}

fn is_empty_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}
