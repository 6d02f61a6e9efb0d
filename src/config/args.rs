//! Parsers for the datasource, context, header and plugin flag values.
//!
//! The flag parser only collects raw strings; this module gives them
//! meaning and folds them into a [`Config`].

use std::collections::BTreeMap;
use std::path::Path;

use http::HeaderName;

use super::ConfigError;
use super::document::{Config, DataSource, DataSources, Headers, canonical_header_key};
use super::source_url::{resolve_file_url, resolve_source_url};

/// One parsed `alias=Name: value` header flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderArg {
    /// Datasource alias the header belongs to
    pub alias: String,
    /// Canonical header name
    pub name: String,
    /// Header value with surrounding whitespace removed
    pub value: String,
}

impl Config {
    /// Sets `datasources` and `context` from `alias=location` flag values and
    /// attaches `alias=Name: value` header flags to them.
    ///
    /// Header flags whose alias matches no datasource or context entry are
    /// kept in `extra_headers`.
    ///
    /// # Errors
    ///
    /// Returns the first malformed datasource, context or header value.
    pub fn parse_datasource_flags(
        &mut self,
        datasources: &[impl AsRef<str>],
        contexts: &[impl AsRef<str>],
        headers: &[impl AsRef<str>],
        cwd: &Path,
    ) -> Result<(), ConfigError> {
        self.datasources.extend(parse_datasource_args(datasources, cwd)?);
        self.context.extend(parse_datasource_args(contexts, cwd)?);

        for (alias, header) in parse_header_args(headers)? {
            let mut matched = false;
            for sources in [&mut self.context, &mut self.datasources] {
                if let Some(ds) = sources.get_mut(&alias) {
                    ds.header.extend(header.clone());
                    matched = true;
                }
            }

            if matched {
                tracing::trace!(alias = %alias, "attached header flags to datasource");
            } else {
                tracing::debug!(alias = %alias, "keeping headers for undeclared datasource");
                self.extra_headers.entry(alias).or_default().extend(header);
            }
        }
        Ok(())
    }

    /// Sets `plugins` from `name=path` flag values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPlugin`] for a value without `=`.
    pub fn parse_plugin_flags(&mut self, plugins: &[impl AsRef<str>]) -> Result<(), ConfigError> {
        self.plugins.extend(parse_plugin_args(plugins)?);
        Ok(())
    }
}

/// Parses a list of datasource flag values into an alias map.
///
/// # Errors
///
/// Returns the first value that fails [`parse_datasource_arg`].
pub fn parse_datasource_args(
    args: &[impl AsRef<str>],
    cwd: &Path,
) -> Result<DataSources, ConfigError> {
    args.iter()
        .map(|arg| parse_datasource_arg(arg.as_ref(), cwd))
        .collect()
}

/// Parses one `alias=location` or bare `file.ext` datasource value.
///
/// A bare value must name a file in `cwd`; its alias is the file name up
/// to the first `.`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingAlias`] for a bare value with a directory
/// component, or a URL error if the location cannot be resolved.
pub fn parse_datasource_arg(value: &str, cwd: &Path) -> Result<(String, DataSource), ConfigError> {
    if let Some((alias, location)) = value.split_once('=') {
        let url = resolve_source_url(location, cwd)?;
        return Ok((alias.to_string(), DataSource::new(url)));
    }

    let alias = value.split_once('.').map_or(value, |(stem, _)| stem);
    if path_base(value) != value {
        return Err(ConfigError::MissingAlias {
            value: value.to_string(),
        });
    }

    let url = resolve_file_url(value, cwd)?;
    Ok((alias.to_string(), DataSource::new(url)))
}

/// Parses `alias=Name: value` header flags, grouped by alias.
///
/// Repeated flags for the same alias and header append values in order.
///
/// # Errors
///
/// Returns the first malformed header flag.
pub fn parse_header_args(
    args: &[impl AsRef<str>],
) -> Result<BTreeMap<String, Headers>, ConfigError> {
    let mut headers: BTreeMap<String, Headers> = BTreeMap::new();
    for arg in args {
        let HeaderArg { alias, name, value } = parse_header_arg(arg.as_ref())?;
        headers
            .entry(alias)
            .or_default()
            .entry(name)
            .or_default()
            .push(value);
    }
    Ok(headers)
}

/// Parses a single `alias=Name: value` header flag.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidHeaderArg`] without `=`,
/// [`ConfigError::InvalidHeader`] without `:`, and
/// [`ConfigError::InvalidHeaderName`] if the name is not a valid HTTP token.
pub fn parse_header_arg(arg: &str) -> Result<HeaderArg, ConfigError> {
    let (alias, header) = arg
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidHeaderArg {
            value: arg.to_string(),
        })?;

    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidHeader {
            value: header.to_string(),
        })?;

    let name = name.trim();
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeaderName {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    Ok(HeaderArg {
        alias: alias.to_string(),
        name: canonical_header_key(name),
        value: value.trim().to_string(),
    })
}

/// Parses `name=path` plugin flags.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPlugin`] for a value without `=`.
pub fn parse_plugin_args(
    args: &[impl AsRef<str>],
) -> Result<BTreeMap<String, String>, ConfigError> {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            arg.split_once('=')
                .map(|(name, path)| (name.to_string(), path.to_string()))
                .ok_or_else(|| ConfigError::InvalidPlugin {
                    value: arg.to_string(),
                })
        })
        .collect()
}

/// Last element of a slash-separated path, ignoring trailing slashes.
fn path_base(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
