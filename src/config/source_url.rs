//! Datasource location resolution.
//!
//! Turns the raw location strings found in config files and flags (relative
//! paths, absolute paths, `-` for stdin, or full URLs) into absolute,
//! scheme-qualified [`Url`]s. All platform path syntax (separators, drive
//! letters, UNC shares) is handled here and nowhere else.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use url::{ParseError, Url};

use super::ConfigError;
use super::defaults::STDIO;

/// URL standing in for the process's standard input.
const STDIN_URL: &str = "stdin://";

/// Returns the current working directory.
///
/// # Errors
///
/// Returns an error if the working directory cannot be determined.
pub fn current_dir() -> Result<PathBuf, ConfigError> {
    std::env::current_dir().map_err(ConfigError::WorkingDir)
}

/// Resolves a datasource location to an absolute URL.
///
/// `-` becomes `stdin://`, anything that already carries a scheme is kept
/// as-is, and everything else is treated as a file path relative to `cwd`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] if the location cannot be parsed.
pub fn resolve_source_url(value: &str, cwd: &Path) -> Result<Url, ConfigError> {
    resolve(value, cwd, cfg!(windows))
}

/// Resolves a file path against `cwd`, producing a `file://` URL.
///
/// Unlike [`resolve_source_url`], the value is never interpreted as a URL
/// with its own scheme.
///
/// # Errors
///
/// Returns an error if `cwd` is not absolute or the path cannot be joined.
pub fn resolve_file_url(value: &str, cwd: &Path) -> Result<Url, ConfigError> {
    let base = Url::from_directory_path(cwd).map_err(|()| {
        ConfigError::WorkingDir(std::io::Error::other(format!(
            "'{}' is not an absolute path",
            cwd.display()
        )))
    })?;

    base.join(&to_slash(value))
        .map_err(|e| ConfigError::invalid_url(value, e))
}

fn resolve(value: &str, cwd: &Path, detect_volumes: bool) -> Result<Url, ConfigError> {
    let raw = if value == STDIO { STDIN_URL } else { value };
    let mut candidate = to_slash(raw);

    let volume = if detect_volumes {
        volume_name(&candidate).len()
    } else {
        0
    };
    if volume > 2 {
        candidate = format!("file:{candidate}");
    } else if volume > 0 {
        candidate = format!("file:///{candidate}");
    }

    match Url::parse(&candidate) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => resolve_file_url(&candidate, cwd),
        Err(e) => Err(ConfigError::invalid_url(value, e)),
    }
}

fn to_slash(value: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        value.to_string()
    } else {
        value.replace(MAIN_SEPARATOR, "/")
    }
}

/// Returns the leading volume designator of a slash-separated path.
///
/// Recognizes drive letters (`C:`) and UNC shares (`//host/share`).
fn volume_name(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return &path[..2];
    }
    unc_volume_len(path).map_or("", |len| &path[..len])
}

fn unc_volume_len(path: &str) -> Option<usize> {
    let rest = path.strip_prefix("//")?;
    if rest.starts_with('/') {
        return None;
    }
    let host_end = rest.find('/')?;
    let share = &rest[host_end + 1..];
    if share.is_empty() || share.starts_with('/') {
        return None;
    }
    let share_end = share.find('/').unwrap_or(share.len());
    Some(2 + host_end + 1 + share_end)
}
