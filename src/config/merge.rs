//! Merging a base configuration with an override.
//!
//! The config file is the base and flags are the override. Set fields in
//! the override win; unset fields leave the base alone. Options that
//! exclude each other are replaced as a group, so a flag choosing
//! `--input-dir` clears an `inputFiles` list coming from the file.

use super::defaults;
use super::document::{Config, DataSource, DataSources};

impl Config {
    /// Overrides this configuration with every set field of `other`.
    ///
    /// A `["-"]` input file list in `other` counts as unset, since that is
    /// what "no input given" looks like once defaults have been applied.
    pub fn merge_from(&mut self, other: &Self) -> &mut Self {
        self.merge_input(other);
        self.merge_output(other);

        replace_if_set(&mut self.post_exec, &other.post_exec);
        if other.exec_pipe {
            self.exec_pipe = true;
            self.post_exec.clone_from(&other.post_exec);
            self.output_files.clone_from(&other.output_files);
        }
        if other.suppress_empty {
            self.suppress_empty = true;
        }
        replace_if_set(&mut self.exclude_globs, &other.exclude_globs);
        replace_if_set(&mut self.out_mode, &other.out_mode);
        replace_if_set(&mut self.left_delim, &other.left_delim);
        replace_if_set(&mut self.right_delim, &other.right_delim);
        replace_if_set(&mut self.templates, &other.templates);
        if !other.plugin_timeout.is_zero() {
            self.plugin_timeout = other.plugin_timeout;
        }

        merge_sources(&mut self.datasources, &other.datasources);
        merge_sources(&mut self.context, &other.context);
        self.plugins
            .extend(other.plugins.iter().map(|(k, v)| (k.clone(), v.clone())));
        for (alias, headers) in &other.extra_headers {
            self.extra_headers
                .entry(alias.clone())
                .or_default()
                .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        tracing::trace!("merged configuration override");
        self
    }

    fn merge_input(&mut self, other: &Self) {
        if !other.input.is_empty() {
            self.input.clone_from(&other.input);
            self.input_dir.clear();
            self.input_files.clear();
            self.output_dir.clear();
        } else if !other.input_dir.is_empty() {
            self.input.clear();
            self.input_dir.clone_from(&other.input_dir);
            self.input_files.clear();
        } else if !other.input_files.is_empty() && !defaults::is_stdio(&other.input_files) {
            self.input.clear();
            self.input_files.clone_from(&other.input_files);
            self.input_dir.clear();
            self.output_dir.clear();
        }
    }

    fn merge_output(&mut self, other: &Self) {
        if !other.output_map.is_empty() {
            self.output_dir.clear();
            self.output_files.clear();
            self.output_map.clone_from(&other.output_map);
        }
        if !other.output_dir.is_empty() {
            self.output_dir.clone_from(&other.output_dir);
            self.output_files.clear();
            self.output_map.clear();
        }
        if !other.output_files.is_empty() {
            self.output_dir.clear();
            self.output_files.clone_from(&other.output_files);
            self.output_map.clear();
        }
    }
}

impl DataSource {
    /// Overrides this datasource with `other`: its URL wins when set and its
    /// headers replace same-named headers here.
    pub fn merge_from(&mut self, other: &Self) {
        if other.url.is_some() {
            self.url.clone_from(&other.url);
        }
        self.header
            .extend(other.header.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

fn merge_sources(base: &mut DataSources, other: &DataSources) {
    for (alias, ds) in other {
        match base.get_mut(alias) {
            Some(existing) => existing.merge_from(ds),
            None => {
                base.insert(alias.clone(), ds.clone());
            }
        }
    }
}

fn replace_if_set<T: Clone + IsSet>(target: &mut T, value: &T) {
    if value.is_set() {
        target.clone_from(value);
    }
}

/// Whether an optional string or list option carries a value.
trait IsSet {
    fn is_set(&self) -> bool;
}

impl IsSet for String {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl IsSet for Vec<String> {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}
