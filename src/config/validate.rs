//! Cross-field validation of a merged configuration.

use super::ConfigError;
use super::defaults;
use super::document::Config;
use super::error::option;

impl Config {
    /// Checks that the configuration is consistent.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// conflicting input options, conflicting output options, output
    /// options conflicting with `execPipe`, `outputDir`/`outputMap` without
    /// `inputDir`, input/output count mismatch, and `execPipe` misuse.
    ///
    /// # Errors
    ///
    /// Returns the validation error describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        not_together(&[
            (option::IN, !self.input.is_empty()),
            (option::INPUT_FILES, !self.input_files.is_empty()),
            (option::INPUT_DIR, !self.input_dir.is_empty()),
        ])?;
        not_together(&[
            (option::OUTPUT_FILES, !self.output_files.is_empty()),
            (option::OUTPUT_DIR, !self.output_dir.is_empty()),
            (option::OUTPUT_MAP, !self.output_map.is_empty()),
        ])?;
        not_together(&[
            (option::OUTPUT_DIR, !self.output_dir.is_empty()),
            (option::OUTPUT_MAP, !self.output_map.is_empty()),
            (option::EXEC_PIPE, self.exec_pipe),
        ])?;

        must_together(
            (option::OUTPUT_DIR, !self.output_dir.is_empty()),
            (option::INPUT_DIR, !self.input_dir.is_empty()),
        )?;
        must_together(
            (option::OUTPUT_MAP, !self.output_map.is_empty()),
            (option::INPUT_DIR, !self.input_dir.is_empty()),
        )?;

        let inputs = self.input_count();
        let outputs = self.output_files.len();
        if inputs != outputs && !self.exec_pipe {
            return Err(ConfigError::OutputCountMismatch { outputs, inputs });
        }

        if self.exec_pipe && self.post_exec.is_empty() {
            return Err(ConfigError::ExecPipeWithoutPostExec);
        }

        if self.exec_pipe
            && self
                .output_files
                .first()
                .is_some_and(|file| file != defaults::STDIO)
        {
            return Err(ConfigError::ExecPipeWithOutputFiles);
        }

        Ok(())
    }

    /// Number of templates named by `in` or `inputFiles`.
    fn input_count(&self) -> usize {
        if self.input_files.is_empty() && !self.input.is_empty() {
            1
        } else {
            self.input_files.len()
        }
    }
}

fn not_together(options: &[(&'static str, bool)]) -> Result<(), ConfigError> {
    let mut found: Option<&'static str> = None;
    for &(name, is_set) in options {
        if !is_set {
            continue;
        }
        if let Some(first) = found {
            return Err(ConfigError::NotTogether {
                first,
                second: name,
            });
        }
        found = Some(name);
    }
    Ok(())
}

fn must_together(
    (left, left_set): (&'static str, bool),
    (right, right_set): (&'static str, bool),
) -> Result<(), ConfigError> {
    if left_set && !right_set {
        return Err(ConfigError::MustTogether { left, right });
    }
    Ok(())
}
