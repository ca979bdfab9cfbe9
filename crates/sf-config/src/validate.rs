//! Semantic validation of a parsed configuration.
//!
//! Parsing guarantees the shape; these checks catch values that parse but
//! cannot produce a sensible run. All problems are reported, not only the
//! first.

use crate::etl::EtlConfig;
use std::fmt;

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `input.song_glob`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validation.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate a configuration.
pub fn validate(config: &EtlConfig) -> ValidationResult {
    let mut errors = Vec::new();

    check_glob(&mut errors, "input.song_glob", &config.input.song_glob);
    check_glob(&mut errors, "input.log_glob", &config.input.log_glob);

    if config.input.root.as_os_str().is_empty() {
        errors.push(ValidationError::new("input.root", "must not be empty"));
    }
    if config.output.root.as_os_str().is_empty() {
        errors.push(ValidationError::new("output.root", "must not be empty"));
    }
    // Runs overwrite their output; writing over the input would destroy it.
    if !config.output.root.as_os_str().is_empty() && config.output.root == config.input.root {
        errors.push(ValidationError::new(
            "output.root",
            "must differ from input.root",
        ));
    }

    if config.pipeline.activity_page.trim().is_empty() {
        errors.push(ValidationError::new(
            "pipeline.activity_page",
            "must not be blank",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_glob(errors: &mut Vec<ValidationError>, field: &str, pattern: &str) {
    if pattern.trim().is_empty() {
        errors.push(ValidationError::new(field, "must not be empty"));
    } else if pattern.starts_with('/') {
        errors.push(ValidationError::new(
            field,
            "must be relative to input.root",
        ));
    } else if !pattern.ends_with(".json") {
        errors.push(ValidationError::new(field, "must match .json files"));
    }
}
