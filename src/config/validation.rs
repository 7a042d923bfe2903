//! Configuration validation
//!
//! Runs on the deserialized [`TypewriterFile`] and collects every issue
//! instead of stopping at the first, so `typewriter validate` can report
//! them all at once.

use crate::config::loader::ConfigLimits;
use crate::config::schema::{DelayValue, TypewriterFile};
use crate::error::{Severity, ValidationIssue};

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration document.
    pub fn validate(&mut self, file: &TypewriterFile, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_phrases(file, limits);
        self.validate_timing(file);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_phrases(&mut self, file: &TypewriterFile, limits: &ConfigLimits) {
        if file.phrases.is_empty() {
            self.add_error("phrases", "at least one phrase is required");
            return;
        }

        if file.phrases.len() > limits.max_phrases {
            self.add_error(
                "phrases",
                &format!(
                    "too many phrases ({} > {})",
                    file.phrases.len(),
                    limits.max_phrases
                ),
            );
        }

        for (i, phrase) in file.phrases.iter().enumerate() {
            let path = format!("phrases[{i}]");
            let chars = phrase.chars().count();
            if chars == 0 {
                self.add_warning(&path, "phrase is empty and will only pause");
            } else if chars > limits.max_phrase_chars {
                self.add_error(
                    &path,
                    &format!(
                        "phrase is too long ({chars} > {} characters)",
                        limits.max_phrase_chars
                    ),
                );
            }
            if phrase.contains(['\n', '\r']) {
                self.add_warning(&path, "phrase contains a line break");
            }
        }
    }

    fn validate_timing(&mut self, file: &TypewriterFile) {
        let timing = &file.timing;
        let fields: [(&str, Option<&DelayValue>); 4] = [
            ("timing.type_delay", timing.type_delay.as_ref()),
            ("timing.delete_delay", timing.delete_delay.as_ref()),
            ("timing.pause", timing.pause.as_ref()),
            ("timing.blink_interval", timing.blink_interval.as_ref()),
        ];

        for (path, value) in fields {
            let Some(value) = value else { continue };
            if let Err(message) = value.to_duration() {
                self.add_error(path, &message);
            } else if value.is_non_positive() {
                self.add_warning(path, "delay is zero or negative and will be clamped to 1ms");
            }
        }
    }

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
