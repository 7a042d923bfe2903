//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size check and read (UTF-8 BOM stripped)
//! 2. Environment variable expansion on the raw text
//! 3. YAML parsing (JSON is accepted, being valid YAML)
//! 4. Deserialization to [`TypewriterFile`]
//! 5. Validation
//! 6. Conversion to a [`PhraseList`] and [`TypewriterConfig`]

use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::config::schema::TypewriterFile;
use crate::config::validation::Validator;
use crate::engine::{PhraseList, TypewriterConfig};
use crate::error::ConfigError;

/// Limits guarding against oversized configuration files.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of phrases.
    pub max_phrases: usize,

    /// Maximum characters in a single phrase.
    pub max_phrase_chars: usize,

    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_phrases: env_or("TYPEWRITER_MAX_PHRASES", 1000),
            max_phrase_chars: env_or("TYPEWRITER_MAX_PHRASE_CHARS", 4096),
            max_config_size: env_or("TYPEWRITER_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

fn env_or(var: &str, default: usize) -> usize {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The validated phrase list.
    pub phrases: PhraseList,

    /// Engine configuration.
    pub config: TypewriterConfig,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "warning: {} at {location}", self.message),
            None => write!(f, "warning: {}", self.message),
        }
    }
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    limits: ConfigLimits,
}

impl ConfigLoader {
    /// Creates a loader with the given limits.
    #[must_use]
    pub const fn new(limits: ConfigLimits) -> Self {
        Self { limits }
    }

    /// Creates a loader with default limits.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or too large, if environment
    /// expansion, parsing or deserialization fails, or if validation finds
    /// errors.
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > self.limits.max_config_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {} bytes", self.limits.max_config_size),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: format!("cannot read file as UTF-8 text: {e}"),
        })?;

        self.load_source(&raw, path)
    }

    /// Loads configuration from an in-memory string.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the file-system checks.
    pub fn load_from_str(&self, raw: &str) -> Result<LoadResult, ConfigError> {
        self.load_source(raw, Path::new("<string>"))
    }

    fn load_source(&self, raw: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let mut warnings = Vec::new();

        let expanded = expand_env(raw, path, &mut warnings)?;

        let root: Value = serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;

        if root.is_null() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "configuration file is empty".to_string(),
            });
        }

        let file: TypewriterFile =
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: format!("failed to deserialize configuration: {e}"),
            })?;

        let result = Validator::new().validate(&file, &self.limits);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }
        warnings.extend(result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        let config = file
            .engine_config()
            .map_err(|(field, message)| ConfigError::InvalidValue {
                field: field.to_string(),
                value: message,
                expected: "a duration".to_string(),
            })?;
        let phrases = PhraseList::new(file.phrases).map_err(|e| ConfigError::InvalidValue {
            field: "phrases".to_string(),
            value: e.to_string(),
            expected: "at least one phrase".to_string(),
        })?;

        debug!(
            path = %path.display(),
            phrases = phrases.len(),
            warnings = warnings.len(),
            "configuration loaded"
        );

        Ok(LoadResult {
            phrases,
            config,
            warnings,
        })
    }
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expands environment references in raw configuration text.
///
/// - `${VAR}`: value, or empty string with a warning when unset
/// - `${VAR:-default}`: value, or `default` when unset
/// - `${VAR:?message}`: value, or an error carrying `message`
/// - `$$`: a literal `$`
fn expand_env(
    raw: &str,
    source: &Path,
    warnings: &mut Vec<LoadWarning>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(body_start) = after.strip_prefix('{') {
            let end = closing_brace(body_start).ok_or_else(|| ConfigError::ParseError {
                path: source.to_path_buf(),
                line: line_of(raw, raw.len() - rest.len() + pos),
                message: "unclosed environment variable reference".to_string(),
            })?;
            out.push_str(&resolve_reference(&body_start[..end], source, warnings)?);
            rest = &body_start[end + 1..];
        } else {
            out.push('$');
            rest = after;
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Byte offset of the `}` closing a reference body, honoring nested braces.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn resolve_reference(
    body: &str,
    source: &Path,
    warnings: &mut Vec<LoadWarning>,
) -> Result<String, ConfigError> {
    let (name, modifier) = match body.split_once(':') {
        Some((name, modifier)) => (name, Some(modifier)),
        None => (body, None),
    };

    if let Ok(value) = std::env::var(name) {
        return Ok(value);
    }

    if let Some(default) = modifier.and_then(|m| m.strip_prefix('-')) {
        return Ok(default.to_string());
    }
    if let Some(message) = modifier.and_then(|m| m.strip_prefix('?')) {
        return Err(ConfigError::EnvVarNotSet {
            var: name.to_string(),
            location: message.to_string(),
        });
    }

    warnings.push(LoadWarning {
        message: format!("environment variable '{name}' is not set, using empty string"),
        location: Some(source.display().to_string()),
    });
    Ok(String::new())
}

fn line_of(text: &str, offset: usize) -> Option<usize> {
    text.get(..offset).map(|s| s.lines().count().max(1))
}
