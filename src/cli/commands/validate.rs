//! `typewriter validate`
//!
//! Runs the full loader over each file and reports every issue found.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::ConfigLoader;
use crate::error::{ConfigError, Severity, TypewriterError, ValidationIssue};

/// Per-file validation outcome.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validate configuration files.
///
/// Every file is checked before returning, so one bad file does not hide
/// problems in the next.
///
/// # Errors
///
/// Returns an I/O error if a file does not exist, or the first file's
/// configuration error if any file fails. With `--strict`, warnings fail
/// the file too.
pub fn run(args: &ValidateArgs) -> Result<(), TypewriterError> {
    let loader = ConfigLoader::with_defaults();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_failure: Option<ConfigError> = None;

    for path in &args.files {
        if !path.exists() {
            return Err(TypewriterError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )));
        }
        tracing::info!(file = %path.display(), "validating configuration");

        let (report, failure) = check(&loader, path, args.strict);
        if first_failure.is_none() {
            first_failure = failure;
        }
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                let status = if report.valid { "ok" } else { "FAILED" };
                println!("{status}: {}", report.file);
                for line in report.errors.iter().chain(&report.warnings) {
                    println!("  {line}");
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    first_failure.map_or(Ok(()), |e| Err(e.into()))
}

fn check(loader: &ConfigLoader, path: &Path, strict: bool) -> (FileReport, Option<ConfigError>) {
    let file = path.display().to_string();

    match loader.load(path) {
        Ok(loaded) => {
            let warnings: Vec<String> = loaded.warnings.iter().map(ToString::to_string).collect();
            let failure = (strict && !loaded.warnings.is_empty()).then(|| {
                ConfigError::ValidationError {
                    path: file.clone(),
                    errors: loaded
                        .warnings
                        .into_iter()
                        .map(|w| ValidationIssue {
                            path: w.location.unwrap_or_default(),
                            message: w.message,
                            severity: Severity::Error,
                        })
                        .collect(),
                }
            });
            tracing::info!(file = %file, warnings = warnings.len(), "configuration checked");
            (
                FileReport {
                    file,
                    valid: failure.is_none(),
                    errors: Vec::new(),
                    warnings,
                },
                failure,
            )
        }
        Err(e) => {
            let errors = match &e {
                ConfigError::ValidationError { errors, .. } => {
                    errors.iter().map(ToString::to_string).collect()
                }
                other => vec![other.to_string()],
            };
            (
                FileReport {
                    file,
                    valid: false,
                    errors,
                    warnings: Vec::new(),
                },
                Some(e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn valid_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "ok.yaml", "phrases: [a, b]\n");
        let (report, failure) = check(&ConfigLoader::with_defaults(), &path, false);
        assert!(report.valid);
        assert!(failure.is_none());
    }

    #[test]
    fn strict_turns_warnings_into_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "warn.yaml", "phrases: [a, '']\n");
        let loader = ConfigLoader::with_defaults();

        let (lenient, failure) = check(&loader, &path, false);
        assert!(lenient.valid);
        assert_eq!(lenient.warnings.len(), 1);
        assert!(failure.is_none());

        let (strict, failure) = check(&loader, &path, true);
        assert!(!strict.valid);
        assert!(matches!(failure, Some(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn validation_errors_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.yaml", "phrases: []\n");
        let (report, failure) = check(&ConfigLoader::with_defaults(), &path, false);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("at least one phrase"));
        assert!(failure.is_some());
    }

    #[test]
    fn missing_file_is_io_error() {
        let args = ValidateArgs {
            files: vec!["/no/such/file.yaml".into()],
            format: OutputFormat::Human,
            strict: false,
        };
        let err = run(&args).unwrap_err();
        assert!(matches!(err, TypewriterError::Io(_)));
    }
}
