//! Comprehensive error types for sectv_tizen operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sectv_tizen operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type for all sectv_tizen operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// Persisted or host configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Interactive prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// One of the build copy steps failed
    #[error("Copy failed during {step}: {}", summarize_failures(.failures))]
    CopyFailed {
        /// Step that failed
        step: CopyStep,
        /// Every entry of the step that could not be copied
        failures: Vec<CopyFailure>,
    },

    /// Rendering or installing a template failed
    #[error("Failed to render template {template}: {source}")]
    TemplateRenderFailed {
        /// Template file that was being rendered
        template: PathBuf,
        /// Underlying error
        #[source]
        source: crate::tizen::Error,
    },

    /// Creating the .wgt archive failed
    #[error("Failed to create archive {archive}: {source}")]
    ArchiveFailed {
        /// Archive that was being written
        archive: PathBuf,
        /// Underlying error
        #[source]
        source: crate::tizen::Error,
    },

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted (`userconf.json`) and host (`config.xml`) configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the persisted configuration
    #[error("Failed to load {path}: {reason}")]
    LoadFailed {
        /// Configuration file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Failed to write the persisted configuration
    #[error("Failed to save {path}: {reason}")]
    SaveFailed {
        /// Configuration file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Failed to read the host build configuration
    #[error("Failed to read host configuration {path}: {reason}")]
    HostConfig {
        /// Host configuration file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Interactive prompt errors
#[derive(Error, Debug)]
pub enum PromptError {
    /// Input ended while the last answer was still invalid
    #[error("Invalid answer for '{question}': {reason}")]
    ValidationFailed {
        /// Question name
        question: String,
        /// Validator message
        reason: String,
    },

    /// Input ended before the question was answered
    #[error("Input closed before '{question}' was answered")]
    InputClosed {
        /// Question name
        question: String,
    },

    /// A required answer is missing from the answer set
    #[error("No answer recorded for '{question}'")]
    MissingAnswer {
        /// Question name
        question: String,
    },

    /// Terminal read/write failure
    #[error("Prompt I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Copy steps of the build pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStep {
    /// Creating the destination directory chain
    Destination,
    /// Copying the explicit script files
    Scripts,
    /// Copying the web application sources
    WebSources,
    /// Copying `platform_repos/www`
    PlatformAdditions,
}

impl fmt::Display for CopyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CopyStep::Destination => "destination setup",
            CopyStep::Scripts => "script copy",
            CopyStep::WebSources => "web source copy",
            CopyStep::PlatformAdditions => "platform additions copy",
        };
        f.write_str(name)
    }
}

/// A single entry that could not be copied
#[derive(Debug)]
pub struct CopyFailure {
    /// Source path of the entry
    pub path: PathBuf,
    /// Underlying error
    pub error: crate::tizen::Error,
}

impl fmt::Display for CopyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

fn summarize_failures(failures: &[CopyFailure]) -> String {
    match failures {
        [] => "no entries reported".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

impl PackagerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PackagerError::Config(ConfigError::SaveFailed { path, .. }) => vec![
                format!("Check write permissions for {}", path.display()),
                "Run the command from the Cordova project root".to_string(),
            ],
            PackagerError::Config(ConfigError::HostConfig { path, .. }) => vec![
                format!("Verify that {} is a readable Cordova config.xml", path.display()),
                "Pass --host-config to point at a different file".to_string(),
            ],
            PackagerError::Prompt(PromptError::InputClosed { .. })
            | PackagerError::Prompt(PromptError::ValidationFailed { .. }) => vec![
                "Run the command from an interactive terminal".to_string(),
                "Application id must be 10 alphanumeric characters (e.g. a1b2c3d4e5)".to_string(),
                "Application version must look like 1.0.0".to_string(),
            ],
            PackagerError::CopyFailed { step, failures } => {
                let mut suggestions: Vec<String> = failures
                    .iter()
                    .take(3)
                    .map(|f| format!("Check that {} exists and is readable", f.path.display()))
                    .collect();
                if *step == CopyStep::PlatformAdditions {
                    suggestions.push(
                        "The platform repository must contain a 'www' directory".to_string(),
                    );
                }
                suggestions
            }
            PackagerError::TemplateRenderFailed { template, .. } => vec![
                format!(
                    "Ensure {} is provided by the platform repository",
                    template.display()
                ),
                "Template placeholders must use {{name}}, {{id}}, {{version}} or {{description}}"
                    .to_string(),
            ],
            PackagerError::ArchiveFailed { archive, .. } => vec![
                format!("Check free space and permissions for {}", archive.display()),
                "Run 'build' before 'package'".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
