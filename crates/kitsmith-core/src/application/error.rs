//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not domain rules.
//! Domain errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No kit with this name is installed.
    #[error("Kit '{name}' not found")]
    KitNotFound { name: String },

    /// A kit with this name is already installed.
    #[error("Kit '{name}' already exists at {path}")]
    KitAlreadyExists { name: String, path: PathBuf },

    /// Generation target directory already exists.
    #[error("Target directory already exists: {path}")]
    TargetExists { path: PathBuf },

    /// Source reference matched none of the recognised forms.
    #[error("Unsupported kit source '{reference}': {reason}")]
    UnsupportedSource { reference: String, reason: String },

    /// Copy, clone, download or extraction failed.
    #[error("Failed to acquire kit from '{reference}': {reason}")]
    AcquisitionFailed { reference: String, reason: String },

    /// Walking or writing the output tree failed.
    #[error("Generation failed at {path}: {reason}")]
    GenerationFailed { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The post-generation script could not be started.
    #[error("Post-generation script {script} could not run: {reason}")]
    HookFailed { script: PathBuf, reason: String },

    /// Restoring a kit from its backup failed.
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::KitNotFound { name } => vec![
                format!("No kit named '{}' is installed", name),
                "Try: kitsmith kit list to see installed kits".into(),
                "Or install it: kitsmith kit add <source>".into(),
            ],
            Self::KitAlreadyExists { name, .. } => vec![
                format!("Kit '{}' is already installed", name),
                format!("Refresh it instead: kitsmith kit update {name}"),
                format!("Or remove it first: kitsmith kit remove {name}"),
            ],
            Self::TargetExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name or --output directory".into(),
            ],
            Self::UnsupportedSource { .. } => vec![
                "Supported sources:".into(),
                "  • a local directory (/abs/path, ./rel/path, ../rel/path)".into(),
                "  • a git repository URL".into(),
                "  • an http(s) URL ending in .tar.gz".into(),
            ],
            Self::AcquisitionFailed { .. } => vec![
                "Check the source exists and is reachable".into(),
                "Git sources need the `git` executable on PATH".into(),
            ],
            Self::GenerationFailed { path, .. } | Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::HookFailed { .. } => vec![
                "Post-generation scripts run with `bash`; make sure it is installed".into(),
                "Use --no-hook to skip the script".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("A backup was left at {}", path.display()),
                "Copy it back into the kits directory manually".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::KitNotFound { .. } => ErrorCategory::NotFound,
            Self::KitAlreadyExists { .. } | Self::TargetExists { .. } => ErrorCategory::Conflict,
            Self::UnsupportedSource { .. } => ErrorCategory::Validation,
            Self::AcquisitionFailed { .. }
            | Self::GenerationFailed { .. }
            | Self::FilesystemError { .. }
            | Self::HookFailed { .. }
            | Self::RollbackFailed { .. } => ErrorCategory::Internal,
        }
    }
}
