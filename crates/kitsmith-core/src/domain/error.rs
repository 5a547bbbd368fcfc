// ============================================================================
// domain/error.rs - KIT DOMAIN ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so services can report and still propagate)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Kit identity
    // ========================================================================
    #[error("Cannot derive a kit name from '{reference}'")]
    NameExtraction { reference: String },

    #[error("Invalid kit name '{name}': {reason}")]
    InvalidKitName { name: String, reason: String },

    // ========================================================================
    // Kit structure
    // ========================================================================
    #[error("Invalid kit at {path}: {reason}")]
    InvalidKit { path: PathBuf, reason: String },

    #[error("Kit '{name}' has no recorded origin to update from")]
    MissingOrigin { name: String },

    // ========================================================================
    // Generation requests
    // ========================================================================
    #[error("Invalid generation request: {field} {reason}")]
    InvalidRequest { field: &'static str, reason: String },

    #[error("Invalid placeholder name '{name}': {reason}")]
    InvalidPlaceholderName { name: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NameExtraction { reference } => vec![
                format!("'{}' does not end in a usable directory or repository name", reference),
                "Point at a kit directory, a git URL, or a .tar.gz URL".into(),
                "Example: kitsmith kit add https://github.com/acme/go-service.git".into(),
            ],
            Self::InvalidKitName { .. } => vec![
                "Kit names are single path segments (no '/', '\\', '.' or '..')".into(),
                "Try: kitsmith kit list".into(),
            ],
            Self::InvalidKit { path, reason } => vec![
                format!("Kit at {} failed validation: {}", path.display(), reason),
                "A kit needs metadata.yaml (with name and description) and a templates/ directory"
                    .into(),
            ],
            Self::MissingOrigin { name } => vec![
                format!("Kit '{}' was installed without a repository field", name),
                format!("Re-install it: kitsmith kit remove {name} && kitsmith kit add <source>"),
            ],
            Self::InvalidRequest { .. } => vec![
                "Check the project name and placeholder values".into(),
                "Use --help for usage information".into(),
            ],
            Self::InvalidPlaceholderName { .. } => vec![
                "Placeholder names cannot contain whitespace or braces".into(),
                "Example: --set author=\"Jane Doe\"".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        // Every domain failure is a problem with what the caller handed us.
        ErrorCategory::Validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_kit_message_names_path_and_reason() {
        let err = DomainError::InvalidKit {
            path: PathBuf::from("/kits/broken"),
            reason: "templates directory is missing".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/kits/broken"));
        assert!(msg.contains("templates directory is missing"));
    }

    #[test]
    fn missing_origin_suggests_reinstall() {
        let err = DomainError::MissingOrigin {
            name: "go-api".into(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("kit add")));
    }
}
