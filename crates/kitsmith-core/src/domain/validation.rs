use crate::domain::error::DomainError;

/// Centralized domain validation.
///
/// Name rules shared by requests, kit names and placeholder registration.
pub struct DomainValidator;

impl DomainValidator {
    /// A project name becomes a single directory under the output path.
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        let reason = if name.trim().is_empty() {
            Some("cannot be empty")
        } else if name == "." || name == ".." {
            Some("cannot be '.' or '..'")
        } else if name.contains('/') || name.contains('\\') {
            Some("cannot contain path separators")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidRequest {
                field: "project name",
                reason: format!("'{name}' {reason}"),
            }),
            None => Ok(()),
        }
    }

    pub fn validate_placeholder_name(name: &str) -> Result<(), DomainError> {
        let reason = if name.is_empty() {
            Some("cannot be empty")
        } else if name.chars().any(char::is_whitespace) {
            Some("cannot contain whitespace")
        } else if name.contains('{') || name.contains('}') {
            Some("cannot contain braces")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidPlaceholderName {
                name: name.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}
