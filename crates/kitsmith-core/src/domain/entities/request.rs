//! Generation requests and the placeholder values they carry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, validation::DomainValidator};

/// Request option: skip the kit's post-generation script.
pub const OPTION_SKIP_HOOK: &str = "skip_hook";

/// A single value supplied for a placeholder, by a caller or as a kit default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderValue {
    pub name: String,
    pub value: String,
    pub description: String,
    pub required: bool,
    pub default: Option<String>,
}

impl PlaceholderValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The value to register: the explicit value, or the default when the
    /// explicit value is empty.
    pub fn effective_value(&self) -> &str {
        match (&self.default, self.value.is_empty()) {
            (Some(default), true) => default,
            _ => &self.value,
        }
    }
}

/// Everything the engine needs to generate one project.
///
/// Built through [`GenerationRequestBuilder`]; once built the request is
/// read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    kit_name: String,
    project_name: String,
    output_path: PathBuf,
    placeholders: Vec<PlaceholderValue>,
    options: BTreeMap<String, String>,
}

impl GenerationRequest {
    pub fn builder(
        kit_name: impl Into<String>,
        project_name: impl Into<String>,
    ) -> GenerationRequestBuilder {
        GenerationRequestBuilder {
            kit_name: kit_name.into(),
            project_name: project_name.into(),
            output_path: PathBuf::from("."),
            placeholders: Vec::new(),
            options: BTreeMap::new(),
        }
    }

    pub fn kit_name(&self) -> &str {
        &self.kit_name
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Directory the project directory is created in.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// The directory that will be generated: `output_path/project_name`.
    pub fn project_path(&self) -> PathBuf {
        self.output_path.join(&self.project_name)
    }

    /// Placeholder values in the order they were supplied.
    pub fn placeholders(&self) -> &[PlaceholderValue] {
        &self.placeholders
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// `true` when `key` is set to `true`, `yes` or `1`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.option(key), Some("true" | "yes" | "1"))
    }
}

/// Fluent builder; validation happens in [`build`](Self::build).
#[derive(Debug)]
pub struct GenerationRequestBuilder {
    kit_name: String,
    project_name: String,
    output_path: PathBuf,
    placeholders: Vec<PlaceholderValue>,
    options: BTreeMap<String, String>,
}

impl GenerationRequestBuilder {
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Add a plain `name = value` pair.
    pub fn placeholder(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.placeholders.push(PlaceholderValue::new(name, value));
        self
    }

    /// Add a fully described value.
    pub fn value(mut self, value: PlaceholderValue) -> Self {
        self.placeholders.push(value);
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Consume builder and construct the request.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for an empty kit name, an unusable project name, or
    ///   a required value that is empty with no default
    /// - `InvalidPlaceholderName` for names with whitespace or braces
    pub fn build(self) -> Result<GenerationRequest, DomainError> {
        if self.kit_name.trim().is_empty() {
            return Err(DomainError::InvalidRequest {
                field: "kit name",
                reason: "cannot be empty".into(),
            });
        }
        DomainValidator::validate_project_name(&self.project_name)?;

        for value in &self.placeholders {
            DomainValidator::validate_placeholder_name(&value.name)?;
            if value.required && value.effective_value().is_empty() {
                return Err(DomainError::InvalidRequest {
                    field: "placeholder",
                    reason: format!("'{}' is required but has no value", value.name),
                });
            }
        }

        Ok(GenerationRequest {
            kit_name: self.kit_name,
            project_name: self.project_name,
            output_path: self.output_path,
            placeholders: self.placeholders,
            options: self.options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_path_joins_output_and_name() {
        let req = GenerationRequest::builder("sample", "widgets")
            .output_path("/tmp/out")
            .build()
            .unwrap();
        assert_eq!(req.project_path(), PathBuf::from("/tmp/out/widgets"));
    }

    #[test]
    fn placeholders_keep_supplied_order() {
        let req = GenerationRequest::builder("sample", "widgets")
            .placeholder("author", "A")
            .placeholder("author", "B")
            .build()
            .unwrap();
        let names: Vec<_> = req.placeholders().iter().map(|p| p.value.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn empty_kit_name_is_rejected() {
        let err = GenerationRequest::builder("  ", "widgets").build().unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest { field: "kit name", .. }));
    }

    #[test]
    fn project_name_with_separator_is_rejected() {
        assert!(GenerationRequest::builder("k", "a/b").build().is_err());
        assert!(GenerationRequest::builder("k", "..").build().is_err());
        assert!(GenerationRequest::builder("k", "").build().is_err());
    }

    #[test]
    fn required_value_without_default_is_rejected() {
        let err = GenerationRequest::builder("k", "p")
            .value(PlaceholderValue::new("port", "").required())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn required_value_falls_back_to_default() {
        let value = PlaceholderValue::new("port", "").required().with_default("8080");
        assert_eq!(value.effective_value(), "8080");
        assert!(GenerationRequest::builder("k", "p").value(value).build().is_ok());
    }

    #[test]
    fn placeholder_name_with_space_is_rejected() {
        let err = GenerationRequest::builder("k", "p")
            .placeholder("my name", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPlaceholderName { .. }));
    }

    #[test]
    fn flag_option_parses_truthy_values() {
        let req = GenerationRequest::builder("k", "p")
            .option(OPTION_SKIP_HOOK, "yes")
            .build()
            .unwrap();
        assert!(req.flag(OPTION_SKIP_HOOK));
        assert!(!req.flag("other"));
    }
}
