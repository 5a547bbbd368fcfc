//! Placeholder Resolver - owns the name → value mapping for one generation
//! and performs the two-phase substitution.
//!
//! 1. **Literal phase**: every known `{{name}}` and `{{.name}}` marker is
//!    replaced by its value.
//! 2. **Expression phase**: the result is handed to the injected
//!    [`ExpressionEvaluator`] with the mapping as context. A failure here is
//!    downgraded to a warning and the literal-phase text is kept.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, warn};

use crate::{
    application::ports::{EvaluationError, ExpressionEvaluator},
    domain::{GenerationRequest, KitMetadata, placeholder},
};

/// Go toolchain version offered to kits when `GO_VERSION` is unset.
pub const DEFAULT_GO_VERSION: &str = "1.24";

/// Names the resolver always fills in itself, from the request, the kit or
/// conventional defaults.
pub const SEEDED_NAMES: &[&str] = &[
    "project_name",
    "ProjectName",
    "current_year",
    "package_name",
    "module_name",
    "class_name",
    "const_name",
    "go_version",
    "kit_name",
    "kit_version",
    "kit_author",
    "author",
    "license",
    "version",
    "description",
];

/// Result of [`PlaceholderResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    /// Set when the expression phase failed and `text` is the literal-phase
    /// output.
    pub warning: Option<EvaluationError>,
}

/// Per-request placeholder state.
pub struct PlaceholderResolver {
    values: BTreeMap<String, String>,
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl PlaceholderResolver {
    pub fn new(evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self {
            values: BTreeMap::new(),
            evaluator,
        }
    }

    /// Set one value, overwriting any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Set many values, overwriting.
    pub fn set_many<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in values {
            self.set(name, value);
        }
    }

    /// Set a value only if nothing is registered under `name` yet.
    pub fn set_default(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Seed from a request: the project name and year, the explicit values
    /// (last write wins), then the derived project-name forms.
    pub fn seed_from_request(&mut self, request: &GenerationRequest) {
        let project_name = request.project_name();

        self.set("project_name", project_name);
        self.set("ProjectName", project_name);
        self.set("current_year", Local::now().format("%Y").to_string());

        for value in request.placeholders() {
            self.set(value.name.as_str(), value.effective_value());
        }

        self.set("package_name", placeholder::package_name(project_name));
        self.set("module_name", placeholder::module_name(project_name));
        self.set("class_name", placeholder::class_name(project_name));
        self.set("const_name", placeholder::const_name(project_name));

        let go_version = std::env::var("GO_VERSION")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GO_VERSION.to_string());
        self.set("go_version", go_version);

        debug!(count = self.values.len(), "Seeded placeholders from request");
    }

    /// Seed kit identity values and the conventional defaults for anything
    /// the request did not provide.
    pub fn seed_from_kit(&mut self, kit: &KitMetadata) {
        self.set("kit_name", kit.name.as_str());
        self.set("kit_version", kit.version.as_str());
        self.set("kit_author", kit.author.as_str());

        self.set_default("author", "Developer");
        self.set_default("license", "MIT");
        self.set_default("version", "1.0.0");
        self.set_default(
            "description",
            format!("A project generated from kit {}", kit.name),
        );
    }

    /// Two-phase substitution. Never fails.
    pub fn process(&self, content: &str) -> String {
        let resolved = self.resolve(content);
        if let Some(e) = &resolved.warning {
            warn!(error = %e, "Template evaluation failed; keeping literal substitution");
        }
        resolved.text
    }

    /// Two-phase substitution that reports, rather than logs, an
    /// expression-phase failure.
    pub fn resolve(&self, content: &str) -> Resolved {
        let literal = self.substitute(content);

        if !has_expression_markers(&literal) {
            return Resolved {
                text: literal,
                warning: None,
            };
        }

        match self.evaluator.evaluate(&literal, &self.values) {
            Ok(text) => Resolved {
                text,
                warning: None,
            },
            Err(e) => Resolved {
                text: literal,
                warning: Some(e),
            },
        }
    }

    /// Literal substitution only; paths never carry expressions.
    pub fn process_path(&self, path: &str) -> String {
        self.substitute(path)
    }

    /// Simple placeholders in `content` with no registered value.
    pub fn find_missing(&self, content: &str) -> Vec<String> {
        placeholder::missing_names(content, |name| self.contains(name))
    }

    fn substitute(&self, content: &str) -> String {
        let mut result = content.to_string();
        for (name, value) in &self.values {
            if !result.contains("{{") {
                break;
            }
            result = result
                .replace(&format!("{{{{{name}}}}}"), value)
                .replace(&format!("{{{{.{name}}}}}"), value);
        }
        result
    }
}

fn has_expression_markers(text: &str) -> bool {
    text.contains("{{") || text.contains("{%") || text.contains("{#")
}
