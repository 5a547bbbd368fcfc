//! Integration tests for kitsmith-core's public API.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kitsmith_core::{
    application::{
        PlaceholderResolver,
        ports::{EvaluationError, ExpressionEvaluator},
    },
    domain::{GenerationRequest, KitMetadata, KitName, KitSource, content},
    error::ErrorCategory,
};

/// Evaluator that fails every call and counts how often it was asked.
#[derive(Default)]
struct FailingEvaluator {
    calls: AtomicUsize,
}

impl ExpressionEvaluator for FailingEvaluator {
    fn evaluate(
        &self,
        _content: &str,
        _values: &BTreeMap<String, String>,
    ) -> Result<String, EvaluationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EvaluationError::new("unexpected token"))
    }
}

fn seeded(project: &str, evaluator: Arc<dyn ExpressionEvaluator>) -> PlaceholderResolver {
    let request = GenerationRequest::builder("go-service", project)
        .placeholder("port", "8080")
        .build()
        .unwrap();
    let kit = KitMetadata::from_yaml("name: go-service\ndescription: d\nversion: 2.0.0\n").unwrap();

    let mut resolver = PlaceholderResolver::new(evaluator);
    resolver.seed_from_request(&request);
    resolver.seed_from_kit(&kit);
    resolver
}

#[test]
fn test_kit_names_from_references() {
    let cases = [
        ("https://github.com/acme/go-service.git", "go-service"),
        ("git@github.com:acme/rust-cli.git", "rust-cli"),
        ("https://example.com/kits/web.tar.gz", "web"),
        ("./kits/local-kit/", "local-kit"),
        ("C:\\kits\\win", "win"),
    ];
    for (reference, expected) in cases {
        assert_eq!(
            KitName::from_source(reference).unwrap().as_str(),
            expected,
            "reference: {reference}"
        );
    }

    let err = KitName::from_source("///").unwrap_err();
    assert_eq!(
        kitsmith_core::error::KitsmithError::from(err).category(),
        ErrorCategory::Validation
    );
}

#[test]
fn test_source_classification() {
    assert!(KitSource::parse("/abs/kit").is_local());
    assert!(KitSource::parse("../rel/kit").is_local());
    assert!(!KitSource::parse("https://github.com/acme/kit").is_local());
    assert!(KitSource::parse("https://example.com/kit.tar.gz").is_archive_url());
    assert!(!KitSource::parse("https://github.com/acme/kit.git").is_archive_url());
}

#[test]
fn test_seeded_values_and_literal_substitution() {
    let evaluator = Arc::new(FailingEvaluator::default());
    let resolver = seeded("My-App 2", evaluator.clone());

    let text = resolver.process(
        "{{project_name}} {{.package_name}} {{module_name}} {{class_name}} {{const_name}} \
         {{port}} {{kit_version}} {{license}}",
    );
    assert_eq!(text, "My-App 2 myapp2 my-app-2 MyApp2 MY_APP_2 8080 2.0.0 MIT");
    // Nothing left for the expression phase.
    assert_eq!(evaluator.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_expression_failure_keeps_literal_output() {
    let evaluator = Arc::new(FailingEvaluator::default());
    let resolver = seeded("demo", evaluator.clone());

    let resolved = resolver.resolve("{{project_name}}: {{ upper( }}");
    assert_eq!(resolved.text, "demo: {{ upper( }}");
    assert!(resolved.warning.is_some());
    assert_eq!(evaluator.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_missing_names_exclude_seeded_values() {
    let resolver = seeded("demo", Arc::new(FailingEvaluator::default()));
    assert_eq!(
        resolver.find_missing("{{project_name}} {{db_url}} {{ upper(value=x) }} {{db_url}}"),
        vec!["db_url"]
    );
}

#[test]
fn test_substitutable_file_policy() {
    use std::path::Path;

    assert!(content::is_substitutable(Path::new("cmd/main.go")));
    assert!(content::is_substitutable(Path::new("Dockerfile")));
    assert!(content::is_substitutable(Path::new("config.yaml.tpl")));
    assert!(!content::is_substitutable(Path::new("assets/logo.png")));
}
