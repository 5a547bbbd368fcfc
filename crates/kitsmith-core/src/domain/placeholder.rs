//! Placeholder token scanning and derived project-name forms.
//!
//! A token is anything between `{{` and `}}` that contains no `}`. Simple
//! placeholders are tokens without whitespace or a member-access dot; the
//! rest (`{{ upper(value=x) }}`, `{{.Name}}`) belong to the expression
//! language or to the dotted notation.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::case::to_title_case;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^}]+)\}\}").expect("TOKEN_REGEX must compile")
});

/// Trimmed inner text of every `{{…}}` token, in order of appearance.
pub fn tokens(content: &str) -> impl Iterator<Item = &str> {
    TOKEN_REGEX
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// `true` if a token names a plain placeholder.
pub fn is_simple_name(token: &str) -> bool {
    !token.is_empty() && !token.contains('.') && !token.chars().any(char::is_whitespace)
}

/// Simple-placeholder tokens for which `is_known` is false, deduplicated,
/// in order of first appearance.
pub fn missing_names(content: &str, is_known: impl Fn(&str) -> bool) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens(content)
        .filter(|t| is_simple_name(t) && !is_known(t))
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}

/// Normalise a token for kit-wide extraction: drop a leading `.` and cut at
/// the first character that cannot appear in an identifier.
///
/// `.ProjectName` → `ProjectName`, `port | default` → `port`,
/// `upper(value=x)` → `upper`.
pub fn normalize_token(token: &str) -> Option<&str> {
    let token = token.trim();
    let token = token.strip_prefix('.').unwrap_or(token);
    let end = token
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(token.len());
    let name = &token[..end];
    (!name.is_empty()).then_some(name)
}

/// Append the normalised tokens of `content` to `names`, skipping any
/// already present.
pub fn collect_names(content: &str, names: &mut Vec<String>) {
    for name in tokens(content).filter_map(normalize_token) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
}

// ============================================================================
// Derived project-name forms
// ============================================================================

/// `My-App 2` → `myapp2`
pub fn package_name(project_name: &str) -> String {
    project_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase()
}

/// `My App` → `my-app`
pub fn module_name(project_name: &str) -> String {
    project_name
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// `demo-app` → `DemoApp`
pub fn class_name(project_name: &str) -> String {
    let spaced = project_name.replace(['-', '_'], " ");
    to_title_case(&spaced).split_whitespace().collect()
}

/// `demo-app` → `DEMO_APP`
pub fn const_name(project_name: &str) -> String {
    project_name
        .trim()
        .replace('-', "_")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}
