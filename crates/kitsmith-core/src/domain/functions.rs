//! The closed set of functions available to phase-2 template expressions.
//!
//! Each function is a pure `fn(&[&str]) -> FunctionValue` with a fixed,
//! named parameter list. Evaluators receive a [`FunctionTable`] at
//! construction and expose its entries in whatever syntax they speak.

use std::fmt::Write as _;
use std::path::Path;

use chrono::Local;

use crate::domain::case::{
    to_camel_case, to_kebab_case, to_pascal_case, to_snake_case, to_title_case,
};

/// Timestamp layout used by `now`.
pub const NOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Result of a template function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionValue {
    Text(String),
    Flag(bool),
}

impl FunctionValue {
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Flag(b) => b.to_string(),
        }
    }
}

type FunctionBody = fn(&[&str]) -> FunctionValue;

/// One named function with its parameter names.
#[derive(Debug, Clone, Copy)]
pub struct TemplateFunction {
    pub name: &'static str,
    pub params: &'static [&'static str],
    body: FunctionBody,
}

impl TemplateFunction {
    /// Call with positional arguments. Missing arguments read as `""`;
    /// extra arguments are ignored.
    pub fn call(&self, args: &[&str]) -> FunctionValue {
        let mut padded: Vec<&str> = args.iter().take(self.params.len()).copied().collect();
        padded.resize(self.params.len(), "");
        (self.body)(&padded)
    }

    /// `true` when the first parameter is the piped-in `value`, so the
    /// function also reads naturally as a filter.
    pub fn takes_value(&self) -> bool {
        self.params.first() == Some(&"value")
    }
}

/// The fixed function registry.
#[derive(Debug, Clone)]
pub struct FunctionTable {
    functions: Vec<TemplateFunction>,
}

impl FunctionTable {
    pub fn standard() -> Self {
        fn text(s: impl Into<String>) -> FunctionValue {
            FunctionValue::Text(s.into())
        }

        const VALUE: &[&str] = &["value"];

        let functions = vec![
            // case and whitespace
            TemplateFunction { name: "upper", params: VALUE, body: |a| text(a[0].to_uppercase()) },
            TemplateFunction { name: "lower", params: VALUE, body: |a| text(a[0].to_lowercase()) },
            TemplateFunction { name: "title", params: VALUE, body: |a| text(to_title_case(a[0])) },
            TemplateFunction { name: "trim", params: VALUE, body: |a| text(a[0].trim()) },
            TemplateFunction {
                name: "replace",
                params: &["value", "from", "to"],
                body: |a| text(a[0].replace(a[1], a[2])),
            },
            // substring predicates
            TemplateFunction {
                name: "contains",
                params: &["value", "needle"],
                body: |a| FunctionValue::Flag(a[0].contains(a[1])),
            },
            TemplateFunction {
                name: "hasPrefix",
                params: &["value", "prefix"],
                body: |a| FunctionValue::Flag(a[0].starts_with(a[1])),
            },
            TemplateFunction {
                name: "hasSuffix",
                params: &["value", "suffix"],
                body: |a| FunctionValue::Flag(a[0].ends_with(a[1])),
            },
            // path parts
            TemplateFunction { name: "base", params: VALUE, body: |a| text(path_base(a[0])) },
            TemplateFunction { name: "dir", params: VALUE, body: |a| text(path_dir(a[0])) },
            TemplateFunction { name: "ext", params: VALUE, body: |a| text(path_ext(a[0])) },
            TemplateFunction {
                name: "join",
                params: &["value", "path"],
                body: |a| text(Path::new(a[0]).join(a[1]).display().to_string()),
            },
            // identifier styles
            TemplateFunction { name: "kebab", params: VALUE, body: |a| text(to_kebab_case(a[0])) },
            TemplateFunction { name: "snake", params: VALUE, body: |a| text(to_snake_case(a[0])) },
            TemplateFunction { name: "camel", params: VALUE, body: |a| text(to_camel_case(a[0])) },
            TemplateFunction {
                name: "pascal",
                params: VALUE,
                body: |a| text(to_pascal_case(a[0])),
            },
            // clock and environment
            TemplateFunction { name: "now", params: &[], body: |_| text(format_now(NOW_FORMAT)) },
            TemplateFunction { name: "date", params: &["format"], body: |a| text(format_now(a[0])) },
            TemplateFunction {
                name: "env",
                params: &["name"],
                body: |a| text(std::env::var(a[0]).unwrap_or_default()),
            },
            TemplateFunction {
                name: "default",
                params: &["value", "fallback"],
                body: |a| text(if a[0].is_empty() { a[1] } else { a[0] }),
            },
        ];

        Self { functions }
    }

    pub fn get(&self, name: &str) -> Option<&TemplateFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateFunction> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn path_base(value: &str) -> String {
    Path::new(value)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| value.to_string())
}

fn path_dir(value: &str) -> String {
    match Path::new(value).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
        _ => ".".to_string(),
    }
}

fn path_ext(value: &str) -> String {
    Path::new(value)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Format the local time; an invalid format string yields `""` rather than
/// a panic.
fn format_now(format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", Local::now().format(format)).is_err() {
        out.clear();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[&str]) -> FunctionValue {
        FunctionTable::standard()
            .get(name)
            .unwrap_or_else(|| panic!("missing function {name}"))
            .call(args)
    }

    fn text(name: &str, args: &[&str]) -> String {
        call(name, args).as_text()
    }

    #[test]
    fn table_is_closed_and_complete() {
        let table = FunctionTable::standard();
        let mut names: Vec<_> = table.iter().map(|f| f.name).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "base", "camel", "contains", "date", "default", "dir", "env", "ext",
                "hasPrefix", "hasSuffix", "join", "kebab", "lower", "now", "pascal",
                "replace", "snake", "title", "trim", "upper"
            ]
        );
    }

    #[test]
    fn string_functions() {
        assert_eq!(text("upper", &["go"]), "GO");
        assert_eq!(text("trim", &["  x "]), "x");
        assert_eq!(text("replace", &["a-b-c", "-", "_"]), "a_b_c");
        assert_eq!(text("title", &["demo app"]), "Demo App");
    }

    #[test]
    fn predicates_return_flags() {
        assert_eq!(call("contains", &["widgets", "dg"]), FunctionValue::Flag(true));
        assert_eq!(call("hasPrefix", &["widgets", "wi"]), FunctionValue::Flag(true));
        assert_eq!(call("hasSuffix", &["widgets", "wi"]), FunctionValue::Flag(false));
    }

    #[test]
    fn path_functions() {
        assert_eq!(text("base", &["cmd/server/main.go"]), "main.go");
        assert_eq!(text("dir", &["cmd/server/main.go"]), "cmd/server");
        assert_eq!(text("dir", &["main.go"]), ".");
        assert_eq!(text("ext", &["main.go"]), ".go");
        assert_eq!(text("ext", &["Makefile"]), "");
        assert_eq!(text("join", &["cmd", "main.go"]), "cmd/main.go");
    }

    #[test]
    fn case_converters() {
        assert_eq!(text("kebab", &["DemoApp"]), "demo-app");
        assert_eq!(text("snake", &["demo-app"]), "demo_app");
        assert_eq!(text("camel", &["demo-app"]), "demoApp");
        assert_eq!(text("pascal", &["demo_app"]), "DemoApp");
    }

    #[test]
    fn default_only_replaces_empty() {
        assert_eq!(text("default", &["", "anon"]), "anon");
        assert_eq!(text("default", &["jane", "anon"]), "jane");
    }

    #[test]
    fn missing_arguments_read_as_empty() {
        assert_eq!(text("default", &[]), "");
        assert_eq!(text("replace", &["abc"]), "abc");
    }

    #[test]
    fn now_and_date_use_local_clock() {
        let now = text("now", &[]);
        assert_eq!(now.len(), "2026-01-01 00:00:00".len());
        let year = text("date", &["%Y"]);
        assert_eq!(year.len(), 4);
        assert!(year.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn env_reads_process_environment() {
        // PATH is set in every test environment we run in.
        assert!(!text("env", &["PATH"]).is_empty());
        assert_eq!(text("env", &["KITSMITH_SURELY_UNSET_VARIABLE"]), "");
    }

    #[test]
    fn takes_value_marks_filter_candidates() {
        let table = FunctionTable::standard();
        assert!(table.get("kebab").is_some_and(TemplateFunction::takes_value));
        assert!(!table.get("date").is_some_and(TemplateFunction::takes_value));
    }
}
