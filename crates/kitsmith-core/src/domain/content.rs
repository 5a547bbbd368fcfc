//! Which template files get placeholder substitution.
//!
//! Files that match none of the rules (images, archives, fonts, compiled
//! artefacts) are copied byte for byte.

use std::path::Path;

/// Extensions (lowercase, without the dot) treated as text.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "go", "mod", "sum", "yaml", "yml", "json", "toml", "md", "txt", "env", "dockerfile",
    "makefile", "sh", "js", "ts", "jsx", "tsx", "css", "scss", "html", "py", "rs", "java", "kt",
    "cpp", "c", "h",
];

/// Conventional file names matched as case-insensitive substrings of the
/// base name.
pub const CONVENTIONAL_NAMES: &[&str] = &[
    "makefile",
    "dockerfile",
    "readme",
    "license",
    "gitignore",
    "changelog",
    "contributing",
    "notice",
    "authors",
];

/// Dedicated template-file suffix.
pub const TEMPLATE_SUFFIX: &str = ".tpl";

/// Decide whether a file's content should go through the resolver.
pub fn is_substitutable(path: &Path) -> bool {
    let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
        return false;
    };

    if file_name.ends_with(TEMPLATE_SUFFIX) {
        return true;
    }

    // Text after the last dot, so dotfiles like `.env` have an extension too.
    let extension_matches = file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| TEXT_EXTENSIONS.contains(&ext));

    extension_matches || CONVENTIONAL_NAMES.iter().any(|n| file_name.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_and_config_files_are_substitutable() {
        for name in ["main.go", "go.mod", "Cargo.toml", "app.PY", "src/lib.rs", ".env"] {
            assert!(is_substitutable(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn conventional_names_match_without_extension() {
        for name in ["Makefile", "Dockerfile", "README", "LICENSE-MIT", ".gitignore", "AUTHORS"] {
            assert!(is_substitutable(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn template_suffix_matches() {
        assert!(is_substitutable(Path::new("config.ini.tpl")));
    }

    #[test]
    fn binary_assets_are_copied_verbatim() {
        for name in ["logo.png", "font.woff2", "archive.tar.gz", "app.exe", "data.bin"] {
            assert!(!is_substitutable(Path::new(name)), "{name}");
        }
    }
}
