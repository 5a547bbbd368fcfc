//! Value objects: kit names and kit source references.

use std::fmt;
use std::path::PathBuf;

use crate::domain::DomainError;

// ============================================================================
// KitName
// ============================================================================

/// The registry key of a kit: a single, non-empty path segment.
///
/// Used to compute `<root>/kits/<name>`, so anything that could escape that
/// directory (`/`, `\`, `.`, `..`) is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KitName(String);

impl KitName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        let reason = if trimmed.is_empty() {
            Some("name cannot be empty")
        } else if trimmed == "." || trimmed == ".." {
            Some("name cannot be '.' or '..'")
        } else if trimmed.contains('/') || trimmed.contains('\\') {
            Some("name cannot contain path separators")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidKitName {
                name,
                reason: reason.into(),
            }),
            None => Ok(Self(trimmed.to_string())),
        }
    }

    /// Derive a kit name from a source reference.
    ///
    /// ## Rules
    ///
    /// | Reference | Name |
    /// |-----------|------|
    /// | `https://github.com/acme/go-api.git` | `go-api` |
    /// | `git@github.com:acme/go-api.git` | `go-api` |
    /// | `https://example.com/kits/web.tar.gz` | `web` |
    /// | `./kits/sample/` | `sample` |
    pub fn from_source(reference: &str) -> Result<Self, DomainError> {
        let extraction_failed = || DomainError::NameExtraction {
            reference: reference.to_string(),
        };

        let segment = reference
            .trim()
            .split(['/', '\\', ':'])
            .rev()
            .find(|s| !s.is_empty())
            .ok_or_else(extraction_failed)?;

        let segment = segment.strip_suffix(".tar.gz").unwrap_or(segment);
        let segment = segment.strip_suffix(".git").unwrap_or(segment);

        Self::new(segment).map_err(|_| extraction_failed())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KitName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// KitSource
// ============================================================================

/// Where kit content comes from.
///
/// Classification is purely syntactic:
/// - **Local**: absolute paths, `./` or `../` prefixes, Windows drive paths
/// - **Remote**: everything else; cloned with git first, then (for
///   `http(s)://…/*.tar.gz`) downloaded as an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitSource {
    Local(PathBuf),
    Remote(String),
}

impl KitSource {
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        if is_local_path(reference) {
            Self::Local(PathBuf::from(reference))
        } else {
            Self::Remote(reference.to_string())
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// `true` for `http(s)` URLs ending in `.tar.gz`.
    pub fn is_archive_url(&self) -> bool {
        match self {
            Self::Remote(url) => {
                let lower = url.to_ascii_lowercase();
                (lower.starts_with("http://") || lower.starts_with("https://"))
                    && lower.ends_with(".tar.gz")
            }
            Self::Local(_) => false,
        }
    }

    /// The reference as the user would write it (and as recorded in
    /// `repository`).
    pub fn reference(&self) -> String {
        match self {
            Self::Local(path) => path.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }

    /// A local path resolved against the current directory; remote
    /// references come back unchanged.
    pub fn to_absolute(&self) -> std::io::Result<Self> {
        match self {
            Self::Local(path) => Ok(Self::Local(std::path::absolute(path)?)),
            Self::Remote(_) => Ok(self.clone()),
        }
    }
}

impl fmt::Display for KitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}

fn is_local_path(reference: &str) -> bool {
    if reference.starts_with('/')
        || reference.starts_with("./")
        || reference.starts_with("../")
        || reference.starts_with(".\\")
        || reference.starts_with("..\\")
    {
        return true;
    }

    // C:\kits\x or C:/kits/x
    let bytes = reference.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}
