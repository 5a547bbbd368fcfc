//! Kit entity and its metadata document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, KitName};

/// Fixed name of the metadata document at a kit's root.
pub const METADATA_FILE: &str = "metadata.yaml";

/// Directory holding the substitutable template tree.
pub const TEMPLATES_DIR: &str = "templates";

/// Optional post-generation script at a kit's root.
pub const HOOK_SCRIPT: &str = "scaffold.sh";

/// Contents of `metadata.yaml`.
///
/// Every field is optional at the parsing level so that a document missing
/// `name` or `description` still parses and is then rejected by
/// [`KitMetadata::validate`] with a precise reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitMetadata {
    pub name: String,
    pub description: String,
    pub language: String,
    pub version: String,
    pub author: String,
    /// Where the kit came from. `None` for kits built by hand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub dependencies: Vec<String>,
    /// Declared required inputs.
    pub placeholders: Vec<String>,
    pub tags: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

impl KitMetadata {
    /// Parse a metadata document.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Serialise back to YAML (used when recording a kit's origin).
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Check the required fields.
    pub fn validate(&self, kit_path: &Path) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidKit {
                path: kit_path.to_path_buf(),
                reason: format!("{METADATA_FILE} is missing required field 'name'"),
            });
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::InvalidKit {
                path: kit_path.to_path_buf(),
                reason: format!("{METADATA_FILE} is missing required field 'description'"),
            });
        }
        Ok(())
    }

    /// The recorded origin, if it is non-empty.
    pub fn origin(&self) -> Option<&str> {
        self.repository
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// An installed kit: its registry key, its metadata and where it lives.
///
/// The key is the directory name under the registry root, derived from the
/// source reference at install time. It is what `get`, `remove`, `update`
/// and generation look kits up by, and may differ from `metadata.name`.
/// `local_path` and `installed_at` come from the registry layout and the
/// filesystem; neither is persisted in the metadata document.
#[derive(Debug, Clone, PartialEq)]
pub struct Kit {
    name: KitName,
    pub metadata: KitMetadata,
    pub local_path: PathBuf,
    pub installed_at: Option<SystemTime>,
}

impl Kit {
    pub fn new(name: KitName, metadata: KitMetadata, local_path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            metadata,
            local_path: local_path.into(),
            installed_at: None,
        }
    }

    pub fn with_installed_at(mut self, at: Option<SystemTime>) -> Self {
        self.installed_at = at;
        self
    }

    /// Registry key.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Human-facing name from the metadata document.
    pub fn display_name(&self) -> &str {
        &self.metadata.name
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.local_path.join(TEMPLATES_DIR)
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.local_path.join(METADATA_FILE)
    }

    pub fn hook_script(&self) -> PathBuf {
        self.local_path.join(HOOK_SCRIPT)
    }
}
