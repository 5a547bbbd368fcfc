//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kitsmith-adapters` crate provides implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

use crate::domain::KitSource;
use crate::error::KitsmithResult;

/// Environment variable carrying the generated project root to the hook.
pub const ENV_PROJECT_PATH: &str = "KITSMITH_PROJECT_PATH";
/// Environment variable carrying the kit's local path to the hook.
pub const ENV_KIT_PATH: &str = "KITSMITH_KIT_PATH";
/// Names read by scripts written for gocrafter kits.
pub const LEGACY_ENV_PROJECT_PATH: &str = "GOCRAFTER_PROJECT_PATH";
pub const LEGACY_ENV_KIT_PATH: &str = "GOCRAFTER_KIT_PATH";

/// One entry produced by [`Filesystem::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
    pub is_dir: bool,
    /// Regular file with an execute bit set (always `false` where the
    /// platform has none).
    pub executable: bool,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kitsmith_adapters::filesystem::LocalFilesystem` (production)
///
/// Paths are used as given; services always pass paths rooted in the
/// registry or the generation target.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KitsmithResult<()>;

    /// Write bytes to a file, replacing it.
    fn write_file(&self, path: &Path, content: &[u8]) -> KitsmithResult<()>;

    /// Read a whole file.
    fn read_file(&self, path: &Path) -> KitsmithResult<Vec<u8>>;

    /// Read a whole UTF-8 file.
    fn read_to_string(&self, path: &Path) -> KitsmithResult<String>;

    /// Mark a file executable (no-op where the platform has no such bit).
    fn set_permissions(&self, path: &Path, executable: bool) -> KitsmithResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> KitsmithResult<()>;

    /// Recursively copy `from` into `to` (created if needed).
    fn copy_dir_all(&self, from: &Path, to: &Path) -> KitsmithResult<()>;

    /// Immediate subdirectories of `path`, sorted by name.
    fn list_dirs(&self, path: &Path) -> KitsmithResult<Vec<PathBuf>>;

    /// Depth-first walk of `root`, excluding `root` itself, entries sorted by
    /// name within each directory.
    fn walk(&self, root: &Path) -> KitsmithResult<Vec<WalkEntry>>;

    /// Last modification time, if the platform reports one.
    fn modified(&self, path: &Path) -> Option<SystemTime>;
}

/// Port for bringing kit content onto local disk.
///
/// `destination` must not exist beforehand, and must not exist afterwards
/// if acquisition fails.
#[cfg_attr(test, mockall::automock)]
pub trait KitAcquirer: Send + Sync {
    fn acquire(&self, source: &KitSource, destination: &Path) -> KitsmithResult<()>;
}

/// Phase-2 evaluation failure. Never fatal: the resolver logs it and keeps
/// the phase-1 text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EvaluationError {
    pub message: String,
}

impl EvaluationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Port for the minimal expression language.
///
/// Implemented by:
/// - `kitsmith_adapters::renderer::TeraEvaluator`
#[cfg_attr(test, mockall::automock)]
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluate `content` with `values` as the context.
    fn evaluate(
        &self,
        content: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<String, EvaluationError>;
}

/// What to run after a project has been generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookInvocation {
    pub script: PathBuf,
    pub working_dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl HookInvocation {
    /// Standard invocation: run in the project, export both paths.
    ///
    /// The script runs from `project_path`, so callers pass absolute paths.
    pub fn new(script: impl Into<PathBuf>, project_path: &Path, kit_path: &Path) -> Self {
        let project = project_path.display().to_string();
        let kit = kit_path.display().to_string();
        Self {
            script: script.into(),
            working_dir: project_path.to_path_buf(),
            env: vec![
                (ENV_PROJECT_PATH.into(), project.clone()),
                (ENV_KIT_PATH.into(), kit.clone()),
                (LEGACY_ENV_PROJECT_PATH.into(), project),
                (LEGACY_ENV_KIT_PATH.into(), kit),
            ],
        }
    }
}

/// How the hook process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookOutcome {
    pub exit_code: Option<i32>,
}

impl HookOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Port for running the post-generation script.
///
/// A non-zero exit is an `Ok(HookOutcome)`; `Err` means the script could
/// not be started at all.
#[cfg_attr(test, mockall::automock)]
pub trait ScriptRunner: Send + Sync {
    fn run(&self, invocation: &HookInvocation) -> KitsmithResult<HookOutcome>;
}
