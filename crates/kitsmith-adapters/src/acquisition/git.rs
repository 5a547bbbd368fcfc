//! Git clone through the `git` executable.

use std::path::Path;
use std::process::Command;

use tracing::{debug, instrument};

/// Shallow-clones repositories and strips their history.
#[derive(Debug, Clone, Default)]
pub struct GitCloner;

impl GitCloner {
    pub fn new() -> Self {
        Self
    }

    /// Clone `url` into `destination` and remove the `.git` directory.
    ///
    /// Errors carry git's stderr so callers can tell an unreachable host
    /// from a repository that does not exist.
    #[instrument(skip_all, fields(url = %url, destination = %destination.display()))]
    pub fn clone_into(&self, url: &str, destination: &Path) -> Result<(), String> {
        let output = Command::new("git")
            .args(["clone", "--depth", "1", "--quiet"])
            .arg(url)
            .arg(destination)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| format!("cannot run git: {e}"))?;

        if !output.status.success() {
            return Err(format!(
                "git clone failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let git_dir = destination.join(".git");
        if git_dir.exists() {
            std::fs::remove_dir_all(&git_dir)
                .map_err(|e| format!("cannot remove {}: {e}", git_dir.display()))?;
        }

        debug!("Repository cloned");
        Ok(())
    }
}
