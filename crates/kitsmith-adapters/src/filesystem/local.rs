//! Local filesystem adapter using std::fs and walkdir.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use kitsmith_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, WalkEntry},
    },
    error::{KitsmithError, KitsmithResult},
};
use tracing::debug;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> KitsmithResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> KitsmithResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> KitsmithResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn read_to_string(&self, path: &Path) -> KitsmithResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> KitsmithResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if executable {
                let metadata =
                    std::fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
                let mut perms = metadata.permissions();
                let mode = perms.mode();
                perms.set_mode(mode | 0o111);
                std::fs::set_permissions(path, perms)
                    .map_err(|e| map_io_error(path, e, "set permissions"))?;
            }
        }
        #[cfg(windows)]
        {
            // Windows doesn't have executable bit in the same way
            let _ = (path, executable);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_dir_all(&self, path: &Path) -> KitsmithResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> KitsmithResult<()> {
        self.create_dir_all(to)?;

        for entry in self.walk(from)? {
            let target = to.join(&entry.relative);
            if entry.is_dir {
                self.create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    self.create_dir_all(parent)?;
                }
                // `fs::copy` keeps permission bits, so scripts stay executable.
                std::fs::copy(&entry.path, &target)
                    .map_err(|e| map_io_error(&entry.path, e, "copy file"))?;
            }
        }
        Ok(())
    }

    fn list_dirs(&self, path: &Path) -> KitsmithResult<Vec<PathBuf>> {
        let entries =
            std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "read directory"))?;
            let entry_path = entry.path();
            if entry_path.is_dir() {
                dirs.push(entry_path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn walk(&self, root: &Path) -> KitsmithResult<Vec<WalkEntry>> {
        let mut entries = Vec::new();

        for walk_entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let walk_entry = walk_entry.map_err(|e| walk_error(root, e))?;
            let file_type = walk_entry.file_type();

            if !file_type.is_dir() && !file_type.is_file() {
                debug!(path = %walk_entry.path().display(), "Skipping special file");
                continue;
            }

            let relative = walk_entry
                .path()
                .strip_prefix(root)
                .map_err(|_| KitsmithError::Internal {
                    message: format!(
                        "walk entry '{}' is outside '{}'",
                        walk_entry.path().display(),
                        root.display()
                    ),
                })?
                .to_path_buf();

            let executable = file_type.is_file() && is_executable(&walk_entry);
            entries.push(WalkEntry {
                path: walk_entry.path().to_path_buf(),
                relative,
                is_dir: file_type.is_dir(),
                executable,
            });
        }

        Ok(entries)
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

#[cfg(unix)]
fn is_executable(entry: &walkdir::DirEntry) -> bool {
    use std::os::unix::fs::PermissionsExt;
    entry
        .metadata()
        .is_ok_and(|m| m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_entry: &walkdir::DirEntry) -> bool {
    false
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KitsmithError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

fn walk_error(root: &Path, e: walkdir::Error) -> KitsmithError {
    let path = e.path().unwrap_or(root).to_path_buf();
    ApplicationError::FilesystemError {
        path,
        reason: format!("Failed to walk directory: {e}"),
    }
    .into()
}
