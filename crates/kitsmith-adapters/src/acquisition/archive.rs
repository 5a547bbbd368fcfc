//! `.tar.gz` download and extraction.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use kitsmith_core::{application::ApplicationError, error::KitsmithResult};
use reqwest::blocking::Client;
use tar::{Archive, EntryType};
use tracing::{debug, info, instrument, warn};

/// Default request timeout for archive downloads.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Downloads kit archives over HTTP(S).
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    timeout: Duration,
}

impl ArchiveFetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Download `url` and extract it into `destination`.
    #[instrument(skip_all, fields(url = %url, destination = %destination.display()))]
    pub fn fetch(&self, url: &str, destination: &Path) -> KitsmithResult<()> {
        let failed = |reason: String| ApplicationError::AcquisitionFailed {
            reference: url.to_string(),
            reason,
        };

        let client = Client::builder()
            .user_agent(concat!("kitsmith/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .map_err(|e| failed(format!("cannot build HTTP client: {e}")))?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| failed(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())).into());
        }

        let entries = extract_archive(response, destination).map_err(failed)?;
        info!(entries, "Archive extracted");
        Ok(())
    }
}

impl Default for ArchiveFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a gzip-compressed tarball into `destination`, which is created.
///
/// Entries whose path is absolute or contains `..` abort the extraction.
/// Symbolic and hard links are skipped. When everything sits under one
/// top-level directory (`<repo>-<ref>/` in forge tarballs), its contents
/// are moved up into `destination`. On any error `destination` is removed
/// before returning. Returns the number of entries written.
pub fn extract_archive<R: Read>(reader: R, destination: &Path) -> Result<usize, String> {
    fs::create_dir_all(destination)
        .map_err(|e| format!("cannot create {}: {e}", destination.display()))?;

    let mut archive = Archive::new(GzDecoder::new(reader));
    let result = unpack_entries(&mut archive, destination).and_then(|written| {
        flatten_single_root(destination)?;
        Ok(written)
    });

    if result.is_err() {
        if let Err(e) = fs::remove_dir_all(destination) {
            warn!(path = %destination.display(), error = %e, "Failed to clean up partial extraction");
        }
    }
    result
}

fn unpack_entries<R: Read>(archive: &mut Archive<R>, destination: &Path) -> Result<usize, String> {
    let mut written = 0;

    let entries = archive
        .entries()
        .map_err(|e| format!("cannot read archive: {e}"))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| format!("corrupt archive entry: {e}"))?;
        let raw_path = entry
            .path()
            .map_err(|e| format!("invalid entry path: {e}"))?
            .into_owned();

        let Some(relative) = contained_path(&raw_path)? else {
            continue;
        };
        let target = destination.join(&relative);

        match entry.header().entry_type() {
            EntryType::Directory => {
                fs::create_dir_all(&target)
                    .map_err(|e| format!("cannot create {}: {e}", target.display()))?;
            }
            EntryType::Regular | EntryType::Continuous => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|e| format!("cannot create {}: {e}", parent.display()))?;
                }
                let mut file = File::create(&target)
                    .map_err(|e| format!("cannot create {}: {e}", target.display()))?;
                io::copy(&mut entry, &mut file)
                    .map_err(|e| format!("cannot write {}: {e}", target.display()))?;
                apply_mode(&target, entry.header().mode().ok());
            }
            EntryType::Symlink | EntryType::Link => {
                warn!(path = %raw_path.display(), "Skipping link entry in archive");
                continue;
            }
            other => {
                debug!(path = %raw_path.display(), kind = ?other, "Skipping archive entry");
                continue;
            }
        }
        written += 1;
    }

    Ok(written)
}

/// Replace `destination/<only-dir>/*` with `destination/*`.
fn flatten_single_root(destination: &Path) -> Result<(), String> {
    let read_dir = |dir: &Path| -> Result<Vec<fs::DirEntry>, String> {
        fs::read_dir(dir)
            .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
            .map_err(|e| format!("cannot read {}: {e}", dir.display()))
    };

    let top = read_dir(destination)?;
    let [only] = top.as_slice() else {
        return Ok(());
    };
    let inner = only.path();
    if !inner.is_dir() {
        return Ok(());
    }

    // Moved aside first so a child with the same name as the wrapper fits.
    let staged = destination.join(".kitsmith-unwrap");
    let rename = |from: &Path, to: &Path| {
        fs::rename(from, to).map_err(|e| format!("cannot move {}: {e}", from.display()))
    };
    rename(&inner, &staged)?;
    for child in read_dir(&staged)? {
        rename(&child.path(), &destination.join(child.file_name()))?;
    }
    fs::remove_dir(&staged).map_err(|e| format!("cannot remove {}: {e}", staged.display()))?;

    debug!(wrapper = %inner.display(), "Flattened single top-level archive directory");
    Ok(())
}

/// The entry path with `.` segments dropped, or an error if it could leave
/// the destination. `Ok(None)` for the archive root itself.
fn contained_path(path: &Path) -> Result<Option<PathBuf>, String> {
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(format!(
                    "archive entry '{}' escapes the destination",
                    path.display()
                ));
            }
        }
    }
    Ok((!relative.as_os_str().is_empty()).then_some(relative))
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777)) {
            debug!(path = %path.display(), error = %e, "Could not apply archive file mode");
        }
    }
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) {}
