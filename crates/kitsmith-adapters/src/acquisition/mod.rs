//! Kit acquisition adapters.
//!
//! [`SourceAcquirer`] implements the `KitAcquirer` port by classifying the
//! source and delegating:
//!
//! | Source | Strategy |
//! |--------|----------|
//! | local path | recursive copy |
//! | remote reference | `git clone --depth 1`, history stripped |
//! | `http(s)://…/*.tar.gz` whose clone failed | download and extract |

mod archive;
mod git;

use std::path::Path;
use std::time::Duration;

use kitsmith_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, KitAcquirer},
    },
    domain::KitSource,
    error::KitsmithResult,
};
use tracing::{info, instrument, warn};

use crate::filesystem::LocalFilesystem;

pub use archive::{ArchiveFetcher, DEFAULT_TIMEOUT, extract_archive};
pub use git::GitCloner;

/// Composite acquirer for every supported source kind.
#[derive(Debug, Clone, Default)]
pub struct SourceAcquirer {
    filesystem: LocalFilesystem,
    git: GitCloner,
    archive: ArchiveFetcher,
}

impl SourceAcquirer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `timeout` for archive downloads.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            archive: ArchiveFetcher::with_timeout(timeout),
            ..Self::default()
        }
    }

    fn copy_local(&self, source: &Path, destination: &Path) -> KitsmithResult<()> {
        if !source.is_dir() {
            return Err(ApplicationError::AcquisitionFailed {
                reference: source.display().to_string(),
                reason: "not a directory".into(),
            }
            .into());
        }
        self.filesystem.copy_dir_all(source, destination)
    }

    fn fetch_remote(&self, source: &KitSource, reference: &str, destination: &Path) -> KitsmithResult<()> {
        let clone_error = match self.git.clone_into(reference, destination) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        self.discard(destination);

        if !source.is_archive_url() {
            return Err(ApplicationError::UnsupportedSource {
                reference: reference.to_string(),
                reason: clone_error,
            }
            .into());
        }

        warn!(
            reference = %reference,
            error = %clone_error,
            "Git clone failed, downloading as archive"
        );
        self.archive.fetch(reference, destination)
    }

    fn discard(&self, path: &Path) {
        if path.exists() {
            if let Err(e) = self.filesystem.remove_dir_all(path) {
                warn!(path = %path.display(), error = %e, "Failed to clean up partial acquisition");
            }
        }
    }
}

impl KitAcquirer for SourceAcquirer {
    #[instrument(skip_all, fields(source = %source, destination = %destination.display()))]
    fn acquire(&self, source: &KitSource, destination: &Path) -> KitsmithResult<()> {
        if destination.exists() {
            return Err(ApplicationError::AcquisitionFailed {
                reference: source.reference(),
                reason: format!("destination {} already exists", destination.display()),
            }
            .into());
        }

        let result = match source {
            KitSource::Local(path) => self.copy_local(path, destination),
            KitSource::Remote(reference) => self.fetch_remote(source, reference, destination),
        };

        match result {
            Ok(()) => {
                info!("Kit content acquired");
                Ok(())
            }
            Err(e) => {
                self.discard(destination);
                Err(e)
            }
        }
    }
}
