//! Kit Registry - the set of installed kits and their lifecycle.
//!
//! Layout on disk:
//!
//! ```text
//! <kits_root>/<name>/metadata.yaml
//! <kits_root>/<name>/templates/...
//! <kits_root>/<name>/scaffold.sh        (optional)
//! <cache_root>/<name>_backup_<secs>/    (only while an update runs)
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, KitAcquirer},
        services::scanner::KitScanner,
    },
    domain::{DomainError, Kit, KitMetadata, KitName, KitSource, METADATA_FILE, TEMPLATES_DIR},
    error::{KitsmithError, KitsmithResult},
};

/// Where the registry keeps its kits and transient backups.
///
/// Passed in explicitly; the registry never looks at the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub kits_root: PathBuf,
    pub cache_root: PathBuf,
}

impl RegistryConfig {
    pub fn new(kits_root: impl Into<PathBuf>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            kits_root: kits_root.into(),
            cache_root: cache_root.into(),
        }
    }

    /// Standard layout under one root: `<root>/kits` and `<root>/cache`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root.join("kits"), root.join("cache"))
    }
}

/// A kit together with its placeholder surface.
#[derive(Debug, Clone, PartialEq)]
pub struct KitInfo {
    pub kit: Kit,
    /// Every placeholder-like name found under `templates/`.
    pub placeholders: Vec<String>,
    pub template_files: usize,
}

/// Manages installed kits.
pub struct KitRegistry {
    config: RegistryConfig,
    filesystem: Arc<dyn Filesystem>,
    acquirer: Arc<dyn KitAcquirer>,
}

impl KitRegistry {
    pub fn new(
        config: RegistryConfig,
        filesystem: Arc<dyn Filesystem>,
        acquirer: Arc<dyn KitAcquirer>,
    ) -> Self {
        Self {
            config,
            filesystem,
            acquirer,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Where a kit with this name lives (whether or not it exists).
    pub fn kit_path(&self, name: &KitName) -> PathBuf {
        self.config.kits_root.join(name.as_str())
    }

    /// Install a kit from a source reference.
    ///
    /// On any failure after acquisition started, nothing is left at the
    /// kit's path.
    #[instrument(skip_all, fields(reference = %reference))]
    pub fn add(&self, reference: &str) -> KitsmithResult<Kit> {
        let name = KitName::from_source(reference)?;
        let path = self.kit_path(&name);

        if self.filesystem.exists(&path) {
            return Err(ApplicationError::KitAlreadyExists {
                name: name.to_string(),
                path,
            }
            .into());
        }

        let source = KitSource::parse(reference);
        info!(kit = %name, source = %source, "Adding kit");

        self.filesystem.create_dir_all(&self.config.kits_root)?;

        let installed = self
            .acquirer
            .acquire(&source, &path)
            .and_then(|()| self.validate(&path))
            .and_then(|metadata| self.record_origin(&path, metadata, &source));

        match installed {
            Ok(metadata) => {
                info!(kit = %name, "Kit added");
                Ok(self.kit_at(name, metadata, path))
            }
            Err(e) => {
                self.discard(&path);
                Err(e)
            }
        }
    }

    /// Directory of an installed kit, without reading its metadata, so a
    /// kit whose `metadata.yaml` no longer parses can still be found.
    pub fn locate(&self, name: &str) -> KitsmithResult<PathBuf> {
        self.existing_path(&KitName::new(name)?)
    }

    /// Delete an installed kit.
    #[instrument(skip_all, fields(kit = %name))]
    pub fn remove(&self, name: &str) -> KitsmithResult<()> {
        let name = KitName::new(name)?;
        let path = self.existing_path(&name)?;
        self.filesystem.remove_dir_all(&path)?;
        info!(kit = %name, "Kit removed");
        Ok(())
    }

    /// All kits whose metadata parses, sorted by directory name.
    ///
    /// Entries that fail to load are skipped with a warning.
    #[instrument(skip_all)]
    pub fn list(&self) -> KitsmithResult<Vec<Kit>> {
        if !self.filesystem.is_dir(&self.config.kits_root) {
            return Ok(Vec::new());
        }

        let mut kits = Vec::new();
        for dir in self.filesystem.list_dirs(&self.config.kits_root)? {
            let loaded = dir_name(&dir).and_then(|name| {
                let metadata = self.load_metadata(&dir)?;
                Ok((name, metadata))
            });
            match loaded {
                Ok((name, metadata)) => kits.push(self.kit_at(name, metadata, dir)),
                Err(e) => warn!(path = %dir.display(), error = %e, "Skipping unreadable kit"),
            }
        }

        debug!(count = kits.len(), "Listed kits");
        Ok(kits)
    }

    /// Load one installed kit.
    #[instrument(skip_all, fields(kit = %name))]
    pub fn get(&self, name: &str) -> KitsmithResult<Kit> {
        let name = KitName::new(name)?;
        let path = self.existing_path(&name)?;
        let metadata = self.load_metadata(&path)?;
        Ok(self.kit_at(name, metadata, path))
    }

    /// `get` plus the kit's placeholder surface.
    pub fn info(&self, name: &str) -> KitsmithResult<KitInfo> {
        let kit = self.get(name)?;
        let scan = KitScanner::new(Arc::clone(&self.filesystem)).scan(&kit.templates_dir())?;
        Ok(KitInfo {
            kit,
            placeholders: scan.placeholders,
            template_files: scan.template_files,
        })
    }

    /// Re-acquire a kit from its recorded origin.
    ///
    /// The current content is backed up first. If re-acquisition or
    /// validation fails, the backup is restored and the original error
    /// returned, so the kit ends up exactly as it was.
    #[instrument(skip_all, fields(kit = %name))]
    pub fn update(&self, name: &str) -> KitsmithResult<Kit> {
        let name = KitName::new(name)?;
        let path = self.existing_path(&name)?;
        let metadata = self.load_metadata(&path)?;

        let Some(origin) = metadata.origin() else {
            return Err(DomainError::MissingOrigin {
                name: name.to_string(),
            }
            .into());
        };
        let source = KitSource::parse(origin);

        let backup = self
            .config
            .cache_root
            .join(format!("{}_backup_{}", name, Utc::now().timestamp()));

        self.filesystem.create_dir_all(&self.config.cache_root)?;
        if let Err(e) = self.filesystem.copy_dir_all(&path, &backup) {
            self.discard(&backup);
            return Err(e);
        }
        debug!(backup = %backup.display(), "Backed up kit");

        let refreshed = self
            .filesystem
            .remove_dir_all(&path)
            .and_then(|()| self.acquirer.acquire(&source, &path))
            .and_then(|()| self.validate(&path))
            .and_then(|metadata| self.record_origin(&path, metadata, &source));

        match refreshed {
            Ok(metadata) => {
                self.discard(&backup);
                info!(kit = %name, version = %metadata.version, "Kit updated");
                Ok(self.kit_at(name, metadata, path))
            }
            Err(e) => {
                warn!(kit = %name, error = %e, "Update failed, restoring backup");
                self.restore(&path, &backup)?;
                Err(e)
            }
        }
    }

    /// Check a kit directory: `metadata.yaml` with a name and description,
    /// and a `templates/` directory.
    pub fn validate(&self, kit_path: &Path) -> KitsmithResult<KitMetadata> {
        let metadata = self.load_metadata(kit_path)?;
        metadata.validate(kit_path)?;

        if !self.filesystem.is_dir(&kit_path.join(TEMPLATES_DIR)) {
            return Err(invalid(kit_path, format!("missing {TEMPLATES_DIR}/ directory")));
        }

        Ok(metadata)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn existing_path(&self, name: &KitName) -> KitsmithResult<PathBuf> {
        let path = self.kit_path(name);
        if !self.filesystem.is_dir(&path) {
            return Err(ApplicationError::KitNotFound {
                name: name.to_string(),
            }
            .into());
        }
        Ok(path)
    }

    fn load_metadata(&self, kit_path: &Path) -> KitsmithResult<KitMetadata> {
        let file = kit_path.join(METADATA_FILE);
        if !self.filesystem.exists(&file) {
            return Err(invalid(kit_path, format!("missing {METADATA_FILE}")));
        }

        let text = self.filesystem.read_to_string(&file)?;
        KitMetadata::from_yaml(&text)
            .map_err(|e| invalid(kit_path, format!("cannot parse {METADATA_FILE}: {e}")))
    }

    /// Persist the source reference as the kit's origin when the metadata
    /// does not declare one. Local paths are stored absolute so `update`
    /// works from any directory.
    fn record_origin(
        &self,
        kit_path: &Path,
        mut metadata: KitMetadata,
        source: &KitSource,
    ) -> KitsmithResult<KitMetadata> {
        if metadata.origin().is_some() {
            return Ok(metadata);
        }

        let source = source.to_absolute().map_err(|e| KitsmithError::Internal {
            message: format!("cannot resolve {source}: {e}"),
        })?;
        metadata.repository = Some(source.reference());
        let yaml = metadata.to_yaml().map_err(|e| KitsmithError::Internal {
            message: format!("cannot serialise kit metadata: {e}"),
        })?;
        self.filesystem
            .write_file(&kit_path.join(METADATA_FILE), yaml.as_bytes())?;
        debug!(origin = %source, "Recorded kit origin");
        Ok(metadata)
    }

    fn restore(&self, path: &Path, backup: &Path) -> KitsmithResult<()> {
        let rollback_failed = |e: KitsmithError| -> KitsmithError {
            ApplicationError::RollbackFailed {
                path: backup.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        };

        if self.filesystem.exists(path) {
            self.filesystem.remove_dir_all(path).map_err(rollback_failed)?;
        }
        self.filesystem
            .copy_dir_all(backup, path)
            .map_err(rollback_failed)?;
        self.discard(backup);
        info!(path = %path.display(), "Kit restored from backup");
        Ok(())
    }

    /// Best-effort removal of a directory we created.
    fn discard(&self, path: &Path) {
        if !self.filesystem.exists(path) {
            return;
        }
        if let Err(e) = self.filesystem.remove_dir_all(path) {
            warn!(path = %path.display(), error = %e, "Failed to clean up directory");
        }
    }

    fn kit_at(&self, name: KitName, metadata: KitMetadata, path: PathBuf) -> Kit {
        let installed_at = self.filesystem.modified(&path);
        Kit::new(name, metadata, path).with_installed_at(installed_at)
    }
}

/// The registry key of a kit directory.
fn dir_name(dir: &Path) -> KitsmithResult<KitName> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    KitName::new(name).map_err(|_| invalid(dir, "directory name is not a valid kit name".into()))
}

fn invalid(kit_path: &Path, reason: String) -> KitsmithError {
    DomainError::InvalidKit {
        path: kit_path.to_path_buf(),
        reason,
    }
    .into()
}
