//! Kit-wide placeholder extraction.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{application::ports::Filesystem, domain::placeholder, error::KitsmithResult};

/// Placeholder surface of one template tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateScan {
    /// Normalised names in order of first appearance across the walk.
    pub placeholders: Vec<String>,
    /// Regular files under the root.
    pub template_files: usize,
}

/// Walks a `templates/` tree and collects every placeholder-like token.
pub struct KitScanner {
    filesystem: Arc<dyn Filesystem>,
}

impl KitScanner {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Scan every regular file under `templates_root`. File names count too,
    /// since paths are substituted. Files that are not UTF-8 are skipped.
    #[instrument(skip_all, fields(root = %templates_root.display()))]
    pub fn scan(&self, templates_root: &Path) -> KitsmithResult<TemplateScan> {
        let mut scan = TemplateScan::default();

        for entry in self.filesystem.walk(templates_root)? {
            placeholder::collect_names(&entry.relative.to_string_lossy(), &mut scan.placeholders);
            if entry.is_dir {
                continue;
            }
            scan.template_files += 1;

            match self.filesystem.read_to_string(&entry.path) {
                Ok(content) => placeholder::collect_names(&content, &mut scan.placeholders),
                Err(e) => debug!(path = %entry.path.display(), error = %e, "Skipping unreadable template"),
            }
        }

        debug!(
            files = scan.template_files,
            placeholders = scan.placeholders.len(),
            "Scanned template tree"
        );
        Ok(scan)
    }
}
