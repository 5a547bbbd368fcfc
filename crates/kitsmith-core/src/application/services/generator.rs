//! Tree Generator - materialises a template tree under a new target root.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, WalkEntry},
        services::resolver::PlaceholderResolver,
    },
    domain::content::is_substitutable,
    error::{KitsmithError, KitsmithResult},
};

/// What one generation wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files whose content went through the resolver.
    pub files_rendered: usize,
    /// Files copied byte for byte.
    pub files_copied: usize,
    pub directories_created: usize,
    /// Target paths whose expression phase failed and kept the literal output.
    pub degraded: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn files_written(&self) -> usize {
        self.files_rendered + self.files_copied
    }
}

/// Copies a template tree, substituting paths and text content.
pub struct TreeGenerator {
    filesystem: Arc<dyn Filesystem>,
}

impl TreeGenerator {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Generate `target_root` from `source_root`.
    ///
    /// `target_root` must not exist. Writes are not transactional: an I/O
    /// failure partway through leaves what was already written in place.
    #[instrument(
        skip_all,
        fields(source = %source_root.display(), target = %target_root.display())
    )]
    pub fn generate(
        &self,
        source_root: &Path,
        target_root: &Path,
        resolver: &PlaceholderResolver,
    ) -> KitsmithResult<GenerationReport> {
        if self.filesystem.exists(target_root) {
            return Err(ApplicationError::TargetExists {
                path: target_root.to_path_buf(),
            }
            .into());
        }

        let entries = self
            .filesystem
            .walk(source_root)
            .map_err(|e| generation_failed(source_root, e))?;

        self.filesystem
            .create_dir_all(target_root)
            .map_err(|e| generation_failed(target_root, e))?;

        let mut report = GenerationReport::default();
        for entry in &entries {
            let destination = target_root.join(resolve_relative(entry, resolver)?);

            if entry.is_dir {
                self.filesystem
                    .create_dir_all(&destination)
                    .map_err(|e| generation_failed(&destination, e))?;
                report.directories_created += 1;
            } else {
                self.write_entry(entry, &destination, resolver, &mut report)?;
            }
        }

        info!(
            rendered = report.files_rendered,
            copied = report.files_copied,
            directories = report.directories_created,
            "Generated project tree"
        );
        Ok(report)
    }

    fn write_entry(
        &self,
        entry: &WalkEntry,
        destination: &Path,
        resolver: &PlaceholderResolver,
        report: &mut GenerationReport,
    ) -> KitsmithResult<()> {
        if let Some(parent) = destination.parent() {
            self.filesystem
                .create_dir_all(parent)
                .map_err(|e| generation_failed(parent, e))?;
        }

        let bytes = self
            .filesystem
            .read_file(&entry.path)
            .map_err(|e| generation_failed(&entry.path, e))?;

        let content = if is_substitutable(&entry.relative) {
            match String::from_utf8(bytes) {
                Ok(text) => {
                    let resolved = resolver.resolve(&text);
                    if let Some(e) = resolved.warning {
                        warn!(
                            path = %destination.display(),
                            error = %e,
                            "Template evaluation failed; keeping literal substitution"
                        );
                        report.degraded.push(destination.to_path_buf());
                    }
                    report.files_rendered += 1;
                    resolved.text.into_bytes()
                }
                Err(e) => {
                    warn!(path = %entry.path.display(), "Template is not valid UTF-8; copying verbatim");
                    report.files_copied += 1;
                    e.into_bytes()
                }
            }
        } else {
            debug!(path = %entry.relative.display(), "Copying verbatim");
            report.files_copied += 1;
            bytes
        };

        self.filesystem
            .write_file(destination, &content)
            .map_err(|e| generation_failed(destination, e))?;

        if entry.executable {
            self.filesystem
                .set_permissions(destination, true)
                .map_err(|e| generation_failed(destination, e))?;
        }
        Ok(())
    }
}

/// Substitute a relative path and make sure it still stays below the target.
fn resolve_relative(entry: &WalkEntry, resolver: &PlaceholderResolver) -> KitsmithResult<PathBuf> {
    let resolved = PathBuf::from(resolver.process_path(&entry.relative.to_string_lossy()));

    let escapes = resolved
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || resolved.as_os_str().is_empty() {
        return Err(ApplicationError::GenerationFailed {
            path: entry.relative.clone(),
            reason: format!(
                "substituted path '{}' is not inside the project",
                resolved.display()
            ),
        }
        .into());
    }
    Ok(resolved)
}

fn generation_failed(path: &Path, error: KitsmithError) -> KitsmithError {
    ApplicationError::GenerationFailed {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        EvaluationError, ExpressionEvaluator, MockExpressionEvaluator, MockFilesystem,
    };
    use std::sync::Mutex;

    fn resolver_with(values: &[(&str, &str)]) -> PlaceholderResolver {
        let mut evaluator = MockExpressionEvaluator::new();
        evaluator
            .expect_evaluate()
            .returning(|content, _| Ok(content.to_string()));
        let evaluator: Arc<dyn ExpressionEvaluator> = Arc::new(evaluator);
        let mut resolver = PlaceholderResolver::new(evaluator);
        resolver.set_many(values.iter().copied());
        resolver
    }

    fn entry(relative: &str, is_dir: bool) -> WalkEntry {
        WalkEntry {
            path: PathBuf::from("/kit/templates").join(relative),
            relative: PathBuf::from(relative),
            is_dir,
            executable: false,
        }
    }

    type Writes = Arc<Mutex<Vec<(PathBuf, Vec<u8>)>>>;

    fn recording_fs(entries: Vec<WalkEntry>, files: Vec<(&'static str, Vec<u8>)>) -> (MockFilesystem, Writes) {
        let writes: Writes = Arc::default();
        let sink = Arc::clone(&writes);

        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_walk().return_once(move |_| Ok(entries));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_read_file().returning(move |path| {
            files
                .iter()
                .find(|(name, _)| path.ends_with(name))
                .map(|(_, bytes)| bytes.clone())
                .ok_or_else(|| KitsmithError::Internal {
                    message: format!("unexpected read of {}", path.display()),
                })
        });
        fs.expect_write_file().returning(move |path, content| {
            sink.lock().unwrap().push((path.to_path_buf(), content.to_vec()));
            Ok(())
        });
        (fs, writes)
    }

    #[test]
    fn refuses_existing_target_without_touching_it() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_walk().never();
        fs.expect_create_dir_all().never();
        fs.expect_write_file().never();

        let err = TreeGenerator::new(Arc::new(fs))
            .generate(Path::new("/kit/templates"), Path::new("/out/app"), &resolver_with(&[]))
            .unwrap_err();
        assert!(matches!(
            err,
            KitsmithError::Application(ApplicationError::TargetExists { .. })
        ));
    }

    #[test]
    fn substitutes_text_and_copies_binaries() {
        let png = vec![0x89, b'P', b'N', b'G', b'{', b'{'];
        let (fs, writes) = recording_fs(
            vec![entry("main.go", false), entry("logo.png", false)],
            vec![
                ("main.go", b"Hello {{project_name}}".to_vec()),
                ("logo.png", png.clone()),
            ],
        );

        let report = TreeGenerator::new(Arc::new(fs))
            .generate(
                Path::new("/kit/templates"),
                Path::new("/out/app"),
                &resolver_with(&[("project_name", "Widgets")]),
            )
            .unwrap();

        assert_eq!(report.files_rendered, 1);
        assert_eq!(report.files_copied, 1);
        let writes = writes.lock().unwrap();
        assert_eq!(writes[0], (PathBuf::from("/out/app/main.go"), b"Hello Widgets".to_vec()));
        assert_eq!(writes[1], (PathBuf::from("/out/app/logo.png"), png));
    }

    #[test]
    fn executable_templates_stay_executable() {
        let mut script = entry("bin/run.sh", false);
        script.executable = true;
        let (mut fs, _writes) = recording_fs(
            vec![script, entry("README.md", false)],
            vec![
                ("run.sh", b"#!/bin/sh\necho {{project_name}}\n".to_vec()),
                ("README.md", b"readme".to_vec()),
            ],
        );
        fs.expect_set_permissions()
            .withf(|path, executable| path == Path::new("/out/app/bin/run.sh") && *executable)
            .times(1)
            .returning(|_, _| Ok(()));

        TreeGenerator::new(Arc::new(fs))
            .generate(
                Path::new("/kit/templates"),
                Path::new("/out/app"),
                &resolver_with(&[("project_name", "app")]),
            )
            .unwrap();
    }

    #[test]
    fn directory_names_are_substituted() {
        let (fs, writes) = recording_fs(
            vec![
                entry("{{.ProjectName}}", true),
                entry("{{.ProjectName}}/README.md", false),
            ],
            vec![("README.md", b"# readme".to_vec())],
        );

        let report = TreeGenerator::new(Arc::new(fs))
            .generate(
                Path::new("/kit/templates"),
                Path::new("/out/app"),
                &resolver_with(&[("ProjectName", "demo-app")]),
            )
            .unwrap();

        assert_eq!(report.directories_created, 1);
        assert_eq!(
            writes.lock().unwrap()[0].0,
            PathBuf::from("/out/app/demo-app/README.md")
        );
    }

    #[test]
    fn degraded_files_are_reported_not_fatal() {
        let (fs, writes) = recording_fs(
            vec![entry("a.md", false), entry("b.md", false)],
            vec![
                ("a.md", b"{{ broken(".to_vec()),
                ("b.md", b"fine".to_vec()),
            ],
        );
        let mut evaluator = MockExpressionEvaluator::new();
        evaluator
            .expect_evaluate()
            .returning(|_, _| Err(EvaluationError::new("unexpected end")));
        let resolver = PlaceholderResolver::new(Arc::new(evaluator));

        let report = TreeGenerator::new(Arc::new(fs))
            .generate(Path::new("/kit/templates"), Path::new("/out/app"), &resolver)
            .unwrap();

        assert_eq!(report.degraded, vec![PathBuf::from("/out/app/a.md")]);
        assert_eq!(report.files_rendered, 2);
        assert_eq!(writes.lock().unwrap()[0].1, b"{{ broken(".to_vec());
    }

    #[test]
    fn invalid_utf8_text_is_copied_verbatim() {
        let bytes = vec![0xff, 0xfe, b'{', b'{'];
        let (fs, writes) = recording_fs(
            vec![entry("notes.txt", false)],
            vec![("notes.txt", bytes.clone())],
        );

        let report = TreeGenerator::new(Arc::new(fs))
            .generate(Path::new("/kit/templates"), Path::new("/out/app"), &resolver_with(&[]))
            .unwrap();

        assert_eq!(report.files_copied, 1);
        assert_eq!(writes.lock().unwrap()[0].1, bytes);
    }

    #[test]
    fn substituted_paths_cannot_escape_the_target() {
        let (fs, _writes) = recording_fs(
            vec![entry("{{dir}}/x.txt", false)],
            vec![("x.txt", b"x".to_vec())],
        );

        let err = TreeGenerator::new(Arc::new(fs))
            .generate(
                Path::new("/kit/templates"),
                Path::new("/out/app"),
                &resolver_with(&[("dir", "../../etc")]),
            )
            .unwrap_err();
        assert!(err.to_string().contains("not inside the project"));
    }

    #[test]
    fn write_failure_is_a_generation_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_walk()
            .returning(|_| Ok(vec![entry("main.go", false)]));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_read_file().returning(|_| Ok(b"package main".to_vec()));
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "permission denied".into(),
            }
            .into())
        });

        let err = TreeGenerator::new(Arc::new(fs))
            .generate(Path::new("/kit/templates"), Path::new("/out/app"), &resolver_with(&[]))
            .unwrap_err();
        assert!(matches!(
            err,
            KitsmithError::Application(ApplicationError::GenerationFailed { .. })
        ));
    }
}
