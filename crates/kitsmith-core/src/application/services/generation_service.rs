//! Generation Service - main application orchestrator.
//!
//! This service coordinates one project generation:
//! 1. Look the kit up in the registry
//! 2. Seed a resolver from the request, then from the kit
//! 3. Generate `<output>/<project>` from the kit's `templates/` tree
//! 4. Run the kit's `scaffold.sh`, if any (best effort)

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ExpressionEvaluator, Filesystem, HookInvocation, ScriptRunner},
        services::{
            generator::{GenerationReport, TreeGenerator},
            registry::KitRegistry,
            resolver::{PlaceholderResolver, SEEDED_NAMES},
            scanner::KitScanner,
        },
    },
    domain::{FunctionTable, GenerationRequest, Kit, OPTION_SKIP_HOOK},
    error::KitsmithResult,
};

/// How the post-generation script ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookReport {
    pub script: PathBuf,
    pub exit_code: Option<i32>,
    /// Set when the script could not be started at all.
    pub error: Option<String>,
}

impl HookReport {
    pub fn success(&self) -> bool {
        self.error.is_none() && self.exit_code == Some(0)
    }

    /// Human-readable warning for a failed hook.
    pub fn warning(&self) -> Option<String> {
        if self.success() {
            return None;
        }
        Some(match (&self.error, self.exit_code) {
            (Some(error), _) => format!("{} could not run: {error}", self.script.display()),
            (None, Some(code)) => format!("{} exited with status {code}", self.script.display()),
            (None, None) => format!("{} was terminated by a signal", self.script.display()),
        })
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub project_path: PathBuf,
    pub report: GenerationReport,
    /// `None` when the kit has no script or the hook was skipped.
    pub hook: Option<HookReport>,
}

impl GenerationOutcome {
    /// Non-fatal problems worth showing to the user.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .report
            .degraded
            .iter()
            .map(|p| format!("{}: template expressions left unevaluated", p.display()))
            .collect();
        warnings.extend(self.hook.as_ref().and_then(HookReport::warning));
        warnings
    }
}

/// Generates projects from installed kits.
pub struct GenerationService {
    registry: KitRegistry,
    filesystem: Arc<dyn Filesystem>,
    evaluator: Arc<dyn ExpressionEvaluator>,
    runner: Arc<dyn ScriptRunner>,
}

impl GenerationService {
    pub fn new(
        registry: KitRegistry,
        filesystem: Arc<dyn Filesystem>,
        evaluator: Arc<dyn ExpressionEvaluator>,
        runner: Arc<dyn ScriptRunner>,
    ) -> Self {
        Self {
            registry,
            filesystem,
            evaluator,
            runner,
        }
    }

    pub fn registry(&self) -> &KitRegistry {
        &self.registry
    }

    /// Generate a project.
    ///
    /// Fails without side effects if the kit is missing or the project
    /// directory already exists. A failing hook is reported in the outcome,
    /// never as an error.
    #[instrument(
        skip_all,
        fields(
            kit = %request.kit_name(),
            project = %request.project_name(),
            output_path = %request.output_path().display()
        )
    )]
    pub fn generate(&self, request: &GenerationRequest) -> KitsmithResult<GenerationOutcome> {
        let kit = self.registry.get(request.kit_name())?;
        let project_path = request.project_path();

        if self.filesystem.exists(&project_path) {
            return Err(ApplicationError::TargetExists { path: project_path }.into());
        }

        let mut resolver = PlaceholderResolver::new(Arc::clone(&self.evaluator));
        resolver.seed_from_request(request);
        resolver.seed_from_kit(&kit.metadata);

        let report = TreeGenerator::new(Arc::clone(&self.filesystem)).generate(
            &kit.templates_dir(),
            &project_path,
            &resolver,
        )?;

        let hook = if request.flag(OPTION_SKIP_HOOK) {
            info!("Skipping post-generation script");
            None
        } else {
            self.run_hook(&kit, &project_path)
        };

        info!(path = %project_path.display(), "Project generated");
        Ok(GenerationOutcome {
            project_path,
            report,
            hook,
        })
    }

    /// Placeholders a kit uses that are neither in `provided` nor filled in
    /// by the engine itself, in order of first appearance.
    ///
    /// Combines the names found under `templates/` with the kit's declared
    /// `placeholders`. Expression-language function names are ignored.
    pub fn missing_placeholders(
        &self,
        kit_name: &str,
        provided: &[String],
    ) -> KitsmithResult<Vec<String>> {
        let kit = self.registry.get(kit_name)?;
        let scan = KitScanner::new(Arc::clone(&self.filesystem)).scan(&kit.templates_dir())?;

        let functions = FunctionTable::standard();
        let mut seen = HashSet::new();
        let missing = scan
            .placeholders
            .into_iter()
            .chain(kit.metadata.placeholders.iter().cloned())
            .filter(|name| {
                !SEEDED_NAMES.contains(&name.as_str())
                    && functions.get(name).is_none()
                    && !provided.contains(name)
            })
            .filter(|name| seen.insert(name.clone()))
            .collect();
        Ok(missing)
    }

    fn run_hook(&self, kit: &Kit, project_path: &Path) -> Option<HookReport> {
        let script = kit.hook_script();
        if !self.filesystem.exists(&script) {
            return None;
        }

        let mut report = HookReport {
            script: script.clone(),
            exit_code: None,
            error: None,
        };

        let outcome = self
            .filesystem
            .set_permissions(&script, true)
            .and_then(|()| hook_invocation(&script, project_path, &kit.local_path))
            .and_then(|invocation| self.runner.run(&invocation));

        match outcome {
            Ok(outcome) => {
                report.exit_code = outcome.exit_code;
                if outcome.success() {
                    info!(script = %script.display(), "Post-generation script finished");
                } else {
                    warn!(
                        script = %script.display(),
                        exit_code = ?outcome.exit_code,
                        "Post-generation script failed"
                    );
                }
            }
            Err(e) => {
                warn!(script = %script.display(), error = %e, "Post-generation script could not run");
                report.error = Some(e.to_string());
            }
        }
        Some(report)
    }
}

/// The script runs from inside the project, so every path it is handed
/// must not depend on the caller's working directory.
fn hook_invocation(
    script: &Path,
    project_path: &Path,
    kit_path: &Path,
) -> KitsmithResult<HookInvocation> {
    let absolute = |path: &Path| {
        std::path::absolute(path).map_err(|e| ApplicationError::HookFailed {
            script: script.to_path_buf(),
            reason: format!("cannot resolve {}: {e}", path.display()),
        })
    };
    Ok(HookInvocation::new(
        absolute(script)?,
        &absolute(project_path)?,
        &absolute(kit_path)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        ENV_KIT_PATH, ENV_PROJECT_PATH, HookOutcome, MockExpressionEvaluator, MockFilesystem,
        MockKitAcquirer, MockScriptRunner, WalkEntry,
    };
    use crate::application::services::registry::RegistryConfig;
    use crate::error::KitsmithError;

    const META: &str = "name: sample\ndescription: Sample kit\nplaceholders: [port, author]\n";

    /// Filesystem with one installed kit `sample` holding `templates/main.go`,
    /// an optional hook, and nothing under `/out`.
    fn kit_fs(with_hook: bool) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir()
            .returning(|p| p.starts_with("/reg/kits/sample"));
        fs.expect_exists().returning(move |p| {
            if p.starts_with("/out") {
                false
            } else if p.ends_with("scaffold.sh") {
                with_hook
            } else {
                p.starts_with("/reg/kits/sample")
            }
        });
        fs.expect_read_to_string().returning(|p| {
            if p.ends_with("metadata.yaml") {
                Ok(META.into())
            } else {
                Ok("package {{package_name}} // {{ port }} {{ db | upper }} {{ now() }}".into())
            }
        });
        fs.expect_read_file()
            .returning(|_| Ok(b"Hello {{project_name}}".to_vec()));
        fs.expect_walk().returning(|root| {
            Ok(vec![WalkEntry {
                path: root.join("main.go"),
                relative: PathBuf::from("main.go"),
                is_dir: false,
                executable: false,
            }])
        });
        fs.expect_modified().returning(|_| None);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_set_permissions().returning(|_, _| Ok(()));
        fs
    }

    fn service(fs: MockFilesystem, runner: MockScriptRunner) -> GenerationService {
        let fs: Arc<dyn Filesystem> = Arc::new(fs);
        let registry = KitRegistry::new(
            RegistryConfig::under("/reg"),
            Arc::clone(&fs),
            Arc::new(MockKitAcquirer::new()),
        );
        let mut evaluator = MockExpressionEvaluator::new();
        evaluator
            .expect_evaluate()
            .returning(|content, _| Ok(content.to_string()));
        GenerationService::new(registry, fs, Arc::new(evaluator), Arc::new(runner))
    }

    fn request() -> GenerationRequest {
        GenerationRequest::builder("sample", "widgets")
            .output_path("/out")
            .build()
            .unwrap()
    }

    #[test]
    fn generates_without_hook_when_kit_has_none() {
        let mut runner = MockScriptRunner::new();
        runner.expect_run().never();

        let outcome = service(kit_fs(false), runner).generate(&request()).unwrap();
        assert_eq!(outcome.project_path, PathBuf::from("/out/widgets"));
        assert_eq!(outcome.report.files_rendered, 1);
        assert!(outcome.hook.is_none());
        assert!(outcome.warnings().is_empty());
    }

    #[test]
    fn hook_runs_in_project_with_paths_exported() {
        let mut runner = MockScriptRunner::new();
        runner
            .expect_run()
            .withf(|inv| {
                inv.working_dir == Path::new("/out/widgets")
                    && inv.script == Path::new("/reg/kits/sample/scaffold.sh")
                    && inv.env.contains(&(ENV_PROJECT_PATH.into(), "/out/widgets".into()))
                    && inv.env.contains(&(ENV_KIT_PATH.into(), "/reg/kits/sample".into()))
            })
            .times(1)
            .returning(|_| Ok(HookOutcome { exit_code: Some(0) }));

        let outcome = service(kit_fs(true), runner).generate(&request()).unwrap();
        assert!(outcome.hook.is_some_and(|h| h.success()));
    }

    #[test]
    fn hook_paths_are_absolute_for_relative_roots() {
        let cwd = std::env::current_dir().unwrap();
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|p| p.starts_with("reg/kits/sample"));
        fs.expect_exists().returning(|p| p.starts_with("reg/kits/sample"));
        fs.expect_read_to_string().returning(|_| Ok(META.into()));
        fs.expect_read_file().returning(|_| Ok(b"x".to_vec()));
        fs.expect_walk().returning(|_| Ok(Vec::new()));
        fs.expect_modified().returning(|_| None);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_set_permissions().returning(|_, _| Ok(()));
        let fs: Arc<dyn Filesystem> = Arc::new(fs);

        let project = cwd.join("out/widgets");
        let kit = cwd.join("reg/kits/sample");
        let expected_project = project.display().to_string();
        let expected_kit = kit.display().to_string();
        let mut runner = MockScriptRunner::new();
        runner
            .expect_run()
            .withf(move |inv| {
                inv.working_dir == project
                    && inv.script == kit.join("scaffold.sh")
                    && inv.env.contains(&(ENV_PROJECT_PATH.into(), expected_project.clone()))
                    && inv.env.contains(&(ENV_KIT_PATH.into(), expected_kit.clone()))
            })
            .times(1)
            .returning(|_| Ok(HookOutcome { exit_code: Some(0) }));

        let registry = KitRegistry::new(
            RegistryConfig::under("reg"),
            Arc::clone(&fs),
            Arc::new(MockKitAcquirer::new()),
        );
        let mut evaluator = MockExpressionEvaluator::new();
        evaluator.expect_evaluate().never();
        let service = GenerationService::new(registry, fs, Arc::new(evaluator), Arc::new(runner));

        let request = GenerationRequest::builder("sample", "widgets")
            .output_path("out")
            .build()
            .unwrap();
        let outcome = service.generate(&request).unwrap();
        assert!(outcome.hook.is_some_and(|h| h.success()));
    }

    #[test]
    fn failing_hook_is_a_warning() {
        let mut runner = MockScriptRunner::new();
        runner
            .expect_run()
            .returning(|_| Ok(HookOutcome { exit_code: Some(3) }));

        let outcome = service(kit_fs(true), runner).generate(&request()).unwrap();
        let warnings = outcome.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("status 3"));
    }

    #[test]
    fn hook_that_cannot_start_is_a_warning() {
        let mut runner = MockScriptRunner::new();
        runner.expect_run().returning(|inv| {
            Err(ApplicationError::HookFailed {
                script: inv.script.clone(),
                reason: "bash: not found".into(),
            }
            .into())
        });

        let outcome = service(kit_fs(true), runner).generate(&request()).unwrap();
        let hook = outcome.hook.unwrap();
        assert!(!hook.success());
        assert!(hook.error.unwrap().contains("bash: not found"));
    }

    #[test]
    fn skip_hook_option_suppresses_the_script() {
        let mut runner = MockScriptRunner::new();
        runner.expect_run().never();
        let request = GenerationRequest::builder("sample", "widgets")
            .output_path("/out")
            .option(OPTION_SKIP_HOOK, "true")
            .build()
            .unwrap();

        let outcome = service(kit_fs(true), runner).generate(&request).unwrap();
        assert!(outcome.hook.is_none());
    }

    #[test]
    fn unknown_kit_is_not_found() {
        let request = GenerationRequest::builder("ghost", "widgets").build().unwrap();
        let err = service(kit_fs(false), MockScriptRunner::new())
            .generate(&request)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn existing_project_directory_is_refused() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string().returning(|_| Ok(META.into()));
        fs.expect_modified().returning(|_| None);
        fs.expect_walk().never();
        fs.expect_write_file().never();

        let err = service(fs, MockScriptRunner::new())
            .generate(&request())
            .unwrap_err();
        assert!(matches!(
            err,
            KitsmithError::Application(ApplicationError::TargetExists { .. })
        ));
    }

    #[test]
    fn missing_placeholders_excludes_seeded_provided_and_functions() {
        let service = service(kit_fs(false), MockScriptRunner::new());

        let missing = service.missing_placeholders("sample", &[]).unwrap();
        assert_eq!(missing, vec!["port", "db"]);

        let missing = service
            .missing_placeholders("sample", &["port".to_string()])
            .unwrap();
        assert_eq!(missing, vec!["db"]);
    }
}
