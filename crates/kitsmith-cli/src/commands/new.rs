//! Implementation of the `kitsmith new` command.
//!
//! Responsibility: translate CLI arguments into a `GenerationRequest`, call
//! the core generation service, and display results. No business logic
//! lives here.

use tracing::{debug, info, instrument};

use kitsmith_core::{
    application::{ApplicationError, GenerationOutcome},
    domain::{GenerationRequest, OPTION_SKIP_HOOK},
    error::KitsmithError,
};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `kitsmith new` command.
///
/// Dispatch sequence:
/// 1. Check every placeholder the kit uses has a value
/// 2. Build and validate the request
/// 3. Early-exit if `--dry-run`
/// 4. Generate via `GenerationService`
/// 5. Report warnings and next steps
#[instrument(skip_all, fields(project = %args.name, kit = %args.kit))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::generation_service(&config, global.quiet);

    // 1. Missing placeholders (also reports an unknown kit)
    let provided: Vec<String> = args.set.iter().map(|(name, _)| name.clone()).collect();
    let missing = service.missing_placeholders(&args.kit, &provided)?;
    if !missing.is_empty() {
        return Err(CliError::MissingPlaceholders {
            kit: args.kit,
            names: missing,
        });
    }

    // 2. Request
    let run_hook = config.generation.run_hooks && !args.no_hook;
    let request = build_request(&args, run_hook)?;
    let project_path = request.project_path();
    debug!(path = %project_path.display(), run_hook, "Request built");

    // 3. Dry run: describe but do not write.
    if args.dry_run {
        if project_path.exists() {
            return Err(KitsmithError::from(ApplicationError::TargetExists {
                path: project_path,
            })
            .into());
        }
        let kit_info = service.registry().info(&args.kit)?;
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            request.project_name(),
            project_path.display(),
        ))?;
        output.field("Kit", &format!("{} {}", kit_info.kit.name(), kit_info.kit.metadata.version))?;
        output.field("Template files", &kit_info.template_files.to_string())?;
        output.field(
            "Hook",
            if run_hook && kit_info.kit.hook_script().exists() {
                "would run scaffold.sh"
            } else {
                "none"
            },
        )?;
        return Ok(());
    }

    // 4. Generate
    info!(path = %project_path.display(), "Generation started");
    let spinner = output.spinner(&format!("Generating '{}'...", request.project_name()));
    let result = service.generate(&request);
    spinner.finish_and_clear();
    let outcome = result?;
    info!(files = outcome.report.files_written(), "Generation completed");

    // 5. Report
    report(&outcome, request.project_name(), &output)
}

fn build_request(args: &NewArgs, run_hook: bool) -> CliResult<GenerationRequest> {
    let mut builder = GenerationRequest::builder(&args.kit, &args.name).output_path(&args.output);
    for (name, value) in &args.set {
        builder = builder.placeholder(name, value);
    }
    if !run_hook {
        builder = builder.option(OPTION_SKIP_HOOK, "true");
    }
    builder
        .build()
        .map_err(|e| CliError::Core(KitsmithError::from(e)))
}

fn report(outcome: &GenerationOutcome, project_name: &str, output: &OutputManager) -> CliResult<()> {
    for warning in outcome.warnings() {
        output.warning(&warning)?;
    }

    output.success(&format!(
        "Project '{project_name}' created at {}",
        outcome.project_path.display()
    ))?;

    if output.is_quiet() {
        return Ok(());
    }
    output.field("Rendered", &outcome.report.files_rendered.to_string())?;
    output.field("Copied", &outcome.report.files_copied.to_string())?;
    output.field("Directories", &outcome.report.directories_created.to_string())?;
    if let Some(hook) = &outcome.hook {
        output.field("Hook", if hook.success() { "ok" } else { "failed" })?;
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", outcome.project_path.display()))?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
