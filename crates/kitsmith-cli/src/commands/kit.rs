//! `kitsmith kit`: add, remove, list, inspect and update installed kits.

use serde::Serialize;
use tracing::instrument;

use kitsmith_core::{
    application::KitRegistry,
    domain::{Kit, KitName},
    error::KitsmithError,
};

use crate::{
    cli::{KitCommands, ListFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct kit subcommand.
pub fn execute(cmd: KitCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let registry = super::registry(&config);
    match cmd {
        KitCommands::Add { source, force } => add(&registry, &source, force, &output),
        KitCommands::Remove { name, yes } => remove(&registry, &name, yes, &output),
        KitCommands::List { format } => list(&registry, format, &output),
        KitCommands::Info { name } => info(&registry, &name, &output),
        KitCommands::Update { name } => update(&registry, &name, &output),
    }
}

#[instrument(skip_all, fields(source = %source, force = force))]
fn add(registry: &KitRegistry, source: &str, force: bool, output: &OutputManager) -> CliResult<()> {
    if force {
        let name = KitName::from_source(source).map_err(KitsmithError::from)?;
        if registry.locate(name.as_str()).is_ok() {
            registry.remove(name.as_str())?;
            output.info(&format!("Replacing installed kit '{name}'"))?;
        }
    }

    let spinner = output.spinner(&format!("Adding kit from {source}..."));
    let result = registry.add(source);
    spinner.finish_and_clear();
    let kit = result?;

    output.success(&format!(
        "Kit '{}' {} installed at {}",
        kit.name(),
        kit.metadata.version,
        kit.local_path.display()
    ))?;
    Ok(())
}

#[instrument(skip_all, fields(kit = %name))]
fn remove(registry: &KitRegistry, name: &str, yes: bool, output: &OutputManager) -> CliResult<()> {
    // Fail with "not found" before asking anything. Only the directory is
    // checked, so kits with unreadable metadata can still be removed.
    let path = registry.locate(name)?;

    if !yes && !confirm(&format!("Remove kit '{name}' ({})?", path.display()))? {
        return Err(CliError::Cancelled);
    }

    registry.remove(name)?;
    output.success(&format!("Kit '{name}' removed"))?;
    Ok(())
}

fn list(registry: &KitRegistry, format: ListFormat, output: &OutputManager) -> CliResult<()> {
    let kits = registry.list()?;

    match format {
        ListFormat::Table => {
            if kits.is_empty() {
                output.info("No kits installed. Add one with: kitsmith kit add <source>")?;
                return Ok(());
            }
            output.header("Installed Kits:")?;
            for kit in &kits {
                output.print(&format!(
                    "  {:<24} {:<10} {}",
                    kit.name(),
                    kit.metadata.version,
                    kit.metadata.description
                ))?;
            }
        }

        ListFormat::List => {
            for kit in &kits {
                output.data(kit.name())?;
            }
        }

        // JSON bypasses quiet mode and colours so it stays parseable in pipes.
        ListFormat::Json => {
            let rows: Vec<KitRow<'_>> = kits.iter().map(KitRow::from).collect();
            let json = serde_json::to_string_pretty(&rows).map_err(std::io::Error::from)?;
            output.data(&json)?;
        }
    }

    Ok(())
}

fn info(registry: &KitRegistry, name: &str, output: &OutputManager) -> CliResult<()> {
    let info = registry.info(name)?;
    let metadata = &info.kit.metadata;

    output.header(&format!("{} {}", info.kit.name(), metadata.version))?;
    if info.kit.display_name() != info.kit.name() {
        output.field("Name", info.kit.display_name())?;
    }
    output.field("Description", &metadata.description)?;
    if !metadata.language.is_empty() {
        output.field("Language", &metadata.language)?;
    }
    if !metadata.author.is_empty() {
        output.field("Author", &metadata.author)?;
    }
    output.field("Origin", metadata.origin().unwrap_or("unknown"))?;
    output.field("Path", &info.kit.local_path.display().to_string())?;
    output.field("Templates", &info.template_files.to_string())?;
    if !metadata.tags.is_empty() {
        output.field("Tags", &metadata.tags.join(", "))?;
    }
    output.field(
        "Hook",
        if info.kit.hook_script().exists() {
            "scaffold.sh"
        } else {
            "none"
        },
    )?;

    if info.placeholders.is_empty() {
        output.field("Placeholders", "none")?;
    } else {
        output.print("")?;
        output.print("Placeholders:")?;
        for placeholder in &info.placeholders {
            output.print(&format!("  {{{{{placeholder}}}}}"))?;
        }
    }
    Ok(())
}

#[instrument(skip_all, fields(kit = %name))]
fn update(registry: &KitRegistry, name: &str, output: &OutputManager) -> CliResult<()> {
    let spinner = output.spinner(&format!("Updating kit '{name}'..."));
    let result = registry.update(name);
    spinner.finish_and_clear();
    let kit = result?;

    output.success(&format!("Kit '{}' updated to {}", kit.name(), kit.metadata.version))?;
    Ok(())
}

/// JSON shape of one `kit list` entry.
#[derive(Debug, Serialize)]
struct KitRow<'a> {
    name: &'a str,
    display_name: &'a str,
    version: &'a str,
    description: &'a str,
    language: &'a str,
    origin: Option<&'a str>,
    path: String,
}

impl<'a> From<&'a Kit> for KitRow<'a> {
    fn from(kit: &'a Kit) -> Self {
        Self {
            name: kit.name(),
            display_name: kit.display_name(),
            version: &kit.metadata.version,
            description: &kit.metadata.description,
            language: &kit.metadata.language,
            origin: kit.metadata.origin(),
            path: kit.local_path.display().to_string(),
        }
    }
}

#[cfg(feature = "interactive")]
fn confirm(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: format!("cannot prompt for confirmation ({e}); pass --yes"),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_prompt: &str) -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}
