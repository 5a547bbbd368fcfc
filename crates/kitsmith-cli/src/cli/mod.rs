//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, LogFormat, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kitsmith",
    bin_name = "kitsmith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{2692} Install template kits and generate projects from them",
    long_about = "Kitsmith installs template kits (a metadata.yaml plus a templates/ tree) \
                  from local directories, git repositories or .tar.gz archives, and \
                  generates new projects from them with placeholder substitution.",
    after_help = "EXAMPLES:\n\
        \x20 kitsmith kit add https://github.com/acme/go-service.git\n\
        \x20 kitsmith new widgets --kit go-service --set port=8080\n\
        \x20 kitsmith kit list --format json\n\
        \x20 kitsmith completions bash > /usr/share/bash-completion/completions/kitsmith",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new project from an installed kit.
    #[command(
        visible_alias = "n",
        about = "Generate a new project from a kit",
        after_help = "EXAMPLES:\n\
            \x20 kitsmith new widgets --kit go-service\n\
            \x20 kitsmith new api --kit rust-axum --output ~/src --set port=3000\n\
            \x20 kitsmith new demo --kit sample --dry-run"
    )]
    New(NewArgs),

    /// Manage installed kits.
    #[command(
        subcommand,
        about = "Manage installed kits",
        after_help = "EXAMPLES:\n\
            \x20 kitsmith kit add ./my-kit\n\
            \x20 kitsmith kit list\n\
            \x20 kitsmith kit info go-service\n\
            \x20 kitsmith kit update go-service\n\
            \x20 kitsmith kit remove go-service --yes"
    )]
    Kit(KitCommands),

    /// Initialise a Kitsmith configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 kitsmith init\n\
            \x20 kitsmith init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kitsmith completions bash > ~/.local/share/bash-completion/completions/kitsmith\n\
            \x20 kitsmith completions zsh  > ~/.zfunc/_kitsmith\n\
            \x20 kitsmith completions fish > ~/.config/fish/completions/kitsmith.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Kitsmith configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kitsmith config get registry.root\n\
            \x20 kitsmith config list\n\
            \x20 kitsmith config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `kitsmith new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Name of the project directory to create.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Installed kit to generate from.
    #[arg(short = 'k', long = "kit", value_name = "KIT", help = "Kit to use")]
    pub kit: String,

    /// Directory the project is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        default_value = ".",
        help = "Output directory"
    )]
    pub output: PathBuf,

    /// Placeholder values, repeatable.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        value_parser = parse_assignment,
        help = "Set a placeholder value (repeatable)"
    )]
    pub set: Vec<(String, String)>,

    /// Do not run the kit's post-generation script.
    #[arg(long = "no-hook", help = "Skip the post-generation script")]
    pub no_hook: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

/// `key=value` → `(key, value)`. The value may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing placeholder name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

// ── kit ───────────────────────────────────────────────────────────────────────

/// Subcommands for `kitsmith kit`.
#[derive(Debug, Subcommand)]
pub enum KitCommands {
    /// Install a kit from a local directory, git URL or .tar.gz URL.
    Add {
        /// Source reference.
        #[arg(value_name = "SOURCE")]
        source: String,
        /// Replace an installed kit with the same name.
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
    /// Delete an installed kit.
    #[command(visible_alias = "rm")]
    Remove {
        /// Kit name.
        name: String,
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// List installed kits.
    #[command(visible_alias = "ls")]
    List {
        /// Output format.
        #[arg(
            long = "format",
            value_enum,
            default_value = "table",
            help = "Output format"
        )]
        format: ListFormat,
    },
    /// Show a kit's metadata and placeholders.
    Info {
        /// Kit name.
        name: String,
    },
    /// Re-acquire a kit from its recorded origin.
    Update {
        /// Kit name.
        name: String,
    },
}

/// Output format for `kit list`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kitsmith init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kitsmith completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `kitsmith config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `registry.root`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
