//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the
//! `RegistryConfig` derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `KITSMITH_<SECTION>__<KEY>`, e.g.
//!    `KITSMITH_REGISTRY__ROOT=/tmp/kits`
//! 3. Config file: `--config FILE`, else `<config dir>/kitsmith/config.toml`
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use kitsmith_core::application::RegistryConfig;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "KITSMITH";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub registry: RegistrySettings,
    pub network: NetworkSettings,
    pub generation: GenerationSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Holds `kits/` and `cache/`.
    pub root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Archive download timeout.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Run `scaffold.sh` after generation unless `--no-hook` is given.
    pub run_hooks: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub no_color: bool,
    /// `auto`, `human` or `plain`.
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            registry: RegistrySettings {
                root: default_registry_root(),
            },
            network: NetworkSettings { timeout_secs: 60 },
            generation: GenerationSettings { run_hooks: true },
            output: OutputSettings {
                no_color: false,
                format: "auto".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then the
    /// environment.
    ///
    /// A file passed explicitly with `--config` must exist; the default
    /// location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to build default configuration")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Invalid configuration values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kitsmith.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "kitsmith", "kitsmith")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kitsmith.toml"))
    }

    /// Registry layout handed to the core.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig::under(&self.registry.root)
    }

    pub fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }

    /// Value of a dotted key, as printed by `config get`.
    pub fn value(&self, key: &str) -> Option<String> {
        let value = match key {
            "registry.root" => self.registry.root.display().to_string(),
            "network.timeout_secs" => self.network.timeout_secs.to_string(),
            "generation.run_hooks" => self.generation.run_hooks.to_string(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => return None,
        };
        Some(value)
    }
}

fn default_registry_root() -> PathBuf {
    directories::ProjectDirs::from("dev", "kitsmith", "kitsmith")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".kitsmith"))
}
