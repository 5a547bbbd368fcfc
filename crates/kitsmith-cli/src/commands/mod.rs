//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments into core calls and render the
//! result. Adapters are wired here and nowhere else.

use std::sync::Arc;

use kitsmith_adapters::{LocalFilesystem, ShellScriptRunner, SourceAcquirer, TeraEvaluator};
use kitsmith_core::application::{GenerationService, KitRegistry};

use crate::config::AppConfig;

pub mod completions;
pub mod config;
pub mod init;
pub mod kit;
pub mod new;

/// Registry over the configured root with the production adapters.
pub(crate) fn registry(config: &AppConfig) -> KitRegistry {
    KitRegistry::new(
        config.registry_config(),
        Arc::new(LocalFilesystem::new()),
        Arc::new(SourceAcquirer::with_timeout(config.network_timeout())),
    )
}

/// Generation service; hook output is discarded when `quiet`.
pub(crate) fn generation_service(config: &AppConfig, quiet: bool) -> GenerationService {
    let runner = if quiet {
        ShellScriptRunner::new().quiet()
    } else {
        ShellScriptRunner::new()
    };
    GenerationService::new(
        registry(config),
        Arc::new(LocalFilesystem::new()),
        Arc::new(TeraEvaluator::default()),
        Arc::new(runner),
    )
}
