//! Application layer for Kitsmith.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (registry, resolver, generator)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Pure rules (names, classification, token scanning) live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    GenerationOutcome, GenerationReport, GenerationService, HookReport, KitInfo, KitRegistry,
    KitScanner, PlaceholderResolver, RegistryConfig, TreeGenerator,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ExpressionEvaluator, Filesystem, KitAcquirer, ScriptRunner};

pub use error::ApplicationError;
