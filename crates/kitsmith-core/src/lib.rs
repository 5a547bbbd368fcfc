//! Kitsmith Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Kitsmith, a
//! kit manager and project generator. A *kit* is a directory holding a
//! `metadata.yaml` document and a `templates/` tree; generating a project
//! copies that tree into a fresh directory while substituting placeholders.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          kitsmith-cli (CLI)             │
//! │     (Builds requests, maps errors)      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (KitRegistry, PlaceholderResolver,     │
//! │   TreeGenerator, GenerationService)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, KitAcquirer, Evaluator,    │
//! │  ScriptRunner)                          │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    kitsmith-adapters (Infrastructure)   │
//! │ (LocalFilesystem, SourceAcquirer,       │
//! │  TeraEvaluator, ShellScriptRunner)      │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (KitMetadata, KitSource, requests,      │
//! │  token scanning, function table)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kitsmith_core::{
//!     application::{GenerationService, KitRegistry, RegistryConfig},
//!     domain::GenerationRequest,
//! };
//!
//! // 1. Registry over an explicit root (adapters injected by the caller)
//! let registry = KitRegistry::new(RegistryConfig::under("/tmp/kitsmith"), filesystem, acquirer);
//!
//! // 2. Install a kit and generate a project from it
//! registry.add("https://github.com/acme/go-service.git")?;
//! let request = GenerationRequest::builder("go-service", "widgets")
//!     .output_path("./out")
//!     .placeholder("port", "8080")
//!     .build()?;
//! let service = GenerationService::new(registry, filesystem, evaluator, runner);
//! service.generate(&request)?;
//! ```

// Domain layer (pure, no I/O)
pub mod domain;

// Application layer (ports + orchestration)
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationOutcome, GenerationReport, GenerationService, KitRegistry, PlaceholderResolver,
        RegistryConfig, TreeGenerator,
        ports::{ExpressionEvaluator, Filesystem, KitAcquirer, ScriptRunner},
    };
    pub use crate::domain::{
        FunctionTable, GenerationRequest, Kit, KitMetadata, KitName, KitSource, PlaceholderValue,
    };
    pub use crate::error::{KitsmithError, KitsmithResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
