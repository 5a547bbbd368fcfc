//! Infrastructure adapters for Kitsmith.
//!
//! This crate implements the ports defined in `kitsmith-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod acquisition;
pub mod filesystem;
pub mod renderer;
pub mod script;

// Re-export commonly used adapters
pub use acquisition::SourceAcquirer;
pub use filesystem::LocalFilesystem;
pub use renderer::TeraEvaluator;
pub use script::ShellScriptRunner;
