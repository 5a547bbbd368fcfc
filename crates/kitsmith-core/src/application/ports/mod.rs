//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kitsmith-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File and directory operations
//!   - `KitAcquirer`: Fetch kit content from a local path, git remote or archive URL
//!   - `ExpressionEvaluator`: Phase-2 template expression evaluation
//!   - `ScriptRunner`: Post-generation hook execution
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (The services themselves; the CLI calls them directly)

pub mod output;

pub use output::{
    ENV_KIT_PATH, ENV_PROJECT_PATH, EvaluationError, ExpressionEvaluator, Filesystem,
    HookInvocation, HookOutcome, KitAcquirer, LEGACY_ENV_KIT_PATH, LEGACY_ENV_PROJECT_PATH,
    ScriptRunner, WalkEntry,
};

#[cfg(test)]
pub use output::{MockExpressionEvaluator, MockFilesystem, MockKitAcquirer, MockScriptRunner};
