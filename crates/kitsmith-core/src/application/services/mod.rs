//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "add a kit" or "generate a project".

pub mod generation_service;
pub mod generator;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use generation_service::{GenerationOutcome, GenerationService, HookReport};
pub use generator::{GenerationReport, TreeGenerator};
pub use registry::{KitInfo, KitRegistry, RegistryConfig};
pub use resolver::{DEFAULT_GO_VERSION, PlaceholderResolver, Resolved, SEEDED_NAMES};
pub use scanner::{KitScanner, TemplateScan};
