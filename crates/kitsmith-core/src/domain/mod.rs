// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Kitsmith.
//!
//! This module contains pure logic with no I/O. Filesystem, network,
//! process and template-engine concerns are reached through ports defined
//! in the application layer.
//!
//! ## What lives here
//!
//! - **Entities**: `Kit`, `KitMetadata`, `GenerationRequest`
//! - **Value objects**: `KitName`, `KitSource`
//! - **Rules**: token scanning, derived names, file classification, the
//!   closed template function table
//!
// Public API - what the world sees
pub mod case;
pub mod content;
pub mod entities;
pub mod error;
pub mod functions;
pub mod placeholder;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    GenerationRequest, GenerationRequestBuilder, HOOK_SCRIPT, Kit, KitMetadata, METADATA_FILE,
    OPTION_SKIP_HOOK, PlaceholderValue, TEMPLATES_DIR,
};
pub use error::DomainError;
pub use functions::{FunctionTable, FunctionValue, TemplateFunction};
pub use validation::DomainValidator;
pub use value_objects::{KitName, KitSource};
