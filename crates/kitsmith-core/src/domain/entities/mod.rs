pub mod kit;
pub mod request;

pub use crate::domain::DomainError;
pub use kit::{HOOK_SCRIPT, Kit, KitMetadata, METADATA_FILE, TEMPLATES_DIR};
pub use request::{GenerationRequest, GenerationRequestBuilder, OPTION_SKIP_HOOK, PlaceholderValue};
