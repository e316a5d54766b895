pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod settings;
pub mod utils;
#[cfg(feature = "web-api")]
pub mod web_handlers;

// Re-export the main node types for easier access
pub use models::{CanonicalNode, LinkResult, ProxyType};

pub use generator::generate_links;
pub use interfaces::{extract_links, ExtractOutcome};
pub use parser::explode_document;
pub use settings::Settings;
