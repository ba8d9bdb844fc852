//! Prompt system for the CDP support chatbot.
//!
//! This crate assembles the grounded generation prompt:
//! - Formatting retrieved documentation into a labeled block
//! - Handlebars template rendering
//! - An optional on-disk template override with an embedded default

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_support_prompt, format_documentation, NO_DOCUMENTATION_FOUND};
pub use loader::{default_prompt, load_prompt};
pub use types::PromptDefinition;
