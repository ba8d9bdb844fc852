//! Generation collaborator integration for the CDP support chatbot.
//!
//! This crate provides a provider-agnostic abstraction for delegating answer
//! generation to an external Large Language Model service, through a unified
//! trait-based interface.
//!
//! # Providers
//! - **Gemini**: Google Generative Language API (default)
//!
//! # Example
//! ```no_run
//! use cdp_llm::{LlmClient, LlmRequest, providers::GeminiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("api-key");
//! let request = LlmRequest::new("Hello, world!", "gemini-1.5-flash");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::GeminiClient;
