// Public modules
pub mod client;
pub mod config;
pub mod converter;
pub mod error;
pub mod prompt;
pub mod render;
pub mod sse;
pub mod types;

mod observability;

// Re-exports
pub use client::OpenAiClient;
pub use config::Config;
pub use converter::{Converter, parse_response};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use prompt::{NamingStyle, SYSTEM_PROMPT, build_prompt, conversion_messages};
pub use render::PlainTextRenderer;
pub use sse::process_sse;
pub use types::*;
