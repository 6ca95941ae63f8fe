//! Language model collaborator: prompt rendering and the chat-completions client.

pub mod client;
pub mod prompt;

pub use client::{
    LlmClient, LlmFailure, MissingKeyGenerator, SqlGenerator, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use prompt::build_prompt;
