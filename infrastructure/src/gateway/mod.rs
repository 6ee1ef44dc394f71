//! Model gateway adapters
//!
//! Implements the [`LlmGateway`](scriptorium_application::LlmGateway) port
//! over HTTP.

mod openai;

pub use openai::OpenAiCompatibleGateway;
