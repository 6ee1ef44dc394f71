//! Prompt domain
//!
//! Templates for the system and user prompts of each agent role.

mod template;

pub use template::PromptTemplate;
