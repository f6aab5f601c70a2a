mod api;
pub mod prompts;
mod provider;

pub use provider::LlmProvider;
