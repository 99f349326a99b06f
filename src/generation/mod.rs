//! Answer generation: Ollama client, prompt assembly, and fallback answers

pub mod fallback;
pub mod ollama;
pub mod prompt;

pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
