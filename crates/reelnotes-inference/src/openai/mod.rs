//! OpenAI-compatible completion backend.
//!
//! Works with any endpoint speaking the OpenAI chat completions protocol.
//! The default target is Groq; OpenAI, OpenRouter, vLLM and Ollama's
//! compatibility mode work the same way with a different `base_url`.
//!
//! # Example
//!
//! ```rust,no_run
//! use reelnotes_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use reelnotes_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables (GROQ_API_KEY, GROQ_MODEL, ...)
//!     let backend = OpenAIBackend::from_env().unwrap();
//!
//!     // Or with custom config
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!         api_key: None,
//!         gen_model: "llama3".to_string(),
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!
//!     let reply = backend.generate("Say hello").await.unwrap();
//!     println!("{}", reply);
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig};
pub use error::{ErrorDetail, ErrorEnvelope, FailureKind};
pub use types::*;
