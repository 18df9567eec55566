//! LLM provider abstraction layer.
//!
//! Coaching features talk to a `LlmProvider`; Gemini is the only backend
//! shipped, tests plug in scripted providers.

mod gemini;
mod provider;

pub use gemini::{GeminiProvider, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
