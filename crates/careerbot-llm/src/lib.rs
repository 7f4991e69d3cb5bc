//! Chat proxy: wraps a conversation in the fixed career-advice policy and
//! forwards it to an OpenAI-compatible completion endpoint.

pub mod error;
pub mod openai;
pub mod policy;
pub mod provider;
pub mod proxy;

pub use error::LlmError;
pub use openai::OpenAiProvider;
pub use provider::{ChatRole, ChatTurn, CompletionProvider};
pub use proxy::ChatProxy;
