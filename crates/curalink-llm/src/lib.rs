//! curalink-llm: Optional text-assist features backed by an LLM.
//!
//! Whether the features are live is decided once, when the
//! [`TextAssistClient`] is built: with a credential it wraps an
//! [`LlmTextAssist`]; without one it wraps [`FallbackTextAssist`]. Neither
//! variant ever returns an error to the caller.

pub mod backend;
pub mod assist;
pub mod client;

pub use assist::{FallbackTextAssist, LlmTextAssist, TextAssist};
pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message, OpenAiBackend};
pub use client::TextAssistClient;
