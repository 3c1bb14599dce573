pub mod client;
pub mod error;
pub mod types;

pub use client::{API_URL, CompletionSender, OpenAiClient};
pub use error::OpenAiError;
pub use types::{ChatRequest, ChatResponse, Completion, Message, Usage};
