//! HuggingChat adapter for the omnibot chat abstraction.
//!
//! Talks to the HuggingChat private HTTP API: conversation creation plus a
//! server-sent-event stream of generated tokens per prompt.

mod client;
mod request;
mod sse;

pub use client::HuggingChatBot;
pub use omnibot_core::{BotConfig, BotError, ChatBot, ChatContext, ResponseChunk, StreamEvent};
pub use request::{GenerationParameters, PromptRequest, RequestOptions};
pub use sse::{SseFrame, SseFrameDecoder};
