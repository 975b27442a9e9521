mod bot;
mod context;
mod error;
mod types;

pub use bot::{BotConfig, ChatBot};
pub use context::ContextCache;
pub use error::BotError;
pub use types::{ChatContext, ResponseChunk, StreamEvent};
