use async_trait::async_trait;

use crate::{BotError, ChatContext, ResponseChunk};

/// Immutable per-instance configuration of a bot adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotConfig {
    /// Stable brand identifier, unique per bot kind.
    pub brand_id: String,
    /// Model identifier sent when creating conversations.
    pub model: String,
    /// Where to send the user when the service demands a login.
    pub login_url: String,
    /// Logo asset name for UI integrations.
    pub logo_filename: String,
}

#[async_trait]
pub trait ChatBot: Send + Sync {
    fn config(&self) -> &BotConfig;

    /// Create a new server-side conversation and return its identifier.
    ///
    /// Failures are propagated as-is; no retry is attempted. The created
    /// conversation persists until the service expires or deletes it.
    async fn create_chat_context(&self) -> Result<ChatContext, BotError>;

    /// Liveness and credential probe. True means a conversation could be
    /// created just now, not that a subsequent prompt send will succeed.
    async fn check_availability(&self) -> bool;

    /// Send one prompt and relay updates to `on_update` until the terminal
    /// one arrives. `param` is threaded through to every invocation
    /// unchanged; the adapter attaches no semantics to it.
    ///
    /// `on_update` sees zero or more chunks with `done: false` followed by
    /// exactly one with `done: true`, or the call returns `Err` instead.
    async fn send_prompt<P, F>(&self, prompt: &str, on_update: F, param: P) -> Result<(), BotError>
    where
        P: Send,
        F: FnMut(&P, ResponseChunk) + Send;
}
