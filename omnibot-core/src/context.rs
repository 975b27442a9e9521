use std::future::Future;

use tokio::sync::Mutex;

use crate::{BotError, ChatContext};

/// Caches the conversation identifier shared by consecutive prompt sends on
/// one adapter instance.
#[derive(Debug, Default)]
pub struct ContextCache {
    slot: Mutex<Option<ChatContext>>,
}

impl ContextCache {
    pub fn new() -> Self {
        ContextCache {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached context, or run `create` and cache its result.
    ///
    /// The slot lock is held across `create`, so concurrent callers never
    /// allocate more than one conversation. An empty identifier counts as
    /// absent and is never cached; the next call retries creation.
    pub async fn get_or_create<F, Fut>(&self, create: F) -> Result<ChatContext, BotError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ChatContext, BotError>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(context) = slot.as_ref() {
            return Ok(context.clone());
        }
        let context = create().await?;
        if !context.is_empty() {
            *slot = Some(context.clone());
        }
        Ok(context)
    }

    /// Drop the cached context so the next send creates a fresh one.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }

    pub async fn current(&self) -> Option<ChatContext> {
        self.slot.lock().await.clone()
    }
}
