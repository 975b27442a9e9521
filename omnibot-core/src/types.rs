use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a server-side conversation. Issued by the remote
/// service; the adapter never inspects it beyond checking for emptiness.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChatContext(String);

impl ChatContext {
    pub fn new(id: impl Into<String>) -> Self {
        ChatContext(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ChatContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One update delivered to the caller's callback. `content` is the full text
/// generated so far while `done` is false; the final delivery carries the
/// service's complete answer with `done` set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseChunk {
    pub content: String,
    pub done: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// Accumulated text so far; more events follow.
    ContentChunk(String),
    /// The complete generated answer; terminal.
    FinalAnswer(String),
}
