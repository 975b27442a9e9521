use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Bot provider failed: {0}")]
    Provider(String),
    /// The service refused to answer until the user logs in again. Upstream
    /// code catches this variant to drive a re-login flow.
    #[error("Login required: {0}")]
    LoginRequired(String),
    #[error("Failed to create conversation")]
    ConversationCreationFailed,
    #[error("Parsing failed on output '{output}': {reason}")]
    ParseFailed { output: String, reason: String },
    /// An error event whose payload did not match any known shape; carries
    /// the raw data as received.
    #[error("{0}")]
    Opaque(String),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
