use serde::Serialize;
use uuid::Uuid;

const STOP_SEQUENCE: &str = "</s>";

/// Request body for one prompt exchange. Built fresh per send and immutable
/// once serialized.
#[derive(Debug, Clone, Serialize)]
pub struct PromptRequest {
    pub inputs: String,
    pub parameters: GenerationParameters,
    pub stream: bool,
    pub options: RequestOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationParameters {
    pub temperature: f64,
    pub truncate: u32,
    pub max_new_tokens: u32,
    pub stop: Vec<String>,
    pub top_p: f64,
    pub repetition_penalty: f64,
    pub top_k: u32,
    pub return_full_text: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestOptions {
    pub id: String,
    pub is_retry: bool,
    pub use_cache: bool,
}

impl PromptRequest {
    /// Shape one prompt exchange: fixed sampling parameters, a fresh random
    /// request id, caching disabled, not a retry.
    pub fn pack(prompt: impl Into<String>) -> Self {
        PromptRequest {
            inputs: prompt.into(),
            parameters: GenerationParameters {
                temperature: 0.9,
                truncate: 1000,
                max_new_tokens: 1024,
                stop: vec![STOP_SEQUENCE.to_string()],
                top_p: 0.95,
                repetition_penalty: 1.2,
                top_k: 50,
                return_full_text: false,
            },
            stream: true,
            options: RequestOptions {
                id: Uuid::new_v4().to_string(),
                is_retry: false,
                use_cache: false,
            },
        }
    }
}
