//! HuggingChat adapter client

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use futures::{
    future,
    stream::{self, BoxStream, StreamExt},
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use omnibot_core::{
    BotConfig, BotError, ChatBot, ChatContext, ContextCache, ResponseChunk, StreamEvent,
};

use crate::request::PromptRequest;
use crate::sse::{SseFrame, SseFrameDecoder};

const HUGGINGCHAT_BASE_URL: &str = "https://huggingface.co/chat";
const DEFAULT_MODEL: &str = "OpenAssistant/oasst-sft-6-llama-30b-xor";
const LOGIN_URL: &str = "https://huggingface.co/chat/";
const BRAND_ID: &str = "huggingChat";
const LOGO_FILENAME: &str = "huggingchat-logo.png";

/// Exact message the service emits when the anonymous quota is exhausted.
const LOGIN_REQUIRED_MESSAGE: &str = "Exceeded number of messages before login";

pub struct HuggingChatBot {
    base_url: String,
    config: BotConfig,
    http: Client,
    context: ContextCache,
    /// Serializes prompt sends: at most one in flight per instance.
    send_guard: Mutex<()>,
}

impl HuggingChatBot {
    pub fn new() -> Self {
        let http = Client::builder()
            .build()
            .expect("valid reqwest client config");
        HuggingChatBot {
            base_url: HUGGINGCHAT_BASE_URL.to_string(),
            config: BotConfig {
                brand_id: BRAND_ID.to_string(),
                model: DEFAULT_MODEL.to_string(),
                login_url: LOGIN_URL.to_string(),
                logo_filename: LOGO_FILENAME.to_string(),
            },
            http,
            context: ContextCache::new(),
            send_guard: Mutex::new(()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    fn creation_url(&self) -> String {
        format!("{}/conversation", self.base_url.trim_end_matches('/'))
    }

    fn conversation_url(&self, id: &str) -> String {
        format!("{}/conversation/{}", self.base_url.trim_end_matches('/'), id)
    }

    fn prompt_stream(
        &self,
        context: &ChatContext,
        prompt: &str,
    ) -> BoxStream<'static, Result<StreamEvent, BotError>> {
        let request = PromptRequest::pack(prompt);
        let url = self.conversation_url(context.as_str());
        let http = self.http.clone();

        stream::once(async move {
            http.post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|err| BotError::Provider(err.to_string()))
        })
        .flat_map(|result| match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    parse_event_stream(response)
                } else {
                    stream::once(async move {
                        let body = response.text().await.unwrap_or_default();
                        let err = match serde_json::from_str::<ErrorPayload>(&body) {
                            Ok(ErrorPayload { message: Some(_) }) => classify_error_data(&body),
                            _ => BotError::Provider(format!("HTTP {}: {}", status, body)),
                        };
                        Err(err)
                    })
                    .boxed()
                }
            }
            Err(err) => stream::iter(vec![Err(err)]).boxed(),
        })
        .boxed()
    }
}

impl Default for HuggingChatBot {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationCreated {
    #[serde(default)]
    conversation_id: String,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    token: Option<TokenChunk>,
    generated_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenChunk {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
}

/// Best-effort mapping of an error payload to the error taxonomy. The shape
/// is not guaranteed, so anything unrecognized surfaces as `Opaque` with the
/// raw data.
fn classify_error_data(data: &str) -> BotError {
    match serde_json::from_str::<ErrorPayload>(data) {
        Ok(ErrorPayload {
            message: Some(message),
        }) if !message.is_empty() => {
            if message == LOGIN_REQUIRED_MESSAGE {
                BotError::LoginRequired(message)
            } else {
                BotError::Provider(message)
            }
        }
        _ => BotError::Opaque(data.to_string()),
    }
}

fn parse_event_stream(
    response: reqwest::Response,
) -> BoxStream<'static, Result<StreamEvent, BotError>> {
    let byte_stream = response.bytes_stream();
    let mut decoder = SseFrameDecoder::new();
    let mut accumulated = String::new();
    let terminated = Arc::new(AtomicBool::new(false));
    let terminated_for_take = terminated.clone();

    // A trailing `None` marks end of input so an unterminated final frame
    // still gets flushed out of the decoder.
    byte_stream
        .map(Some)
        .chain(stream::once(future::ready(None)))
        .take_while(move |_| future::ready(!terminated_for_take.load(Ordering::SeqCst)))
        .flat_map(move |chunk| match chunk {
            Some(Ok(bytes)) => {
                let frames = decoder.push(&bytes);
                stream::iter(process_frames(frames, &mut accumulated, &terminated))
            }
            Some(Err(err)) => {
                terminated.store(true, Ordering::SeqCst);
                stream::iter(vec![Err(BotError::Provider(err.to_string()))])
            }
            None => {
                let frames: Vec<SseFrame> = decoder.finish().into_iter().collect();
                stream::iter(process_frames(frames, &mut accumulated, &terminated))
            }
        })
        .boxed()
}

fn process_frames(
    frames: Vec<SseFrame>,
    accumulated: &mut String,
    terminated: &AtomicBool,
) -> Vec<Result<StreamEvent, BotError>> {
    let mut events = Vec::new();

    for frame in frames {
        match frame.event.as_str() {
            "error" => {
                terminated.store(true, Ordering::SeqCst);
                events.push(Err(classify_error_data(&frame.data)));
                break;
            }
            "message" => match serde_json::from_str::<MessagePayload>(&frame.data) {
                Ok(payload) => {
                    if let Some(text) = payload.generated_text {
                        terminated.store(true, Ordering::SeqCst);
                        events.push(Ok(StreamEvent::FinalAnswer(text)));
                        break;
                    }
                    if let Some(token) = payload.token {
                        accumulated.push_str(&token.text);
                        events.push(Ok(StreamEvent::ContentChunk(accumulated.clone())));
                    }
                }
                Err(err) => {
                    terminated.store(true, Ordering::SeqCst);
                    events.push(Err(BotError::ParseFailed {
                        output: frame.data.clone(),
                        reason: err.to_string(),
                    }));
                    break;
                }
            },
            _ => {}
        }
    }

    events
}

#[async_trait::async_trait]
impl ChatBot for HuggingChatBot {
    fn config(&self) -> &BotConfig {
        &self.config
    }

    async fn create_chat_context(&self) -> Result<ChatContext, BotError> {
        let response = self
            .http
            .post(self.creation_url())
            .json(&json!({ "model": self.config.model }))
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "conversation creation request failed");
                BotError::Provider(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "conversation creation rejected");
            return Err(BotError::Provider(format!("HTTP {}: {}", status, body)));
        }

        let created = response.json::<ConversationCreated>().await.map_err(|err| {
            tracing::error!(error = %err, "conversation creation response unreadable");
            BotError::Provider(err.to_string())
        })?;

        Ok(ChatContext::new(created.conversation_id))
    }

    async fn check_availability(&self) -> bool {
        let context = match self.create_chat_context().await {
            Ok(context) => context,
            Err(err) => {
                tracing::debug!(error = %err, "availability probe failed");
                return false;
            }
        };
        if context.is_empty() {
            return false;
        }

        // Advisory cleanup of the probe conversation; outcome is ignored.
        let http = self.http.clone();
        let url = self.conversation_url(context.as_str());
        tokio::spawn(async move {
            if let Err(err) = http.delete(&url).send().await {
                tracing::debug!(error = %err, "probe conversation cleanup failed");
            }
        });

        true
    }

    async fn send_prompt<P, F>(
        &self,
        prompt: &str,
        mut on_update: F,
        param: P,
    ) -> Result<(), BotError>
    where
        P: Send,
        F: FnMut(&P, ResponseChunk) + Send,
    {
        let _guard = self.send_guard.lock().await;

        // Resolve and validate the context before any stream is opened.
        let context = self
            .context
            .get_or_create(|| self.create_chat_context())
            .await?;
        if context.is_empty() {
            return Err(BotError::ConversationCreationFailed);
        }

        let mut events = self.prompt_stream(&context, prompt);
        while let Some(event) = events.next().await {
            match event? {
                StreamEvent::ContentChunk(content) => {
                    on_update(&param, ResponseChunk { content, done: false });
                }
                StreamEvent::FinalAnswer(content) => {
                    on_update(&param, ResponseChunk { content, done: true });
                    return Ok(());
                }
            }
        }

        Err(BotError::Provider(
            "event stream closed before the final message".to_string(),
        ))
    }
}
