//! Conversation creation and availability probing against a mock server

use std::time::Duration;

use httpmock::prelude::*;
use omnibot_huggingchat::{ChatBot, HuggingChatBot};
use serde_json::json;

#[tokio::test]
async fn create_chat_context_returns_the_conversation_id() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/conversation")
            .json_body(json!({ "model": "OpenAssistant/oasst-sft-6-llama-30b-xor" }));
        then.status(200)
            .json_body(json!({ "conversationId": "conv-123" }));
    });

    let bot = HuggingChatBot::new().with_base_url(server.url(""));
    let context = bot.create_chat_context().await.expect("context");

    assert_eq!(context.as_str(), "conv-123");
    mock.assert();
}

#[tokio::test]
async fn create_chat_context_sends_the_configured_model() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/conversation")
            .json_body(json!({ "model": "other-model" }));
        then.status(200)
            .json_body(json!({ "conversationId": "conv-1" }));
    });

    let bot = HuggingChatBot::new()
        .with_base_url(server.url(""))
        .with_model("other-model");
    bot.create_chat_context().await.expect("context");
    mock.assert();
}

#[tokio::test]
async fn create_chat_context_propagates_http_failures() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/conversation");
        then.status(503).body("service unavailable");
    });

    let bot = HuggingChatBot::new().with_base_url(server.url(""));
    let err = bot.create_chat_context().await.expect_err("failure");

    assert!(matches!(
        err,
        omnibot_huggingchat::BotError::Provider(ref msg) if msg.contains("503")
    ));
}

#[tokio::test]
async fn check_availability_deletes_the_probe_conversation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/conversation");
        then.status(200)
            .json_body(json!({ "conversationId": "probe-1" }));
    });
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/conversation/probe-1");
        then.status(200);
    });

    let bot = HuggingChatBot::new().with_base_url(server.url(""));
    assert!(bot.check_availability().await);

    // The delete is fire-and-forget; give the spawned task a moment.
    for _ in 0..50 {
        if delete_mock.hits() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    delete_mock.assert();
}

#[tokio::test]
async fn check_availability_is_false_for_an_empty_conversation_id() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/conversation");
        then.status(200).json_body(json!({ "conversationId": "" }));
    });
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/conversation/");
        then.status(200);
    });

    let bot = HuggingChatBot::new().with_base_url(server.url(""));
    assert!(!bot.check_availability().await);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(delete_mock.hits(), 0);
}

#[tokio::test]
async fn check_availability_is_false_when_creation_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/conversation");
        then.status(500);
    });

    let bot = HuggingChatBot::new().with_base_url(server.url(""));
    assert!(!bot.check_availability().await);
}

#[tokio::test]
async fn missing_conversation_id_field_counts_as_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/conversation");
        then.status(200).json_body(json!({}));
    });

    let bot = HuggingChatBot::new().with_base_url(server.url(""));
    assert!(!bot.check_availability().await);
}
