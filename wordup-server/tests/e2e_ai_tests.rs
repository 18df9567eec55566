//! End-to-end tests for the coaching endpoints

mod common;

use common::{
    TestClient, TestServer, FEEDBACK_REPLY_SCORE, IMPROVER_REPLY, IMPROVER_REPLY_VERSION,
    SAMPLE_TRANSCRIPT,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use wordup_server::coach::LlmError;

#[tokio::test]
async fn test_feedback_returns_structured_data() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .ai_feedback(json!({ "transcript": SAMPLE_TRANSCRIPT }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["structured"], true);
    assert_eq!(body["data"]["overallScore"], FEEDBACK_REPLY_SCORE);

    // Locally computed counts are part of the prompt
    let prompt = &server.llm.prompts()[0];
    assert!(prompt.contains(SAMPLE_TRANSCRIPT));
    assert!(
        prompt.contains("(16 words, 3 sentences, 2 filler words detected)"),
        "{}",
        prompt
    );
}

#[tokio::test]
async fn test_feedback_passes_raw_text_through() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    server.llm.push_reply("Nice pacing, fewer ums next time.");

    let body: Value = client
        .ai_feedback(json!({ "transcript": SAMPLE_TRANSCRIPT }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["structured"], false);
    assert_eq!(body["feedback"], "Nice pacing, fewer ums next time.");
}

#[tokio::test]
async fn test_feedback_requires_transcript() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.ai_feedback(json!({ "transcript": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Transcript is required.");
}

#[tokio::test]
async fn test_feedback_upstream_failure_is_bad_gateway() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    server.llm.push_error(LlmError::Api {
        status: 500,
        message: "backend exploded".to_string(),
    });

    let response = client
        .ai_feedback(json!({ "transcript": SAMPLE_TRANSCRIPT }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("backend exploded"));
}

#[tokio::test]
async fn test_improve_returns_sections() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .ai_improve(json!({ "draft": "hi everyone thanks for comming", "analysisType": "grammar" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["text"], IMPROVER_REPLY);
    assert_eq!(body["improvedVersion"], IMPROVER_REPLY_VERSION);
    assert_eq!(body["sections"]["KEY CHANGES"], "Added a greeting.");

    let prompt = &server.llm.prompts()[0];
    assert!(prompt.contains("Original Speech: \"hi everyone thanks for comming\""));
}

#[tokio::test]
async fn test_improve_requires_draft() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.ai_improve(json!({ "analysisType": "full" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Draft speech is required.");
}

#[tokio::test]
async fn test_improve_empty_reply_is_bad_gateway() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    server.llm.push_reply("   ");

    let response = client.ai_improve(json!({ "draft": "Hello." })).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "The AI model did not return any content.");
}

#[tokio::test]
async fn test_unconfigured_model_is_unavailable() {
    let server = TestServer::spawn_without_llm().await;
    let client = TestClient::authenticated(server.base_url.clone()).await;

    let response = client
        .ai_feedback(json!({ "transcript": SAMPLE_TRANSCRIPT }))
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "AI service is not configured");

    let response = client
        .save_scored_practice(json!({ "transcript": SAMPLE_TRANSCRIPT }))
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
