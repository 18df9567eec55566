//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all WordUp endpoints.
//!
//! When API routes or request formats change, update only this file.

#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::fmt::Display;
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a new unauthenticated client
    ///
    /// Use this for testing authentication flows.
    /// For most tests, use `authenticated()` or `authenticated_admin()` instead.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Automatically handle session cookies
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client pre-authenticated as the regular test user
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        Self::authenticated_as(base_url, TEST_USER_EMAIL, TEST_PASS).await
    }

    /// Creates a client pre-authenticated as the admin user
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated_admin(base_url: String) -> Self {
        Self::authenticated_as(base_url, ADMIN_EMAIL, ADMIN_PASS).await
    }

    /// Registers a fresh account and keeps its session.
    pub async fn registered(base_url: String, name: &str, email: &str) -> Self {
        let client = Self::new(base_url);
        let response = client.register(name, email, TEST_PASS).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "Registration failed: {:?}",
            response.text().await
        );
        let response = client.login(email, TEST_PASS).await;
        assert!(response.status().is_success());
        client
    }

    async fn authenticated_as(base_url: String, email: &str, password: &str) -> Self {
        let client = Self::new(base_url);

        let response = client.login(email, password).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Authentication of {} failed: {:?}",
            email,
            response.text().await
        );

        client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PUT request failed")
    }

    async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE request failed")
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /auth/register
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Response {
        self.register_json(json!({
            "name": name,
            "email": email,
            "password": password,
        }))
        .await
    }

    /// POST /auth/register with an arbitrary body
    pub async fn register_json(&self, body: Value) -> Response {
        self.post("/auth/register", &body).await
    }

    /// POST /auth/login
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post(
            "/auth/login",
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    /// POST /auth/logout
    pub async fn logout(&self) -> Response {
        self.post("/auth/logout", &json!({})).await
    }

    /// GET /auth/me
    pub async fn me(&self) -> Response {
        self.get("/auth/me").await
    }

    // ========================================================================
    // Speech Endpoints
    // ========================================================================

    /// GET /speech
    pub async fn list_speeches(&self) -> Response {
        self.get("/speech").await
    }

    /// GET /speech/{id}
    pub async fn get_speech(&self, id: impl Display) -> Response {
        self.get(&format!("/speech/{}", id)).await
    }

    /// POST /speech
    pub async fn create_speech(&self, title: &str, draft: &str) -> Response {
        self.create_speech_json(json!({ "title": title, "originalDraft": draft }))
            .await
    }

    /// POST /speech with an arbitrary body
    pub async fn create_speech_json(&self, body: Value) -> Response {
        self.post("/speech", &body).await
    }

    /// Creates a speech and returns its id
    pub async fn create_speech_id(&self, title: &str, draft: &str) -> u64 {
        let response = self.create_speech(title, draft).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.expect("Invalid speech JSON");
        body["speech"]["id"].as_u64().expect("Speech without id")
    }

    /// PUT /speech/{id}
    pub async fn update_speech(&self, id: impl Display, body: Value) -> Response {
        self.put(&format!("/speech/{}", id), &body).await
    }

    /// DELETE /speech/{id}
    pub async fn delete_speech(&self, id: impl Display) -> Response {
        self.delete(&format!("/speech/{}", id)).await
    }

    /// POST /speech/{id}/practice
    pub async fn record_speech_practice(&self, id: impl Display) -> Response {
        self.post(&format!("/speech/{}/practice", id), &json!({}))
            .await
    }

    // ========================================================================
    // Practice Endpoints
    // ========================================================================

    /// POST /api/practice
    pub async fn create_practice(&self, body: Value) -> Response {
        self.post("/api/practice", &body).await
    }

    /// Stores a manual session and returns its id
    pub async fn create_practice_id(&self, speech_id: Option<u64>, score: u32) -> u64 {
        let response = self
            .create_practice(json!({
                "speechId": speech_id,
                "transcript": SAMPLE_TRANSCRIPT,
                "score": score,
                "wordCount": 15,
                "sentenceCount": 3,
                "fillerWordCount": 2,
                "duration": 30,
            }))
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.expect("Invalid session JSON");
        body["session"]["id"].as_u64().expect("Session without id")
    }

    /// POST /api/practice/save
    pub async fn save_scored_practice(&self, body: Value) -> Response {
        self.post("/api/practice/save", &body).await
    }

    /// GET /api/practice
    pub async fn list_practice(&self) -> Response {
        self.get("/api/practice").await
    }

    /// GET /api/practice/history
    pub async fn practice_history(&self, limit: Option<usize>) -> Response {
        match limit {
            Some(limit) => self.get(&format!("/api/practice/history?limit={}", limit)).await,
            None => self.get("/api/practice/history").await,
        }
    }

    /// GET /api/practice/stats
    pub async fn practice_stats(&self) -> Response {
        self.get("/api/practice/stats").await
    }

    /// GET /api/practice/speech/{speech_id}
    pub async fn speech_practices(&self, speech_id: impl Display) -> Response {
        self.get(&format!("/api/practice/speech/{}", speech_id)).await
    }

    /// GET /api/practice/{session_id}
    pub async fn get_practice(&self, session_id: impl Display) -> Response {
        self.get(&format!("/api/practice/{}", session_id)).await
    }

    /// DELETE /api/practice/{session_id}
    pub async fn delete_practice(&self, session_id: impl Display) -> Response {
        self.delete(&format!("/api/practice/{}", session_id)).await
    }

    /// DELETE /api/practice/delete/{session_id}
    pub async fn delete_practice_legacy(&self, session_id: impl Display) -> Response {
        self.delete(&format!("/api/practice/delete/{}", session_id))
            .await
    }

    // ========================================================================
    // Progress Endpoints
    // ========================================================================

    /// GET /api/progress/overall
    pub async fn overall_progress(&self) -> Response {
        self.get("/api/progress/overall").await
    }

    /// GET /api/progress/calendar
    pub async fn practice_calendar(&self) -> Response {
        self.get("/api/progress/calendar").await
    }

    /// GET /api/progress/difficult-sentences
    pub async fn difficult_sentences(&self) -> Response {
        self.get("/api/progress/difficult-sentences").await
    }

    /// POST /api/progress/sentence-practice
    pub async fn sentence_practice(&self, body: Value) -> Response {
        self.post("/api/progress/sentence-practice", &body).await
    }

    /// PUT /api/progress/sentence/{session_id}/{sentence_id}
    pub async fn update_sentence(
        &self,
        session_id: impl Display,
        sentence_id: impl Display,
        body: Value,
    ) -> Response {
        self.put(
            &format!("/api/progress/sentence/{}/{}", session_id, sentence_id),
            &body,
        )
        .await
    }

    // ========================================================================
    // Coaching Endpoints
    // ========================================================================

    /// POST /api/ai/feedback
    pub async fn ai_feedback(&self, body: Value) -> Response {
        self.post("/api/ai/feedback", &body).await
    }

    /// POST /api/ai/improve
    pub async fn ai_improve(&self, body: Value) -> Response {
        self.post("/api/ai/improve", &body).await
    }

    // ========================================================================
    // Admin Endpoints
    // ========================================================================

    /// GET /admin/users
    pub async fn admin_list_users(&self) -> Response {
        self.get("/admin/users").await
    }

    /// GET /admin/speeches
    pub async fn admin_list_speeches(&self) -> Response {
        self.get("/admin/speeches").await
    }

    /// DELETE /admin/users/{id}
    pub async fn admin_delete_user(&self, id: impl Display) -> Response {
        self.delete(&format!("/admin/users/{}", id)).await
    }

    /// DELETE /admin/speeches/{id}
    pub async fn admin_delete_speech(&self, id: impl Display) -> Response {
        self.delete(&format!("/admin/speeches/{}", id)).await
    }
}
