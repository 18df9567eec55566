//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When test data changes (user credentials, scripted model replies, etc.),
//! update only this file.

#![allow(dead_code)]

// ============================================================================
// Test User Credentials
// ============================================================================

/// Regular test user display name
pub const TEST_USER_NAME: &str = "Test Speaker";

/// Regular test user email
pub const TEST_USER_EMAIL: &str = "speaker@example.com";

/// Regular test user password
pub const TEST_PASS: &str = "testpass123";

/// Admin test user display name
pub const ADMIN_USER_NAME: &str = "Admin";

/// Admin test user email
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Admin test user password
pub const ADMIN_PASS: &str = "adminpass123";

/// Secret the test server signs session tokens with
pub const TEST_JWT_SECRET: &str = "e2e-test-secret";

// ============================================================================
// Scripted Language Model Replies
// ============================================================================

/// Default reply to feedback prompts: structured JSON wrapped in prose and
/// a code fence, the way models tend to answer.
pub const FEEDBACK_REPLY: &str = r#"Here is my evaluation:
```json
{
  "overallScore": 72,
  "metrics": {
    "clarity": { "score": 80, "feedback": "Clear main point." },
    "pace": { "score": 70, "feedback": "A little rushed." },
    "fillerWords": { "score": 60, "feedback": "Two fillers." },
    "vocabulary": { "score": 75, "feedback": "Varied enough." },
    "structure": { "score": 65, "feedback": "Needs a conclusion." }
  },
  "strengths": ["Confident opening", "Good examples"],
  "improvements": ["Fewer fillers", "Stronger ending"],
  "stats": {
    "wordCount": 42,
    "sentenceCount": 4,
    "fillerWordCount": 2,
    "wordsPerMinute": 130,
    "duration": 20
  }
}
```"#;

/// Score inside `FEEDBACK_REPLY`
pub const FEEDBACK_REPLY_SCORE: u64 = 72;

/// Default reply to improver prompts
pub const IMPROVER_REPLY: &str = "IMPROVED VERSION:\nGood evening, friends.\nThank you for coming.\n\nKEY CHANGES:\nAdded a greeting.\n";

/// `IMPROVED VERSION` section of `IMPROVER_REPLY`
pub const IMPROVER_REPLY_VERSION: &str = "Good evening, friends.\nThank you for coming.";

/// A transcript with two filler words
pub const SAMPLE_TRANSCRIPT: &str =
    "Um, thank you all for coming tonight. I basically want to talk about practice. It matters!";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
