//! Practice session endpoints: manual and coach-scored recording, history
//! listings and the headline stats.

use super::api_error::{ApiError, ApiResult, JsonBody};
use super::metrics::{record_llm_request, record_practice_session};
use super::session::Session;
use super::state::{GuardedCoach, GuardedStore, ServerState};
use crate::coach::{session_from_feedback, FeedbackOutcome};
use crate::practice::{
    DetailedScores, LegacySessionSummary, NewGrammarIssue, NewPracticeSession,
    NewVocabularyEntry, SessionFeedback, SessionMetrics, SessionOrder, MAX_SCORE, MIN_SCORE,
};
use crate::progress::PracticeStats;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 200;

const SESSION_NOT_FOUND: &str = "Session not found";

/// Clients send speech ids as numbers, numeric strings, or placeholders
/// like `"null"` for free practice. Anything that is not a number is free
/// practice.
pub(super) fn lenient_speech_id(value: Option<&Value>) -> Option<usize> {
    match value? {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct ManualSessionBody {
    speech_id: Option<Value>,
    transcript: Option<String>,
    score: Option<f64>,
    word_count: Option<u32>,
    sentence_count: Option<u32>,
    filler_word_count: Option<u32>,
    words_per_minute: Option<u32>,
    duration: Option<u32>,
    feedback: Option<String>,
    strengths: Vec<String>,
    improvements: Vec<String>,
    detailed_scores: Option<DetailedScores>,
    grammar_issues: Vec<NewGrammarIssue>,
    vocabulary_learned: Vec<NewVocabularyEntry>,
}

impl ManualSessionBody {
    fn into_new_session(self) -> ApiResult<NewPracticeSession> {
        let (Some(transcript), Some(score), Some(word_count)) = (
            self.transcript.filter(|t| !t.trim().is_empty()),
            self.score,
            self.word_count.filter(|c| *c > 0),
        ) else {
            return Err(ApiError::validation(
                "Transcript, score, and word count are required",
            ));
        };
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(ApiError::validation("Score must be between 0 and 100"));
        }

        Ok(NewPracticeSession {
            speech_id: lenient_speech_id(self.speech_id.as_ref()),
            transcript,
            score: score.round() as u32,
            detailed_scores: self.detailed_scores.unwrap_or_default(),
            metrics: SessionMetrics {
                word_count,
                sentence_count: self.sentence_count.unwrap_or(0),
                filler_word_count: self.filler_word_count.unwrap_or(0),
                words_per_minute: self.words_per_minute,
                duration: self.duration,
            },
            feedback: SessionFeedback {
                strengths: self.strengths,
                improvements: self.improvements,
                overall_feedback: self.feedback.filter(|f| !f.is_empty()),
            },
            grammar_issues: self.grammar_issues,
            vocabulary_learned: self.vocabulary_learned,
            practice_date: None,
        })
    }
}

async fn create_session(
    session: Session,
    State(store): State<GuardedStore>,
    JsonBody(body): JsonBody<ManualSessionBody>,
) -> ApiResult<Response> {
    let new_session = body.into_new_session()?;
    let practice = store.create_practice_session(session.user_id, &new_session)?;
    record_practice_session("manual");
    debug!(
        "User {} saved practice session {} (speech {:?})",
        session.user_id, practice.id, practice.speech_id
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Practice session saved",
            "session": practice,
        })),
    )
        .into_response())
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct ScoredSessionBody {
    speech_id: Option<Value>,
    transcript: Option<String>,
    duration: Option<u32>,
}

async fn save_scored_session(
    session: Session,
    State(store): State<GuardedStore>,
    State(coach): State<GuardedCoach>,
    JsonBody(body): JsonBody<ScoredSessionBody>,
) -> ApiResult<Json<Value>> {
    let Some(transcript) = body.transcript.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::validation("Transcript is required"));
    };

    let feedback = match coach.feedback(&transcript).await {
        Ok(feedback) => feedback,
        Err(err) => {
            record_llm_request("feedback", "error");
            return Err(err.into());
        }
    };
    let reply = match feedback.outcome {
        FeedbackOutcome::Structured(reply) => {
            record_llm_request("feedback", "structured");
            reply
        }
        FeedbackOutcome::Raw(_) => {
            record_llm_request("feedback", "raw");
            return Err(ApiError::Upstream("Failed to get AI feedback".to_string()));
        }
    };

    let new_session = session_from_feedback(
        &reply,
        &transcript,
        lenient_speech_id(body.speech_id.as_ref()),
        body.duration,
        &feedback.stats,
    );
    let practice = store.create_practice_session(session.user_id, &new_session)?;
    record_practice_session("ai");
    info!(
        "Stored coach-scored session {} for user {} with score {}",
        practice.id, session.user_id, practice.score
    );

    Ok(Json(json!({
        "success": true,
        "message": "Practice session saved successfully",
        "data": {
            "sessionId": practice.id,
            "score": practice.score,
            "detailedScores": practice.detailed_scores,
            "feedback": {
                "strengths": practice.feedback.strengths,
                "improvements": practice.feedback.improvements,
            },
        },
    })))
}

async fn list_sessions(
    session: Session,
    State(store): State<GuardedStore>,
) -> ApiResult<Json<Value>> {
    let sessions = store.get_practice_sessions(session.user_id, SessionOrder::NewestFirst, None)?;
    Ok(Json(json!({ "success": true, "sessions": sessions })))
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct HistoryQuery {
    limit: Option<String>,
}

impl HistoryQuery {
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT)
    }
}

async fn session_history(
    session: Session,
    State(store): State<GuardedStore>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Value>> {
    let sessions = store.get_practice_sessions(
        session.user_id,
        SessionOrder::NewestFirst,
        Some(query.limit()),
    )?;
    let summaries: Vec<LegacySessionSummary> =
        sessions.iter().map(LegacySessionSummary::from).collect();
    Ok(Json(json!({ "success": true, "sessions": summaries })))
}

async fn practice_stats(
    session: Session,
    State(store): State<GuardedStore>,
) -> ApiResult<Json<Value>> {
    let sessions = store.get_practice_sessions(session.user_id, SessionOrder::OldestFirst, None)?;
    let stats = PracticeStats::compute(&sessions, Utc::now());
    Ok(Json(json!({ "success": true, "stats": stats })))
}

async fn speech_sessions(
    session: Session,
    State(store): State<GuardedStore>,
    Path(speech_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let speech_id = speech_id
        .parse::<usize>()
        .map_err(|_| ApiError::validation("Invalid speech ID"))?;
    let practices = store.get_speech_practice_sessions(session.user_id, speech_id)?;
    Ok(Json(json!({ "success": true, "practices": practices })))
}

async fn get_session(
    session: Session,
    State(store): State<GuardedStore>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let not_found = || ApiError::not_found("Practice session not found");
    let session_id = session_id.parse::<usize>().map_err(|_| not_found())?;
    let practice = store
        .get_practice_session(session.user_id, session_id)?
        .ok_or_else(not_found)?;
    Ok(Json(json!({ "success": true, "practice": practice })))
}

async fn delete_session(
    session: Session,
    State(store): State<GuardedStore>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let session_id = session_id
        .parse::<usize>()
        .map_err(|_| ApiError::not_found(SESSION_NOT_FOUND))?;
    let deleted = store
        .delete_practice_session(session.user_id, session_id)?
        .ok_or_else(|| ApiError::not_found(SESSION_NOT_FOUND))?;
    debug!("User {} deleted practice session {}", session.user_id, deleted.id);
    Ok(Json(json!({
        "success": true,
        "message": "Session deleted successfully",
    })))
}

pub fn make_practice_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/save", post(save_scored_session))
        .route("/history", get(session_history))
        .route("/stats", get(practice_stats))
        .route("/speech/{speech_id}", get(speech_sessions))
        .route("/delete/{session_id}", delete(delete_session))
        .route("/{session_id}", get(get_session).delete(delete_session))
        .with_state(state)
}
