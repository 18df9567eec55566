use super::api_error::{ApiError, ApiResult, JsonBody};
use super::metrics::record_practice_session;
use super::practice_routes::lenient_speech_id;
use super::session::Session;
use super::state::{GuardedStore, ServerState};
use crate::practice::{
    record_sentence_practice, SentenceAttempt, SentenceUpdate, SentenceUpdateOutcome,
    SessionOrder, MAX_SCORE, MIN_SCORE,
};
use crate::progress::{calendar, ProgressReport};

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const SESSION_NOT_FOUND: &str = "Session not found";
const SENTENCE_NOT_FOUND: &str = "Sentence not found";

async fn overall_progress(
    session: Session,
    State(store): State<GuardedStore>,
) -> ApiResult<Json<Value>> {
    let sessions = store.get_practice_sessions(session.user_id, SessionOrder::OldestFirst, None)?;
    let progress = ProgressReport::compute(&sessions, Utc::now());
    Ok(Json(json!({ "success": true, "progress": progress })))
}

async fn practice_calendar(
    session: Session,
    State(store): State<GuardedStore>,
) -> ApiResult<Json<Value>> {
    let sessions = store.get_practice_sessions(session.user_id, SessionOrder::OldestFirst, None)?;
    Ok(Json(json!({
        "success": true,
        "calendar": calendar(&sessions, Utc::now()),
    })))
}

async fn difficult_sentences(
    session: Session,
    State(store): State<GuardedStore>,
) -> ApiResult<Json<Value>> {
    let sentences = store.get_difficult_sentences(session.user_id)?;
    Ok(Json(json!({
        "success": true,
        "difficultSentences": sentences,
    })))
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct SentencePracticeBody {
    speech_id: Option<Value>,
    sentence_text: Option<String>,
    sentence_index: Option<i64>,
    score: Option<f64>,
    flag_as_difficult: Option<bool>,
    notes: Option<String>,
}

impl SentencePracticeBody {
    fn into_attempt(self) -> ApiResult<SentenceAttempt> {
        let (Some(sentence_text), Some(sentence_index), Some(score)) = (
            self.sentence_text.filter(|t| !t.trim().is_empty()),
            self.sentence_index,
            self.score,
        ) else {
            return Err(ApiError::validation(
                "Sentence text, index, and score are required",
            ));
        };
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(ApiError::validation("Score must be between 0 and 100"));
        }

        Ok(SentenceAttempt {
            speech_id: lenient_speech_id(self.speech_id.as_ref()),
            sentence_text,
            sentence_index,
            score: score.round() as u32,
            flag_as_difficult: self.flag_as_difficult,
            notes: self.notes.filter(|n| !n.is_empty()),
        })
    }
}

async fn sentence_practice(
    session: Session,
    State(store): State<GuardedStore>,
    JsonBody(body): JsonBody<SentencePracticeBody>,
) -> ApiResult<Json<Value>> {
    let attempt = body.into_attempt()?;
    let result = record_sentence_practice(store.as_ref(), session.user_id, &attempt, Utc::now())?;
    if result.attempts == 1 {
        record_practice_session("sentence");
    }
    debug!(
        "User {} practiced sentence {} of session {} ({} attempts)",
        session.user_id, result.sentence_index, result.session_id, result.attempts
    );
    Ok(Json(json!({
        "success": true,
        "message": "Sentence practice saved",
        "sentenceResult": result,
    })))
}

async fn update_sentence(
    session: Session,
    State(store): State<GuardedStore>,
    Path((session_id, sentence_id)): Path<(String, String)>,
    JsonBody(update): JsonBody<SentenceUpdate>,
) -> ApiResult<Json<Value>> {
    let session_id = session_id
        .parse::<usize>()
        .map_err(|_| ApiError::not_found(SESSION_NOT_FOUND))?;
    let sentence_id = sentence_id
        .parse::<usize>()
        .map_err(|_| ApiError::not_found(SENTENCE_NOT_FOUND))?;

    match store.update_sentence_result(session.user_id, session_id, sentence_id, &update)? {
        SentenceUpdateOutcome::SessionNotFound => Err(ApiError::not_found(SESSION_NOT_FOUND)),
        SentenceUpdateOutcome::SentenceNotFound => Err(ApiError::not_found(SENTENCE_NOT_FOUND)),
        SentenceUpdateOutcome::Updated(sentence) => Ok(Json(json!({
            "success": true,
            "message": "Sentence updated",
            "sentence": sentence,
        }))),
    }
}

pub fn make_progress_routes(state: ServerState) -> Router {
    Router::new()
        .route("/overall", get(overall_progress))
        .route("/calendar", get(practice_calendar))
        .route("/difficult-sentences", get(difficult_sentences))
        .route("/sentence-practice", post(sentence_practice))
        .route("/sentence/{session_id}/{sentence_id}", put(update_sentence))
        .with_state(state)
}
