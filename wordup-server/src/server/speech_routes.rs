use super::api_error::{ApiError, ApiResult, JsonBody};
use super::session::Session;
use super::state::{GuardedStore, ServerState};
use crate::speech::{NewSpeech, SpeechUpdate};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::debug;

const SPEECH_NOT_FOUND: &str = "Speech not found";

/// Ids that are not numbers can't name a speech.
fn parse_speech_id(raw: &str) -> ApiResult<usize> {
    raw.parse::<usize>()
        .map_err(|_| ApiError::not_found(SPEECH_NOT_FOUND))
}

async fn list_speeches(
    session: Session,
    State(store): State<GuardedStore>,
) -> ApiResult<Json<serde_json::Value>> {
    let speeches = store.get_user_speeches(session.user_id)?;
    Ok(Json(json!({ "success": true, "speeches": speeches })))
}

async fn get_speech(
    session: Session,
    State(store): State<GuardedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let speech_id = parse_speech_id(&id)?;
    let speech = store
        .get_speech(session.user_id, speech_id)?
        .ok_or_else(|| ApiError::not_found(SPEECH_NOT_FOUND))?;
    Ok(Json(json!({ "success": true, "speech": speech })))
}

async fn create_speech(
    session: Session,
    State(store): State<GuardedStore>,
    JsonBody(new_speech): JsonBody<NewSpeech>,
) -> ApiResult<Response> {
    if !new_speech.is_valid() {
        return Err(ApiError::validation(
            "Title and original draft are required",
        ));
    }
    let speech_id = store.create_speech(session.user_id, &new_speech)?;
    let speech = store
        .get_speech(session.user_id, speech_id)?
        .ok_or_else(|| ApiError::not_found(SPEECH_NOT_FOUND))?;
    debug!("User {} saved speech {}", session.user_id, speech_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Speech saved successfully",
            "speech": speech,
        })),
    )
        .into_response())
}

async fn update_speech(
    session: Session,
    State(store): State<GuardedStore>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<SpeechUpdate>,
) -> ApiResult<Json<serde_json::Value>> {
    let speech_id = parse_speech_id(&id)?;
    let speech = store
        .update_speech(session.user_id, speech_id, &update)?
        .ok_or_else(|| ApiError::not_found(SPEECH_NOT_FOUND))?;
    Ok(Json(json!({
        "success": true,
        "message": "Speech updated successfully",
        "speech": speech,
    })))
}

async fn delete_speech(
    session: Session,
    State(store): State<GuardedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let speech_id = parse_speech_id(&id)?;
    if !store.delete_speech(session.user_id, speech_id)? {
        return Err(ApiError::not_found(SPEECH_NOT_FOUND));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Speech deleted successfully",
    })))
}

async fn record_practice(
    session: Session,
    State(store): State<GuardedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let speech_id = parse_speech_id(&id)?;
    let practice_count = store
        .record_speech_practice(session.user_id, speech_id)?
        .ok_or_else(|| ApiError::not_found(SPEECH_NOT_FOUND))?;
    Ok(Json(json!({
        "success": true,
        "message": "Practice recorded",
        "practiceCount": practice_count,
    })))
}

pub fn make_speech_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_speeches).post(create_speech))
        .route(
            "/{id}",
            get(get_speech).put(update_speech).delete(delete_speech),
        )
        .route("/{id}/practice", post(record_practice))
        .with_state(state)
}
