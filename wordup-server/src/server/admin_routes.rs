use super::api_error::{ApiError, ApiResult};
use super::session::AdminSession;
use super::state::{GuardedStore, ServerState};

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

const USER_NOT_FOUND: &str = "User not found";
const SPEECH_NOT_FOUND: &str = "Speech not found";

async fn list_users(
    _session: AdminSession,
    State(store): State<GuardedStore>,
) -> ApiResult<Json<Value>> {
    let users = store.get_all_users()?;
    Ok(Json(json!({ "success": true, "users": users })))
}

async fn list_speeches(
    _session: AdminSession,
    State(store): State<GuardedStore>,
) -> ApiResult<Json<Value>> {
    let speeches = store.get_all_speeches()?;
    Ok(Json(json!({ "success": true, "speeches": speeches })))
}

async fn delete_user(
    AdminSession(session): AdminSession,
    State(store): State<GuardedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let user_id = id
        .parse::<usize>()
        .map_err(|_| ApiError::not_found(USER_NOT_FOUND))?;
    if !store.delete_user(user_id)? {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }
    info!("Admin {} deleted user {}", session.user_id, user_id);
    Ok(Json(json!({
        "success": true,
        "message": "User and their speeches deleted successfully",
    })))
}

async fn delete_speech(
    AdminSession(session): AdminSession,
    State(store): State<GuardedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let speech_id = id
        .parse::<usize>()
        .map_err(|_| ApiError::not_found(SPEECH_NOT_FOUND))?;
    if !store.delete_any_speech(speech_id)? {
        return Err(ApiError::not_found(SPEECH_NOT_FOUND));
    }
    info!("Admin {} deleted speech {}", session.user_id, speech_id);
    Ok(Json(json!({
        "success": true,
        "message": "Speech deleted successfully",
    })))
}

pub fn make_admin_routes(state: ServerState) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/speeches", get(list_speeches))
        .route("/users/{id}", delete(delete_user))
        .route("/speeches/{id}", delete(delete_speech))
        .with_state(state)
}
