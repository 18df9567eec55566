//! Coaching endpoints backed by the language model. They do not require a
//! session, like the practice pages that call them before sign-in.

use super::api_error::{ApiError, ApiResult, JsonBody};
use super::metrics::record_llm_request;
use super::state::{GuardedCoach, ServerState};
use crate::coach::{AnalysisType, FeedbackOutcome, LlmError};

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct FeedbackBody {
    transcript: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct ImproveBody {
    draft: Option<String>,
    analysis_type: Option<String>,
}

fn outcome_label(err: &LlmError) -> &'static str {
    match err {
        LlmError::NotConfigured => "not_configured",
        LlmError::Timeout => "timeout",
        LlmError::RateLimited => "rate_limited",
        _ => "error",
    }
}

async fn speech_feedback(
    State(coach): State<GuardedCoach>,
    JsonBody(body): JsonBody<FeedbackBody>,
) -> ApiResult<Json<Value>> {
    let Some(transcript) = body.transcript.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::validation("Transcript is required."));
    };

    let feedback = coach.feedback(&transcript).await.map_err(|err| {
        record_llm_request("feedback", outcome_label(&err));
        ApiError::from(err)
    })?;

    Ok(Json(match feedback.outcome {
        FeedbackOutcome::Structured(data) => {
            record_llm_request("feedback", "structured");
            json!({ "success": true, "structured": true, "data": data })
        }
        FeedbackOutcome::Raw(text) => {
            record_llm_request("feedback", "raw");
            json!({ "success": true, "structured": false, "feedback": text })
        }
    }))
}

async fn improve_speech(
    State(coach): State<GuardedCoach>,
    JsonBody(body): JsonBody<ImproveBody>,
) -> ApiResult<Json<Value>> {
    let Some(draft) = body.draft.filter(|d| !d.trim().is_empty()) else {
        return Err(ApiError::validation("Draft speech is required."));
    };
    let analysis_type = AnalysisType::parse_lossy(body.analysis_type.as_deref());

    let improved = coach
        .improve(&draft, analysis_type)
        .await
        .map_err(|err| {
            record_llm_request("improve", outcome_label(&err));
            ApiError::from(err)
        })?;
    record_llm_request("improve", "success");

    Ok(Json(json!({
        "success": true,
        "text": improved.text,
        "improvedVersion": improved.parsed.improved_version,
        "sections": improved.parsed.sections,
    })))
}

pub fn make_ai_routes(state: ServerState) -> Router {
    Router::new()
        .route("/feedback", post(speech_feedback))
        .route("/improve", post(improve_speech))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_llm_failures() {
        assert_eq!(outcome_label(&LlmError::NotConfigured), "not_configured");
        assert_eq!(outcome_label(&LlmError::Timeout), "timeout");
        assert_eq!(
            outcome_label(&LlmError::InvalidResponse("x".to_string())),
            "error"
        );
    }
}
