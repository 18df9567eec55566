use crate::coach::LlmError;
use crate::user::AuthError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Failure of a request handler, rendered as
/// `{ "success": false, "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Internal errors only expose their
    /// outermost context.
    fn client_message(&self) -> String {
        match self {
            ApiError::Internal(err) => format!("Internal server error: {}", err),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(err) => error!("{} internal error: {:?}", status.as_u16(), err),
            ApiError::Upstream(msg) | ApiError::Unavailable(msg) => {
                error!("{} upstream error: {}", status.as_u16(), msg)
            }
            other => warn!("{} {}", status.as_u16(), other),
        }

        let body = Json(json!({
            "success": false,
            "error": self.client_message(),
        }));
        (status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserExists => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::Internal(inner) => ApiError::Internal(inner),
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::NotConfigured => ApiError::Unavailable(err.to_string()),
            LlmError::InvalidResponse(message) => ApiError::Upstream(message),
            LlmError::Api { status, message } => {
                ApiError::Upstream(format!("AI service error (status {}): {}", status, message))
            }
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejections use the error envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn renders_envelope_with_status() {
        let response = ApiError::not_found("Speech not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "error": "Speech not found"})
        );
    }

    #[tokio::test]
    async fn internal_error_hides_root_cause() {
        let err = anyhow!("disk I/O error at page 42").context("Failed to load speeches");
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error: Failed to load speeches");
    }

    #[test]
    fn maps_auth_errors() {
        assert_eq!(
            ApiError::from(AuthError::UserExists).status(),
            StatusCode::CONFLICT
        );
        let invalid = ApiError::from(AuthError::InvalidCredentials);
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.to_string(), "Invalid email or password");
    }

    #[test]
    fn maps_llm_errors() {
        assert_eq!(
            ApiError::from(LlmError::NotConfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        let timeout = ApiError::from(LlmError::Timeout);
        assert_eq!(timeout.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(timeout.to_string(), "Request timeout");
        let empty = ApiError::from(LlmError::InvalidResponse("nothing".to_string()));
        assert_eq!(empty.to_string(), "nothing");
    }
}
