use super::api_error::ApiError;
use super::state::ServerState;
use crate::user::{AuthError, UserRole};

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::debug;

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

const NO_TOKEN_MESSAGE: &str = "Access denied. No token provided.";
const ADMIN_ONLY_MESSAGE: &str = "Access denied. Admin only.";

#[derive(Debug)]
pub struct Session {
    pub user_id: usize,
    pub role: UserRole,
    pub token: String,
}

/// A session whose user holds the admin role.
#[derive(Debug)]
pub struct AdminSession(pub Session);

fn extract_session_token_from_headers(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(HEADER_SESSION_TOKEN_KEY)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("Bearer") => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then(|| token.to_string())
}

fn extract_session_token_from_cookies(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn extract_session_from_request_parts(
    parts: &Parts,
    ctx: &ServerState,
) -> Result<Session, ApiError> {
    let token = extract_session_token_from_headers(parts)
        .or_else(|| extract_session_token_from_cookies(parts))
        .ok_or_else(|| {
            debug!("No token in headers nor cookies.");
            ApiError::Unauthorized(NO_TOKEN_MESSAGE.to_string())
        })?;

    let claims = ctx.user_manager.authenticate(&token).map_err(|err| {
        if let AuthError::InvalidToken = err {
            debug!("Rejected session token");
        }
        ApiError::from(err)
    })?;

    Ok(Session {
        user_id: claims.user_id,
        role: claims.role,
        token,
    })
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_session_from_request_parts(parts, ctx)
    }
}

impl FromRequestParts<ServerState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let session = extract_session_from_request_parts(parts, ctx)?;
        if session.role != UserRole::Admin {
            return Err(ApiError::Forbidden(ADMIN_ONLY_MESSAGE.to_string()));
        }
        Ok(AdminSession(session))
    }
}
