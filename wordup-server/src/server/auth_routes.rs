//! Registration, login and the current-user endpoint.

use super::api_error::{ApiError, ApiResult, JsonBody};
use super::metrics::record_login_attempt;
use super::session::{Session, COOKIE_SESSION_TOKEN_KEY};
use super::state::{GuardedUserManager, ServerState};
use crate::user::{AuthError, NewUser, UsageContext, User, UserRole, UserType};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct RegisterBody {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    user_type: Option<String>,
    usage_context: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
struct AuthResponse {
    success: bool,
    message: &'static str,
    token: String,
    user: User,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn session_cookie(token: String, max_age: std::time::Duration) -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION_TOKEN_KEY, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age.as_secs() as i64))
        .build()
}

async fn register(
    State(user_manager): State<GuardedUserManager>,
    JsonBody(body): JsonBody<RegisterBody>,
) -> ApiResult<Response> {
    let (Some(name), Some(email), Some(password)) = (
        non_blank(body.name),
        non_blank(body.email),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation(
            "Name, email and password are required",
        ));
    };
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let new_user = NewUser {
        name: name.trim().to_string(),
        email,
        role: UserRole::User,
        user_type: body
            .user_type
            .as_deref()
            .map(UserType::parse_lossy)
            .unwrap_or_default(),
        usage_context: body
            .usage_context
            .as_deref()
            .map(UsageContext::parse_lossy)
            .unwrap_or_default(),
    };
    let (user, token) = user_manager.register(new_user, &password)?;
    info!("Registered user {} ({})", user.id, user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully",
            token,
            user,
        }),
    )
        .into_response())
}

async fn login(
    State(user_manager): State<GuardedUserManager>,
    jar: CookieJar,
    JsonBody(body): JsonBody<LoginBody>,
) -> ApiResult<Response> {
    let (Some(email), Some(password)) = (non_blank(body.email), body.password) else {
        return Err(ApiError::validation("Email and password are required"));
    };
    if password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let (user, token) = match user_manager.login(&email, &password) {
        Ok(logged_in) => {
            record_login_attempt("success");
            logged_in
        }
        Err(err) => {
            if let AuthError::InvalidCredentials = err {
                record_login_attempt("failure");
            } else {
                record_login_attempt("error");
            }
            return Err(err.into());
        }
    };
    debug!("User {} logged in", user.id);

    let jar = jar.add(session_cookie(token.clone(), user_manager.token_ttl()));
    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            message: "Login successful",
            token,
            user,
        }),
    )
        .into_response())
}

async fn me(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = user_manager
        .get_user(session.user_id)?
        .ok_or_else(|| ApiError::from(AuthError::InvalidToken))?;
    Ok(Json(serde_json::json!({ "success": true, "user": user })))
}

async fn logout(jar: CookieJar) -> impl IntoResponse {
    let cookie = Cookie::build((COOKIE_SESSION_TOKEN_KEY, ""))
        .path("/")
        .build();
    (
        jar.remove(cookie),
        Json(serde_json::json!({
            "success": true,
            "message": "Logged out successfully",
        })),
    )
}

pub fn make_auth_routes(state: ServerState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/logout", post(logout))
        .with_state(state)
}
