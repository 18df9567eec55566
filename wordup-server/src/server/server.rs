use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::coach::Coach;
use crate::store::FullStore;
use crate::user::{JwtKeys, UserManager, UserStore};
use axum::{
    extract::{OriginalUri, State},
    http::Method,
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use super::admin_routes::make_admin_routes;
use super::ai_routes::make_ai_routes;
use super::api_error::ApiError;
use super::auth_routes::make_auth_routes;
use super::metrics::{init_metrics, metrics_handler};
use super::practice_routes::make_practice_routes;
use super::progress_routes::make_progress_routes;
use super::speech_routes::make_speech_routes;
use super::{log_requests, state::*, ServerConfig};

pub const HOME_MESSAGE: &str = "WordUP API is running...";

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> &'static str {
    info!(
        "Home hit, build {} up {}",
        state.hash,
        format_uptime(state.start_time.elapsed())
    );
    HOME_MESSAGE
}

async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("Cannot {} {}", method, uri.path()))
}

fn with_json_fallback(router: Router) -> Router {
    router.fallback(route_not_found)
}

impl ServerState {
    fn new(
        config: ServerConfig,
        store: GuardedStore,
        user_manager: UserManager,
        coach: Coach,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            store,
            user_manager: Arc::new(user_manager),
            coach: Arc::new(coach),
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

pub fn make_app<S: FullStore + 'static>(
    config: ServerConfig,
    store: Arc<S>,
    jwt: JwtKeys,
    coach: Coach,
) -> Result<Router> {
    let user_store: Arc<dyn UserStore> = store.clone();
    let user_manager = UserManager::new(user_store, jwt);
    let state = ServerState::new(config.clone(), store, user_manager, coach);

    // Unknown API paths get the JSON 404, never the SPA fallback.
    let api_routes: Router = Router::new()
        .nest("/auth", with_json_fallback(make_auth_routes(state.clone())))
        .nest("/speech", with_json_fallback(make_speech_routes(state.clone())))
        .nest("/admin", with_json_fallback(make_admin_routes(state.clone())))
        .nest(
            "/api",
            with_json_fallback(
                Router::new()
                    .nest("/practice", make_practice_routes(state.clone()))
                    .nest("/progress", make_progress_routes(state.clone()))
                    .nest("/ai", make_ai_routes(state.clone())),
            ),
        );

    let home_router: Router = match &config.frontend_dir_path {
        Some(frontend_path) => {
            let index = std::path::Path::new(frontend_path).join("index.html");
            let static_files_service = ServeDir::new(frontend_path)
                .append_index_html_on_directories(true)
                .fallback(ServeFile::new(index));
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .fallback(route_not_found)
            .with_state(state.clone()),
    };

    let mut app: Router = home_router.merge(api_routes);
    app = app
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server<S: FullStore + 'static>(
    config: ServerConfig,
    store: Arc<S>,
    jwt: JwtKeys,
    coach: Coach,
) -> Result<()> {
    init_metrics();

    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(config, store, jwt, coach)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Listening on port {}, metrics on port {}", port, metrics_port);

    tokio::select! {
        result = axum::serve(listener, app) => result.context("HTTP server failed"),
        result = axum::serve(metrics_listener, make_metrics_app()) => result.context("Metrics server failed"),
    }
}
