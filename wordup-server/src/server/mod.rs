mod admin_routes;
mod ai_routes;
mod api_error;
mod auth_routes;
pub mod config;
mod http_layers;
pub mod metrics;
mod practice_routes;
mod progress_routes;
#[allow(clippy::module_inception)]
pub mod server;
pub(self) mod session;
mod speech_routes;
pub mod state;

pub use api_error::{ApiError, ApiResult};
pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
