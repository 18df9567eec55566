use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wordup_server::coach::{Coach, GeminiProvider, LlmProvider};
use wordup_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_JWT_TTL_HOURS, DEFAULT_LLM_TIMEOUT_SEC,
};
use wordup_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use wordup_server::sqlite_persistence::SqliteStore;
use wordup_server::user::{JwtKeys, UserManager, UserStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the SQLite database (wordup.db).
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Secret used to sign session tokens. Falls back to JWT_SECRET.
    #[clap(long)]
    pub jwt_secret: Option<String>,

    /// Lifetime of issued session tokens, in hours.
    #[clap(long, default_value_t = DEFAULT_JWT_TTL_HOURS)]
    pub jwt_ttl_hours: u64,

    /// Gemini API key. Falls back to GOOGLE_GEMINI_API_KEY, GEMINI_API_KEY
    /// and GOOGLE_API_KEY.
    #[clap(long)]
    pub gemini_api_key: Option<String>,

    #[clap(long)]
    pub gemini_model: Option<String>,

    #[clap(long)]
    pub gemini_base_url: Option<String>,

    /// Timeout in seconds for language model requests.
    #[clap(long, default_value_t = DEFAULT_LLM_TIMEOUT_SEC)]
    pub llm_timeout_sec: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            frontend_dir_path: self.frontend_dir_path.clone(),
            jwt_secret: self.jwt_secret.clone(),
            jwt_ttl_hours: self.jwt_ttl_hours,
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_model: self.gemini_model.clone(),
            gemini_base_url: self.gemini_base_url.clone(),
            llm_timeout_sec: self.llm_timeout_sec,
        }
    }
}

fn make_coach(config: &AppConfig) -> Coach {
    let llm = config.llm.api_key.as_ref().map(|api_key| {
        Arc::new(GeminiProvider::new(
            config.llm.base_url.clone(),
            config.llm.model.clone(),
            api_key.clone(),
        )) as Arc<dyn LlmProvider>
    });
    Coach::new(llm, config.llm.timeout)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening SQLite database at {:?}...", config.db_path());
    let store = Arc::new(SqliteStore::new(config.db_path())?);

    let jwt = JwtKeys::new(&config.auth.jwt_secret, config.auth.jwt_ttl);
    if let Some(admin) = &config.admin {
        let user_store: Arc<dyn UserStore> = store.clone();
        let admin_user = UserManager::new(user_store, jwt.clone())
            .ensure_admin(&admin.name, &admin.email, &admin.password)
            .context("Failed to bootstrap admin account")?;
        info!("Admin account ready: {}", admin_user.email);
    }

    let coach = make_coach(&config);
    match coach.describe() {
        Some(llm) => info!("Language model configured: {} at {}", llm, config.llm.base_url),
        None => warn!("No Gemini API key configured, coaching endpoints will answer 503"),
    }

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        metrics_port: config.metrics_port,
        frontend_dir_path: config.frontend_dir_path.clone(),
    };

    info!("Ready to serve at port {}!", config.port);
    info!("Metrics available at port {}!", config.metrics_port);
    run_server(server_config, store, jwt, coach).await
}
