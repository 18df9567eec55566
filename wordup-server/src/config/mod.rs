mod file_config;

pub use file_config::{AdminConfig, FileConfig, LlmConfig};

use crate::coach::llm::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::server::RequestsLoggingLevel;
use crate::user::generate_jwt_secret;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DB_FILE_NAME: &str = "wordup.db";
pub const DEFAULT_JWT_TTL_HOURS: u64 = 24 * 7;
pub const DEFAULT_LLM_TIMEOUT_SEC: u64 = 120;

/// Environment variables searched, in order, for the Gemini API key.
pub const GEMINI_API_KEY_ENV_VARS: &[&str] =
    &["GOOGLE_GEMINI_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub jwt_secret: Option<String>,
    pub jwt_ttl_hours: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub llm_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_dir: None,
            port: 5000,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            frontend_dir_path: None,
            jwt_secret: None,
            jwt_ttl_hours: DEFAULT_JWT_TTL_HOURS,
            gemini_api_key: None,
            gemini_model: None,
            gemini_base_url: None,
            llm_timeout_sec: DEFAULT_LLM_TIMEOUT_SEC,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub db_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,

    pub auth: AuthSettings,
    pub llm: LlmSettings,
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    /// True when no secret was configured and a random one was generated,
    /// tokens then do not survive a restart.
    pub jwt_secret_generated: bool,
    pub jwt_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// `None` leaves the coaching endpoints answering 503.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present, the process environment
    /// fills in secrets neither of them set.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        Self::resolve_with_env(cli, file_config, |name| std::env::var(name).ok())
    }

    pub fn resolve_with_env<E>(
        cli: &CliConfig,
        file_config: Option<FileConfig>,
        env: E,
    ) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let file = file_config.unwrap_or_default();
        let env = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        // TOML overrides CLI for each field
        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        // Validate db_dir exists
        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let configured_secret = file
            .jwt_secret
            .or_else(|| cli.jwt_secret.clone())
            .or_else(|| env("JWT_SECRET"));
        let auth = match configured_secret {
            Some(jwt_secret) => AuthSettings {
                jwt_secret,
                jwt_secret_generated: false,
                jwt_ttl: hours(file.jwt_ttl_hours.unwrap_or(cli.jwt_ttl_hours)),
            },
            None => {
                warn!("No JWT secret configured, generated a random one. Issued tokens will not survive a restart.");
                AuthSettings {
                    jwt_secret: generate_jwt_secret(),
                    jwt_secret_generated: true,
                    jwt_ttl: hours(file.jwt_ttl_hours.unwrap_or(cli.jwt_ttl_hours)),
                }
            }
        };

        // LLM settings - TOML [llm] section, then CLI, then environment
        let llm_file = file.llm.unwrap_or_default();
        let api_key = llm_file
            .api_key
            .or_else(|| cli.gemini_api_key.clone())
            .or_else(|| GEMINI_API_KEY_ENV_VARS.iter().find_map(|name| env(*name)));
        let model = llm_file
            .model
            .or_else(|| cli.gemini_model.clone())
            .or_else(|| env("GEMINI_MODEL"))
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base_url = llm_file
            .base_url
            .or_else(|| cli.gemini_base_url.clone())
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        let timeout = Duration::from_secs(llm_file.timeout_sec.unwrap_or(cli.llm_timeout_sec));

        if let Some(admin) = &file.admin {
            if admin.email.trim().is_empty() || admin.password.is_empty() {
                bail!("[admin] requires a non-empty email and password");
            }
        }

        Ok(Self {
            db_dir,
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            auth,
            llm: LlmSettings {
                api_key,
                model,
                base_url,
                timeout,
            },
            admin: file.admin,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir.join(DB_FILE_NAME)
    }
}

fn hours(hours: u64) -> Duration {
    Duration::from_secs(hours * 60 * 60)
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn make_temp_db_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn cli_with_dir(dir: &TempDir) -> CliConfig {
        CliConfig {
            db_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("headers"),
            Some(RequestsLoggingLevel::Headers)
        ));
        // Case insensitive
        assert!(matches!(
            parse_logging_level("BODY"),
            Some(RequestsLoggingLevel::Body)
        ));
        // Invalid
        assert!(parse_logging_level("invalid").is_none());
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_dir = make_temp_db_dir();
        let cli = CliConfig {
            db_dir: Some(temp_dir.path().to_path_buf()),
            port: 5050,
            metrics_port: 9191,
            logging_level: RequestsLoggingLevel::Headers,
            frontend_dir_path: Some("/frontend".to_string()),
            jwt_secret: Some("cli-secret".to_string()),
            jwt_ttl_hours: 2,
            gemini_api_key: Some("cli-key".to_string()),
            gemini_model: Some("gemini-cli".to_string()),
            gemini_base_url: Some("http://llm:1234".to_string()),
            llm_timeout_sec: 15,
        };

        let config = AppConfig::resolve_with_env(&cli, None, no_env).unwrap();

        assert_eq!(config.db_dir, temp_dir.path());
        assert_eq!(config.port, 5050);
        assert_eq!(config.metrics_port, 9191);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        assert_eq!(config.frontend_dir_path, Some("/frontend".to_string()));
        assert_eq!(config.auth.jwt_secret, "cli-secret");
        assert!(!config.auth.jwt_secret_generated);
        assert_eq!(config.auth.jwt_ttl, Duration::from_secs(7200));
        assert_eq!(config.llm.api_key.as_deref(), Some("cli-key"));
        assert_eq!(config.llm.model, "gemini-cli");
        assert_eq!(config.llm.base_url, "http://llm:1234");
        assert_eq!(config.llm.timeout, Duration::from_secs(15));
        assert!(config.admin.is_none());
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let temp_dir = make_temp_db_dir();
        let cli = CliConfig {
            db_dir: Some(PathBuf::from("/should/be/overridden")),
            port: 5000,
            gemini_model: Some("gemini-cli".to_string()),
            ..Default::default()
        };

        let file_config = FileConfig {
            db_dir: Some(temp_dir.path().to_string_lossy().to_string()),
            port: Some(4000),
            logging_level: Some("body".to_string()),
            llm: Some(LlmConfig {
                model: Some("gemini-toml".to_string()),
                timeout_sec: Some(5),
                ..Default::default()
            }),
            admin: Some(AdminConfig {
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                password: "rootpass".to_string(),
            }),
            ..Default::default()
        };

        let config = AppConfig::resolve_with_env(&cli, Some(file_config), no_env).unwrap();

        // TOML values should override CLI
        assert_eq!(config.db_dir, temp_dir.path());
        assert_eq!(config.port, 4000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Body);
        assert_eq!(config.llm.model, "gemini-toml");
        assert_eq!(config.llm.timeout, Duration::from_secs(5));
        // CLI value used when TOML doesn't specify
        assert_eq!(config.metrics_port, 9091);
        assert_eq!(config.admin.unwrap().email, "root@example.com");
    }

    #[test]
    fn test_env_fallbacks_in_order() {
        let temp_dir = make_temp_db_dir();
        let env: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "second"),
            ("GOOGLE_API_KEY", "third"),
            ("GOOGLE_GEMINI_API_KEY", "  "),
            ("GEMINI_MODEL", "gemini-env"),
            ("JWT_SECRET", "env-secret"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::resolve_with_env(&cli_with_dir(&temp_dir), None, |name| {
            env.get(name).map(|v| v.to_string())
        })
        .unwrap();

        // Blank values are skipped.
        assert_eq!(config.llm.api_key.as_deref(), Some("second"));
        assert_eq!(config.llm.model, "gemini-env");
        assert_eq!(config.auth.jwt_secret, "env-secret");
    }

    #[test]
    fn test_defaults_without_llm_key_or_secret() {
        let temp_dir = make_temp_db_dir();
        let config = AppConfig::resolve_with_env(&cli_with_dir(&temp_dir), None, no_env).unwrap();

        assert!(config.llm.api_key.is_none());
        assert_eq!(config.llm.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.llm.base_url, DEFAULT_GEMINI_BASE_URL);
        assert!(config.auth.jwt_secret_generated);
        assert_eq!(config.auth.jwt_secret.len(), 64);
        assert_eq!(
            config.auth.jwt_ttl,
            Duration::from_secs(DEFAULT_JWT_TTL_HOURS * 3600)
        );
    }

    #[test]
    fn test_resolve_missing_db_dir_error() {
        let cli = CliConfig::default();
        let result = AppConfig::resolve_with_env(&cli, None, no_env);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("db_dir must be specified"));
    }

    #[test]
    fn test_resolve_nonexistent_db_dir_error() {
        let cli = CliConfig {
            db_dir: Some(PathBuf::from("/nonexistent/path/that/should/not/exist")),
            ..Default::default()
        };
        let result = AppConfig::resolve_with_env(&cli, None, no_env);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_db_dir_not_directory_error() {
        // Create a temporary file (not a directory)
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let cli = CliConfig {
            db_dir: Some(temp_file.path().to_path_buf()),
            ..Default::default()
        };
        let result = AppConfig::resolve_with_env(&cli, None, no_env);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }

    #[test]
    fn test_admin_without_password_is_rejected() {
        let temp_dir = make_temp_db_dir();
        let file_config = FileConfig {
            admin: Some(AdminConfig {
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                password: String::new(),
            }),
            ..Default::default()
        };
        let result =
            AppConfig::resolve_with_env(&cli_with_dir(&temp_dir), Some(file_config), no_env);
        assert!(result.unwrap_err().to_string().contains("[admin]"));
    }

    #[test]
    fn test_db_path() {
        let temp_dir = make_temp_db_dir();
        let config = AppConfig::resolve_with_env(&cli_with_dir(&temp_dir), None, no_env).unwrap();
        assert_eq!(config.db_path(), temp_dir.path().join("wordup.db"));
    }
}
