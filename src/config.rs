//! Configuration module for environment variables and application settings

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::client::prediction::DEFAULT_REQUEST_TIMEOUT;
use crate::database::DatabaseConfig;

const DEV_JWT_SECRET: &str = "dev_secret";

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Token signing configuration
    pub auth: AuthConfig,

    /// User storage; `None` selects the in-memory repository
    pub database: Option<DatabaseConfig>,

    /// Upstream prediction service
    pub prediction: PredictionConfig,

    /// Settings used by the CLI client commands
    pub client: ClientConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct PredictionConfig {
    pub service_url: Url,
    /// Bound on an outstanding prediction request
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub credentials_path: PathBuf,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn url_var(name: &str, default: &str) -> Result<Url> {
    let raw = var_or(name, default);
    Url::parse(&raw).with_context(|| format!("{} is not a valid URL: {}", name, raw))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(|| parsed_or("SERVER_PORT", 3000));

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });

        let database = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Some(DatabaseConfig::from_url(
                url.trim(),
                parsed_or("DATABASE_MAX_CONNECTIONS", 16),
            )?),
            _ => None,
        };

        let credentials_path = match env::var("CREDENTIALS_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_credentials_path(),
        };

        Ok(Self {
            server: ServerConfig {
                host: var_or("SERVER_HOST", "127.0.0.1"),
                port,
                cors_origins: var_or("CORS_ORIGINS", "http://localhost:3001")
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect(),
            },

            auth: AuthConfig {
                jwt_secret,
                token_ttl: chrono::Duration::hours(parsed_or("TOKEN_TTL_HOURS", 24)),
            },

            database,

            prediction: PredictionConfig {
                service_url: url_var("PREDICTION_SERVICE_URL", "http://127.0.0.1:8000")?,
                request_timeout: Duration::from_secs(parsed_or(
                    "PREDICTION_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT.as_secs(),
                )),
            },

            client: ClientConfig {
                api_base_url: url_var("API_BASE_URL", "http://127.0.0.1:3000")?,
                credentials_path,
            },
        })
    }
}

fn default_credentials_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crypto-predictor")
        .join("credentials")
}
