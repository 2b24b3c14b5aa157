//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "sqlite://./testgen.db?mode=rwc";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8000;
    pub const DEV_DB_MAX_CONNECTIONS: u32 = 10;
    pub const DEV_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10MB per Swagger document
    pub const DEV_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

    // Chat-completion defaults
    pub const AI_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
    pub const AI_MODEL: &str = "qwen/qwen-2.5-72b-instruct:free";
    pub const AI_SITE_URL: &str = "http://localhost:3000";
    pub const AI_SITE_NAME: &str = "Test Generation Server";
    pub const AI_TIMEOUT_SECS: u64 = 120;
    pub const AI_MAX_RETRIES: u32 = 0;

    /// Value shipped in sample `.env` files; treated as "no key configured".
    pub const AI_PLACEHOLDER_KEY: &str = "your_openrouter_api_key_here";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Chat-completion provider settings.
#[derive(Debug, Clone)]
pub struct AiSettings {
    /// API key. `None`, blank and the sample placeholder all mean "not configured".
    pub api_key: Option<SecretString>,
    /// Full URL of the chat-completion endpoint.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sent as `HTTP-Referer` for provider attribution.
    pub site_url: String,
    /// Sent as `X-Title` for provider attribution.
    pub site_name: String,
    /// Total request timeout.
    pub timeout: Duration,
    /// Extra attempts on transport failures (0 = single attempt).
    pub max_retries: u32,
}

impl AiSettings {
    /// The configured key, if it is usable for live calls.
    pub fn credential(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| {
            let key = key.expose_secret().trim();
            !key.is_empty() && key != defaults::AI_PLACEHOLDER_KEY
        })
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::AI_BASE_URL.to_string(),
            model: defaults::AI_MODEL.to_string(),
            site_url: defaults::AI_SITE_URL.to_string(),
            site_name: defaults::AI_SITE_NAME.to_string(),
            timeout: Duration::from_secs(defaults::AI_TIMEOUT_SECS),
            max_retries: defaults::AI_MAX_RETRIES,
        }
    }
}

/// Simulated execution settings.
#[derive(Debug, Clone)]
pub struct ExecutionSettings {
    /// Sleep between simulated test cases and script runs.
    pub simulate_delays: bool,
    /// Probability that a simulated test case passes.
    pub case_pass_rate: f64,
    /// Probability that a simulated script run succeeds.
    pub script_success_rate: f64,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            simulate_delays: true,
            case_pass_rate: 0.8,
            script_success_rate: 0.9,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL (PostgreSQL or SQLite connection string)
    pub database_url: String,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// Directory for static frontend assets (optional)
    pub static_dir: Option<PathBuf>,
    /// Maximum Swagger upload size in bytes (default: 10MB)
    pub max_upload_size: usize,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Chat-completion provider settings
    pub ai: AiSettings,
    /// Simulated execution settings
    pub execution: ExecutionSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `TESTGEN_HOST`: Server host (default: 127.0.0.1)
    /// - `TESTGEN_PORT`: Server port (default: 8000)
    /// - `DATABASE_URL`: Database connection string (required in production)
    /// - `TESTGEN_DB_MAX_CONNECTIONS`: Pool size (default: 10)
    /// - `TESTGEN_STATIC_DIR`: Static assets directory
    /// - `TESTGEN_MAX_UPLOAD_SIZE`: Max Swagger upload size in bytes (default: 10MB)
    /// - `TESTGEN_CORS_ORIGINS`: Comma-separated allowed origins
    /// - `TESTGEN_SIMULATE_DELAYS`: Sleep during simulated execution (default: true)
    /// - `OPENROUTER_API_KEY`: Chat-completion API key (optional; sample output without it)
    /// - `OPENROUTER_BASE_URL`, `OPENROUTER_MODEL`, `OPENROUTER_SITE_URL`, `OPENROUTER_SITE_NAME`
    /// - `OPENROUTER_TIMEOUT_SECS`: Request timeout (default: 120)
    /// - `OPENROUTER_MAX_RETRIES`: Retries on transport failure (default: 0)
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("TESTGEN_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("TESTGEN_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("TESTGEN_PORT must be a valid port number"))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string());

        let db_max_connections = env::var("TESTGEN_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| defaults::DEV_DB_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue("TESTGEN_DB_MAX_CONNECTIONS must be a valid number")
            })?;

        let max_upload_size = env::var("TESTGEN_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue("TESTGEN_MAX_UPLOAD_SIZE must be a valid number")
            })?;

        let static_dir = env::var("TESTGEN_STATIC_DIR").ok().map(PathBuf::from);

        let cors_origins = match env::var("TESTGEN_CORS_ORIGINS") {
            Ok(list) => parse_list(&list),
            Err(_) => defaults::DEV_CORS_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let simulate_delays = match env::var("TESTGEN_SIMULATE_DELAYS") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::InvalidValue(
                "TESTGEN_SIMULATE_DELAYS must be true or false",
            ))?,
            Err(_) => true,
        };

        let timeout_secs = match env::var("OPENROUTER_TIMEOUT_SECS") {
            Ok(v) => parse_timeout_secs(&v)?,
            Err(_) => defaults::AI_TIMEOUT_SECS,
        };

        let max_retries = env::var("OPENROUTER_MAX_RETRIES")
            .unwrap_or_else(|_| defaults::AI_MAX_RETRIES.to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue("OPENROUTER_MAX_RETRIES must be a valid number"))?;

        let ai = AiSettings {
            api_key: env::var("OPENROUTER_API_KEY").ok().map(SecretString::from),
            base_url: env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| defaults::AI_BASE_URL.to_string()),
            model: env::var("OPENROUTER_MODEL").unwrap_or_else(|_| defaults::AI_MODEL.to_string()),
            site_url: env::var("OPENROUTER_SITE_URL")
                .unwrap_or_else(|_| defaults::AI_SITE_URL.to_string()),
            site_name: env::var("OPENROUTER_SITE_NAME")
                .unwrap_or_else(|_| defaults::AI_SITE_NAME.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
        };

        let config = Config {
            environment,
            host,
            port,
            database_url,
            db_max_connections,
            static_dir,
            max_upload_size,
            cors_origins,
            ai,
            execution: ExecutionSettings {
                simulate_delays,
                ..ExecutionSettings::default()
            },
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "DATABASE_URL is using development default '{}'. Set a production database URL.",
                defaults::DEV_DATABASE_URL
            ));
        }

        if self.cors_origins.iter().any(|o| o == "*") {
            errors.push("TESTGEN_CORS_ORIGINS must list explicit origins in production.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_timeout_secs(value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue(
            "OPENROUTER_TIMEOUT_SECS must be greater than 0",
        )),
        Ok(secs) => Ok(secs),
        Err(_) => Err(ConfigError::InvalidValue(
            "OPENROUTER_TIMEOUT_SECS must be a valid number",
        )),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
