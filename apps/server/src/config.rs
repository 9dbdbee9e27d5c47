//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::services::poller::{PollPolicy, UnknownStatusPolicy};

/// HTTP header carrying the document analysis subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Response header carrying the operation URL after submission.
pub const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_MAX_UPLOAD_SIZE: usize = 20_971_520; // 20MB per report
    pub const DEV_MAX_CONCURRENT_ANALYSES: usize = 4;

    // Document analysis service placeholders
    pub const DEV_ANALYZER_ENDPOINT: &str =
        "https://<your-resource-name>.cognitiveservices.azure.com/";
    pub const DEV_ANALYZER_KEY: &str = "<your-api-key>";
    pub const DEV_ANALYZER_MODEL_ID: &str = "DDR_Sample";
    pub const DEV_ANALYZER_API_VERSION: &str = "2023-07-31";

    pub const DEV_POLL_INTERVAL_MS: u64 = 1000;
    pub const DEV_POLL_MAX_ATTEMPTS: u32 = 120;
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

/// Document analysis service settings.
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Service endpoint URL (resource root, trailing slash optional)
    pub endpoint: String,
    /// Subscription key sent with every request
    pub api_key: SecretString,
    /// Custom extraction model identifier
    pub model_id: String,
    /// REST API version
    pub api_version: String,
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
    /// Maximum PDF size in bytes (default: 20MB)
    pub max_upload_size: usize,
    /// Maximum analyses running at once (default: 4)
    pub max_concurrent_analyses: usize,
    /// Document analysis service settings
    pub analyzer: AnalyzerSettings,
    /// Poll loop bounds
    pub poll: PollPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode every variable except `RUST_ENV` has a default.
    /// In production mode the analyzer endpoint and key must be real values.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `DDR_HOST`: Server host (default: 127.0.0.1)
    /// - `DDR_PORT`: Server port (default: 8080)
    /// - `DDR_MAX_UPLOAD_SIZE`: Max PDF size in bytes (default: 20MB)
    /// - `DDR_MAX_CONCURRENT_ANALYSES`: Max analyses in flight (default: 4)
    /// - `DDR_ANALYZER_ENDPOINT`: Document analysis endpoint URL
    /// - `DDR_ANALYZER_KEY`: Subscription key
    /// - `DDR_ANALYZER_MODEL_ID`: Model id (default: DDR_Sample)
    /// - `DDR_ANALYZER_API_VERSION`: API version (default: 2023-07-31)
    /// - `DDR_POLL_INTERVAL_MS`: Delay between status polls (default: 1000)
    /// - `DDR_POLL_MAX_ATTEMPTS`: Polls before giving up (default: 120)
    /// - `DDR_UNKNOWN_STATUS`: `fail` or `wait` on unrecognized status (default: fail)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let env_str = lookup("RUST_ENV").ok_or(ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = var("DDR_HOST", defaults::DEV_HOST);

        let port = var("DDR_PORT", &defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("DDR_PORT must be a valid port number"))?;

        let max_upload_size = var("DDR_MAX_UPLOAD_SIZE", &defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("DDR_MAX_UPLOAD_SIZE must be a valid number"))?;

        let max_concurrent_analyses = var(
            "DDR_MAX_CONCURRENT_ANALYSES",
            &defaults::DEV_MAX_CONCURRENT_ANALYSES.to_string(),
        )
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ConfigError::InvalidValue(
            "DDR_MAX_CONCURRENT_ANALYSES must be a number of at least 1",
        ))?;

        let analyzer = AnalyzerSettings {
            endpoint: var("DDR_ANALYZER_ENDPOINT", defaults::DEV_ANALYZER_ENDPOINT),
            api_key: SecretString::from(var("DDR_ANALYZER_KEY", defaults::DEV_ANALYZER_KEY)),
            model_id: var("DDR_ANALYZER_MODEL_ID", defaults::DEV_ANALYZER_MODEL_ID),
            api_version: var("DDR_ANALYZER_API_VERSION", defaults::DEV_ANALYZER_API_VERSION),
        };

        let poll_interval_ms = var("DDR_POLL_INTERVAL_MS", &defaults::DEV_POLL_INTERVAL_MS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("DDR_POLL_INTERVAL_MS must be a valid number"))?;

        // Zero would submit a billable job and never poll it
        let max_attempts = var("DDR_POLL_MAX_ATTEMPTS", &defaults::DEV_POLL_MAX_ATTEMPTS.to_string())
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidValue(
                "DDR_POLL_MAX_ATTEMPTS must be a number of at least 1",
            ))?;

        let unknown_status = match lookup("DDR_UNKNOWN_STATUS") {
            Some(value) => UnknownStatusPolicy::parse(&value).ok_or(ConfigError::InvalidValue(
                "DDR_UNKNOWN_STATUS must be 'fail' or 'wait'",
            ))?,
            None => UnknownStatusPolicy::default(),
        };

        let config = Config {
            environment,
            host,
            port,
            max_upload_size,
            max_concurrent_analyses,
            analyzer,
            poll: PollPolicy {
                interval: Duration::from_millis(poll_interval_ms),
                max_attempts,
                unknown_status,
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

        if self.analyzer.endpoint == defaults::DEV_ANALYZER_ENDPOINT {
            errors.push(
                "DDR_ANALYZER_ENDPOINT is using the placeholder endpoint. Set your resource URL."
                    .to_string(),
            );
        }

        if self.analyzer.api_key.expose_secret() == defaults::DEV_ANALYZER_KEY
            || self.analyzer.api_key.expose_secret().is_empty()
        {
            errors.push(
                "DDR_ANALYZER_KEY is using the placeholder key. Set the subscription key."
                    .to_string(),
            );
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
