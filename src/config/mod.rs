//! Configuration management for Sathi
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

const DEV_JWT_SECRET: &str = "development-secret-change-in-production";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// Rate limit: requests per second per client
    pub rate_limit_rps: u32,

    /// CORS allowed origins, comma separated
    pub cors_allowed_origins: Option<String>,

    /// JWT secret for token signing
    pub jwt_secret: String,

    /// Access token TTL in seconds (default: 3600 = 1 hour)
    pub jwt_access_token_ttl_seconds: i64,

    pub admin_username: String,

    /// Plain admin password, hashed at startup when no hash is given
    pub admin_password: String,

    /// Pre-computed bcrypt hash, preferred over `admin_password`
    pub admin_password_hash: Option<String>,

    /// Gemini API key; the assistant is disabled without it
    pub gemini_api_key: Option<String>,

    pub gemini_model: String,

    pub gemini_base_url: String,

    /// Number of synthetic students generated at startup
    pub student_count: usize,

    /// Seed for reproducible synthetic data
    pub data_seed: Option<u64>,

    /// Reject malformed student records instead of scoring them
    pub risk_strict_validation: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let rate_limit_rps = env::var("RATE_LIMIT_RPS")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<u32>()
            .unwrap_or(100);

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if environment.is_production() => {
                return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()))
            }
            Err(_) => DEV_JWT_SECRET.to_string(),
        };

        let jwt_access_token_ttl_seconds = env::var("JWT_ACCESS_TOKEN_TTL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<i64>()
            .unwrap_or(3600);

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
        let admin_password_hash = env::var("ADMIN_PASSWORD_HASH").ok();

        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let gemini_base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());

        let student_count = env::var("STUDENT_COUNT")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("STUDENT_COUNT must be a number".to_string()))?;

        let data_seed = match env::var("DATA_SEED") {
            Ok(s) => Some(s.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue("DATA_SEED must be an unsigned integer".to_string())
            })?),
            Err(_) => None,
        };

        let risk_strict_validation = env::var("RISK_STRICT_VALIDATION")
            .map(|s| parse_flag(&s))
            .unwrap_or(Ok(false))?;

        Ok(Config {
            environment,
            port,
            log_level,
            rate_limit_rps,
            cors_allowed_origins,
            jwt_secret,
            jwt_access_token_ttl_seconds,
            admin_username,
            admin_password,
            admin_password_hash,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            student_count,
            data_seed,
            risk_strict_validation,
        })
    }

    /// Key for logging, first four characters only
    pub fn gemini_api_key_masked(&self) -> Option<String> {
        self.gemini_api_key
            .as_ref()
            .map(|k| format!("{}****", k.chars().take(4).collect::<String>()))
    }
}

fn parse_flag(s: &str) -> Result<bool, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue(format!(
            "Invalid boolean flag: '{}'",
            other
        ))),
    }
}
