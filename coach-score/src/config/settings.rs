use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::errors::CoachScoreError;
use crate::ledger::RetryPolicy;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SERVER_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_VOTE_MAX_RETRIES: usize = 3;
const DEFAULT_VOTE_RETRY_BASE_DELAY_MS: u64 = 10;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable console output.
    Pretty,
    /// One JSON object per event, with targets and thread ids.
    Json,
}

impl FromStr for LogFormat {
    type Err = CoachScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(CoachScoreError::config(format!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{other}'"
            ))),
        }
    }
}

/// Service settings resolved at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_addr: SocketAddr,
    pub cors_allowed_origins: Vec<HeaderValue>,
    pub vote_retry: RetryPolicy,
    pub run_migrations: bool,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
    /// - `SERVER_HOST` / `SERVER_PORT`: Bind address (default: 0.0.0.0:8080)
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated origins (default: http://localhost:3000)
    /// - `VOTE_MAX_RETRIES`: Retries for contended votes (default: 3)
    /// - `VOTE_RETRY_BASE_DELAY_MS`: First backoff delay (default: 10)
    /// - `RUN_MIGRATIONS`: Apply embedded migrations at startup (default: true)
    /// - `LOG_FORMAT`: "pretty" or "json" (default: pretty)
    pub fn from_env() -> Result<Self, CoachScoreError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Unset and blank values fall back to their defaults; set values that
    /// fail to parse are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoachScoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url =
            get("DATABASE_URL").ok_or_else(|| CoachScoreError::config("DATABASE_URL must be set"))?;

        let database_max_connections = parse_or(
            get("DATABASE_MAX_CONNECTIONS"),
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        )?;
        if database_max_connections == 0 {
            return Err(CoachScoreError::config(
                "DATABASE_MAX_CONNECTIONS must be greater than zero",
            ));
        }

        let host = parse_or(get("SERVER_HOST"), "SERVER_HOST", DEFAULT_SERVER_HOST)?;
        let port = parse_or(get("SERVER_PORT"), "SERVER_PORT", DEFAULT_SERVER_PORT)?;

        let cors_allowed_origins = parse_origins(
            get("CORS_ALLOWED_ORIGINS")
                .as_deref()
                .unwrap_or(DEFAULT_CORS_ORIGINS),
        )?;

        let max_retries = parse_or(
            get("VOTE_MAX_RETRIES"),
            "VOTE_MAX_RETRIES",
            DEFAULT_VOTE_MAX_RETRIES,
        )?;
        let base_delay_ms = parse_or(
            get("VOTE_RETRY_BASE_DELAY_MS"),
            "VOTE_RETRY_BASE_DELAY_MS",
            DEFAULT_VOTE_RETRY_BASE_DELAY_MS,
        )?;
        let vote_retry = RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(base_delay_ms),
            ..RetryPolicy::default()
        };

        let run_migrations = parse_or(get("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?;
        let log_format = get("LOG_FORMAT")
            .map(|value| value.parse())
            .transpose()?
            .unwrap_or(LogFormat::Pretty);

        Ok(Self {
            database_url,
            database_max_connections,
            server_addr: SocketAddr::new(host, port),
            cors_allowed_origins,
            vote_retry,
            run_migrations,
            log_format,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, CoachScoreError> {
    match value {
        Some(value) => value.trim().parse().map_err(|_| {
            CoachScoreError::config(format!("{key} has an invalid value: '{value}'"))
        }),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, CoachScoreError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| {
                CoachScoreError::config(format!("CORS_ALLOWED_ORIGINS has an invalid origin: '{origin}'"))
            })
        })
        .collect()
}
