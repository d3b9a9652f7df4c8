use trackmeet_core::assignment::{AssignmentOptions, DEFAULT_MAX_INDIVIDUAL_EVENTS};

use crate::auth::jwt::JwtConfig;

/// Room for the largest roster paste plus JSON framing.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for closing the pool after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Largest accepted request body; sized for pasted roster imports.
    pub max_body_bytes: usize,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Entry rule options applied to every assignment.
    pub assignment: AssignmentOptions,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                    |
    /// | `MAX_BODY_BYTES`            | `2097152`               |
    /// | `RELAYS_COUNT_TOWARD_LIMIT` | `false`                 |
    /// | `MAX_INDIVIDUAL_EVENTS`     | `4`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_BODY_BYTES.to_string())
            .parse()
            .expect("MAX_BODY_BYTES must be a valid usize");

        let relays_count_toward_limit = parse_flag(
            &std::env::var("RELAYS_COUNT_TOWARD_LIMIT").unwrap_or_else(|_| "false".into()),
        )
        .expect("RELAYS_COUNT_TOWARD_LIMIT must be true or false");

        let max_individual_events: usize = std::env::var("MAX_INDIVIDUAL_EVENTS")
            .unwrap_or_else(|_| DEFAULT_MAX_INDIVIDUAL_EVENTS.to_string())
            .parse()
            .expect("MAX_INDIVIDUAL_EVENTS must be a valid usize");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_body_bytes,
            jwt,
            assignment: AssignmentOptions {
                relays_count_toward_limit,
                max_individual_events,
            },
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
