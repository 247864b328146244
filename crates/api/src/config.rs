use std::time::Duration;

use waypoint_llm::client::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use waypoint_llm::GeminiConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`).
    pub request_timeout_secs: u64,
    /// How long a public-feed snapshot is served before re-querying (default: `300`).
    pub feed_cache_ttl_secs: u64,
    /// Maximum number of roadmaps in the public feed (default: `100`).
    pub feed_limit: i64,
    /// Maximum number of roadmaps returned by `/mine`, `/liked` and `/saved`
    /// (default: `100`).
    pub list_limit: i64,
    /// Requests allowed per client within one rate-limit window
    /// (default: `100`). `0` disables rate limiting.
    pub rate_limit_max: u32,
    /// Length of the rate-limit window in seconds (default: `900`).
    pub rate_limit_window_secs: u64,
    /// PostgreSQL URL. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    /// Bearer-token validation settings.
    pub jwt: JwtConfig,
    /// Service-wide Gemini API key, used when the caller has none.
    pub gemini_api_key: Option<String>,
    /// Gemini endpoint, model and per-call timeout.
    pub gemini: GeminiConfig,
}

fn parsed<T: std::str::FromStr>(name: &str, default: &str) -> T {
    std::env::var(name)
        .unwrap_or_else(|_| default.into())
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a valid {}", std::any::type_name::<T>()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                     |
    /// |---------------------------|-----------------------------|
    /// | `HOST`                    | `0.0.0.0`                   |
    /// | `PORT`                    | `5000`                      |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`    | `120`                       |
    /// | `FEED_CACHE_TTL_SECS`     | `300`                       |
    /// | `FEED_LIMIT`              | `100`                       |
    /// | `LIST_LIMIT`              | `100`                       |
    /// | `RATE_LIMIT_MAX`          | `100` (`0` disables)        |
    /// | `RATE_LIMIT_WINDOW_SECS`  | `900`                       |
    /// | `DATABASE_URL`            | -- (in-memory store)        |
    /// | `GEMINI_API_KEY`          | --                          |
    /// | `GEMINI_MODEL`            | `gemini-1.5-flash-002`      |
    /// | `GEMINI_BASE_URL`         | Google's public endpoint    |
    /// | `GENERATION_TIMEOUT_SECS` | `60`                        |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parsed("PORT", "5000");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parsed("REQUEST_TIMEOUT_SECS", "120");
        let feed_cache_ttl_secs: u64 = parsed("FEED_CACHE_TTL_SECS", "300");
        let feed_limit: i64 = parsed("FEED_LIMIT", "100");
        assert!(feed_limit > 0, "FEED_LIMIT must be positive");
        let list_limit: i64 = parsed("LIST_LIMIT", "100");
        assert!(list_limit > 0, "LIST_LIMIT must be positive");

        let rate_limit_max: u32 = parsed("RATE_LIMIT_MAX", "100");
        let rate_limit_window_secs: u64 = parsed("RATE_LIMIT_WINDOW_SECS", "900");
        assert!(rate_limit_window_secs > 0, "RATE_LIMIT_WINDOW_SECS must be positive");

        let generation_timeout_secs: u64 =
            parsed("GENERATION_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string());

        let gemini = GeminiConfig {
            base_url: optional("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            model: optional("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            timeout: Duration::from_secs(generation_timeout_secs),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            feed_cache_ttl_secs,
            feed_limit,
            list_limit,
            rate_limit_max,
            rate_limit_window_secs,
            database_url: optional("DATABASE_URL"),
            jwt: JwtConfig::from_env(),
            gemini_api_key: optional("GEMINI_API_KEY"),
            gemini,
        }
    }
}
