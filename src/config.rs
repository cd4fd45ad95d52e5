use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Document source: file path or http(s) URL
    pub spec_source: String,
    pub fetch_timeout_seconds: u64,

    // Explorer sessions idle this long are dropped
    pub session_idle_seconds: u64,

    // Logging
    pub log_format: LogFormat,

    // Server
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        Ok(Self {
            // Document source
            spec_source: env::var("SPEC_SOURCE")
                .unwrap_or_else(|_| "data/openapi.json".to_string()),
            fetch_timeout_seconds: env::var("FETCH_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("FETCH_TIMEOUT_SECONDS"))?,

            // Sessions
            session_idle_seconds: env::var("SESSION_IDLE_SECONDS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("SESSION_IDLE_SECONDS"))?,

            // Logging
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_ascii_lowercase()
                .as_str()
            {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::Invalid("LOG_FORMAT")),
            },

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_seconds)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
