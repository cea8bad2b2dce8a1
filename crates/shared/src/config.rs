//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Rate limiting for public write endpoints.
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://larder.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration as read from config sources.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token lifetime in days.
    #[serde(default = "default_token_expiry_days")]
    pub token_expiry_days: i64,
}

fn default_token_expiry_days() -> i64 {
    7
}

/// Sliding-window rate limit settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Requests allowed per client inside one window.
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// How often idle client keys are evicted, in seconds.
    #[serde(default = "default_eviction_interval_secs")]
    pub eviction_interval_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            eviction_interval_secs: default_eviction_interval_secs(),
        }
    }
}

fn default_max_requests() -> usize {
    100
}

fn default_window_secs() -> u64 {
    900 // 15 minutes
}

fn default_eviction_interval_secs() -> u64 {
    60
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LARDER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("LARDER__JWT__SECRET", Some("env-secret")),
                ("LARDER__SERVER__PORT", None),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.jwt.secret, "env-secret");
                assert_eq!(config.jwt.token_expiry_days, 7);
                assert_eq!(config.server.port, 3001);
                assert_eq!(config.rate_limit.max_requests, 100);
                assert_eq!(config.rate_limit.window_secs, 900);
                assert!(config.database.url.starts_with("sqlite://"));
            },
        );
    }

    #[test]
    fn test_environment_overrides_nested_values() {
        temp_env::with_vars(
            [
                ("LARDER__JWT__SECRET", Some("s")),
                ("LARDER__SERVER__PORT", Some("8088")),
                ("LARDER__RATE_LIMIT__MAX_REQUESTS", Some("5")),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 8088);
                assert_eq!(config.rate_limit.max_requests, 5);
            },
        );
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        temp_env::with_vars(
            [
                ("LARDER__JWT__SECRET", None::<&str>),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
