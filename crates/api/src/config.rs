use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

/// Built-in defaults, applied before any file or environment source.
const DEFAULTS: &str = r#"
    [server]
    host = "0.0.0.0"
    port = 3000
    request_timeout_secs = 30
    cors_origins = []

    [database]
    backend = "mongo"
    url = ""
    collection = "todos"
    max_pool_size = 10
    min_pool_size = 0
    connect_timeout_secs = 10
    server_selection_timeout_secs = 10

    [logging]
    level = "info"
    format = "json"

    [metrics]
    enabled = true
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Which todo store the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongo,
    /// Process-local store; contents are lost on restart.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// MongoDB connection string.
    #[serde(default)]
    pub url: String,

    /// Database name; falls back to the one named in `url`.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,

    #[serde(default)]
    pub min_pool_size: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_server_selection_timeout")]
    pub server_selection_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_request_timeout() -> u64 {
    30
}
fn default_backend() -> StorageBackend {
    StorageBackend::Mongo
}
fn default_collection() -> String {
    "todos".to_string()
}
fn default_max_pool_size() -> u32 {
    10
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_server_selection_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_metrics_enabled() -> bool {
    true
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            name: config.name.clone(),
            app_name: env!("CARGO_PKG_NAME").to_string(),
            max_pool_size: config.max_pool_size,
            min_pool_size: config.min_pool_size,
            connect_timeout_secs: config.connect_timeout_secs,
            server_selection_timeout_secs: config.server_selection_timeout_secs,
        }
    }
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. config/default.toml (optional)
    /// 3. config/local.toml - local overrides (optional, not in git)
    /// 4. Environment variables with TODO__ prefix
    /// 5. `PORT` and `MONGODB_URI`
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = Self::defaults()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("TODO").separator("__"));

        let builder = apply_plain_env(
            builder,
            std::env::var("PORT").ok(),
            std::env::var("MONGODB_URI").ok(),
        )?;

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration from defaults plus explicit overrides, without
    /// touching config files or the process environment.
    pub fn load_with_overrides(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = Self::defaults();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()?.try_deserialize()
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Connection string is required unless running in memory
        if self.database.backend == StorageBackend::Mongo && self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "MONGODB_URI (or TODO__DATABASE__URL) environment variable must be set"
                    .to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_pool_size > self.database.max_pool_size {
            return Err(ConfigValidationError::InvalidValue(
                "min_pool_size cannot exceed max_pool_size".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

/// Applies the unprefixed `PORT` and `MONGODB_URI` variables, which win over
/// every other source.
fn apply_plain_env(
    builder: ConfigBuilder<DefaultState>,
    port: Option<String>,
    mongodb_uri: Option<String>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_override_option("server.port", port.filter(|p| !p.is_empty()))?
        .set_override_option("database.url", mongodb_uri.filter(|u| !u.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_with_overrides(&[]).expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.backend, StorageBackend::Mongo);
        assert_eq!(config.database.collection, "todos");
        assert_eq!(config.database.max_pool_size, 10);
        assert!(config.database.name.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_logging_default_matches_embedded_defaults() {
        let config = Config::load_with_overrides(&[]).expect("Failed to load config");
        let fallback = LoggingConfig::default();

        assert_eq!(fallback.level, config.logging.level);
        assert_eq!(fallback.format, config.logging.format);
    }

    #[test]
    fn test_config_override() {
        let config = Config::load_with_overrides(&[
            ("database.url", "mongodb://localhost:27017/todos"),
            ("database.name", "other"),
            ("server.port", "9000"),
            ("logging.level", "debug"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.name.as_deref(), Some("other"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_memory_backend() {
        let config = Config::load_with_overrides(&[("database.backend", "memory")])
            .expect("Failed to load config");
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_db_url() {
        let config = Config::load_with_overrides(&[]).expect("Failed to load config");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("MONGODB_URI"));
    }

    #[test]
    fn test_config_validation_zero_port() {
        let config = Config::load_with_overrides(&[
            ("database.url", "mongodb://localhost:27017"),
            ("server.port", "0"),
        ])
        .expect("Failed to load config");
        assert!(config.validate().unwrap_err().to_string().contains("port"));
    }

    #[test]
    fn test_config_validation_invalid_pool_settings() {
        let config = Config::load_with_overrides(&[
            ("database.url", "mongodb://localhost:27017"),
            ("database.min_pool_size", "20"),
            ("database.max_pool_size", "5"),
        ])
        .expect("Failed to load config");

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("min_pool_size"));
    }

    #[test]
    fn test_plain_env_overrides() {
        let builder = Config::defaults().set_override("server.port", "4000").unwrap();
        let builder = apply_plain_env(
            builder,
            Some("8081".to_string()),
            Some("mongodb://db:27017/app".to_string()),
        )
        .unwrap();
        let config: Config = builder.build().unwrap().try_deserialize().unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.url, "mongodb://db:27017/app");
    }

    #[test]
    fn test_plain_env_absent_keeps_defaults() {
        let builder = apply_plain_env(Config::defaults(), None, Some(String::new())).unwrap();
        let config: Config = builder.build().unwrap().try_deserialize().unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.database.url.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_with_overrides(&[
            ("server.host", "127.0.0.1"),
            ("server.port", "3000"),
        ])
        .expect("Failed to load config");

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_database_config_conversion() {
        let config = Config::load_with_overrides(&[
            ("database.url", "mongodb://localhost:27017"),
            ("database.max_pool_size", "4"),
        ])
        .expect("Failed to load config");

        let db: persistence::db::DatabaseConfig = (&config.database).into();
        assert_eq!(db.url, "mongodb://localhost:27017");
        assert_eq!(db.max_pool_size, 4);
        assert_eq!(db.app_name, "todo-api");
    }
}
