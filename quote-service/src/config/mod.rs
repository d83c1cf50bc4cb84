use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";

#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub store: StoreConfig,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl QuoteConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("mongo"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        // The URI only matters when MongoDB actually backs the store.
        let uri_default = match backend {
            StoreBackend::Mongo => None,
            StoreBackend::Memory => Some(DEFAULT_MONGODB_URI),
        };

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "quote-service".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            store: StoreConfig { backend },
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", uri_default, is_prod && backend == StoreBackend::Mongo)?,
                database: get_env("MONGODB_DATABASE", Some("quote_db"), is_prod)?,
            },
        })
    }

    /// Configuration for an in-memory instance on `port` (0 picks a free one).
    pub fn in_memory(port: u16) -> Self {
        Self {
            common: core_config::Config {
                port,
                ..Default::default()
            },
            service_name: "quote-service".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            store: StoreConfig {
                backend: StoreBackend::Memory,
            },
            mongodb: MongoConfig {
                uri: DEFAULT_MONGODB_URI.to_string(),
                database: "quote_db".to_string(),
            },
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    lookup(key, env::var(key).ok(), default, is_prod)
}

fn lookup(
    key: &str,
    value: Option<String>,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError> {
    match value {
        Some(val) => Ok(val),
        None if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        None => default.map(str::to_string).ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key))
        }),
    }
}
