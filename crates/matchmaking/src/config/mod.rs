use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::matching::config::PAGE_SIZE_CEILING;
use crate::matching::MatchingConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingConfig,
    pub notifications: NotificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = MatchingConfig::default();
        let popularity_threshold = numeric_var(
            "APP_POPULARITY_THRESHOLD",
            defaults.popularity_threshold,
        )?;
        let default_page_size = numeric_var("APP_DEFAULT_PAGE_SIZE", defaults.default_page_size)?;
        let max_page_size = numeric_var("APP_MAX_PAGE_SIZE", defaults.max_page_size)?;
        if max_page_size == 0
            || max_page_size > PAGE_SIZE_CEILING
            || default_page_size == 0
            || default_page_size > max_page_size
        {
            return Err(ConfigError::InvalidPageBounds {
                default_page_size,
                max_page_size,
            });
        }

        let admin_email = env::var("ADMIN_EMAIL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching: MatchingConfig {
                popularity_threshold,
                default_page_size,
                max_page_size,
            },
            notifications: NotificationConfig { admin_email },
        })
    }
}

fn numeric_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where popularity alerts are addressed. Alerts are dropped when unset.
#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    pub admin_email: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    InvalidPageBounds {
        default_page_size: u32,
        max_page_size: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
            ConfigError::InvalidPageBounds {
                default_page_size,
                max_page_size,
            } => write!(
                f,
                "page size bounds are inconsistent (default {default_page_size}, max {max_page_size})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidPageBounds { .. } => None,
        }
    }
}
