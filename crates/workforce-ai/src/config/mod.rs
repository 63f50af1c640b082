use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use chrono::Duration;

pub const DEFAULT_ATTRITION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ATTRITION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

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
    pub alerts: AlertConfig,
    pub attrition: AttritionConfig,
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

        let deadline_window_hours = env::var("APP_DEADLINE_WINDOW_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<u32>()
            .ok()
            .filter(|hours| *hours > 0)
            .ok_or(ConfigError::InvalidDeadlineWindow)?;

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let model = env::var("APP_ATTRITION_MODEL")
            .unwrap_or_else(|_| DEFAULT_ATTRITION_MODEL.to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            alerts: AlertConfig {
                deadline_window_hours,
            },
            attrition: AttritionConfig {
                api_key,
                model,
                ..AttritionConfig::default()
            },
        })
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

/// Deadline alert settings.
#[derive(Debug, Clone, Copy)]
pub struct AlertConfig {
    pub deadline_window_hours: u32,
}

impl AlertConfig {
    pub fn deadline_window(&self) -> Duration {
        Duration::hours(i64::from(self.deadline_window_hours))
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            deadline_window_hours: 24,
        }
    }
}

/// Remote attrition model settings. Without an API key, model-backed
/// predictions are disabled.
#[derive(Clone)]
pub struct AttritionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
}

impl AttritionConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for AttritionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ATTRITION_MODEL.to_string(),
            endpoint: DEFAULT_ATTRITION_ENDPOINT.to_string(),
            temperature: 0.2,
        }
    }
}

impl fmt::Debug for AttritionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttritionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDeadlineWindow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDeadlineWindow => {
                write!(f, "APP_DEADLINE_WINDOW_HOURS must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidDeadlineWindow => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
