use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::feedback::DEFAULT_RETRAIN_THRESHOLD;
use crate::risk::{FusionMethod, FusionParams};

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
    pub models: ModelConfig,
    pub fusion: FusionParams,
    pub feedback: FeedbackConfig,
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

        let artifacts_path = optional_path("CLAIMWATCH_MODEL_ARTIFACTS");

        let defaults = FusionParams::default();
        let method = env::var("CLAIMWATCH_FUSION_METHOD")
            .map(|name| FusionMethod::from_name(&name))
            .unwrap_or(defaults.method);
        let alpha = parse_var("CLAIMWATCH_FUSION_ALPHA", defaults.alpha)?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::OutOfRange {
                var: "CLAIMWATCH_FUSION_ALPHA",
            });
        }

        let log_path = optional_path("CLAIMWATCH_FEEDBACK_LOG");
        let retrain_threshold =
            parse_var("CLAIMWATCH_RETRAIN_THRESHOLD", DEFAULT_RETRAIN_THRESHOLD)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            models: ModelConfig { artifacts_path },
            fusion: FusionParams {
                method,
                alpha,
                ..defaults
            },
            feedback: FeedbackConfig {
                log_path,
                retrain_threshold,
            },
        })
    }
}

fn optional_path(var: &str) -> Option<PathBuf> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var }),
        _ => Ok(default),
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

/// Where fitted model parameters come from; `None` selects the built-in bundle.
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    pub artifacts_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct FeedbackConfig {
    /// CSV log destination; verdicts stay in memory when unset.
    pub log_path: Option<PathBuf>,
    pub retrain_threshold: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { var: &'static str },
    OutOfRange { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var } => write!(f, "{} must be a valid number", var),
            ConfigError::OutOfRange { var } => write!(f, "{} must be between 0 and 1", var),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::OutOfRange { .. } => None,
        }
    }
}
