use crate::outreach::sequencing::{
    DecayModel, EnginePolicy, PolicyError, StoppingThreshold, BASE_DECAY_RATE,
    BASE_STOPPING_THRESHOLD, DEFAULT_TOTAL_STEPS,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

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
    pub engine: EngineConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
                include_targets: environment != AppEnvironment::Production,
            },
            engine: EngineConfig::from_env()?,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
    pub include_targets: bool,
}

/// Sequencing policy, cache lifetime and the optional lead seed file.
///
/// The policy is validated here so that a bad threshold or decay rate stops
/// the process at startup instead of surfacing mid-request.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub policy: EnginePolicy,
    pub cache_ttl_secs: u64,
    pub leads_csv: Option<PathBuf>,
}

impl EngineConfig {
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs.min(MAX_CACHE_TTL_SECS) as i64)
    }

    fn from_env() -> Result<Self, ConfigError> {
        let total_steps = parse_var("APP_TOTAL_STEPS", DEFAULT_TOTAL_STEPS)?;
        let decay = match optional_var("APP_DECAY_RATE") {
            Some(raw) => DecayModel::Geometric {
                rate: parse_value("APP_DECAY_RATE", &raw)?,
            },
            None => DecayModel::EngagementScaled {
                base: BASE_DECAY_RATE,
            },
        };
        let stopping_threshold = match optional_var("APP_STOPPING_THRESHOLD") {
            Some(raw) => StoppingThreshold::Fixed {
                value: parse_value("APP_STOPPING_THRESHOLD", &raw)?,
            },
            None => StoppingThreshold::IntentScaled {
                base: BASE_STOPPING_THRESHOLD,
            },
        };
        let cache_ttl_secs = parse_var("APP_CACHE_TTL_SECS", 300_u64)?;
        let leads_csv = optional_var("APP_LEADS_CSV").map(PathBuf::from);

        let policy = EnginePolicy::new(
            total_steps,
            decay,
            stopping_threshold,
        )?;

        Ok(Self {
            policy,
            cache_ttl_secs,
            leads_csv,
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::InvalidNumber {
        variable: name,
        value: raw.to_string(),
    })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str, value: String },
    InvalidPolicy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be numeric, got '{value}'")
            }
            ConfigError::InvalidPolicy(err) => write!(f, "invalid sequencing policy: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPolicy(err) => Some(err),
        }
    }
}

impl From<PolicyError> for ConfigError {
    fn from(value: PolicyError) -> Self {
        Self::InvalidPolicy(value)
    }
}
