use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::contest::{MissingListPolicy, PushRule, ScoringConfig};

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
    pub contest: ContestConfig,
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
            telemetry: TelemetryConfig { log_level },
            contest: ContestConfig::from_env()?,
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

/// Contest preloading and scoring defaults.
#[derive(Debug, Clone, Default)]
pub struct ContestConfig {
    pub contest_dir: Option<PathBuf>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub push_rule: Option<PushRule>,
    pub missing_list_policy: MissingListPolicy,
}

impl ContestConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let push_rule = match non_empty_var("APP_PUSH_RULE") {
            Some(raw) => Some(
                PushRule::parse(&raw).ok_or(ConfigError::InvalidPushRule { value: raw })?,
            ),
            None => None,
        };

        let missing_list_policy = match non_empty_var("APP_MISSING_LIST_POLICY") {
            Some(raw) => MissingListPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidMissingListPolicy { value: raw })?,
            None => MissingListPolicy::default(),
        };

        let home_team = non_empty_var("APP_HOME_TEAM");
        let away_team = non_empty_var("APP_AWAY_TEAM");
        if home_team.is_some() != away_team.is_some() {
            return Err(ConfigError::IncompleteTeams);
        }

        Ok(Self {
            contest_dir: non_empty_var("APP_CONTEST_DIR").map(PathBuf::from),
            home_team,
            away_team,
            push_rule,
            missing_list_policy,
        })
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            push_rule: self.push_rule,
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
            missing_list_policy: self.missing_list_policy,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPushRule { value: String },
    InvalidMissingListPolicy { value: String },
    IncompleteTeams,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPushRule { value } => {
                write!(f, "APP_PUSH_RULE must be 'zero' or 'half', got '{value}'")
            }
            ConfigError::InvalidMissingListPolicy { value } => write!(
                f,
                "APP_MISSING_LIST_POLICY must be 'miss' or 'pending', got '{value}'"
            ),
            ConfigError::IncompleteTeams => {
                write!(f, "APP_HOME_TEAM and APP_AWAY_TEAM must be set together")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPushRule { .. }
            | ConfigError::InvalidMissingListPolicy { .. }
            | ConfigError::IncompleteTeams => None,
        }
    }
}
