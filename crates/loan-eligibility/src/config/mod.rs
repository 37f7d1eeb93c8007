use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::eligibility::{PolicyBook, PolicyError};

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

        let engine = EngineConfig {
            policy_path: optional_path("APP_POLICY_PATH"),
            lender_catalog: optional_path("APP_LENDER_CATALOG"),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine,
        })
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
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
}

/// Where the engine's policy tables and lender catalog come from.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// JSON policy book replacing the standard tables.
    pub policy_path: Option<PathBuf>,
    /// CSV lender catalog; the seeded in-memory catalog is used when absent.
    pub lender_catalog: Option<PathBuf>,
}

impl EngineConfig {
    /// Standard tables unless a policy file is configured, in which case it must
    /// parse and validate.
    pub fn policy_book(&self) -> Result<PolicyBook, ConfigError> {
        let Some(path) = &self.policy_path else {
            return Ok(PolicyBook::standard());
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::PolicyFile {
            path: path.clone(),
            source: Box::new(source),
        })?;
        let book = PolicyBook::from_json(&raw).map_err(|source| ConfigError::PolicyFile {
            path: path.clone(),
            source: Box::new(source),
        })?;
        book.validate().map_err(ConfigError::InvalidPolicy)?;
        Ok(book)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    PolicyFile {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    InvalidPolicy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::PolicyFile { path, source } => {
                write!(f, "unable to load policy file {}: {source}", path.display())
            }
            ConfigError::InvalidPolicy(err) => write!(f, "invalid policy tables: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::PolicyFile { source, .. } => Some(&**source),
            ConfigError::InvalidPolicy(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::LoanCategory;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_POLICY_PATH");
        env::remove_var("APP_LENDER_CATALOG");
    }

    fn temp_policy(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!(
            "loan-eligibility-policy-{name}-{}.json",
            std::process::id()
        ));
        fs::write(&path, contents).expect("write temp policy");
        path
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.engine.policy_path.is_none());
        assert!(config.engine.lender_catalog.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn rejects_non_numeric_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "eighty");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidPort)));
        reset_env();
    }

    #[test]
    fn reads_engine_paths_and_ignores_blank_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("APP_POLICY_PATH", "/etc/lending/policy.json");
        env::set_var("APP_LENDER_CATALOG", "   ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.engine.policy_path,
            Some(PathBuf::from("/etc/lending/policy.json"))
        );
        assert!(config.engine.lender_catalog.is_none());
        reset_env();
    }

    #[test]
    fn policy_book_defaults_to_standard_tables() {
        let book = EngineConfig::default()
            .policy_book()
            .expect("standard tables load");
        assert_eq!(book, PolicyBook::standard());
    }

    #[test]
    fn policy_book_loads_overrides_from_file() {
        let mut book = PolicyBook::standard();
        book.personal.rate.base_rate = 12.25;
        let path = temp_policy(
            "override",
            &serde_json::to_string(&book).expect("serialize policy"),
        );

        let loaded = EngineConfig {
            policy_path: Some(path.clone()),
            lender_catalog: None,
        }
        .policy_book()
        .expect("policy file loads");
        fs::remove_file(path).ok();

        assert_eq!(loaded.policy(LoanCategory::Personal).rate.base_rate, 12.25);
    }

    #[test]
    fn policy_book_rejects_malformed_and_invalid_files() {
        let garbage = temp_policy("garbage", "{ not json");
        let result = EngineConfig {
            policy_path: Some(garbage.clone()),
            lender_catalog: None,
        }
        .policy_book();
        fs::remove_file(garbage).ok();
        assert!(matches!(result, Err(ConfigError::PolicyFile { .. })));

        let mut book = PolicyBook::standard();
        book.vehicle.tenure.min_years = 0;
        let invalid = temp_policy(
            "invalid",
            &serde_json::to_string(&book).expect("serialize policy"),
        );
        let result = EngineConfig {
            policy_path: Some(invalid.clone()),
            lender_catalog: None,
        }
        .policy_book();
        fs::remove_file(invalid).ok();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPolicy(PolicyError::ZeroTenure {
                category: LoanCategory::Vehicle
            }))
        ));
    }
}
