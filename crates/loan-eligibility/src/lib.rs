//! Loan eligibility rules engine with its configuration, error, and telemetry plumbing.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod telemetry;

pub use config::{AppConfig, AppEnvironment, ConfigError, EngineConfig};
pub use error::AppError;
