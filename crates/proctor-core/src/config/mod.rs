//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default so the server can start
//! without any configuration file present.

pub mod app;
pub mod detection;
pub mod exam;
pub mod logging;
pub mod monitoring;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::detection::DetectionConfig;
pub use self::exam::ExamConfig;
pub use self::logging::LoggingConfig;
pub use self::monitoring::MonitoringConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "PROCTOR";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Exam session policy.
    #[serde(default)]
    pub exam: ExamConfig,
    /// Monitor sampling settings.
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Simulated detection collaborators.
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// and environment variables prefixed with `PROCTOR__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));

        Self::finish(builder)
    }

    /// Load configuration from an explicit file path plus environment overrides.
    pub fn load_from(path: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        tracing::debug!(
            port = parsed.server.port,
            heartbeat_timeout = parsed.exam.heartbeat_timeout_seconds,
            "Configuration loaded"
        );
        Ok(parsed)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.exam.validate()?;
        self.monitoring.validate()?;
        self.detection.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViolationSource;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.exam.heartbeat_timeout_seconds, 60);
        assert_eq!(config.exam.default_duration_seconds, 7200);
        assert_eq!(config.monitoring.sample_interval_seconds, 3);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_empty_document_deserializes_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config.monitoring.audio_noise_threshold, 50);
        assert!(
            config
                .monitoring
                .enabled_sources
                .contains(&ViolationSource::TabVisibility)
        );
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut config = AppConfig::default();
        config.exam.default_duration_seconds = 0;
        let err = config.validate().expect_err("zero duration must fail");
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_rate_out_of_range_rejected() {
        let mut config = AppConfig::default();
        config.detection.phone_rate = 1.5;
        assert!(config.validate().is_err());
    }
}
