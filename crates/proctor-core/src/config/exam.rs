//! Exam session policy configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Exam session policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Duration used for tests created without an explicit duration.
    #[serde(default = "default_duration")]
    pub default_duration_seconds: u64,
    /// Wall-clock interval between automatic countdown ticks, in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Exam seconds consumed per automatic tick.
    #[serde(default = "default_seconds_per_tick")]
    pub seconds_per_tick: u64,
    /// Whether running sessions count down on their own.
    ///
    /// When disabled the countdown only advances through explicit ticks.
    #[serde(default = "default_true")]
    pub auto_tick: bool,
    /// Seconds without a client heartbeat after which a running session
    /// is abandoned. Zero disables the watchdog.
    #[serde(default = "default_heartbeat_timeout")]
    pub heartbeat_timeout_seconds: u64,
    /// Seed the test catalog with the demo exam on startup.
    #[serde(default = "default_true")]
    pub seed_demo_catalog: bool,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            default_duration_seconds: default_duration(),
            tick_interval_ms: default_tick_interval(),
            seconds_per_tick: default_seconds_per_tick(),
            auto_tick: true,
            heartbeat_timeout_seconds: default_heartbeat_timeout(),
            seed_demo_catalog: true,
        }
    }
}

impl ExamConfig {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.default_duration_seconds == 0 {
            return Err(AppError::configuration(
                "exam.default_duration_seconds must be positive",
            ));
        }
        if self.tick_interval_ms == 0 || self.seconds_per_tick == 0 {
            return Err(AppError::configuration(
                "exam.tick_interval_ms and exam.seconds_per_tick must be positive",
            ));
        }
        Ok(())
    }
}

fn default_heartbeat_timeout() -> u64 {
    60
}

fn default_duration() -> u64 {
    7200
}

fn default_tick_interval() -> u64 {
    1000
}

fn default_seconds_per_tick() -> u64 {
    1
}

fn default_true() -> bool {
    true
}
