//! Monitor sampling configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::ViolationSource;

/// Settings shared by the polled monitors of a running session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Interval between classifier polls, in seconds.
    #[serde(default = "default_sample_interval")]
    pub sample_interval_seconds: u64,
    /// Noise level (0-100) above which the audio monitor reports.
    #[serde(default = "default_noise_threshold")]
    pub audio_noise_threshold: u8,
    /// Consecutive away-gaze samples that count as sustained.
    #[serde(default = "default_gaze_samples")]
    pub gaze_away_samples: u32,
    /// Sources activated when a session starts.
    #[serde(default = "default_sources")]
    pub enabled_sources: Vec<ViolationSource>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            sample_interval_seconds: default_sample_interval(),
            audio_noise_threshold: default_noise_threshold(),
            gaze_away_samples: default_gaze_samples(),
            enabled_sources: default_sources(),
        }
    }
}

impl MonitoringConfig {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.sample_interval_seconds == 0 {
            return Err(AppError::configuration(
                "monitoring.sample_interval_seconds must be positive",
            ));
        }
        if self.gaze_away_samples == 0 {
            return Err(AppError::configuration(
                "monitoring.gaze_away_samples must be at least 1",
            ));
        }
        if self.audio_noise_threshold > 100 {
            return Err(AppError::configuration(
                "monitoring.audio_noise_threshold must be within 0..=100",
            ));
        }
        Ok(())
    }
}

fn default_sample_interval() -> u64 {
    3
}

fn default_noise_threshold() -> u8 {
    50
}

fn default_gaze_samples() -> u32 {
    2
}

fn default_sources() -> Vec<ViolationSource> {
    vec![
        ViolationSource::TabVisibility,
        ViolationSource::FacePresence,
        ViolationSource::EyeGaze,
        ViolationSource::PhonePresence,
        ViolationSource::AudioLevel,
    ]
}
