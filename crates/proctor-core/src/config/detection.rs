//! Simulated detection collaborator configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Rates used by the simulated capability provider and classifiers.
///
/// Each rate is the probability that a single sample is anomalous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Whether the simulated camera/microphone grant succeeds.
    #[serde(default = "default_true")]
    pub capability_available: bool,
    /// Face count different from one.
    #[serde(default = "default_face_rate")]
    pub face_anomaly_rate: f64,
    /// Gaze directed away from the screen.
    #[serde(default = "default_gaze_rate")]
    pub gaze_away_rate: f64,
    /// Phone in frame.
    #[serde(default = "default_phone_rate")]
    pub phone_rate: f64,
    /// Noisy audio clip.
    #[serde(default = "default_audio_rate")]
    pub noisy_audio_rate: f64,
    /// RF scan anomaly.
    #[serde(default = "default_rf_rate")]
    pub rf_anomaly_rate: f64,
    /// Fixed RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            capability_available: true,
            face_anomaly_rate: default_face_rate(),
            gaze_away_rate: default_gaze_rate(),
            phone_rate: default_phone_rate(),
            noisy_audio_rate: default_audio_rate(),
            rf_anomaly_rate: default_rf_rate(),
            seed: None,
        }
    }
}

impl DetectionConfig {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        let rates = [
            ("face_anomaly_rate", self.face_anomaly_rate),
            ("gaze_away_rate", self.gaze_away_rate),
            ("phone_rate", self.phone_rate),
            ("noisy_audio_rate", self.noisy_audio_rate),
            ("rf_anomaly_rate", self.rf_anomaly_rate),
        ];
        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(AppError::configuration(format!(
                    "detection.{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_face_rate() -> f64 {
    0.05
}

fn default_gaze_rate() -> f64 {
    0.08
}

fn default_phone_rate() -> f64 {
    0.03
}

fn default_audio_rate() -> f64 {
    0.05
}

fn default_rf_rate() -> f64 {
    0.15
}
