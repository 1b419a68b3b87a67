//! Signal classifier trait and its output.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::detection::{GazeDirection, ThreatLevel};
use crate::types::sample::{Sample, SampleChannel};
use crate::types::violation::ViolationSource;

/// Result of classifying one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// Number of faces in a camera frame.
    FaceCount {
        /// Faces detected.
        faces: u32,
        /// Detector confidence in `[0, 1]`.
        confidence: f32,
    },
    /// Gaze direction in a camera frame.
    Gaze {
        /// Estimated direction.
        direction: GazeDirection,
    },
    /// Phone presence in a camera frame.
    Phone {
        /// Whether a phone was seen.
        detected: bool,
        /// Detector confidence in `[0, 1]`.
        confidence: f32,
    },
    /// Loudness of a microphone clip.
    AudioLevel {
        /// Background noise on a 0-100 scale.
        level: u8,
        /// Whether speech was recognized.
        speech_detected: bool,
    },
    /// RF spectrum sweep.
    RfScan {
        /// Transmitters in range.
        devices: u32,
        /// Dominant frequency in MHz.
        primary_frequency_mhz: u32,
        /// Assessed threat level.
        threat: ThreatLevel,
        /// Human-readable anomaly descriptions.
        anomalies: Vec<String>,
    },
}

/// Given a sample, return a classification.
///
/// Implementations wrap an external inference service or, in this
/// repository, a seeded simulation. Errors must be reported as
/// [`crate::error::ErrorKind::TransientSampling`]; the monitor swallows them.
#[async_trait]
pub trait SignalClassifier: Send + Sync + Debug + 'static {
    /// The violation source this classifier feeds.
    fn source(&self) -> ViolationSource;

    /// The channel samples must be captured from.
    fn channel(&self) -> SampleChannel;

    /// Classify one sample.
    async fn classify(&self, sample: &Sample) -> AppResult<Classification>;
}
