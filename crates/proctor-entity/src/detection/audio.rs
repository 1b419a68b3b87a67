//! Audio analysis result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proctor_core::types::Severity;

use super::face::DetectedViolation;

/// Analysis of one microphone clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysis {
    /// Background noise on a 0-100 scale.
    pub background_noise_level: u8,
    /// Whether speech was recognized.
    pub speech_detected: bool,
    /// Whether any violation was found.
    pub suspicious_audio: bool,
    /// Violations found in the clip.
    pub violations: Vec<DetectedViolation>,
    /// When the analysis was made.
    pub timestamp: DateTime<Utc>,
}

impl AudioAnalysis {
    /// Assemble an analysis; noise strictly above `noise_threshold` is a violation.
    pub fn from_level(level: u8, speech_detected: bool, noise_threshold: u8) -> Self {
        let mut violations = Vec::new();
        if level > noise_threshold {
            violations.push(
                DetectedViolation::new("high_background_noise", Severity::Medium).with_level(level),
            );
        }
        if speech_detected {
            violations.push(DetectedViolation::new("speech_detected", Severity::High));
        }

        Self {
            background_noise_level: level,
            speech_detected,
            suspicious_audio: !violations.is_empty(),
            violations,
            timestamp: Utc::now(),
        }
    }
}
