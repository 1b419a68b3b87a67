//! Face analysis result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proctor_core::types::{GazeDirection, Severity};

/// A violation found while analysing a single frame or clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedViolation {
    /// Violation type, e.g. `multiple_faces`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Severity.
    pub severity: Severity,
    /// Detector confidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Measured level, for audio violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl DetectedViolation {
    /// Violation without a confidence or level.
    pub fn new(kind: impl Into<String>, severity: Severity) -> Self {
        Self {
            kind: kind.into(),
            severity,
            confidence: None,
            level: None,
        }
    }

    /// Attach a detector confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Attach a measured level.
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }
}

/// Analysis of one camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceAnalysis {
    /// Number of faces in the frame.
    pub faces_detected: u32,
    /// Face detector confidence.
    pub faces_confidence: f32,
    /// Whether the candidate's eyes are open.
    pub eyes_open: bool,
    /// Estimated gaze direction.
    pub eye_gaze_direction: GazeDirection,
    /// Head orientation.
    pub head_position: String,
    /// Lighting assessment.
    pub lighting_condition: String,
    /// Violations found in the frame.
    pub violations: Vec<DetectedViolation>,
    /// When the analysis was made.
    pub timestamp: DateTime<Utc>,
}

impl FaceAnalysis {
    /// Assemble an analysis from the individual classifier outputs.
    pub fn from_signals(
        faces: u32,
        confidence: f32,
        gaze: GazeDirection,
        phone_detected: Option<f32>,
    ) -> Self {
        let mut violations = Vec::new();
        match faces {
            0 => violations.push(DetectedViolation::new("no_face", Severity::High)),
            1 => {}
            _ => violations.push(
                DetectedViolation::new("multiple_faces", Severity::High)
                    .with_confidence(confidence),
            ),
        }
        if faces == 1 && gaze.is_away() {
            violations.push(DetectedViolation::new("gaze_away", Severity::Medium));
        }
        if let Some(phone_confidence) = phone_detected {
            violations.push(
                DetectedViolation::new("phone_detected", Severity::High)
                    .with_confidence(phone_confidence),
            );
        }

        Self {
            faces_detected: faces,
            faces_confidence: confidence,
            eyes_open: faces > 0,
            eye_gaze_direction: gaze,
            head_position: if gaze.is_away() { "turned" } else { "frontal" }.to_string(),
            lighting_condition: "good".to_string(),
            violations,
            timestamp: Utc::now(),
        }
    }

    /// Whether the frame is free of violations.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_centered_face_is_clean() {
        let a = FaceAnalysis::from_signals(1, 0.98, GazeDirection::Center, None);
        assert!(a.is_clean());
        assert_eq!(a.head_position, "frontal");
        let json = serde_json::to_value(&a).expect("json");
        assert_eq!(json["facesDetected"], 1);
        assert_eq!(json["eyeGazeDirection"], "center");
    }

    #[test]
    fn test_multiple_faces_is_high() {
        let a = FaceAnalysis::from_signals(2, 0.95, GazeDirection::Center, None);
        assert_eq!(a.violations.len(), 1);
        assert_eq!(a.violations[0].kind, "multiple_faces");
        assert_eq!(a.violations[0].severity, Severity::High);
        assert_eq!(a.violations[0].confidence, Some(0.95));
    }

    #[test]
    fn test_no_face_and_phone() {
        let a = FaceAnalysis::from_signals(0, 0.9, GazeDirection::Center, Some(0.8));
        let kinds: Vec<_> = a.violations.iter().map(|v| v.kind.as_str()).collect();
        assert_eq!(kinds, vec!["no_face", "phone_detected"]);
        assert!(!a.eyes_open);
    }
}
