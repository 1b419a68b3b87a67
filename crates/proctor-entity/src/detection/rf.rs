//! RF scan results and history.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proctor_core::types::{StudentId, TestId, ThreatLevel};

/// Spectrum-level findings of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalAnalysis {
    /// Dominant frequency in MHz.
    pub primary_frequency: u32,
    /// Anomaly descriptions.
    pub anomalies: Vec<String>,
    /// Assessed threat.
    pub threat_level: ThreatLevel,
}

/// A transmitter that should not be in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnauthorizedDevice {
    /// Device description.
    #[serde(rename = "type")]
    pub kind: String,
    /// Signal strength in dBm.
    pub signal_strength: i32,
    /// Rough distance from the scanner.
    pub estimated_distance: String,
    /// Whether the device is considered a threat.
    pub threat: bool,
}

/// One RF scan for a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfDetection {
    /// Test being monitored.
    pub test_id: TestId,
    /// Student being monitored.
    pub student_id: StudentId,
    /// When the scan ran.
    pub timestamp: DateTime<Utc>,
    /// Transmitters in range.
    pub detected_devices: u32,
    /// Spectrum findings.
    pub signal_analysis: SignalAnalysis,
    /// Transmitters flagged as unauthorized.
    pub unauthorized_devices: Vec<UnauthorizedDevice>,
}

impl RfDetection {
    /// Build a detection; any threat above low flags an unknown device.
    pub fn from_scan(
        test_id: TestId,
        student_id: StudentId,
        devices: u32,
        primary_frequency_mhz: u32,
        threat: ThreatLevel,
        anomalies: Vec<String>,
    ) -> Self {
        let unauthorized_devices = if threat > ThreatLevel::Low {
            vec![UnauthorizedDevice {
                kind: "Unknown RF Device".to_string(),
                signal_strength: -45,
                estimated_distance: "1-3 meters".to_string(),
                threat: true,
            }]
        } else {
            Vec::new()
        };

        Self {
            test_id,
            student_id,
            timestamp: Utc::now(),
            detected_devices: devices,
            signal_analysis: SignalAnalysis {
                primary_frequency: primary_frequency_mhz,
                anomalies,
                threat_level: threat,
            },
            unauthorized_devices,
        }
    }

    /// Recommendation derived from the threat level.
    pub fn recommendation(&self) -> Recommendation {
        Recommendation::for_threat(self.signal_analysis.threat_level)
    }

    /// Whether the scan found anything anomalous.
    pub fn is_anomalous(&self) -> bool {
        !self.signal_analysis.anomalies.is_empty()
            || self.signal_analysis.threat_level > ThreatLevel::Low
    }
}

/// Action suggested to the proctor after a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// End the test.
    RecommendTestTermination,
    /// Have a proctor look at it.
    RecommendManualReview,
    /// Nothing to do.
    ContinueMonitoring,
}

impl Recommendation {
    /// Map a threat level to a recommendation.
    pub fn for_threat(threat: ThreatLevel) -> Self {
        match threat {
            ThreatLevel::High => Self::RecommendTestTermination,
            ThreatLevel::Medium => Self::RecommendManualReview,
            ThreatLevel::Low => Self::ContinueMonitoring,
        }
    }

    /// Wire form of the recommendation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecommendTestTermination => "RECOMMEND_TEST_TERMINATION",
            Self::RecommendManualReview => "RECOMMEND_MANUAL_REVIEW",
            Self::ContinueMonitoring => "CONTINUE_MONITORING",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device count statistics across scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCount {
    /// Fewest devices in one scan.
    pub min: u32,
    /// Most devices in one scan.
    pub max: u32,
    /// Rounded mean devices per scan.
    pub average: u32,
}

/// Aggregate of all scans of a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfHistorySummary {
    /// Test the scans belong to, if filtered.
    pub test_id: Option<TestId>,
    /// Number of scans.
    pub total_scans: u64,
    /// Scans with anomalies.
    pub anomalies_detected: u64,
    /// Mean threat level.
    pub average_threat_level: ThreatLevel,
    /// Device counts.
    pub device_count: DeviceCount,
}

impl RfHistorySummary {
    /// Summarize a set of scans.
    pub fn from_scans(test_id: Option<TestId>, scans: &[RfDetection]) -> Self {
        if scans.is_empty() {
            return Self {
                test_id,
                total_scans: 0,
                anomalies_detected: 0,
                average_threat_level: ThreatLevel::Low,
                device_count: DeviceCount::default(),
            };
        }

        let n = scans.len() as f64;
        let threat_sum: f64 = scans
            .iter()
            .map(|s| f64::from(s.signal_analysis.threat_level.weight()))
            .sum();
        let devices = scans.iter().map(|s| s.detected_devices);
        let device_sum: f64 = devices.clone().map(f64::from).sum();

        Self {
            test_id,
            total_scans: scans.len() as u64,
            anomalies_detected: scans.iter().filter(|s| s.is_anomalous()).count() as u64,
            average_threat_level: ThreatLevel::from_average(threat_sum / n),
            device_count: DeviceCount {
                min: devices.clone().min().unwrap_or(0),
                max: devices.max().unwrap_or(0),
                average: (device_sum / n).round() as u32,
            },
        }
    }
}
