//! Violation value types shared by the session, the monitors, and the store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Display severity of a violation.
///
/// Severity never weighs into the termination threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor signal, e.g. background noise.
    Low,
    /// Suspicious behaviour, e.g. leaving the tab.
    Medium,
    /// Strong evidence, e.g. a second face or a phone.
    High,
}

impl Severity {
    /// Return the severity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(AppError::validation(format!("Unknown severity '{other}'"))),
        }
    }
}

/// Independent producer of violation signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSource {
    /// The exam page lost foreground focus.
    TabVisibility,
    /// Zero or several faces in frame.
    FacePresence,
    /// Gaze held away from the screen.
    EyeGaze,
    /// A phone was seen in frame.
    PhonePresence,
    /// Ambient noise above threshold.
    AudioLevel,
    /// Unauthorized radio transmitter nearby.
    RfSignal,
}

impl ViolationSource {
    /// All known sources.
    pub const ALL: [ViolationSource; 6] = [
        Self::TabVisibility,
        Self::FacePresence,
        Self::EyeGaze,
        Self::PhonePresence,
        Self::AudioLevel,
        Self::RfSignal,
    ];

    /// Severity used when a report does not carry one.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::TabVisibility | Self::EyeGaze | Self::RfSignal => Severity::Medium,
            Self::FacePresence | Self::PhonePresence => Severity::High,
            Self::AudioLevel => Severity::Low,
        }
    }

    /// Whether the source is fed by client events rather than a polled classifier.
    pub fn is_event_driven(&self) -> bool {
        matches!(self, Self::TabVisibility)
    }

    /// Return the source as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TabVisibility => "tab_visibility",
            Self::FacePresence => "face_presence",
            Self::EyeGaze => "eye_gaze",
            Self::PhonePresence => "phone_presence",
            Self::AudioLevel => "audio_level",
            Self::RfSignal => "rf_signal",
        }
    }
}

impl fmt::Display for ViolationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationSource {
    type Err = AppError;

    /// Accepts both `tab_visibility` and `tab-visibility` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == normalized)
            .ok_or_else(|| AppError::validation(format!("Unknown violation source '{s}'")))
    }
}

/// One entry of a session's append-only violation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationEntry {
    /// Position in the log, starting at 1.
    pub sequence: u32,
    /// Producer of the signal.
    pub source: ViolationSource,
    /// Display severity.
    pub severity: Severity,
    /// When the triggering condition was observed.
    pub timestamp: DateTime<Utc>,
    /// Free-form description.
    pub details: String,
}
