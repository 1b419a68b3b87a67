//! Classifier output vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of the candidate's gaze relative to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GazeDirection {
    /// Looking at the screen.
    Center,
    /// Looking left of the screen.
    Left,
    /// Looking right of the screen.
    Right,
    /// Looking down, typically at a desk or lap.
    Down,
    /// Looking above the screen.
    Up,
}

impl GazeDirection {
    /// Whether the gaze is off the screen.
    pub fn is_away(&self) -> bool {
        !matches!(self, Self::Center)
    }

    /// Return the direction as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

impl fmt::Display for GazeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threat level assigned to an RF scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    /// Background devices only.
    Low,
    /// Anomalies worth a manual review.
    Medium,
    /// Strong evidence of an unauthorized transmitter.
    High,
}

impl ThreatLevel {
    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Numeric weight used when averaging levels.
    pub fn weight(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Inverse of [`ThreatLevel::weight`], rounding to the nearest level.
    pub fn from_average(average: f64) -> Self {
        if average >= 1.5 {
            Self::High
        } else if average >= 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
