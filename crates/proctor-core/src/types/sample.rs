//! Raw samples captured from a capability lease.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Capture channel of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleChannel {
    /// Camera frame.
    Video,
    /// Microphone clip.
    Audio,
    /// RF spectrum sweep.
    Radio,
}

/// A single captured sample handed to a classifier.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Capture channel.
    pub channel: SampleChannel,
    /// When the sample was captured.
    pub captured_at: DateTime<Utc>,
    /// Encoded payload (frame, clip, or sweep).
    pub data: Bytes,
}

impl Sample {
    /// Create a sample captured now.
    pub fn new(channel: SampleChannel, data: impl Into<Bytes>) -> Self {
        Self {
            channel,
            captured_at: Utc::now(),
            data: data.into(),
        }
    }

    /// Decode a base64 payload as sent by the browser.
    ///
    /// Accepts data URLs (`data:image/jpeg;base64,...`) as well as bare base64.
    pub fn from_base64(channel: SampleChannel, encoded: &str) -> Result<Self, AppError> {
        let payload = match encoded.split_once(";base64,") {
            Some((_, rest)) => rest,
            None => encoded,
        };
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(AppError::validation("Sample payload is empty"));
        }
        let data = STANDARD.decode(payload)?;
        Ok(Self::new(channel, data))
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
