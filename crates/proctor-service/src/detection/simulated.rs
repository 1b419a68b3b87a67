//! Simulated capability and classifiers driven by a seedable RNG.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::debug;

use proctor_core::config::DetectionConfig;
use proctor_core::error::AppError;
use proctor_core::result::AppResult;
use proctor_core::traits::{
    CapabilityLease, CapabilityProvider, Classification, SignalClassifier,
};
use proctor_core::types::{
    GazeDirection, Sample, SampleChannel, SessionId, ThreatLevel, ViolationSource,
};

use super::channel_for;

const AWAY_DIRECTIONS: [GazeDirection; 4] = [
    GazeDirection::Left,
    GazeDirection::Right,
    GazeDirection::Down,
    GazeDirection::Up,
];

/// Grants or denies camera and microphone access from a switch.
#[derive(Debug)]
pub struct SimulatedCapabilityProvider {
    available: AtomicBool,
    acquisitions: AtomicU32,
    release_calls: Arc<AtomicU32>,
}

impl SimulatedCapabilityProvider {
    /// Provider that grants access iff `available`.
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
            acquisitions: AtomicU32::new(0),
            release_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Provider configured from the detection settings.
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.capability_available)
    }

    /// Grant or deny subsequent acquisitions.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Successful acquisitions so far.
    pub fn acquisitions(&self) -> u32 {
        self.acquisitions.load(Ordering::Acquire)
    }

    /// Calls to [`CapabilityLease::release`] across all leases.
    pub fn release_calls(&self) -> u32 {
        self.release_calls.load(Ordering::Acquire)
    }
}

#[async_trait]
impl CapabilityProvider for SimulatedCapabilityProvider {
    async fn acquire(&self, session_id: &SessionId) -> AppResult<Arc<dyn CapabilityLease>> {
        if !self.available.load(Ordering::Acquire) {
            return Err(AppError::device_unavailable(
                "Camera or microphone permission denied",
            ));
        }

        self.acquisitions.fetch_add(1, Ordering::AcqRel);
        debug!(%session_id, "Simulated capability granted");
        Ok(Arc::new(SimulatedLease {
            session_id: *session_id,
            released: AtomicBool::new(false),
            release_calls: Arc::clone(&self.release_calls),
        }))
    }
}

/// Lease handed out by [`SimulatedCapabilityProvider`].
#[derive(Debug)]
pub struct SimulatedLease {
    session_id: SessionId,
    released: AtomicBool,
    release_calls: Arc<AtomicU32>,
}

impl SimulatedLease {
    /// Whether the lease has been released.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

#[async_trait]
impl CapabilityLease for SimulatedLease {
    async fn capture(&self, channel: SampleChannel) -> AppResult<Sample> {
        if self.is_released() {
            return Err(AppError::transient_sampling("Capability already released"));
        }
        let data = match channel {
            SampleChannel::Video => Bytes::from_static(b"simulated-frame"),
            SampleChannel::Audio => Bytes::from_static(b"simulated-clip"),
            SampleChannel::Radio => Bytes::from_static(b"simulated-sweep"),
        };
        Ok(Sample::new(channel, data))
    }

    async fn release(&self) {
        self.release_calls.fetch_add(1, Ordering::AcqRel);
        if !self.released.swap(true, Ordering::AcqRel) {
            debug!(session_id = %self.session_id, "Simulated capability released");
        }
    }
}

/// Classifier producing plausible output at configured anomaly rates.
#[derive(Debug)]
pub struct SimulatedClassifier {
    source: ViolationSource,
    config: DetectionConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedClassifier {
    /// Classifier for `source`; `seed` makes its output reproducible.
    pub fn new(source: ViolationSource, config: &DetectionConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            source,
            config: config.clone(),
            rng: Mutex::new(rng),
        }
    }

    fn simulate(&self, rng: &mut StdRng) -> AppResult<Classification> {
        let c = &self.config;
        let classification = match self.source {
            ViolationSource::FacePresence => {
                let faces = if rng.gen_bool(c.face_anomaly_rate) {
                    if rng.gen_bool(0.5) { 0 } else { 2 }
                } else {
                    1
                };
                Classification::FaceCount {
                    faces,
                    confidence: rng.gen_range(0.90..0.99),
                }
            }
            ViolationSource::EyeGaze => {
                let direction = if rng.gen_bool(c.gaze_away_rate) {
                    AWAY_DIRECTIONS[rng.gen_range(0..AWAY_DIRECTIONS.len())]
                } else {
                    GazeDirection::Center
                };
                Classification::Gaze { direction }
            }
            ViolationSource::PhonePresence => {
                let detected = rng.gen_bool(c.phone_rate);
                Classification::Phone {
                    detected,
                    confidence: if detected {
                        rng.gen_range(0.6..0.95)
                    } else {
                        rng.gen_range(0.0..0.2)
                    },
                }
            }
            ViolationSource::AudioLevel => {
                let noisy = rng.gen_bool(c.noisy_audio_rate);
                Classification::AudioLevel {
                    level: if noisy {
                        rng.gen_range(51..=90)
                    } else {
                        rng.gen_range(10..=40)
                    },
                    speech_detected: noisy && rng.gen_bool(0.5),
                }
            }
            ViolationSource::RfSignal => {
                let devices = rng.gen_range(2..10);
                let (threat, anomalies) = if rng.gen_bool(c.rf_anomaly_rate) {
                    if rng.gen_bool(0.2) {
                        (
                            ThreatLevel::High,
                            vec!["Persistent transmitter close to the candidate".to_string()],
                        )
                    } else {
                        (
                            ThreatLevel::Medium,
                            vec!["Unusual frequency hopping pattern detected".to_string()],
                        )
                    }
                } else {
                    (ThreatLevel::Low, Vec::new())
                };
                Classification::RfScan {
                    devices,
                    primary_frequency_mhz: 2400,
                    threat,
                    anomalies,
                }
            }
            ViolationSource::TabVisibility => {
                return Err(AppError::transient_sampling(
                    "Tab visibility is reported by the client, not sampled",
                ));
            }
        };
        Ok(classification)
    }
}

#[async_trait]
impl SignalClassifier for SimulatedClassifier {
    fn source(&self) -> ViolationSource {
        self.source
    }

    fn channel(&self) -> SampleChannel {
        channel_for(self.source)
    }

    async fn classify(&self, sample: &Sample) -> AppResult<Classification> {
        if sample.channel != self.channel() {
            return Err(AppError::transient_sampling(format!(
                "{} classifier cannot use a {:?} sample",
                self.source, sample.channel
            )));
        }
        let mut rng = self.rng.lock().await;
        self.simulate(&mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctor_core::error::ErrorKind;

    #[tokio::test]
    async fn test_denied_provider() {
        let provider = SimulatedCapabilityProvider::new(false);
        let err = provider
            .acquire(&SessionId::new())
            .await
            .expect_err("denied");
        assert_eq!(err.kind, ErrorKind::DeviceUnavailable);
        assert_eq!(provider.acquisitions(), 0);
    }

    #[tokio::test]
    async fn test_released_lease_stops_capturing() {
        let provider = SimulatedCapabilityProvider::new(true);
        let lease = provider.acquire(&SessionId::new()).await.expect("grant");
        lease.capture(SampleChannel::Video).await.expect("frame");
        lease.release().await;
        let err = lease
            .capture(SampleChannel::Video)
            .await
            .expect_err("released");
        assert_eq!(err.kind, ErrorKind::TransientSampling);
        assert_eq!(provider.release_calls(), 1);
    }

    #[tokio::test]
    async fn test_same_seed_same_output() {
        let config = DetectionConfig {
            face_anomaly_rate: 0.5,
            ..DetectionConfig::default()
        };
        let a = SimulatedClassifier::new(ViolationSource::FacePresence, &config, Some(7));
        let b = SimulatedClassifier::new(ViolationSource::FacePresence, &config, Some(7));
        let frame = Sample::new(SampleChannel::Video, Bytes::from_static(b"f"));
        for _ in 0..20 {
            assert_eq!(
                a.classify(&frame).await.expect("a"),
                b.classify(&frame).await.expect("b")
            );
        }
    }

    #[tokio::test]
    async fn test_certain_rates() {
        let config = DetectionConfig {
            phone_rate: 1.0,
            noisy_audio_rate: 1.0,
            ..DetectionConfig::default()
        };
        let phone = SimulatedClassifier::new(ViolationSource::PhonePresence, &config, Some(1));
        let frame = Sample::new(SampleChannel::Video, Bytes::from_static(b"f"));
        assert!(matches!(
            phone.classify(&frame).await.expect("phone"),
            Classification::Phone { detected: true, .. }
        ));

        let audio = SimulatedClassifier::new(ViolationSource::AudioLevel, &config, Some(1));
        let clip = Sample::new(SampleChannel::Audio, Bytes::from_static(b"c"));
        match audio.classify(&clip).await.expect("audio") {
            Classification::AudioLevel { level, .. } => assert!(level > 50),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_channel_is_transient() {
        let c = SimulatedClassifier::new(
            ViolationSource::AudioLevel,
            &DetectionConfig::default(),
            Some(1),
        );
        let frame = Sample::new(SampleChannel::Video, Bytes::from_static(b"f"));
        let err = c.classify(&frame).await.expect_err("wrong channel");
        assert_eq!(err.kind, ErrorKind::TransientSampling);
    }
}
