//! Turning classifier output into violations.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use proctor_core::config::MonitoringConfig;
use proctor_core::error::ErrorKind;
use proctor_core::traits::{CapabilityLease, Classification, SignalClassifier};
use proctor_core::types::{Severity, ThreatLevel, ViolationSource};

use super::handle::ExamSessionHandle;

/// A violation a monitor wants to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Reporting source.
    pub source: ViolationSource,
    /// Severity.
    pub severity: Severity,
    /// Human-readable details.
    pub details: String,
}

/// Per-monitor memory between samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorState {
    /// Consecutive samples with gaze away from the screen.
    pub gaze_away_streak: u32,
}

/// Thresholds applied to classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPolicy {
    /// Noise strictly above this level is a violation.
    pub audio_noise_threshold: u8,
    /// Consecutive away samples that make one gaze violation.
    pub gaze_away_samples: u32,
}

impl Default for SignalPolicy {
    fn default() -> Self {
        Self::from_config(&MonitoringConfig::default())
    }
}

impl SignalPolicy {
    /// Policy from the monitoring configuration.
    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self {
            audio_noise_threshold: config.audio_noise_threshold,
            gaze_away_samples: config.gaze_away_samples.max(1),
        }
    }

    /// Decide whether a classification is a violation.
    pub fn evaluate(
        &self,
        state: &mut MonitorState,
        classification: &Classification,
    ) -> Option<Detection> {
        match classification {
            Classification::FaceCount { faces, .. } if *faces != 1 => Some(Detection {
                source: ViolationSource::FacePresence,
                severity: Severity::High,
                details: if *faces == 0 {
                    "No face in frame".to_string()
                } else {
                    format!("{faces} faces in frame")
                },
            }),
            Classification::FaceCount { .. } => None,
            Classification::Gaze { direction } => {
                if !direction.is_away() {
                    state.gaze_away_streak = 0;
                    return None;
                }
                state.gaze_away_streak += 1;
                if state.gaze_away_streak < self.gaze_away_samples {
                    return None;
                }
                state.gaze_away_streak = 0;
                Some(Detection {
                    source: ViolationSource::EyeGaze,
                    severity: Severity::Medium,
                    details: format!(
                        "Gaze {direction} for {} consecutive samples",
                        self.gaze_away_samples
                    ),
                })
            }
            Classification::Phone {
                detected: true,
                confidence,
            } => Some(Detection {
                source: ViolationSource::PhonePresence,
                severity: Severity::High,
                details: format!("Phone detected (confidence {confidence:.2})"),
            }),
            Classification::Phone { .. } => None,
            Classification::AudioLevel { level, .. } if *level > self.audio_noise_threshold => {
                Some(Detection {
                    source: ViolationSource::AudioLevel,
                    severity: Severity::Low,
                    details: format!("Background noise level {level}"),
                })
            }
            Classification::AudioLevel { .. } => None,
            Classification::RfScan {
                threat, anomalies, ..
            } => {
                let severity = match threat {
                    ThreatLevel::Low => return None,
                    ThreatLevel::Medium => Severity::Medium,
                    ThreatLevel::High => Severity::High,
                };
                let details = if anomalies.is_empty() {
                    format!("RF threat level {threat}")
                } else {
                    anomalies.join("; ")
                };
                Some(Detection {
                    source: ViolationSource::RfSignal,
                    severity,
                    details,
                })
            }
        }
    }
}

/// Sample, classify, and report until the session ends.
///
/// Capture and classification failures are transient: they are logged
/// and the sample is skipped.
pub(crate) async fn run_monitor(
    handle: Arc<ExamSessionHandle>,
    lease: Arc<dyn CapabilityLease>,
    classifier: Arc<dyn SignalClassifier>,
    policy: SignalPolicy,
    period: Duration,
    cancel: CancellationToken,
) {
    let source = classifier.source();
    let session_id = handle.id();
    let mut state = MonitorState::default();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let sample = match lease.capture(classifier.channel()).await {
            Ok(sample) => sample,
            Err(e) => {
                debug!(%session_id, %source, error = %e, "Sample capture failed, skipping");
                continue;
            }
        };

        let classification = match classifier.classify(&sample).await {
            Ok(c) => c,
            Err(e) => {
                debug!(%session_id, %source, error = %e, "Classification failed, skipping");
                continue;
            }
        };

        let Some(detection) = policy.evaluate(&mut state, &classification) else {
            continue;
        };

        match handle
            .report_violation(detection.source, detection.severity, detection.details)
            .await
        {
            Ok(outcome) if outcome.transition.is_terminal() => break,
            Ok(_) => {}
            Err(e) if matches!(e.kind, ErrorKind::InvalidState | ErrorKind::PolicyViolation) => {
                break;
            }
            Err(e) => debug!(%session_id, %source, error = %e, "Violation report failed"),
        }
    }

    debug!(%session_id, %source, "Monitor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctor_core::types::GazeDirection;

    fn policy() -> SignalPolicy {
        SignalPolicy {
            audio_noise_threshold: 50,
            gaze_away_samples: 2,
        }
    }

    #[test]
    fn test_face_count_other_than_one_is_high() {
        let mut state = MonitorState::default();
        let p = policy();
        assert!(p
            .evaluate(
                &mut state,
                &Classification::FaceCount {
                    faces: 1,
                    confidence: 0.98
                }
            )
            .is_none());

        for faces in [0, 2] {
            let d = p
                .evaluate(&mut state, &Classification::FaceCount { faces, confidence: 0.9 })
                .expect("violation");
            assert_eq!(d.source, ViolationSource::FacePresence);
            assert_eq!(d.severity, Severity::High);
        }
    }

    #[test]
    fn test_gaze_needs_consecutive_away_samples() {
        let mut state = MonitorState::default();
        let p = policy();
        let away = Classification::Gaze {
            direction: GazeDirection::Left,
        };
        let center = Classification::Gaze {
            direction: GazeDirection::Center,
        };

        assert!(p.evaluate(&mut state, &away).is_none());
        assert!(p.evaluate(&mut state, &center).is_none());
        assert_eq!(state.gaze_away_streak, 0);

        assert!(p.evaluate(&mut state, &away).is_none());
        let d = p.evaluate(&mut state, &away).expect("sustained gaze");
        assert_eq!(d.source, ViolationSource::EyeGaze);
        assert_eq!(d.severity, Severity::Medium);
        assert_eq!(state.gaze_away_streak, 0);
    }

    #[test]
    fn test_audio_threshold_is_exclusive() {
        let mut state = MonitorState::default();
        let p = policy();
        let at = Classification::AudioLevel {
            level: 50,
            speech_detected: false,
        };
        let above = Classification::AudioLevel {
            level: 51,
            speech_detected: false,
        };
        assert!(p.evaluate(&mut state, &at).is_none());
        let d = p.evaluate(&mut state, &above).expect("noise");
        assert_eq!(d.severity, Severity::Low);
    }

    #[test]
    fn test_phone_and_rf() {
        let mut state = MonitorState::default();
        let p = policy();
        let phone = p
            .evaluate(
                &mut state,
                &Classification::Phone {
                    detected: true,
                    confidence: 0.7,
                },
            )
            .expect("phone");
        assert_eq!(phone.severity, Severity::High);

        let rf_low = Classification::RfScan {
            devices: 3,
            primary_frequency_mhz: 2400,
            threat: ThreatLevel::Low,
            anomalies: Vec::new(),
        };
        assert!(p.evaluate(&mut state, &rf_low).is_none());

        let rf_high = Classification::RfScan {
            devices: 9,
            primary_frequency_mhz: 2400,
            threat: ThreatLevel::High,
            anomalies: vec!["Unusual frequency hopping pattern detected".into()],
        };
        let d = p.evaluate(&mut state, &rf_high).expect("rf");
        assert_eq!(d.source, ViolationSource::RfSignal);
        assert_eq!(d.severity, Severity::High);
    }
}
