//! One-shot analyses behind the detection endpoints.

use std::sync::Arc;

use tracing::{info, warn};

use proctor_core::error::{AppError, ErrorKind};
use proctor_core::result::AppResult;
use proctor_core::traits::{Classification, SignalClassifier};
use proctor_core::types::{GazeDirection, Sample, SampleChannel, StudentId, TestId};
use proctor_entity::detection::{AudioAnalysis, FaceAnalysis, RfDetection, RfHistorySummary};
use proctor_store::RfScanHistory;

use super::DetectionSuite;

/// Face, audio, and RF analysis of uploaded samples.
#[derive(Debug, Clone)]
pub struct DetectionService {
    suite: DetectionSuite,
    rf_history: Arc<RfScanHistory>,
    audio_noise_threshold: u8,
}

impl DetectionService {
    /// Creates a new detection service.
    pub fn new(
        suite: DetectionSuite,
        rf_history: Arc<RfScanHistory>,
        audio_noise_threshold: u8,
    ) -> Self {
        Self {
            suite,
            rf_history,
            audio_noise_threshold,
        }
    }

    /// Analyse a base64 camera frame.
    pub async fn analyze_face(&self, image_data: &str, test_id: &TestId) -> AppResult<FaceAnalysis> {
        let frame = Sample::from_base64(SampleChannel::Video, image_data)?;

        let (faces, confidence) = match classify(&self.suite.face, &frame, "Face detection").await? {
            Classification::FaceCount { faces, confidence } => (faces, confidence),
            other => return Err(unexpected("Face detection", &other)),
        };
        let gaze = match classify(&self.suite.gaze, &frame, "Gaze detection").await? {
            Classification::Gaze { direction } => direction,
            _ => GazeDirection::Center,
        };
        let phone = match classify(&self.suite.phone, &frame, "Phone detection").await? {
            Classification::Phone {
                detected: true,
                confidence,
            } => Some(confidence),
            _ => None,
        };

        let analysis = FaceAnalysis::from_signals(faces, confidence, gaze, phone);
        info!(
            test_id = %test_id,
            faces = analysis.faces_detected,
            violations = analysis.violations.len(),
            "Face analysis completed"
        );
        Ok(analysis)
    }

    /// Analyse a base64 microphone clip.
    pub async fn analyze_audio(
        &self,
        audio_data: &str,
        test_id: &TestId,
    ) -> AppResult<AudioAnalysis> {
        let clip = Sample::from_base64(SampleChannel::Audio, audio_data)?;

        let analysis = match classify(&self.suite.audio, &clip, "Audio detection").await? {
            Classification::AudioLevel {
                level,
                speech_detected,
            } => AudioAnalysis::from_level(level, speech_detected, self.audio_noise_threshold),
            other => return Err(unexpected("Audio detection", &other)),
        };

        info!(
            test_id = %test_id,
            level = analysis.background_noise_level,
            suspicious = analysis.suspicious_audio,
            "Audio analysis completed"
        );
        Ok(analysis)
    }

    /// Run an RF scan for a student and add it to the history.
    pub async fn scan_rf(
        &self,
        test_id: TestId,
        student_id: StudentId,
        signal_data: Option<&str>,
    ) -> AppResult<RfDetection> {
        let sweep = match signal_data.filter(|s| !s.trim().is_empty()) {
            Some(encoded) => Sample::from_base64(SampleChannel::Radio, encoded)?,
            None => Sample::new(SampleChannel::Radio, bytes::Bytes::new()),
        };

        let detection = match classify(&self.suite.rf, &sweep, "RF detection").await? {
            Classification::RfScan {
                devices,
                primary_frequency_mhz,
                threat,
                anomalies,
            } => RfDetection::from_scan(
                test_id,
                student_id,
                devices,
                primary_frequency_mhz,
                threat,
                anomalies,
            ),
            other => return Err(unexpected("RF detection", &other)),
        };

        if detection.is_anomalous() {
            warn!(
                test_id = %detection.test_id,
                student_id = %detection.student_id,
                threat = %detection.signal_analysis.threat_level,
                devices = detection.detected_devices,
                "RF anomaly detected"
            );
        }
        self.rf_history.push(detection.clone()).await;
        Ok(detection)
    }

    /// Summary of past RF scans.
    pub async fn rf_history(&self, test_id: Option<&TestId>) -> RfHistorySummary {
        self.rf_history.summary(test_id).await
    }
}

async fn classify(
    classifier: &Arc<dyn SignalClassifier>,
    sample: &Sample,
    what: &str,
) -> AppResult<Classification> {
    classifier.classify(sample).await.map_err(|e| {
        if e.kind == ErrorKind::TransientSampling {
            AppError::with_source(ErrorKind::ExternalService, format!("{what} failed"), e)
        } else {
            e
        }
    })
}

fn unexpected(what: &str, classification: &Classification) -> AppError {
    AppError::internal(format!(
        "{what} returned an unexpected classification: {classification:?}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ScriptedClassifier;
    use proctor_core::types::{Severity, ThreatLevel, ViolationSource};
    use proctor_entity::detection::Recommendation;

    fn scripted(source: ViolationSource, fallback: Classification) -> Arc<dyn SignalClassifier> {
        Arc::new(ScriptedClassifier::new(source).with_fallback(fallback))
    }

    fn service(faces: u32, level: u8, threat: ThreatLevel) -> DetectionService {
        let suite = DetectionSuite {
            face: scripted(
                ViolationSource::FacePresence,
                Classification::FaceCount {
                    faces,
                    confidence: 0.95,
                },
            ),
            gaze: scripted(
                ViolationSource::EyeGaze,
                Classification::Gaze {
                    direction: GazeDirection::Center,
                },
            ),
            phone: scripted(
                ViolationSource::PhonePresence,
                Classification::Phone {
                    detected: false,
                    confidence: 0.1,
                },
            ),
            audio: scripted(
                ViolationSource::AudioLevel,
                Classification::AudioLevel {
                    level,
                    speech_detected: false,
                },
            ),
            rf: scripted(
                ViolationSource::RfSignal,
                Classification::RfScan {
                    devices: 4,
                    primary_frequency_mhz: 2400,
                    threat,
                    anomalies: Vec::new(),
                },
            ),
        };
        DetectionService::new(suite, Arc::new(RfScanHistory::new()), 50)
    }

    const FRAME: &str = "data:image/jpeg;base64,aGVsbG8=";

    #[tokio::test]
    async fn test_face_analysis_flags_multiple_faces() {
        let svc = service(2, 20, ThreatLevel::Low);
        let analysis = svc
            .analyze_face(FRAME, &TestId::new("1"))
            .await
            .expect("analysis");
        assert_eq!(analysis.faces_detected, 2);
        assert_eq!(analysis.violations[0].kind, "multiple_faces");
    }

    #[tokio::test]
    async fn test_invalid_base64_is_validation_error() {
        let svc = service(1, 20, ThreatLevel::Low);
        let err = svc
            .analyze_face("!!not base64!!", &TestId::new("1"))
            .await
            .expect_err("invalid");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_audio_analysis_uses_threshold() {
        let svc = service(1, 72, ThreatLevel::Low);
        let analysis = svc
            .analyze_audio("aGVsbG8=", &TestId::new("1"))
            .await
            .expect("analysis");
        assert_eq!(analysis.violations.len(), 1);
        assert_eq!(analysis.violations[0].severity, Severity::Medium);
    }

    #[tokio::test]
    async fn test_rf_scan_recorded_in_history() {
        let svc = service(1, 20, ThreatLevel::Medium);
        let detection = svc
            .scan_rf(TestId::new("1"), StudentId::new("s1"), None)
            .await
            .expect("scan");
        assert_eq!(detection.recommendation(), Recommendation::RecommendManualReview);
        let history = svc.rf_history(Some(&TestId::new("1"))).await;
        assert_eq!(history.total_scans, 1);
        assert_eq!(history.anomalies_detected, 1);
    }

    #[tokio::test]
    async fn test_classifier_failure_is_external_service_error() {
        let mut svc = service(1, 20, ThreatLevel::Low);
        svc.suite.face = Arc::new(ScriptedClassifier::new(ViolationSource::FacePresence));
        let err = svc
            .analyze_face(FRAME, &TestId::new("1"))
            .await
            .expect_err("classifier down");
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
