//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use proctor_api::{AppState, Collaborators, build_app, build_state};
use proctor_core::config::AppConfig;
use proctor_core::traits::Classification;
use proctor_core::types::{GazeDirection, ThreatLevel, ViolationSource};
use proctor_service::{DetectionSuite, ScriptedClassifier, SimulatedCapabilityProvider};
use proctor_store::{InMemoryViolationStore, SubmissionLedger};

/// A tiny valid base64 payload ("frame").
pub const SAMPLE_B64: &str = "ZnJhbWU=";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct inspection
    pub state: AppState,
    /// Camera grant that tests can refuse
    pub capability: Arc<SimulatedCapabilityProvider>,
    /// Submission collaborator that tests can take offline
    pub submissions: Arc<SubmissionLedger>,
}

impl TestApp {
    /// Application whose classifiers always report a clean sample.
    pub fn new() -> Self {
        Self::with_suite(clean_suite())
    }

    /// Application using the given classifiers for the detection endpoints.
    pub fn with_suite(suite: DetectionSuite) -> Self {
        let capability = Arc::new(SimulatedCapabilityProvider::new(true));
        let submissions = Arc::new(SubmissionLedger::new());

        let collaborators = Collaborators {
            capability: capability.clone(),
            suite,
            submissions: submissions.clone(),
            violations: Arc::new(InMemoryViolationStore::new()),
        };
        let state = build_state(test_config(), collaborators);
        let router = build_app(state.clone());

        Self {
            router,
            state,
            capability,
            submissions,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create a session for the demo test and return its id.
    pub async fn create_session(&self, student_id: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/sessions",
                Some(serde_json::json!({ "testId": "1", "studentId": student_id })),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create failed: {:?}",
            response.body
        );
        response.body["data"]["sessionId"]
            .as_str()
            .expect("No sessionId in response")
            .to_string()
    }

    /// Create and start a session, returning its id.
    pub async fn start_session(&self, student_id: &str) -> String {
        let id = self.create_session(student_id).await;
        let response = self
            .request("POST", &format!("/api/sessions/{id}/start"), None)
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Start failed: {:?}",
            response.body
        );
        id
    }

    /// Report a tab-visibility violation against a session.
    pub async fn report_tab_switch(&self, id: &str) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/sessions/{id}/violations"),
            Some(serde_json::json!({ "source": "tab-visibility" })),
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when not JSON
    pub body: Value,
}

/// Configuration with manual ticks and no background monitors.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.exam.auto_tick = false;
    config.monitoring.enabled_sources = vec![ViolationSource::TabVisibility];
    config
}

/// Classifiers that never find anything.
pub fn clean_suite() -> DetectionSuite {
    suite_with(
        Classification::FaceCount {
            faces: 1,
            confidence: 0.95,
        },
        Classification::AudioLevel {
            level: 20,
            speech_detected: false,
        },
        Classification::RfScan {
            devices: 2,
            primary_frequency_mhz: 2400,
            threat: ThreatLevel::Low,
            anomalies: Vec::new(),
        },
    )
}

/// Suite with fixed face, audio, and RF results; gaze centered, no phone.
pub fn suite_with(face: Classification, audio: Classification, rf: Classification) -> DetectionSuite {
    let fixed = |source: ViolationSource, result: Classification| {
        Arc::new(ScriptedClassifier::new(source).with_fallback(result))
            as Arc<dyn proctor_core::traits::SignalClassifier>
    };

    DetectionSuite {
        face: fixed(ViolationSource::FacePresence, face),
        gaze: fixed(
            ViolationSource::EyeGaze,
            Classification::Gaze {
                direction: GazeDirection::Center,
            },
        ),
        phone: fixed(
            ViolationSource::PhonePresence,
            Classification::Phone {
                detected: false,
                confidence: 0.1,
            },
        ),
        audio: fixed(ViolationSource::AudioLevel, audio),
        rf: fixed(ViolationSource::RfSignal, rf),
    }
}
