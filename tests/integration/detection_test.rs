//! Integration tests for the face, audio, and RF detection endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use proctor_core::traits::Classification;
use proctor_core::types::ThreatLevel;

use helpers::{SAMPLE_B64, TestApp, suite_with};

fn face(faces: u32) -> Classification {
    Classification::FaceCount {
        faces,
        confidence: 0.9,
    }
}

fn audio(level: u8, speech_detected: bool) -> Classification {
    Classification::AudioLevel {
        level,
        speech_detected,
    }
}

fn rf(devices: u32, threat: ThreatLevel, anomalies: &[&str]) -> Classification {
    Classification::RfScan {
        devices,
        primary_frequency_mhz: 2400,
        threat,
        anomalies: anomalies.iter().map(|a| a.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_face_recognition_clean() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/ai/face-recognition",
            Some(json!({ "imageData": format!("data:image/jpeg;base64,{SAMPLE_B64}"), "testId": "1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    let analysis = &response.body["analysis"];
    assert_eq!(analysis["facesDetected"], 1);
    assert_eq!(analysis["eyeGazeDirection"], "center");
    assert_eq!(analysis["violations"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_face_recognition_multiple_faces() {
    let app = TestApp::with_suite(suite_with(face(2), audio(10, false), rf(1, ThreatLevel::Low, &[])));

    let response = app
        .request(
            "POST",
            "/api/ai/face-recognition",
            Some(json!({ "imageData": SAMPLE_B64, "testId": "1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let violations = &response.body["analysis"]["violations"];
    assert_eq!(violations[0]["type"], "multiple_faces");
    assert_eq!(violations[0]["severity"], "high");
}

#[tokio::test]
async fn test_face_recognition_rejects_bad_payload() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/ai/face-recognition",
            Some(json!({ "imageData": "***not base64***", "testId": "1" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", "/api/ai/face-recognition", Some(json!({ "testId": "1" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_audio_detection_thresholds() {
    let app = TestApp::with_suite(suite_with(face(1), audio(72, true), rf(1, ThreatLevel::Low, &[])));

    let response = app
        .request(
            "POST",
            "/api/ai/audio-detection",
            Some(json!({ "audioData": SAMPLE_B64, "testId": "1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let analysis = &response.body["analysis"];
    assert_eq!(analysis["backgroundNoiseLevel"], 72);
    assert_eq!(analysis["suspiciousAudio"], true);
    assert_eq!(analysis["violations"][0]["type"], "high_background_noise");
    assert_eq!(analysis["violations"][0]["severity"], "medium");
    assert_eq!(analysis["violations"][0]["level"], 72);
    assert_eq!(analysis["violations"][1]["type"], "speech_detected");
    assert_eq!(analysis["violations"][1]["severity"], "high");
}

#[tokio::test]
async fn test_audio_at_threshold_is_quiet() {
    let app = TestApp::with_suite(suite_with(face(1), audio(50, false), rf(1, ThreatLevel::Low, &[])));

    let response = app
        .request(
            "POST",
            "/api/ai/audio-detection",
            Some(json!({ "audioData": SAMPLE_B64, "testId": "1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["analysis"]["suspiciousAudio"], false);
}

#[tokio::test]
async fn test_rf_scan_high_threat() {
    let app = TestApp::with_suite(suite_with(
        face(1),
        audio(10, false),
        rf(5, ThreatLevel::High, &["Unusual 2.4GHz activity"]),
    ));

    let response = app
        .request(
            "POST",
            "/api/hardware/rf-detector",
            Some(json!({ "testId": "1", "studentId": "s1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["recommendation"], "RECOMMEND_TEST_TERMINATION");
    let detection = &response.body["detection"];
    assert_eq!(detection["detectedDevices"], 5);
    assert_eq!(detection["signalAnalysis"]["threatLevel"], "high");
    assert_eq!(detection["unauthorizedDevices"][0]["type"], "Unknown RF Device");
}

#[tokio::test]
async fn test_rf_scan_requires_ids() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/hardware/rf-detector", Some(json!({ "testId": "1" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rf_history_summary() {
    let app = TestApp::with_suite(suite_with(
        face(1),
        audio(10, false),
        rf(3, ThreatLevel::Medium, &["Bluetooth beacon"]),
    ));
    for (test_id, student_id) in [("1", "s1"), ("1", "s2"), ("2", "s3")] {
        app.request(
            "POST",
            "/api/hardware/rf-detector",
            Some(json!({ "testId": test_id, "studentId": student_id })),
        )
        .await;
    }

    let response = app
        .request("GET", "/api/hardware/rf-detector?testId=1", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["totalScans"], 2);
    assert_eq!(response.body["anomaliesDetected"], 2);
    assert_eq!(response.body["averageThreatLevel"], "medium");
    assert_eq!(response.body["deviceCount"]["max"], 3);

    let response = app.request("GET", "/api/hardware/rf-detector", None).await;
    assert_eq!(response.body["totalScans"], 3);
}

#[tokio::test]
async fn test_detection_failure_maps_to_bad_gateway() {
    use std::sync::Arc;

    use proctor_core::types::ViolationSource;
    use proctor_service::ScriptedClassifier;

    let mut suite = helpers::clean_suite();
    suite.audio = Arc::new(
        ScriptedClassifier::new(ViolationSource::AudioLevel)
            .with_script(vec![Err("microphone glitch".to_string())]),
    );
    let app = TestApp::with_suite(suite);

    let response = app
        .request(
            "POST",
            "/api/ai/audio-detection",
            Some(json!({ "audioData": SAMPLE_B64, "testId": "1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "EXTERNAL_SERVICE_ERROR");
}
