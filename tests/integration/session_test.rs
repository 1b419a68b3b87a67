//! Integration tests for the exam session lifecycle.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_session_starts_not_started() {
    let app = helpers::TestApp::new();
    let id = app.create_session("student-1").await;

    let response = app.request("GET", &format!("/api/sessions/{id}"), None).await;

    assert_eq!(response.status, StatusCode::OK);
    let session = &response.body["data"];
    assert_eq!(session["status"], "not_started");
    assert_eq!(session["durationSeconds"], 7200);
    assert_eq!(session["violationCount"], 0);
    assert_eq!(session["submission"]["state"], "not_submitted");
}

#[tokio::test]
async fn test_create_session_unknown_test() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/sessions",
            Some(json!({ "testId": "missing", "studentId": "s1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_session_requires_student() {
    let app = helpers::TestApp::new();

    let response = app
        .request("POST", "/api/sessions", Some(json!({ "testId": "1" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_operations_rejected_before_start() {
    let app = helpers::TestApp::new();
    let id = app.create_session("student-1").await;

    let response = app.report_tab_switch(&id).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "INVALID_STATE");

    let response = app
        .request(
            "POST",
            &format!("/api/sessions/{id}/tick"),
            Some(json!({ "elapsedSeconds": 10 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app.request("GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(response.body["data"]["status"], "not_started");
    assert_eq!(response.body["data"]["remainingSeconds"], 7200);
}

#[tokio::test]
async fn test_three_tab_switches_terminate() {
    let app = helpers::TestApp::new();
    let id = app.start_session("student-1").await;

    for expected in 1..=2 {
        let response = app.report_tab_switch(&id).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["recorded"], true);
        assert_eq!(response.body["data"]["session"]["violationCount"], expected);
        assert_eq!(response.body["data"]["session"]["status"], "running");
    }

    let response = app.report_tab_switch(&id).await;
    assert_eq!(response.status, StatusCode::OK);
    let session = &response.body["data"]["session"];
    assert_eq!(session["status"], "terminated");
    assert_eq!(session["terminationReason"], "policy_violation");
    assert_eq!(session["violations"].as_array().map(Vec::len), Some(3));
    assert_eq!(session["submission"]["state"], "acknowledged");

    let response = app.report_tab_switch(&id).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "POLICY_VIOLATION");
    let response = app
        .request("POST", &format!("/api/sessions/{id}/submit"), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let response = app.request("GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(response.body["data"]["violationCount"], 3);
}

#[tokio::test]
async fn test_tick_to_zero_submits() {
    let app = helpers::TestApp::new();
    let id = app.start_session("student-1").await;

    let response = app
        .request(
            "POST",
            &format!("/api/sessions/{id}/tick"),
            Some(json!({ "elapsedSeconds": 7200 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["remainingSeconds"], 0);
    assert_eq!(response.body["data"]["session"]["status"], "submitted_normally");
    assert_eq!(app.submissions.len(), 1);
}

#[tokio::test]
async fn test_tick_counts_down() {
    let app = helpers::TestApp::new();
    let id = app.start_session("student-1").await;

    for _ in 0..3 {
        app.request(
            "POST",
            &format!("/api/sessions/{id}/tick"),
            Some(json!({ "elapsedSeconds": 100 })),
        )
        .await;
    }

    let response = app.request("GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(response.body["data"]["remainingSeconds"], 6900);
    assert_eq!(response.body["data"]["status"], "running");
}

#[tokio::test]
async fn test_denied_capability_terminates() {
    let app = helpers::TestApp::new();
    app.capability.set_available(false);
    let id = app.create_session("student-1").await;

    let response = app
        .request("POST", &format!("/api/sessions/{id}/start"), None)
        .await;
    assert_eq!(response.status, StatusCode::FAILED_DEPENDENCY);
    assert_eq!(response.body["error"], "DEVICE_UNAVAILABLE");

    let response = app.request("GET", &format!("/api/sessions/{id}"), None).await;
    let session = &response.body["data"];
    assert_eq!(session["status"], "terminated");
    assert_eq!(session["terminationReason"], "device_unavailable");
    assert_eq!(session["violations"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_submit_then_late_violation_rejected() {
    let app = helpers::TestApp::new();
    let id = app.start_session("student-1").await;

    app.report_tab_switch(&id).await;
    app.report_tab_switch(&id).await;

    let response = app
        .request("POST", &format!("/api/sessions/{id}/submit"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "submitted_normally");

    let response = app.report_tab_switch(&id).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app.request("GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(response.body["data"]["status"], "submitted_normally");
    assert_eq!(response.body["data"]["violationCount"], 2);
}

#[tokio::test]
async fn test_visibility_restored_records_nothing() {
    let app = helpers::TestApp::new();
    let id = app.start_session("student-1").await;

    let response = app
        .request(
            "POST",
            &format!("/api/sessions/{id}/visibility"),
            Some(json!({ "hidden": false })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["recorded"], false);

    let response = app
        .request(
            "POST",
            &format!("/api/sessions/{id}/visibility"),
            Some(json!({ "hidden": true })),
        )
        .await;
    assert_eq!(response.body["data"]["recorded"], true);
    assert_eq!(response.body["data"]["entry"]["source"], "tab_visibility");
    assert_eq!(response.body["data"]["session"]["violationCount"], 1);
}

#[tokio::test]
async fn test_answers_validated_against_test() {
    let app = helpers::TestApp::new();
    let id = app.start_session("student-1").await;
    let path = format!("/api/sessions/{id}/answers");

    let response = app
        .request("POST", &path, Some(json!({ "questionId": "1", "answer": "4" })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["answers"]["1"], "4");

    let response = app
        .request("POST", &path, Some(json!({ "questionId": "1", "answer": "7" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", &path, Some(json!({ "questionId": "99", "answer": "x" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            &path,
            Some(json!({ "questionId": "3", "answer": "Light becomes sugar" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["answers"]["3"], "Light becomes sugar");
}

#[tokio::test]
async fn test_admin_terminate() {
    let app = helpers::TestApp::new();
    let id = app.start_session("student-1").await;

    let response = app
        .request(
            "POST",
            &format!("/api/sessions/{id}/terminate"),
            Some(json!({ "reason": "Suspicious behaviour" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "terminated");
    assert_eq!(response.body["data"]["terminationReason"], "administrative");
}

#[tokio::test]
async fn test_abandon_not_started_session() {
    let app = helpers::TestApp::new();
    let id = app.create_session("student-1").await;

    let response = app
        .request("POST", &format!("/api/sessions/{id}/abandon"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["terminationReason"], "user_abandoned");

    let response = app
        .request("POST", &format!("/api/sessions/{id}/start"), None)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_failed_submission_can_be_retried() {
    let app = helpers::TestApp::new();
    app.submissions.set_available(false);
    let id = app.start_session("student-1").await;

    let response = app
        .request("POST", &format!("/api/sessions/{id}/submit"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "submitted_normally");
    assert_eq!(response.body["data"]["submission"]["state"], "failed");
    assert_eq!(response.body["data"]["submission"]["attempts"], 1);

    app.submissions.set_available(true);
    let retry = format!("/api/sessions/{id}/submission/retry");
    let response = app.request("POST", &retry, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["submission"]["state"], "acknowledged");
    assert_eq!(app.submissions.len(), 1);

    let response = app.request("POST", &retry, None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_sessions_only_live() {
    let app = helpers::TestApp::new();
    let live = app.start_session("student-1").await;
    let ended = app.start_session("student-2").await;
    app.request("POST", &format!("/api/sessions/{ended}/submit"), None)
        .await;

    let response = app.request("GET", "/api/sessions", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let sessions = response.body["data"].as_array().expect("array");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["sessionId"], live.as_str());
}

#[tokio::test]
async fn test_invalid_session_id() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/sessions/not-a-uuid", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "GET",
            "/api/sessions/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_heartbeat_keeps_running_session() {
    let app = helpers::TestApp::new();
    let id = app.start_session("student-1").await;
    let heartbeat = format!("/api/sessions/{id}/heartbeat");

    let response = app.request("POST", &heartbeat, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "running");
    assert_eq!(response.body["data"]["violationThreshold"], 3);

    app.request("POST", &format!("/api/sessions/{id}/abandon"), None)
        .await;
    let response = app.request("POST", &heartbeat, None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            "/api/sessions/00000000-0000-0000-0000-000000000000/heartbeat",
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
