//! Integration tests for violation records, the test catalog, and reports.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_record_violation() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/exams/violations",
            Some(json!({
                "testId": "1",
                "studentId": "s1",
                "type": "multiple_faces",
                "severity": "high",
                "details": "Two faces in frame",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["violationId"], 0);
    assert_eq!(response.body["recorded"]["type"], "multiple_faces");
    assert!(response.body["recorded"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_record_violation_missing_fields() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/exams/violations",
            Some(json!({ "testId": "1", "type": "tab_visibility" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["message"]
            .as_str()
            .is_some_and(|m| m.contains("Missing required fields"))
    );
}

#[tokio::test]
async fn test_violation_summary_filters_and_groups() {
    let app = helpers::TestApp::new();
    let rows = [
        ("1", "s1", "tab_visibility", "medium"),
        ("1", "s1", "multiple_faces", "high"),
        ("1", "s2", "tab_visibility", "medium"),
        ("2", "s1", "speech_detected", "high"),
    ];
    for (test_id, student_id, kind, severity) in rows {
        app.request(
            "POST",
            "/api/exams/violations",
            Some(json!({
                "testId": test_id,
                "studentId": student_id,
                "type": kind,
                "severity": severity,
            })),
        )
        .await;
    }

    let response = app
        .request("GET", "/api/exams/violations?testId=1", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 3);
    assert_eq!(response.body["byType"]["tab_visibility"], 2);
    assert_eq!(response.body["bySeverity"]["high"], 1);
    assert_eq!(response.body["bySeverity"]["medium"], 2);

    let response = app
        .request("GET", "/api/exams/violations?testId=1&studentId=s1", None)
        .await;
    assert_eq!(response.body["total"], 2);

    let response = app.request("GET", "/api/exams/violations", None).await;
    assert_eq!(response.body["total"], 4);
}

#[tokio::test]
async fn test_session_violations_reach_store() {
    let app = helpers::TestApp::new();
    let id = app.start_session("s9").await;
    app.report_tab_switch(&id).await;

    let response = app
        .request("GET", "/api/exams/violations?studentId=s9", None)
        .await;

    assert_eq!(response.body["total"], 1);
    assert_eq!(response.body["violations"][0]["type"], "tab_visibility");
    assert_eq!(response.body["violations"][0]["severity"], "medium");
}

#[tokio::test]
async fn test_catalog_lists_demo_test() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/tests", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["id"], "1");

    let response = app.request("GET", "/api/tests/1", None).await;
    assert_eq!(response.body["data"]["questions"][0]["type"], "mcq");
    assert_eq!(response.body["data"]["durationSeconds"], 7200);

    let response = app.request("GET", "/api/tests/404", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_test() {
    let app = helpers::TestApp::new();
    let body = json!({
        "id": "chem-101",
        "title": "Chemistry",
        "subject": "Science",
        "durationSeconds": 600,
        "questions": [
            { "id": "q1", "text": "H2O is?", "type": "mcq", "options": ["water", "salt"] },
            { "id": "q2", "text": "Describe a covalent bond.", "type": "short" }
        ]
    });

    let response = app.request("POST", "/api/tests", Some(body.clone())).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["questions"][1]["type"], "short");

    let response = app.request("POST", "/api/tests", Some(body)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            "/api/sessions",
            Some(json!({ "testId": "chem-101", "studentId": "s1" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["durationSeconds"], 600);
}

#[tokio::test]
async fn test_export_pdf() {
    let app = helpers::TestApp::new();

    let response = app
        .request("POST", "/api/reports/export-pdf", Some(json!({ "testId": "7" })))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["pdfReady"], true);
    assert_eq!(
        response.body["downloadUrl"],
        "/api/reports/download?testId=7&format=pdf"
    );
    assert_eq!(response.body["metadata"]["reportType"], "comprehensive");
    assert_eq!(
        response.body["metadata"]["title"],
        "Test Analytics Report - Test 7"
    );

    let response = app
        .request("POST", "/api/reports/export-pdf", Some(json!({})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_test_analytics() {
    let app = helpers::TestApp::new();
    let ended = app.start_session("s1").await;
    for _ in 0..3 {
        app.report_tab_switch(&ended).await;
    }
    app.start_session("s2").await;

    let response = app.request("GET", "/api/reports/tests/1", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let analytics = &response.body["data"];
    assert_eq!(analytics["sessions"]["active"], 1);
    assert_eq!(analytics["sessions"]["terminatedPolicyViolation"], 1);
    assert_eq!(analytics["violations"]["total"], 3);
}

#[tokio::test]
async fn test_login_stub() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "a@b.c", "password": "pw", "role": "admin" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.body["token"]
            .as_str()
            .is_some_and(|t| t.starts_with("mock_jwt_token_"))
    );
    assert_eq!(response.body["user"]["role"], "admin");

    let response = app
        .request("POST", "/api/auth/login", Some(json!({ "password": "pw" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();
    app.start_session("s1").await;

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["activeSessions"], 1);
}
