//! Route definitions for the Proctor Hub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with every route mounted under `/api`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(detection_routes())
        .merge(violation_routes())
        .merge(test_routes())
        .merge(session_routes())
        .merge(report_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(handlers::auth::login))
}

/// Face, audio, and RF detection
fn detection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ai/face-recognition",
            post(handlers::ai::face_recognition),
        )
        .route("/ai/audio-detection", post(handlers::ai::audio_detection))
        .route(
            "/hardware/rf-detector",
            post(handlers::hardware::rf_scan).get(handlers::hardware::rf_history),
        )
}

fn violation_routes() -> Router<AppState> {
    Router::new().route(
        "/exams/violations",
        post(handlers::violations::record_violation).get(handlers::violations::list_violations),
    )
}

/// Test catalog
fn test_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tests",
            get(handlers::tests::list_tests).post(handlers::tests::create_test),
        )
        .route("/tests/{test_id}", get(handlers::tests::get_test))
}

/// Exam session lifecycle
fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions",
            get(handlers::sessions::list_sessions).post(handlers::sessions::create_session),
        )
        .route("/sessions/{id}", get(handlers::sessions::get_session))
        .route("/sessions/{id}/start", post(handlers::sessions::start_session))
        .route("/sessions/{id}/tick", post(handlers::sessions::tick))
        .route(
            "/sessions/{id}/violations",
            post(handlers::sessions::report_violation),
        )
        .route("/sessions/{id}/visibility", post(handlers::sessions::visibility))
        .route("/sessions/{id}/answers", post(handlers::sessions::answer))
        .route(
            "/sessions/{id}/heartbeat",
            post(handlers::sessions::heartbeat),
        )
        .route("/sessions/{id}/submit", post(handlers::sessions::submit))
        .route("/sessions/{id}/terminate", post(handlers::sessions::terminate))
        .route("/sessions/{id}/abandon", post(handlers::sessions::abandon))
        .route(
            "/sessions/{id}/submission/retry",
            post(handlers::sessions::retry_submission),
        )
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/export-pdf", post(handlers::reports::export_pdf))
        .route(
            "/reports/tests/{test_id}",
            get(handlers::reports::test_analytics),
        )
}
