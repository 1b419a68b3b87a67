//! Exam session handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use proctor_core::error::AppError;
use proctor_core::types::{QuestionId, SessionId, StudentId, TestId, ViolationSource};
use proctor_entity::session::ViolationOutcome;

use crate::dto::request::{
    AnswerRequest, CreateSessionRequest, ReportViolationRequest, TerminateRequest, TickRequest,
    VisibilityRequest,
};
use crate::dto::response::{ApiResponse, SessionResponse, TickResponse, ViolationAckResponse};
use crate::error::ApiResult;
use crate::extractors::{JsonBody, ValidatedJson, parse_session_id};
use crate::state::AppState;

type SessionJson = Json<ApiResponse<SessionResponse>>;

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSessionRequest>,
) -> ApiResult<(StatusCode, SessionJson)> {
    let report = state
        .sessions
        .create_session(TestId::new(req.test_id), StudentId::new(req.student_id))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(report.into()))))
}

/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<SessionResponse>>> {
    let sessions = state
        .sessions
        .list_active()
        .await
        .into_iter()
        .map(SessionResponse::from)
        .collect();
    Json(ApiResponse::ok(sessions))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionJson> {
    let id = parse_session_id(&id)?;
    session_json(&state, &id).await
}

/// POST /api/sessions/{id}/start
pub async fn start_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionJson> {
    let id = parse_session_id(&id)?;
    let report = state.sessions.start(&id).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

/// POST /api/sessions/{id}/tick
pub async fn tick(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<TickRequest>,
) -> ApiResult<Json<ApiResponse<TickResponse>>> {
    let id = parse_session_id(&id)?;
    let outcome = state.sessions.tick(&id, req.elapsed_seconds).await?;
    let report = state.sessions.get(&id).await?;
    Ok(Json(ApiResponse::ok(TickResponse {
        remaining_seconds: outcome.remaining_seconds,
        session: report.into(),
    })))
}

/// POST /api/sessions/{id}/violations
pub async fn report_violation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ReportViolationRequest>,
) -> ApiResult<Json<ApiResponse<ViolationAckResponse>>> {
    let id = parse_session_id(&id)?;
    let source: ViolationSource = req.source.parse()?;
    let outcome = state
        .sessions
        .report_violation(&id, source, req.severity, req.details)
        .await?;
    violation_ack(&state, &id, Some(outcome)).await
}

/// POST /api/sessions/{id}/visibility
pub async fn visibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<VisibilityRequest>,
) -> ApiResult<Json<ApiResponse<ViolationAckResponse>>> {
    let id = parse_session_id(&id)?;
    let outcome = state.sessions.visibility_changed(&id, req.hidden).await?;
    violation_ack(&state, &id, outcome).await
}

/// POST /api/sessions/{id}/answers
pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AnswerRequest>,
) -> ApiResult<SessionJson> {
    let id = parse_session_id(&id)?;
    let report = state
        .sessions
        .answer(&id, QuestionId::new(req.question_id), req.answer)
        .await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

/// POST /api/sessions/{id}/heartbeat
pub async fn heartbeat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionJson> {
    let id = parse_session_id(&id)?;
    let report = state.sessions.heartbeat(&id).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

/// POST /api/sessions/{id}/submit
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionJson> {
    let id = parse_session_id(&id)?;
    let report = state.sessions.submit(&id).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

/// POST /api/sessions/{id}/terminate
pub async fn terminate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<SessionJson> {
    let id = parse_session_id(&id)?;
    let note = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<TerminateRequest>(&body)
            .map_err(|e| AppError::validation(format!("Invalid terminate body: {e}")))?
            .reason
    };
    let report = state.sessions.terminate(&id, note.as_deref()).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

/// POST /api/sessions/{id}/abandon
pub async fn abandon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionJson> {
    let id = parse_session_id(&id)?;
    let report = state.sessions.abandon(&id).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

/// POST /api/sessions/{id}/submission/retry
pub async fn retry_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionJson> {
    let id = parse_session_id(&id)?;
    let report = state.sessions.retry_submission(&id).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

async fn session_json(state: &AppState, id: &SessionId) -> ApiResult<SessionJson> {
    let report = state.sessions.get(id).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

async fn violation_ack(
    state: &AppState,
    id: &SessionId,
    outcome: Option<ViolationOutcome>,
) -> ApiResult<Json<ApiResponse<ViolationAckResponse>>> {
    let report = state.sessions.get(id).await?;
    Ok(Json(ApiResponse::ok(ViolationAckResponse {
        recorded: outcome.is_some(),
        entry: outcome.map(|o| o.entry),
        session: report.into(),
    })))
}
