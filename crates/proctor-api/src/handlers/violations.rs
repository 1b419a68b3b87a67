//! Admin-facing violation record handlers.

use axum::Json;
use axum::extract::{Query, State};

use proctor_entity::violation::{NewViolation, ViolationFilter, ViolationSummary};

use crate::dto::response::{Flattened, RecordViolationResponse};
use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /api/exams/violations
pub async fn record_violation(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewViolation>,
) -> ApiResult<Json<RecordViolationResponse>> {
    let record = state.violations.record(req).await?;
    Ok(Json(RecordViolationResponse {
        success: true,
        violation_id: record.id,
        recorded: record,
    }))
}

/// GET /api/exams/violations
pub async fn list_violations(
    State(state): State<AppState>,
    Query(filter): Query<ViolationFilter>,
) -> ApiResult<Json<Flattened<ViolationSummary>>> {
    let summary = state.violations.summary(&filter).await?;
    Ok(Json(Flattened::ok(summary)))
}
