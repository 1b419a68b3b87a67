//! Report export and analytics handlers.

use axum::Json;
use axum::extract::{Path, State};

use proctor_core::types::TestId;
use proctor_entity::report::{ReportExport, TestAnalytics};

use crate::dto::request::ExportPdfRequest;
use crate::dto::response::{ApiResponse, Flattened};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/reports/export-pdf
pub async fn export_pdf(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ExportPdfRequest>,
) -> ApiResult<Json<Flattened<ReportExport>>> {
    let export = state
        .reports
        .export_pdf(&TestId::new(req.test_id), req.report_type.as_deref())?;
    Ok(Json(Flattened::ok(export)))
}

/// GET /api/reports/tests/{test_id}
pub async fn test_analytics(
    State(state): State<AppState>,
    Path(test_id): Path<String>,
) -> ApiResult<Json<ApiResponse<TestAnalytics>>> {
    let analytics = state.reports.test_analytics(&TestId::new(test_id)).await?;
    Ok(Json(ApiResponse::ok(analytics)))
}
