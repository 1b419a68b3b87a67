//! RF detector handlers.

use axum::Json;
use axum::extract::{Query, State};

use proctor_core::types::{StudentId, TestId};
use proctor_entity::detection::RfHistorySummary;

use crate::dto::request::{RfHistoryQuery, RfScanRequest};
use crate::dto::response::{Flattened, RfScanResponse};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/hardware/rf-detector
pub async fn rf_scan(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RfScanRequest>,
) -> ApiResult<Json<RfScanResponse>> {
    let detection = state
        .detection
        .scan_rf(
            TestId::new(req.test_id),
            StudentId::new(req.student_id),
            req.signal_data.as_deref(),
        )
        .await?;
    let recommendation = detection.recommendation();

    Ok(Json(RfScanResponse {
        success: true,
        detection,
        recommendation,
    }))
}

/// GET /api/hardware/rf-detector
pub async fn rf_history(
    State(state): State<AppState>,
    Query(query): Query<RfHistoryQuery>,
) -> Json<Flattened<RfHistorySummary>> {
    let test_id = query.test_id.filter(|t| !t.is_empty()).map(TestId::new);
    let summary = state.detection.rf_history(test_id.as_ref()).await;
    Json(Flattened::ok(summary))
}
