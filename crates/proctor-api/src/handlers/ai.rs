//! Face and audio analysis handlers.

use axum::Json;
use axum::extract::State;

use proctor_core::types::TestId;
use proctor_entity::detection::{AudioAnalysis, FaceAnalysis};

use crate::dto::request::{AudioDetectionRequest, FaceRecognitionRequest};
use crate::dto::response::AnalysisResponse;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/ai/face-recognition
pub async fn face_recognition(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<FaceRecognitionRequest>,
) -> ApiResult<Json<AnalysisResponse<FaceAnalysis>>> {
    let analysis = state
        .detection
        .analyze_face(&req.image_data, &TestId::new(req.test_id))
        .await?;
    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

/// POST /api/ai/audio-detection
pub async fn audio_detection(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AudioDetectionRequest>,
) -> ApiResult<Json<AnalysisResponse<AudioAnalysis>>> {
    let analysis = state
        .detection
        .analyze_audio(&req.audio_data, &TestId::new(req.test_id))
        .await?;
    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}
