//! Mock login handler.

use axum::Json;
use axum::extract::State;

use proctor_service::LoginResult;

use crate::dto::request::LoginRequest;
use crate::dto::response::Flattened;
use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<Flattened<LoginResult>>> {
    let result = state.login.login(&req.email, &req.password, req.role)?;
    Ok(Json(Flattened::ok(result)))
}
