//! Generate Handler
//!
//! POST /api/generate：不接受任何参数，返回固定曲目的 Base64 音频

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::GenerateTrackCommand;
use crate::infrastructure::http::dto::GenerateResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn generate_track(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let result = state
        .generate_track_handler
        .handle(GenerateTrackCommand)
        .await?;

    Ok(Json(GenerateResponse {
        audio_data: result.audio_data,
    }))
}
