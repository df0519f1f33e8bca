//! Model Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::ListModels;
use crate::infrastructure::http::dto::{ApiResponse, ModelResponse, ModelsResponse};
use crate::infrastructure::http::state::AppState;

pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ModelsResponse>> {
    let result = state.list_models_handler.handle(ListModels).await;

    Json(ApiResponse::success(ModelsResponse {
        models: result.models.into_iter().map(ModelResponse::from).collect(),
    }))
}
