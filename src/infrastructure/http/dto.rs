//! Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::ModelStatus;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式（生成接口除外）
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Generate DTOs
// ============================================================================

/// 生成接口响应，保持 `{"audio_data": "<base64>"}` 的简单结构
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub audio_data: String,
}

// ============================================================================
// Model DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub handle: String,
    pub kind: String,
    pub model_id: String,
    pub dtype: String,
    pub device: String,
    pub loaded_at: DateTime<Utc>,
    pub healthy: bool,
}

impl From<ModelStatus> for ModelResponse {
    fn from(status: ModelStatus) -> Self {
        let d = status.descriptor;
        Self {
            handle: d.handle,
            kind: d.kind.as_str().to_string(),
            model_id: d.model_id,
            dtype: d.dtype,
            device: d.device,
            loaded_at: d.loaded_at,
            healthy: status.healthy,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelResponse>,
}
