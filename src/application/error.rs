//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{BackendError, ProbeError, StagingError};
use crate::domain::{ModelKind, TrackError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 模型加载失败（冷启动阶段）
    #[error("Failed to load {kind} model '{model_id}': {message}")]
    ModelLoad {
        kind: ModelKind,
        model_id: String,
        message: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 推理失败
    #[error("Generation failed: {0}")]
    GenerationError(String),

    /// 生成结果不是有效音频
    #[error("Invalid pipeline output: {0}")]
    InvalidOutput(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建模型加载错误
    pub fn model_load(kind: ModelKind, model_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            kind,
            model_id: model_id.into(),
            message: message.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<BackendError> for ApplicationError {
    fn from(err: BackendError) -> Self {
        Self::GenerationError(err.to_string())
    }
}

impl From<StagingError> for ApplicationError {
    fn from(err: StagingError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<ProbeError> for ApplicationError {
    fn from(err: ProbeError) -> Self {
        Self::InvalidOutput(err.to_string())
    }
}

impl From<TrackError> for ApplicationError {
    fn from(err: TrackError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
