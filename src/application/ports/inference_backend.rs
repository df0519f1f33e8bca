//! Inference Backend Port - 推理后端抽象
//!
//! 预训练模型本身运行在推理后端中，本服务只负责加载句柄并驱动推理。
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{ModelDescriptor, ModelSpec};

use super::music_pipeline::MusicPipelinePort;

/// 推理后端错误
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Checkpoint not found: {0}")]
    CheckpointNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 已加载模型句柄
///
/// 句柄在冷启动时创建，之后只读共享
#[async_trait]
pub trait ModelHandlePort: Send + Sync {
    /// 模型描述
    fn descriptor(&self) -> &ModelDescriptor;

    /// 检查句柄是否仍然可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}

/// Inference Backend Port
///
/// 负责把模型权重加载到推理后端并返回句柄
#[async_trait]
pub trait InferenceBackendPort: Send + Sync {
    /// 加载音乐生成管线
    async fn load_music_pipeline(
        &self,
        spec: &ModelSpec,
    ) -> Result<Arc<dyn MusicPipelinePort>, BackendError>;

    /// 加载其他模型（语言模型、文生图管线）
    async fn load_model(&self, spec: &ModelSpec) -> Result<Arc<dyn ModelHandlePort>, BackendError>;

    /// 检查后端是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
