//! Model Queries - 已加载模型查询

use crate::domain::ModelDescriptor;

/// 列出已加载模型
#[derive(Debug, Clone, Default)]
pub struct ListModels;

/// 模型状态
#[derive(Debug, Clone)]
pub struct ModelStatus {
    pub descriptor: ModelDescriptor,
    pub healthy: bool,
}

/// 列出已加载模型响应
#[derive(Debug, Clone)]
pub struct ListModelsResponse {
    pub models: Vec<ModelStatus>,
}
