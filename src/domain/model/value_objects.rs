//! Model Context - Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 模型类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// 音乐生成管线
    Music,
    /// Tokenizer + 因果语言模型
    Llm,
    /// 文生图管线
    Image,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Llm => "llm",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 权重来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// 本地 checkpoint 目录
    Local,
    /// 远程模型仓库（下载后缓存到本地）
    Hub,
}

/// 模型加载描述
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSpec {
    pub kind: ModelKind,
    /// 本地来源时为 checkpoint 目录，远程来源时为仓库 ID
    pub model_id: String,
    pub source: ModelSource,
    pub dtype: String,
    pub device: String,
    /// 远程权重缓存目录
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    /// 管线专有选项，原样透传给推理后端
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl ModelSpec {
    pub fn new(kind: ModelKind, model_id: impl Into<String>, source: ModelSource) -> Self {
        Self {
            kind,
            model_id: model_id.into(),
            source,
            dtype: "auto".to_string(),
            device: "auto".to_string(),
            cache_dir: None,
            options: serde_json::Map::new(),
        }
    }

    pub fn with_dtype(mut self, dtype: impl Into<String>) -> Self {
        self.dtype = dtype.into();
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn with_option(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }
}

/// 已加载模型的描述
#[derive(Debug, Clone, Serialize)]
pub struct ModelDescriptor {
    /// 推理后端分配的句柄 ID
    pub handle: String,
    pub kind: ModelKind,
    pub model_id: String,
    pub source: ModelSource,
    pub dtype: String,
    pub device: String,
    pub loaded_at: DateTime<Utc>,
}

impl ModelDescriptor {
    pub fn from_spec(handle: impl Into<String>, spec: &ModelSpec) -> Self {
        Self {
            handle: handle.into(),
            kind: spec.kind,
            model_id: spec.model_id.clone(),
            source: spec.source,
            dtype: spec.dtype.clone(),
            device: spec.device.clone(),
            loaded_at: Utc::now(),
        }
    }
}
