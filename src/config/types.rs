//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::LoadModelsCommand;
use crate::domain::{ModelKind, ModelSource, ModelSpec, TrackPreset};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 推理后端配置
    #[serde(default)]
    pub backend: BackendConfig,

    /// 模型配置
    #[serde(default)]
    pub models: ModelsConfig,

    /// 生成配置
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 推理后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// 外部 GPU 推理服务
    #[default]
    Http,
    /// 本地合成音频，用于开发和测试
    Fake,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Http => write!(f, "http"),
            BackendKind::Fake => write!(f, "fake"),
        }
    }
}

/// 推理后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// 后端类型
    #[serde(default)]
    pub kind: BackendKind,

    /// 推理服务基础 URL
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// 推理请求超时时间（秒）
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,

    /// 模型加载超时时间（秒）
    #[serde(default = "default_load_timeout")]
    pub load_timeout_secs: u64,

    /// 访问令牌，通常由平台 secret 注入环境变量
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_backend_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_backend_timeout() -> u64 {
    600 // 10 分钟
}

fn default_load_timeout() -> u64 {
    1800 // 30 分钟
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: default_backend_url(),
            timeout_secs: default_backend_timeout(),
            load_timeout_secs: default_load_timeout(),
            auth_token: None,
        }
    }
}

/// 模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// 远程模型权重缓存目录
    #[serde(default = "default_hub_cache_dir")]
    pub hub_cache_dir: PathBuf,

    /// 加载前确认本地 checkpoint 目录存在
    #[serde(default = "default_require_local_checkpoint")]
    pub require_local_checkpoint: bool,

    /// 音乐生成管线
    #[serde(default)]
    pub music: MusicModelConfig,

    /// 语言模型
    #[serde(default)]
    pub llm: LlmModelConfig,

    /// 文生图管线
    #[serde(default)]
    pub image: ImageModelConfig,
}

fn default_hub_cache_dir() -> PathBuf {
    PathBuf::from("/.cache/huggingface")
}

fn default_require_local_checkpoint() -> bool {
    true
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            hub_cache_dir: default_hub_cache_dir(),
            require_local_checkpoint: default_require_local_checkpoint(),
            music: MusicModelConfig::default(),
            llm: LlmModelConfig::default(),
            image: ImageModelConfig::default(),
        }
    }
}

impl ModelsConfig {
    /// 音乐管线从本地 checkpoint 加载
    pub fn music_spec(&self) -> ModelSpec {
        let music = &self.music;
        ModelSpec::new(
            ModelKind::Music,
            music.checkpoint_dir.to_string_lossy(),
            ModelSource::Local,
        )
        .with_dtype(&music.dtype)
        .with_option("torch_compile", music.torch_compile)
        .with_option("cpu_offload", music.cpu_offload)
        .with_option("overlapped_decode", music.overlapped_decode)
    }

    pub fn llm_spec(&self) -> ModelSpec {
        ModelSpec::new(ModelKind::Llm, &self.llm.model_id, ModelSource::Hub)
            .with_dtype(&self.llm.dtype)
            .with_device(&self.llm.device_map)
            .with_cache_dir(&self.hub_cache_dir)
    }

    pub fn image_spec(&self) -> ModelSpec {
        let image = &self.image;
        let spec = ModelSpec::new(ModelKind::Image, &image.model_id, ModelSource::Hub)
            .with_dtype(&image.dtype)
            .with_device(&image.device)
            .with_cache_dir(&self.hub_cache_dir);
        match &image.variant {
            Some(variant) => spec.with_option("variant", variant.as_str()),
            None => spec,
        }
    }

    /// 冷启动加载命令
    pub fn load_command(&self) -> LoadModelsCommand {
        LoadModelsCommand {
            music: self.music_spec(),
            llm: self.llm_spec(),
            image: self.image_spec(),
            require_local_checkpoint: self.require_local_checkpoint,
        }
    }
}

/// 音乐生成管线配置
#[derive(Debug, Clone, Deserialize)]
pub struct MusicModelConfig {
    /// checkpoint 目录（挂载的模型卷）
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,

    /// 权重精度
    #[serde(default = "default_music_dtype")]
    pub dtype: String,

    #[serde(default)]
    pub torch_compile: bool,

    #[serde(default)]
    pub cpu_offload: bool,

    #[serde(default)]
    pub overlapped_decode: bool,
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("/models")
}

fn default_music_dtype() -> String {
    "bfloat16".to_string()
}

impl Default for MusicModelConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: default_checkpoint_dir(),
            dtype: default_music_dtype(),
            torch_compile: false,
            cpu_offload: false,
            overlapped_decode: false,
        }
    }
}

/// 语言模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmModelConfig {
    /// 模型仓库 ID
    #[serde(default = "default_llm_model_id")]
    pub model_id: String,

    #[serde(default = "default_auto")]
    pub dtype: String,

    /// 设备映射
    #[serde(default = "default_auto")]
    pub device_map: String,
}

fn default_llm_model_id() -> String {
    "Qwen/Qwen2-72B-Instruct".to_string()
}

fn default_auto() -> String {
    "auto".to_string()
}

impl Default for LlmModelConfig {
    fn default() -> Self {
        Self {
            model_id: default_llm_model_id(),
            dtype: default_auto(),
            device_map: default_auto(),
        }
    }
}

/// 文生图管线配置
#[derive(Debug, Clone, Deserialize)]
pub struct ImageModelConfig {
    /// 模型仓库 ID
    #[serde(default = "default_image_model_id")]
    pub model_id: String,

    #[serde(default = "default_image_dtype")]
    pub dtype: String,

    /// 权重变体
    #[serde(default = "default_image_variant")]
    pub variant: Option<String>,

    #[serde(default = "default_image_device")]
    pub device: String,
}

fn default_image_model_id() -> String {
    "stabilityai/sdxl-turbo".to_string()
}

fn default_image_dtype() -> String {
    "float16".to_string()
}

fn default_image_variant() -> Option<String> {
    Some("fp16".to_string())
}

fn default_image_device() -> String {
    "cuda".to_string()
}

impl Default for ImageModelConfig {
    fn default() -> Self {
        Self {
            model_id: default_image_model_id(),
            dtype: default_image_dtype(),
            variant: default_image_variant(),
            device: default_image_device(),
        }
    }
}

/// 生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// 暂存目录
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// 同时进行的生成数量
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 曲目预设
    #[serde(default)]
    pub preset: TrackPreset,
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("/tmp/jukebox")
}

fn default_max_concurrent() -> usize {
    1
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            max_concurrent: default_max_concurrent(),
            preset: TrackPreset::default(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.backend.kind, BackendKind::Http);
        assert_eq!(config.models.music.checkpoint_dir, PathBuf::from("/models"));
        assert_eq!(config.generation.max_concurrent, 1);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_model_specs() {
        let models = ModelsConfig::default();

        let music = models.music_spec();
        assert_eq!(music.source, ModelSource::Local);
        assert_eq!(music.model_id, "/models");
        assert_eq!(music.dtype, "bfloat16");
        assert_eq!(music.options["cpu_offload"], false);

        let llm = models.llm_spec();
        assert_eq!(llm.model_id, "Qwen/Qwen2-72B-Instruct");
        assert_eq!(llm.device, "auto");
        assert_eq!(llm.cache_dir, Some(PathBuf::from("/.cache/huggingface")));

        let image = models.image_spec();
        assert_eq!(image.dtype, "float16");
        assert_eq!(image.device, "cuda");
        assert_eq!(image.options["variant"], "fp16");
    }

    #[test]
    fn test_image_spec_without_variant() {
        let mut models = ModelsConfig::default();
        models.image.variant = None;
        assert!(!models.image_spec().options.contains_key("variant"));
    }
}
