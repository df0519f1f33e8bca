//! Configuration Loader
//!
//! 多源配置加载与合并
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, BackendKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "JUKEBOX";

/// 加载应用配置
///
/// # 环境变量示例
/// - `JUKEBOX_SERVER__PORT=8000`
/// - `JUKEBOX_BACKEND__URL=http://gpu:9000`
/// - `JUKEBOX_BACKEND__KIND=fake`
/// - `JUKEBOX_MODELS__HUB_CACHE_DIR=/.cache/huggingface`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时在当前目录搜索默认配置文件
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("backend.kind", "http")?
        .set_default("backend.url", "http://localhost:9000")?
        .set_default("backend.timeout_secs", 600)?
        .set_default("backend.load_timeout_secs", 1800)?
        .set_default("models.hub_cache_dir", "/.cache/huggingface")?
        .set_default("generation.staging_dir", "/tmp/jukebox")?
        .set_default("generation.max_concurrent", 1)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 层级分隔符为 "__"，变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.backend.kind == BackendKind::Http && config.backend.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Backend URL cannot be empty".to_string(),
        ));
    }

    if config.generation.staging_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Staging directory cannot be empty".to_string(),
        ));
    }

    if config.generation.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "generation.max_concurrent must be at least 1".to_string(),
        ));
    }

    config
        .generation
        .preset
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("Invalid preset: {}", e)))?;

    let models = &config.models;
    if models.music.checkpoint_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Music checkpoint directory cannot be empty".to_string(),
        ));
    }
    if models.llm.model_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM model id cannot be empty".to_string(),
        ));
    }
    if models.image.model_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Image model id cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Backend: {} ({})", config.backend.kind, config.backend.url);
    tracing::info!("Backend Timeout: {}s", config.backend.timeout_secs);
    tracing::info!("Backend Auth: {}", config.backend.auth_token.is_some());
    tracing::info!("Music Checkpoint: {:?}", config.models.music.checkpoint_dir);
    tracing::info!("LLM: {}", config.models.llm.model_id);
    tracing::info!("Image: {}", config.models.image.model_id);
    tracing::info!("Hub Cache: {:?}", config.models.hub_cache_dir);
    tracing::info!("Staging Directory: {:?}", config.generation.staging_dir);
    tracing::info!("Max Concurrent: {}", config.generation.max_concurrent);
    tracing::info!(
        "Preset: {}s, {} steps, guidance {}",
        config.generation.preset.audio_duration,
        config.generation.preset.infer_step,
        config.generation.preset.guidance_scale
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
