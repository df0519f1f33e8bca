//! Music Pipeline Port - 音乐生成管线抽象

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::TrackPreset;

use super::inference_backend::{BackendError, ModelHandlePort};

/// 一次音乐生成调用的完整参数
#[derive(Debug, Clone, PartialEq)]
pub struct MusicGenerationParams {
    pub prompt: String,
    pub lyrics: String,
    /// 音频时长（秒）
    pub audio_duration: f64,
    pub infer_step: u32,
    pub guidance_scale: f64,
    /// 输出 WAV 文件路径，由管线写入
    pub save_path: PathBuf,
}

impl MusicGenerationParams {
    pub fn from_preset(preset: &TrackPreset, save_path: impl Into<PathBuf>) -> Self {
        Self {
            prompt: preset.prompt.clone(),
            lyrics: preset.lyrics.clone(),
            audio_duration: preset.audio_duration,
            infer_step: preset.infer_step,
            guidance_scale: preset.guidance_scale,
            save_path: save_path.into(),
        }
    }
}

/// Music Pipeline Port
///
/// 已加载的音乐生成管线句柄
#[async_trait]
pub trait MusicPipelinePort: ModelHandlePort {
    /// 执行生成，结果写入 `params.save_path`
    async fn generate(&self, params: &MusicGenerationParams) -> Result<(), BackendError>;
}
