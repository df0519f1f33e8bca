//! Fake Inference Backend - 用于开发和测试的推理后端
//!
//! 不加载任何权重，音乐管线输出一段合成的正弦波 WAV

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{
    BackendError, InferenceBackendPort, ModelHandlePort, MusicGenerationParams, MusicPipelinePort,
};
use crate::domain::{ModelDescriptor, ModelSpec};

/// Fake Backend 配置
#[derive(Debug, Clone)]
pub struct FakeBackendConfig {
    /// 输出采样率
    pub sample_rate: u32,
    /// 输出声道数
    pub channels: u16,
    /// 实际渲染的最大时长（秒），避免生成过大的文件
    pub max_render_secs: f64,
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            channels: 2,
            max_render_secs: 2.0,
            latency_ms: 0,
        }
    }
}

/// Fake Inference Backend
pub struct FakeInferenceBackend {
    config: FakeBackendConfig,
}

impl FakeInferenceBackend {
    pub fn new(config: FakeBackendConfig) -> Self {
        tracing::info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            max_render_secs = config.max_render_secs,
            "FakeInferenceBackend initialized"
        );
        Self { config }
    }

    fn descriptor(spec: &ModelSpec) -> ModelDescriptor {
        ModelDescriptor::from_spec(format!("fake-{}-{}", spec.kind, Uuid::new_v4()), spec)
    }
}

#[async_trait]
impl InferenceBackendPort for FakeInferenceBackend {
    async fn load_music_pipeline(
        &self,
        spec: &ModelSpec,
    ) -> Result<Arc<dyn MusicPipelinePort>, BackendError> {
        Ok(Arc::new(FakeMusicPipeline {
            descriptor: Self::descriptor(spec),
            config: self.config.clone(),
        }))
    }

    async fn load_model(&self, spec: &ModelSpec) -> Result<Arc<dyn ModelHandlePort>, BackendError> {
        Ok(Arc::new(FakeModelHandle {
            descriptor: Self::descriptor(spec),
        }))
    }
}

/// 不做任何事的模型句柄
struct FakeModelHandle {
    descriptor: ModelDescriptor,
}

#[async_trait]
impl ModelHandlePort for FakeModelHandle {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }
}

/// 输出正弦波的音乐管线
struct FakeMusicPipeline {
    descriptor: ModelDescriptor,
    config: FakeBackendConfig,
}

#[async_trait]
impl ModelHandlePort for FakeMusicPipeline {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl MusicPipelinePort for FakeMusicPipeline {
    async fn generate(&self, params: &MusicGenerationParams) -> Result<(), BackendError> {
        tracing::debug!(
            handle = %self.descriptor.handle,
            prompt_len = params.prompt.len(),
            lyrics_len = params.lyrics.len(),
            path = %params.save_path.display(),
            "FakeMusicPipeline: rendering sine wave"
        );

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        let seconds = params.audio_duration.min(self.config.max_render_secs).max(0.0);
        let config = self.config.clone();
        let path = params.save_path.clone();

        tokio::task::spawn_blocking(move || write_sine_wav(&path, &config, seconds))
            .await
            .map_err(|e| BackendError::ServiceError(format!("Render task failed: {}", e)))?
    }
}

/// 写入 16-bit PCM 正弦波（A3）
fn write_sine_wav(path: &Path, config: &FakeBackendConfig, seconds: f64) -> Result<(), BackendError> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let frames = (seconds * config.sample_rate as f64).round().max(1.0) as u64;

    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| BackendError::IoError(e.to_string()))?;
    for n in 0..frames {
        let t = n as f64 / config.sample_rate as f64;
        let sample = ((2.0 * std::f64::consts::PI * 220.0 * t).sin() * 0.25 * i16::MAX as f64) as i16;
        for _ in 0..config.channels {
            writer
                .write_sample(sample)
                .map_err(|e| BackendError::IoError(e.to_string()))?;
        }
    }
    writer
        .finalize()
        .map_err(|e| BackendError::IoError(e.to_string()))?;
    Ok(())
}
