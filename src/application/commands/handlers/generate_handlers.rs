//! Generate Command Handlers

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::application::commands::generate_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioProbePort, AudioStagingPort, MusicGenerationParams, MusicPipelinePort,
};
use crate::domain::TrackPreset;

/// GenerateTrack Handler - 生成固定曲目
///
/// 流程：分配暂存路径 → 调用管线 → 读取 → 校验 → Base64 编码 → 删除暂存文件。
/// 暂存文件由 `StagedAudio` 持有，任何一步失败都会在 drop 时删除。
///
/// 生成在独立任务中执行，请求被取消时任务仍会跑完并清理暂存文件，
/// 许可也在任务结束后才释放。
pub struct GenerateTrackHandler {
    job: Arc<GenerationJob>,
    /// 同时进行的生成数量上限
    permits: Arc<Semaphore>,
}

/// 一次生成所需的端口和预设
struct GenerationJob {
    pipeline: Arc<dyn MusicPipelinePort>,
    staging: Arc<dyn AudioStagingPort>,
    probe: Arc<dyn AudioProbePort>,
    preset: TrackPreset,
}

impl GenerateTrackHandler {
    pub fn new(
        pipeline: Arc<dyn MusicPipelinePort>,
        staging: Arc<dyn AudioStagingPort>,
        probe: Arc<dyn AudioProbePort>,
        preset: TrackPreset,
        max_concurrent: usize,
    ) -> Self {
        Self {
            job: Arc::new(GenerationJob {
                pipeline,
                staging,
                probe,
                preset,
            }),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub async fn handle(
        &self,
        _cmd: GenerateTrackCommand,
    ) -> Result<GenerateTrackResponse, ApplicationError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ApplicationError::internal("Generation permits closed"))?;

        let job = self.job.clone();
        tokio::spawn(async move {
            let _permit = permit;
            job.run().await
        })
        .await
        .map_err(|e| ApplicationError::internal(format!("Generation task failed: {}", e)))?
    }
}

impl GenerationJob {
    async fn run(&self) -> Result<GenerateTrackResponse, ApplicationError> {
        let staged = self.staging.allocate();
        let started = Instant::now();

        tracing::info!(
            path = %staged.path().display(),
            audio_duration = self.preset.audio_duration,
            infer_step = self.preset.infer_step,
            guidance_scale = self.preset.guidance_scale,
            instrumental = self.preset.is_instrumental(),
            "Starting track generation"
        );

        let params = MusicGenerationParams::from_preset(&self.preset, staged.path());
        self.pipeline.generate(&params).await.map_err(|e| {
            tracing::error!(error = %e, "Music pipeline failed");
            ApplicationError::from(e)
        })?;

        let audio = self.staging.read(&staged).await?;
        let size_bytes = audio.len();

        // 解析与编码都是 CPU 密集操作，放到阻塞线程池
        let probe = self.probe.clone();
        let (audio_info, audio_data) = tokio::task::spawn_blocking(move || {
            let info = probe.probe(&audio)?;
            Ok::<_, ApplicationError>((info, STANDARD.encode(&audio)))
        })
        .await
        .map_err(|e| ApplicationError::internal(format!("Encode task failed: {}", e)))??;

        self.staging.discard(staged).await?;

        tracing::info!(
            size_bytes = size_bytes,
            sample_rate = audio_info.sample_rate,
            channels = audio_info.channels,
            duration_ms = audio_info.duration_ms,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Track generation completed"
        );

        Ok(GenerateTrackResponse {
            audio_data,
            audio_info,
            size_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::tempdir;

    use crate::application::ports::{BackendError, InferenceBackendPort, ModelHandlePort};
    use crate::domain::{ModelDescriptor, ModelKind, ModelSource, ModelSpec};
    use crate::infrastructure::adapters::{
        FakeBackendConfig, FakeInferenceBackend, FileAudioStaging, WavProbe,
    };

    fn short_preset() -> TrackPreset {
        TrackPreset {
            audio_duration: 0.5,
            ..Default::default()
        }
    }

    fn music_spec() -> ModelSpec {
        ModelSpec::new(ModelKind::Music, "/models", ModelSource::Local)
    }

    async fn fake_pipeline() -> Arc<dyn MusicPipelinePort> {
        FakeInferenceBackend::new(FakeBackendConfig::default())
            .load_music_pipeline(&music_spec())
            .await
            .unwrap()
    }

    fn wav_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "wav"))
            .count()
    }

    /// 写入部分输出后失败的管线
    struct FailingPipeline {
        descriptor: ModelDescriptor,
        write_garbage: bool,
    }

    impl FailingPipeline {
        fn new(write_garbage: bool) -> Self {
            Self {
                descriptor: ModelDescriptor::from_spec("failing", &music_spec()),
                write_garbage,
            }
        }
    }

    #[async_trait]
    impl ModelHandlePort for FailingPipeline {
        fn descriptor(&self) -> &ModelDescriptor {
            &self.descriptor
        }
    }

    #[async_trait]
    impl MusicPipelinePort for FailingPipeline {
        async fn generate(&self, params: &MusicGenerationParams) -> Result<(), BackendError> {
            if self.write_garbage {
                tokio::fs::write(&params.save_path, b"definitely not audio")
                    .await
                    .unwrap();
                return Ok(());
            }
            tokio::fs::write(&params.save_path, b"partial").await.unwrap();
            Err(BackendError::ServiceError("CUDA out of memory".to_string()))
        }
    }

    #[tokio::test]
    async fn test_generate_returns_base64_wav_and_removes_file() {
        let dir = tempdir().unwrap();
        let staging = Arc::new(FileAudioStaging::new(dir.path()).await.unwrap());
        let handler = GenerateTrackHandler::new(
            fake_pipeline().await,
            staging,
            Arc::new(WavProbe::new()),
            short_preset(),
            1,
        );

        let response = handler.handle(GenerateTrackCommand).await.unwrap();

        assert!(!response.audio_data.is_empty());
        let bytes = STANDARD.decode(&response.audio_data).unwrap();
        assert_eq!(bytes.len(), response.size_bytes);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(response.audio_info.sample_rate, 48000);
        assert_eq!(response.audio_info.channels, 2);
        assert_eq!(wav_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_repeated_generation_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        let staging = Arc::new(FileAudioStaging::new(dir.path()).await.unwrap());
        let handler = GenerateTrackHandler::new(
            fake_pipeline().await,
            staging,
            Arc::new(WavProbe::new()),
            short_preset(),
            1,
        );

        for _ in 0..3 {
            handler.handle(GenerateTrackCommand).await.unwrap();
        }
        assert_eq!(wav_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_pipeline_failure_cleans_up_staged_file() {
        let dir = tempdir().unwrap();
        let staging = Arc::new(FileAudioStaging::new(dir.path()).await.unwrap());
        let handler = GenerateTrackHandler::new(
            Arc::new(FailingPipeline::new(false)),
            staging,
            Arc::new(WavProbe::new()),
            short_preset(),
            1,
        );

        let err = handler.handle(GenerateTrackCommand).await.unwrap_err();
        assert!(matches!(err, ApplicationError::GenerationError(_)));
        assert_eq!(wav_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_invalid_output_cleans_up_staged_file() {
        let dir = tempdir().unwrap();
        let staging = Arc::new(FileAudioStaging::new(dir.path()).await.unwrap());
        let handler = GenerateTrackHandler::new(
            Arc::new(FailingPipeline::new(true)),
            staging,
            Arc::new(WavProbe::new()),
            short_preset(),
            1,
        );

        let err = handler.handle(GenerateTrackCommand).await.unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidOutput(_)));
        assert_eq!(wav_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_serialized() {
        let dir = tempdir().unwrap();
        let staging = Arc::new(FileAudioStaging::new(dir.path()).await.unwrap());
        let backend = FakeInferenceBackend::new(FakeBackendConfig {
            latency_ms: 50,
            ..Default::default()
        });
        let pipeline = backend.load_music_pipeline(&music_spec()).await.unwrap();
        let handler = Arc::new(GenerateTrackHandler::new(
            pipeline,
            staging,
            Arc::new(WavProbe::new()),
            short_preset(),
            1,
        ));

        let started = Instant::now();
        let (a, b) = tokio::join!(
            handler.handle(GenerateTrackCommand),
            handler.handle(GenerateTrackCommand)
        );
        assert!(a.is_ok());
        assert!(b.is_ok());
        assert!(started.elapsed().as_millis() >= 100);
        assert_eq!(wav_count(dir.path()), 0);
    }

    /// 在阻塞线程中延迟写入输出的管线
    struct SlowBlockingPipeline {
        descriptor: ModelDescriptor,
    }

    #[async_trait]
    impl ModelHandlePort for SlowBlockingPipeline {
        fn descriptor(&self) -> &ModelDescriptor {
            &self.descriptor
        }
    }

    #[async_trait]
    impl MusicPipelinePort for SlowBlockingPipeline {
        async fn generate(&self, params: &MusicGenerationParams) -> Result<(), BackendError> {
            let path = params.save_path.clone();
            tokio::task::spawn_blocking(move || {
                std::thread::sleep(std::time::Duration::from_millis(100));
                let spec = hound::WavSpec {
                    channels: 1,
                    sample_rate: 8000,
                    bits_per_sample: 16,
                    sample_format: hound::SampleFormat::Int,
                };
                let mut writer = hound::WavWriter::create(&path, spec).unwrap();
                for n in 0..800 {
                    writer.write_sample((n % 64) as i16).unwrap();
                }
                writer.finalize().unwrap();
            })
            .await
            .map_err(|e| BackendError::ServiceError(e.to_string()))
        }
    }

    #[tokio::test]
    async fn test_cancelled_request_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        let staging = Arc::new(FileAudioStaging::new(dir.path()).await.unwrap());
        let pipeline = SlowBlockingPipeline {
            descriptor: ModelDescriptor::from_spec("slow", &music_spec()),
        };
        let handler = GenerateTrackHandler::new(
            Arc::new(pipeline),
            staging,
            Arc::new(WavProbe::new()),
            short_preset(),
            1,
        );

        // 客户端在管线写文件之前断开
        let cancelled = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            handler.handle(GenerateTrackCommand),
        )
        .await;
        assert!(cancelled.is_err());

        // 只有一个许可，下一次请求要等被取消的生成结束后才会开始
        handler.handle(GenerateTrackCommand).await.unwrap();
        assert_eq!(wav_count(dir.path()), 0);
    }
}
