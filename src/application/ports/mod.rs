//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_probe;
mod audio_staging;
mod inference_backend;
mod music_pipeline;

pub use audio_probe::{AudioInfo, AudioProbePort, ProbeError};
pub use audio_staging::{AudioStagingPort, StagedAudio, StagingError};
pub use inference_backend::{BackendError, InferenceBackendPort, ModelHandlePort};
pub use music_pipeline::{MusicGenerationParams, MusicPipelinePort};
