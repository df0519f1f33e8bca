//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（InferenceBackend、MusicPipeline、AudioStaging、AudioProbe）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Generate commands
    GenerateTrackCommand,
    GenerateTrackResponse,
    // Load models commands
    LoadModelsCommand,
    LoadedModels,
    // Handlers
    handlers::{GenerateTrackHandler, LoadModelsHandler},
};

pub use error::ApplicationError;

pub use ports::{
    // Audio probe
    AudioInfo,
    AudioProbePort,
    ProbeError,
    // Audio staging
    AudioStagingPort,
    StagedAudio,
    StagingError,
    // Inference backend
    BackendError,
    InferenceBackendPort,
    ModelHandlePort,
    // Music pipeline
    MusicGenerationParams,
    MusicPipelinePort,
};

pub use queries::{
    // Model queries
    ListModels,
    ListModelsResponse,
    ModelStatus,
    // Handlers
    handlers::ListModelsHandler,
};
