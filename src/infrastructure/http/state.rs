//! Application State
//!
//! 请求处理所需的已加载模型与用例处理器

use std::sync::Arc;

use crate::application::{
    AudioProbePort, AudioStagingPort, GenerateTrackHandler, ListModelsHandler, LoadedModels,
};
use crate::domain::TrackPreset;

/// 应用状态
///
/// 模型句柄在冷启动时加载，之后只读
pub struct AppState {
    pub models: LoadedModels,

    // ========== Command Handlers ==========
    pub generate_track_handler: GenerateTrackHandler,

    // ========== Query Handlers ==========
    pub list_models_handler: ListModelsHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        models: LoadedModels,
        staging: Arc<dyn AudioStagingPort>,
        probe: Arc<dyn AudioProbePort>,
        preset: TrackPreset,
        max_concurrent: usize,
    ) -> Self {
        Self {
            models: models.clone(),

            generate_track_handler: GenerateTrackHandler::new(
                models.music.clone(),
                staging,
                probe,
                preset,
                max_concurrent,
            ),

            list_models_handler: ListModelsHandler::new(models),
        }
    }
}
