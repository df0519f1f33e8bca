//! Model Query Handlers

use crate::application::commands::LoadedModels;
use crate::application::queries::model_queries::{ListModels, ListModelsResponse, ModelStatus};

/// ListModels Handler - 列出已加载模型及其健康状态
pub struct ListModelsHandler {
    models: LoadedModels,
}

impl ListModelsHandler {
    pub fn new(models: LoadedModels) -> Self {
        Self { models }
    }

    pub async fn handle(&self, _query: ListModels) -> ListModelsResponse {
        let music_healthy = self.models.music.health_check().await;
        let llm_healthy = self.models.llm.health_check().await;
        let image_healthy = self.models.image.health_check().await;

        ListModelsResponse {
            models: vec![
                ModelStatus {
                    descriptor: self.models.music.descriptor().clone(),
                    healthy: music_healthy,
                },
                ModelStatus {
                    descriptor: self.models.llm.descriptor().clone(),
                    healthy: llm_healthy,
                },
                ModelStatus {
                    descriptor: self.models.image.descriptor().clone(),
                    healthy: image_healthy,
                },
            ],
        }
    }
}
