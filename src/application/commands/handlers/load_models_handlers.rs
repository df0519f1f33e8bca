//! Load Models Command Handler

use std::sync::Arc;
use std::time::Instant;

use crate::application::commands::load_models_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{BackendError, InferenceBackendPort};
use crate::domain::{ModelSource, ModelSpec};

/// LoadModels Handler - 冷启动时依次加载三个模型
///
/// 没有重试：任何一个模型加载失败都直接返回错误，由调用方终止启动
pub struct LoadModelsHandler {
    backend: Arc<dyn InferenceBackendPort>,
}

impl LoadModelsHandler {
    pub fn new(backend: Arc<dyn InferenceBackendPort>) -> Self {
        Self { backend }
    }

    pub async fn handle(&self, cmd: LoadModelsCommand) -> Result<LoadedModels, ApplicationError> {
        let started = Instant::now();

        if cmd.require_local_checkpoint {
            ensure_local_checkpoint(&cmd.music).await?;
        }

        log_loading(&cmd.music);
        let step = Instant::now();
        let music = self
            .backend
            .load_music_pipeline(&cmd.music)
            .await
            .map_err(|e| load_error(&cmd.music, e))?;
        log_loaded(&cmd.music, &music.descriptor().handle, step);

        log_loading(&cmd.llm);
        let step = Instant::now();
        let llm = self
            .backend
            .load_model(&cmd.llm)
            .await
            .map_err(|e| load_error(&cmd.llm, e))?;
        log_loaded(&cmd.llm, &llm.descriptor().handle, step);

        log_loading(&cmd.image);
        let step = Instant::now();
        let image = self
            .backend
            .load_model(&cmd.image)
            .await
            .map_err(|e| load_error(&cmd.image, e))?;
        log_loaded(&cmd.image, &image.descriptor().handle, step);

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "All models loaded"
        );

        Ok(LoadedModels { music, llm, image })
    }
}

/// 本地来源的模型要求 checkpoint 目录已挂载
async fn ensure_local_checkpoint(spec: &ModelSpec) -> Result<(), ApplicationError> {
    if spec.source != ModelSource::Local {
        return Ok(());
    }
    match tokio::fs::metadata(&spec.model_id).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(load_error(
            spec,
            BackendError::CheckpointNotFound(format!("{} is not a directory", spec.model_id)),
        )),
        Err(e) => Err(load_error(
            spec,
            BackendError::CheckpointNotFound(format!("{}: {}", spec.model_id, e)),
        )),
    }
}

fn load_error(spec: &ModelSpec, err: BackendError) -> ApplicationError {
    tracing::error!(
        kind = %spec.kind,
        model_id = %spec.model_id,
        error = %err,
        "Model load failed"
    );
    ApplicationError::model_load(spec.kind, spec.model_id.clone(), err.to_string())
}

fn log_loading(spec: &ModelSpec) {
    tracing::info!(
        kind = %spec.kind,
        model_id = %spec.model_id,
        dtype = %spec.dtype,
        device = %spec.device,
        "Loading model"
    );
}

fn log_loaded(spec: &ModelSpec, handle: &str, started: Instant) {
    tracing::info!(
        kind = %spec.kind,
        handle = %handle,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Model loaded"
    );
}
