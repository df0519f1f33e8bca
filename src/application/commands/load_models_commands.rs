//! Load Models Commands - 冷启动模型加载命令

use std::sync::Arc;

use crate::application::ports::{ModelHandlePort, MusicPipelinePort};
use crate::domain::{ModelDescriptor, ModelSpec};

/// 加载全部模型命令
#[derive(Debug, Clone)]
pub struct LoadModelsCommand {
    pub music: ModelSpec,
    pub llm: ModelSpec,
    pub image: ModelSpec,
    /// 加载前确认本地 checkpoint 目录存在
    pub require_local_checkpoint: bool,
}

/// 已加载的模型句柄（进程级只读共享）
#[derive(Clone)]
pub struct LoadedModels {
    pub music: Arc<dyn MusicPipelinePort>,
    pub llm: Arc<dyn ModelHandlePort>,
    pub image: Arc<dyn ModelHandlePort>,
}

impl LoadedModels {
    /// 按加载顺序返回所有模型描述
    pub fn descriptors(&self) -> Vec<&ModelDescriptor> {
        vec![
            self.music.descriptor(),
            self.llm.descriptor(),
            self.image.descriptor(),
        ]
    }
}

impl std::fmt::Debug for LoadedModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModels")
            .field("music", self.music.descriptor())
            .field("llm", self.llm.descriptor())
            .field("image", self.image.descriptor())
            .finish()
    }
}
