//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Track Context: 固定曲目预设
//! - Model Context: 预训练模型描述

pub mod model;
pub mod track;

pub use model::{ModelDescriptor, ModelKind, ModelSource, ModelSpec};
pub use track::{TrackError, TrackPreset};
