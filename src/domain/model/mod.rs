//! Model Context - 模型限界上下文
//!
//! 职责:
//! - 描述需要加载的预训练模型（来源、精度、设备）
//! - 描述已加载的模型句柄

mod value_objects;

pub use value_objects::{ModelDescriptor, ModelKind, ModelSource, ModelSpec};
