//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：模型加载与曲目生成

mod generate_commands;
mod load_models_commands;

pub mod handlers;

pub use generate_commands::*;
pub use load_models_commands::*;
