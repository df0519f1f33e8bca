//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod generate_handlers;
mod load_models_handlers;

pub use generate_handlers::*;
pub use load_models_handlers::*;
