//! Track Context - 曲目限界上下文
//!
//! 职责:
//! - 固定曲目预设（prompt、歌词、时长、推理参数）
//! - 预设校验

mod errors;
mod preset;

pub use errors::TrackError;
pub use preset::{TrackPreset, DEFAULT_LYRICS, DEFAULT_PROMPT};
