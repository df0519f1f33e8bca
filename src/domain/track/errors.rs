//! Track Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TrackError {
    #[error("prompt 不能为空")]
    EmptyPrompt,

    #[error("无效的时长: {0}s")]
    InvalidDuration(f64),

    #[error("推理步数必须大于 0")]
    InvalidInferStep,

    #[error("无效的 guidance scale: {0}")]
    InvalidGuidanceScale(f64),
}
