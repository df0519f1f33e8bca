//! Audio Probe Port - 音频格式校验
//!
//! 在返回给调用方之前确认生成结果是可解码的音频

use serde::Serialize;
use thiserror::Error;

/// 探测错误
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// 音频信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioInfo {
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u8,
    /// 帧数
    pub frames: u64,
    /// 时长（毫秒）
    pub duration_ms: u64,
}

/// Audio Probe Port
pub trait AudioProbePort: Send + Sync {
    /// 解析音频数据，返回格式信息
    fn probe(&self, data: &[u8]) -> Result<AudioInfo, ProbeError>;
}
