//! Generate Commands - 曲目生成命令

use crate::application::ports::AudioInfo;

/// 生成固定曲目命令
///
/// 不携带任何参数，生成参数来自服务配置中的曲目预设
#[derive(Debug, Clone, Default)]
pub struct GenerateTrackCommand;

/// 生成响应
#[derive(Debug, Clone)]
pub struct GenerateTrackResponse {
    /// Base64 编码的音频数据
    pub audio_data: String,
    /// 音频格式信息
    pub audio_info: AudioInfo,
    /// 原始音频大小（字节）
    pub size_bytes: usize,
}
