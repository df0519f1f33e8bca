//! Track Context - 固定曲目预设
//!
//! 生成接口不接受任何参数，每次请求都使用同一份预设合成同一首说唱曲目。

use serde::{Deserialize, Serialize};

use super::TrackError;

/// 默认风格描述
pub const DEFAULT_PROMPT: &str = "rap, hip-hop, boom bap, male vocals, punchy drums, 90 bpm";

/// 默认歌词
pub const DEFAULT_LYRICS: &str = "[verse]
Woke up in the city with the bass in my chest
Concrete humming and the street never rest
Pen on the paper and the beat on repeat
Every single bar is a step to the beat

[chorus]
Turn it up, turn it up, let the speakers ride
Jukebox spinning with the fire inside
Turn it up, turn it up, till the morning light
We ain't ever coming down tonight

[verse]
Started with a sample and a dream in a box
Dusty old records and some secondhand socks
Now the crowd's jumping and the lights going wild
Same kid rhyming with the same old smile

[chorus]
Turn it up, turn it up, let the speakers ride
Jukebox spinning with the fire inside
Turn it up, turn it up, till the morning light
We ain't ever coming down tonight";

/// 曲目预设
///
/// 对应音乐生成管线的一次完整调用参数（输出路径除外）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPreset {
    /// 风格描述（tags）
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// 歌词，支持 [verse]/[chorus] 段落标记
    #[serde(default = "default_lyrics")]
    pub lyrics: String,

    /// 音频时长（秒）
    #[serde(default = "default_audio_duration")]
    pub audio_duration: f64,

    /// 推理步数
    #[serde(default = "default_infer_step")]
    pub infer_step: u32,

    /// Classifier-free guidance scale
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_lyrics() -> String {
    DEFAULT_LYRICS.to_string()
}

fn default_audio_duration() -> f64 {
    221.0
}

fn default_infer_step() -> u32 {
    60
}

fn default_guidance_scale() -> f64 {
    15.0
}

impl Default for TrackPreset {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            lyrics: default_lyrics(),
            audio_duration: default_audio_duration(),
            infer_step: default_infer_step(),
            guidance_scale: default_guidance_scale(),
        }
    }
}

impl TrackPreset {
    /// 校验预设
    ///
    /// 歌词允许为空（纯音乐）
    pub fn validate(&self) -> Result<(), TrackError> {
        if self.prompt.trim().is_empty() {
            return Err(TrackError::EmptyPrompt);
        }
        if !self.audio_duration.is_finite() || self.audio_duration <= 0.0 {
            return Err(TrackError::InvalidDuration(self.audio_duration));
        }
        if self.infer_step == 0 {
            return Err(TrackError::InvalidInferStep);
        }
        if !self.guidance_scale.is_finite() || self.guidance_scale < 0.0 {
            return Err(TrackError::InvalidGuidanceScale(self.guidance_scale));
        }
        Ok(())
    }

    /// 是否为纯音乐（无歌词）
    pub fn is_instrumental(&self) -> bool {
        self.lyrics.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_is_valid() {
        let preset = TrackPreset::default();
        assert!(preset.validate().is_ok());
        assert_eq!(preset.audio_duration, 221.0);
        assert_eq!(preset.infer_step, 60);
        assert_eq!(preset.guidance_scale, 15.0);
        assert!(!preset.is_instrumental());
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let preset = TrackPreset {
            prompt: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(preset.validate(), Err(TrackError::EmptyPrompt));
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let preset = TrackPreset {
            audio_duration: 0.0,
            ..Default::default()
        };
        assert_eq!(preset.validate(), Err(TrackError::InvalidDuration(0.0)));

        let preset = TrackPreset {
            audio_duration: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            preset.validate(),
            Err(TrackError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_zero_infer_step_rejected() {
        let preset = TrackPreset {
            infer_step: 0,
            ..Default::default()
        };
        assert_eq!(preset.validate(), Err(TrackError::InvalidInferStep));
    }

    #[test]
    fn test_negative_guidance_rejected() {
        let preset = TrackPreset {
            guidance_scale: -1.0,
            ..Default::default()
        };
        assert_eq!(
            preset.validate(),
            Err(TrackError::InvalidGuidanceScale(-1.0))
        );
    }

    #[test]
    fn test_instrumental_preset() {
        let preset = TrackPreset {
            lyrics: String::new(),
            ..Default::default()
        };
        assert!(preset.validate().is_ok());
        assert!(preset.is_instrumental());
    }
}
