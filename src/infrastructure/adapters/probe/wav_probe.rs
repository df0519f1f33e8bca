//! WAV Probe - 基于 symphonia 的音频校验
//!
//! 解析容器头并解码首个数据包，确认生成结果是可播放的音频

use std::io::Cursor;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioInfo, AudioProbePort, ProbeError};

/// WAV 探测器
#[derive(Debug, Clone, Default)]
pub struct WavProbe;

impl WavProbe {
    pub fn new() -> Self {
        Self
    }

    /// 快速检查 RIFF/WAVE 标识
    fn check_riff_header(data: &[u8]) -> Result<(), ProbeError> {
        if data.len() < 44 {
            return Err(ProbeError::InvalidInput("WAV data too short".to_string()));
        }
        if &data[0..4] != b"RIFF" {
            return Err(ProbeError::InvalidInput(
                "Invalid WAV: missing RIFF header".to_string(),
            ));
        }
        if &data[8..12] != b"WAVE" {
            return Err(ProbeError::InvalidInput(
                "Invalid WAV: missing WAVE identifier".to_string(),
            ));
        }
        Ok(())
    }
}

impl AudioProbePort for WavProbe {
    fn probe(&self, data: &[u8]) -> Result<AudioInfo, ProbeError> {
        Self::check_riff_header(data)?;

        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("wav");

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| ProbeError::DecodingError(format!("Probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| ProbeError::DecodingError("No audio track found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .filter(|rate| *rate > 0)
            .ok_or_else(|| ProbeError::DecodingError("Unknown sample rate".to_string()))?;

        let channels = track
            .codec_params
            .channels
            .map(|c| c.count() as u8)
            .ok_or_else(|| ProbeError::DecodingError("Unknown channel count".to_string()))?;

        let frames = track.codec_params.n_frames.unwrap_or(0);
        if frames == 0 {
            return Err(ProbeError::InvalidInput("WAV contains no audio frames".to_string()));
        }

        let track_id = track.id;
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| ProbeError::DecodingError(format!("Decoder creation failed: {}", e)))?;

        // 只解码第一个属于该轨道的数据包
        loop {
            let packet = format
                .next_packet()
                .map_err(|e| ProbeError::DecodingError(format!("Packet read error: {}", e)))?;
            if packet.track_id() != track_id {
                continue;
            }
            decoder
                .decode(&packet)
                .map_err(|e| ProbeError::DecodingError(format!("Decode failed: {}", e)))?;
            break;
        }

        Ok(AudioInfo {
            sample_rate,
            channels,
            frames,
            duration_ms: frames * 1000 / sample_rate as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(sample_rate: u32, channels: u16, frames: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..frames * channels as u32 {
                writer.write_sample((i % 100) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_probe_valid_wav() {
        let data = wav_bytes(48000, 2, 24000);
        let info = WavProbe::new().probe(&data).unwrap();
        assert_eq!(info.sample_rate, 48000);
        assert_eq!(info.channels, 2);
        assert_eq!(info.frames, 24000);
        assert_eq!(info.duration_ms, 500);
    }

    #[test]
    fn test_probe_rejects_short_data() {
        let err = WavProbe::new().probe(b"RIFF").unwrap_err();
        assert!(matches!(err, ProbeError::InvalidInput(_)));
    }

    #[test]
    fn test_probe_rejects_non_wav() {
        let data = vec![0u8; 128];
        let err = WavProbe::new().probe(&data).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidInput(_)));
    }

    #[test]
    fn test_probe_rejects_empty_data_chunk() {
        let data = wav_bytes(16000, 1, 0);
        assert!(WavProbe::new().probe(&data).is_err());
    }
}
