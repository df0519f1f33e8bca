//! Probe Adapter - 音频校验

mod wav_probe;

pub use wav_probe::WavProbe;
