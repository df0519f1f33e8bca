//! Staging Adapter - 临时音频文件

mod file_staging;

pub use file_staging::FileAudioStaging;
