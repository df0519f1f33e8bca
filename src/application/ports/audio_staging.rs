//! Audio Staging Port - 临时音频文件管理
//!
//! 生成管线把结果写入临时文件，读取后立即删除。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;

/// 暂存错误
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 暂存音频文件
///
/// 包装 `tempfile::TempPath`：被 drop 时删除文件（文件不存在时忽略），
/// 保证错误路径不会遗留文件。drop 中的删除是同步调用，
/// 正常路径应通过 `AudioStagingPort::discard` 在阻塞线程池中删除。
#[derive(Debug)]
pub struct StagedAudio {
    path: TempPath,
}

impl StagedAudio {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: TempPath::from_path(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 立即删除文件（阻塞调用）
    pub fn close(self) -> std::io::Result<()> {
        self.path.close()
    }
}

/// Audio Staging Port
#[async_trait]
pub trait AudioStagingPort: Send + Sync {
    /// 暂存目录
    fn staging_dir(&self) -> &Path;

    /// 分配一个新的暂存路径（每次调用都不同）
    fn allocate(&self) -> StagedAudio;

    /// 完整读取暂存文件
    async fn read(&self, staged: &StagedAudio) -> Result<Vec<u8>, StagingError>;

    /// 删除暂存文件
    async fn discard(&self, staged: StagedAudio) -> Result<(), StagingError>;

    /// 清理暂存目录中遗留的音频文件，返回删除数量
    async fn sweep(&self) -> Result<u64, StagingError>;
}
