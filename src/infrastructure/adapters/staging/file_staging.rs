//! File Audio Staging - 文件系统暂存实现
//!
//! 实现 AudioStagingPort trait，暂存文件命名为 `<uuid>.wav`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{AudioStagingPort, StagedAudio, StagingError};

/// 文件系统暂存目录
pub struct FileAudioStaging {
    /// 暂存根目录
    base_dir: PathBuf,
}

impl FileAudioStaging {
    /// 创建暂存目录
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StagingError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StagingError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }
}

/// 只匹配本服务分配的 `<uuid>.wav`，暂存目录可能与其他文件共用
fn is_staged_audio(path: &Path) -> bool {
    let is_wav = path.extension().map_or(false, |ext| ext == "wav");
    is_wav
        && path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map_or(false, |stem| Uuid::parse_str(stem).is_ok())
}

#[async_trait]
impl AudioStagingPort for FileAudioStaging {
    fn staging_dir(&self) -> &Path {
        &self.base_dir
    }

    fn allocate(&self) -> StagedAudio {
        StagedAudio::new(self.base_dir.join(format!("{}.wav", Uuid::new_v4())))
    }

    async fn read(&self, staged: &StagedAudio) -> Result<Vec<u8>, StagingError> {
        match fs::read(staged.path()).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StagingError::FileNotFound(
                staged.path().to_string_lossy().to_string(),
            )),
            Err(e) => Err(StagingError::IoError(e.to_string())),
        }
    }

    async fn discard(&self, staged: StagedAudio) -> Result<(), StagingError> {
        let path = staged.path().to_path_buf();
        let result = tokio::task::spawn_blocking(move || staged.close())
            .await
            .map_err(|e| StagingError::IoError(e.to_string()))?;

        match result {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StagingError::IoError(e.to_string())),
        }

        tracing::debug!(path = %path.display(), "Discarded staged audio");
        Ok(())
    }

    async fn sweep(&self) -> Result<u64, StagingError> {
        let mut deleted_count = 0u64;
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| StagingError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StagingError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if !is_staged_audio(&path) {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => deleted_count += 1,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to sweep staged audio");
                }
            }
        }

        if deleted_count > 0 {
            tracing::info!(
                dir = %self.base_dir.display(),
                files = deleted_count,
                "Swept stale staged audio"
            );
        }

        Ok(deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_allocate_read_discard() {
        let temp_dir = tempdir().unwrap();
        let staging = FileAudioStaging::new(temp_dir.path().join("staging")).await.unwrap();

        let staged = staging.allocate();
        assert!(staged.path().starts_with(staging.staging_dir()));
        assert_eq!(staged.path().extension().unwrap(), "wav");

        std::fs::write(staged.path(), b"fake wav data").unwrap();
        let data = staging.read(&staged).await.unwrap();
        assert_eq!(data, b"fake wav data");

        let path = staged.path().to_path_buf();
        staging.discard(staged).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_allocate_never_repeats() {
        let temp_dir = tempdir().unwrap();
        let staging = FileAudioStaging::new(temp_dir.path()).await.unwrap();

        let a = staging.allocate();
        let b = staging.allocate();
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp_dir = tempdir().unwrap();
        let staging = FileAudioStaging::new(temp_dir.path()).await.unwrap();

        let staged = staging.allocate();
        let err = staging.read(&staged).await.unwrap_err();
        assert!(matches!(err, StagingError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_sweep_removes_only_staged_audio() {
        let temp_dir = tempdir().unwrap();
        let staging = FileAudioStaging::new(temp_dir.path()).await.unwrap();

        let stale_a = temp_dir.path().join(format!("{}.wav", Uuid::new_v4()));
        let stale_b = temp_dir.path().join(format!("{}.wav", Uuid::new_v4()));
        std::fs::write(&stale_a, b"a").unwrap();
        std::fs::write(&stale_b, b"b").unwrap();
        std::fs::write(temp_dir.path().join("keep.wav"), b"user audio").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"keep").unwrap();

        let deleted = staging.sweep().await.unwrap();
        assert_eq!(deleted, 2);
        assert!(!stale_a.exists());
        assert!(!stale_b.exists());
        assert!(temp_dir.path().join("keep.wav").exists());
        assert!(temp_dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_discard_missing_file_is_ok() {
        let temp_dir = tempdir().unwrap();
        let staging = FileAudioStaging::new(temp_dir.path()).await.unwrap();

        let staged = staging.allocate();
        assert!(staging.discard(staged).await.is_ok());
    }
}
