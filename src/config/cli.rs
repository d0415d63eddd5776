use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    async fn ensure_parent(full_path: &Path) -> Result<()> {
        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }
}

impl Storage for LocalStorage {
    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        Self::ensure_parent(&full_path).await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(full_path)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        fs::try_exists(self.full_path(path)).await.unwrap_or(false)
    }
}
