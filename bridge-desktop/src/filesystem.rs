//! `FileSystemAccess` over `tokio::fs`

use async_trait::async_trait;
use bridge_traits::{error::Result, storage::FileSystemAccess};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Application subdirectory under the platform data directory.
const APP_DIR: &str = "file-bridge";

/// Local-disk storage for desktop shells and tests.
#[derive(Debug, Clone)]
pub struct TokioFileSystem {
    data_dir: PathBuf,
}

impl TokioFileSystem {
    /// Uses `<platform data dir>/file-bridge`, e.g. `~/.local/share/file-bridge`.
    pub fn new() -> Self {
        let base = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self::with_data_directory(base.join(APP_DIR))
    }

    pub fn with_data_directory(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory, whether or not it exists yet.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for TokioFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(fs::try_exists(path).await?)
    }
}
