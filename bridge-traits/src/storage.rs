//! Filesystem checks made before a file leaves the app

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// The host's view of app-private storage.
///
/// Android backs this with `Context.getFilesDir()`, iOS with the sandbox
/// documents directory and desktop shells with a per-user data directory.
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Whether `path` names an existing file or directory.
    ///
    /// Permission problems are errors, not `false`.
    async fn exists(&self, path: &Path) -> Result<bool>;
}
