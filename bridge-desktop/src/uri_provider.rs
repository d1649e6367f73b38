//! Content URI provider for desktop hosts
//!
//! Mirrors a platform file provider: a set of named roots is exposed under
//! the provider authority, and a file is shareable only if it lives under one
//! of them. `/home/me/.local/share/file-bridge/exports/notes.json` with root
//! `files` → `.../file-bridge` becomes
//! `content://<authority>/files/exports/notes.json`.

use bridge_traits::{
    error::{BridgeError, Result},
    provider::{ContentUri, ShareableHandle, UriGrant, UriProvider},
};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// A directory exposed through the provider under `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRoot {
    pub name: String,
    pub path: PathBuf,
}

/// Path-to-URI provider with explicitly configured roots
#[derive(Debug, Clone, Default)]
pub struct ContentUriProvider {
    roots: Vec<ProviderRoot>,
}

impl ContentUriProvider {
    /// Create a provider with no roots; every path is rejected until one is added
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose the application data directory as the `files` root
    pub fn for_data_directory(data_dir: impl Into<PathBuf>) -> Self {
        Self::new().with_root("files", data_dir)
    }

    pub fn with_root(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.roots.push(ProviderRoot {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    pub fn roots(&self) -> &[ProviderRoot] {
        &self.roots
    }

    /// Most specific root containing `path`, with the path relative to it
    fn resolve<'a>(&'a self, path: &'a Path) -> Option<(&'a ProviderRoot, &'a Path)> {
        self.roots
            .iter()
            .filter_map(|root| path.strip_prefix(&root.path).ok().map(|rel| (root, rel)))
            .max_by_key(|(root, _)| root.path.components().count())
    }
}

impl UriProvider for ContentUriProvider {
    fn grant_uri(&self, authority: &str, path: &Path, grant: UriGrant) -> Result<ShareableHandle> {
        let (root, relative) = self.resolve(path).ok_or_else(|| {
            BridgeError::OperationFailed(format!(
                "Failed to find configured root that contains {}",
                path.display()
            ))
        })?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    segments.push(urlencoding::encode(&segment.to_string_lossy()).into_owned())
                }
                Component::CurDir => {}
                _ => {
                    return Err(BridgeError::OperationFailed(format!(
                        "Path escapes provider root: {}",
                        path.display()
                    )))
                }
            }
        }

        let uri = ContentUri::parse(format!(
            "content://{}/{}/{}",
            authority,
            urlencoding::encode(&root.name),
            segments.join("/")
        ))?;
        debug!(uri = %uri, ?grant, "Granted content URI");

        Ok(ShareableHandle::new(uri, grant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHORITY: &str = "com.dmch.winetastingnotesapp.fileprovider";

    #[test]
    fn test_grant_under_files_root() {
        let provider = ContentUriProvider::for_data_directory("/data/user/0/app/files");

        let handle = provider
            .grant_uri(
                AUTHORITY,
                Path::new("/data/user/0/app/files/notes.json"),
                UriGrant::Read,
            )
            .unwrap();

        assert_eq!(
            handle.uri.as_str(),
            "content://com.dmch.winetastingnotesapp.fileprovider/files/notes.json"
        );
        assert_eq!(handle.grant, UriGrant::Read);
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let provider = ContentUriProvider::for_data_directory("/data/files");

        let handle = provider
            .grant_uri(
                AUTHORITY,
                Path::new("/data/files/exports/Wine Notes #1.json"),
                UriGrant::ReadWrite,
            )
            .unwrap();

        assert!(handle
            .uri
            .as_str()
            .ends_with("/files/exports/Wine%20Notes%20%231.json"));
    }

    #[test]
    fn test_most_specific_root_wins() {
        let provider = ContentUriProvider::new()
            .with_root("files", "/data/files")
            .with_root("exports", "/data/files/exports");

        let handle = provider
            .grant_uri(AUTHORITY, Path::new("/data/files/exports/a.json"), UriGrant::Read)
            .unwrap();

        assert!(handle.uri.as_str().ends_with("/exports/a.json"));
    }

    #[test]
    fn test_path_outside_roots_is_rejected() {
        let provider = ContentUriProvider::for_data_directory("/data/files");

        let err = provider
            .grant_uri(AUTHORITY, Path::new("/etc/passwd"), UriGrant::Read)
            .unwrap_err();

        assert!(err.to_string().contains("Failed to find configured root"));
    }

    #[test]
    fn test_parent_components_are_rejected() {
        let provider = ContentUriProvider::for_data_directory("/data/files");

        assert!(provider
            .grant_uri(AUTHORITY, Path::new("/data/files/../secret.json"), UriGrant::Read)
            .is_err());
    }
}
