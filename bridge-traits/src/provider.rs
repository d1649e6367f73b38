//! Permission-scoped file handles
//!
//! A raw filesystem path never crosses into another application. Instead the
//! bridge asks a [`UriProvider`] to mint a [`ShareableHandle`]: a content URI
//! namespaced by the application's provider authority, paired with the access
//! the receiving application is granted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::activity::IntentFlag;
use crate::error::{BridgeError, Result};

/// A URI as understood by the platform (`content://`, `file://`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentUri(String);

impl ContentUri {
    /// Parse a URI string, requiring a non-empty scheme followed by `://`.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        match value.split_once("://") {
            Some((scheme, _))
                if !scheme.is_empty()
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
            {
                Ok(Self(value))
            }
            _ => Err(BridgeError::InvalidUri(value)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        self.0.split_once("://").map(|(s, _)| s).unwrap_or_default()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access granted to the application receiving a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UriGrant {
    Read,
    ReadWrite,
}

impl UriGrant {
    pub fn allows_write(&self) -> bool {
        matches!(self, UriGrant::ReadWrite)
    }

    /// Permission flags that must accompany an intent carrying this grant.
    pub fn intent_flags(&self) -> &'static [IntentFlag] {
        match self {
            UriGrant::Read => &[IntentFlag::GrantReadUriPermission],
            UriGrant::ReadWrite => &[
                IntentFlag::GrantReadUriPermission,
                IntentFlag::GrantWriteUriPermission,
            ],
        }
    }
}

/// Opaque, permission-scoped reference to a local file.
///
/// Valid only while the grant flags travel with the request that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareableHandle {
    pub uri: ContentUri,
    pub grant: UriGrant,
}

impl ShareableHandle {
    pub fn new(uri: ContentUri, grant: UriGrant) -> Self {
        Self { uri, grant }
    }
}

/// Mints shareable handles for local files.
///
/// - **Android**: `FileProvider.getUriForFile(context, authority, file)`
/// - **Desktop**: synthesized `content://<authority>/...` URIs
///
/// Implementations must fail when the path lies outside the locations the
/// authority is configured to expose.
pub trait UriProvider: Send + Sync {
    fn grant_uri(&self, authority: &str, path: &Path, grant: UriGrant) -> Result<ShareableHandle>;
}
