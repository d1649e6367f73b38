//! Call-by-name dispatch for shells
//!
//! Shells that talk to the bridge through a message channel send one JSON
//! object per call:
//!
//! ```json
//! {"method": "shareFile", "args": {"filePath": "/data/.../notes.json"}}
//! {"method": "saveFile", "args": {"sourcePath": "...", "destinationFilename": "notes.json"}}
//! {"method": "pickFolder"}
//! ```
//!
//! Every failure comes back as a [`Rejection`] carrying the wire code.

use crate::error::CoreError;
use crate::{FILE_SHARE_MODULE, FOLDER_PICKER_MODULE};
use core_documents::DocumentError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareFileArgs {
    pub file_path: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFileArgs {
    pub source_path: String,
    pub destination_filename: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// A bridge call addressed by method name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "camelCase")]
pub enum BridgeCall {
    ShareFile(ShareFileArgs),
    SaveFile(SaveFileArgs),
    PickFolder,
}

impl BridgeCall {
    /// Parse a call from its JSON text.
    pub fn from_json(request: &str) -> Result<Self, CoreError> {
        serde_json::from_str(request).map_err(|err| CoreError::InvalidCall(err.to_string()))
    }

    pub fn method(&self) -> &'static str {
        match self {
            BridgeCall::ShareFile(_) => "shareFile",
            BridgeCall::SaveFile(_) => "saveFile",
            BridgeCall::PickFolder => "pickFolder",
        }
    }

    /// Native module the method is registered under.
    pub fn module(&self) -> &'static str {
        match self {
            BridgeCall::ShareFile(_) | BridgeCall::SaveFile(_) => FILE_SHARE_MODULE,
            BridgeCall::PickFolder => FOLDER_PICKER_MODULE,
        }
    }
}

/// Failure as seen by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub code: String,
    pub message: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Rejection {}

impl From<DocumentError> for Rejection {
    fn from(err: DocumentError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for Rejection {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Documents(err) => err.into(),
            other => Self {
                code: other.code().to_string(),
                message: other.to_string(),
            },
        }
    }
}
