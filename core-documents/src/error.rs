use bridge_traits::error::BridgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a document operation.
///
/// Every variant maps to one stable wire code (see [`DocumentError::code`])
/// that JavaScript callers match on; the `Display` text is the human message
/// that travels with it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Source file not found: {path}")]
    SourceNotFound { path: String },

    #[error("{0}")]
    ShareFailed(String),

    #[error("{0}")]
    SaveFailed(String),

    #[error("Activity doesn't exist")]
    NoActivity,

    #[error("{0}")]
    FailedToShowPicker(String),

    #[error("Folder picker was cancelled")]
    PickerCancelled,

    #[error("Folder picker returned no folder")]
    PickerNoData,

    #[error("A folder pick is already in progress")]
    PickerBusy,

    #[error("Activity was destroyed before the folder picker returned")]
    ActivityDestroyed,
}

impl DocumentError {
    pub const FILE_NOT_FOUND: &'static str = "FILE_NOT_FOUND";
    pub const SHARE_ERROR: &'static str = "SHARE_ERROR";
    pub const SAVE_ERROR: &'static str = "SAVE_ERROR";
    pub const E_NO_ACTIVITY: &'static str = "E_NO_ACTIVITY";
    pub const E_FAILED_TO_SHOW_PICKER: &'static str = "E_FAILED_TO_SHOW_PICKER";
    pub const E_PICKER_CANCELLED: &'static str = "E_PICKER_CANCELLED";
    pub const E_PICKER_NO_DATA: &'static str = "E_PICKER_NO_DATA";
    pub const E_PICKER_BUSY: &'static str = "E_PICKER_BUSY";
    pub const E_ACTIVITY_DESTROYED: &'static str = "E_ACTIVITY_DESTROYED";

    /// Stable code reported to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::FileNotFound { .. } | DocumentError::SourceNotFound { .. } => {
                Self::FILE_NOT_FOUND
            }
            DocumentError::ShareFailed(_) => Self::SHARE_ERROR,
            DocumentError::SaveFailed(_) => Self::SAVE_ERROR,
            DocumentError::NoActivity => Self::E_NO_ACTIVITY,
            DocumentError::FailedToShowPicker(_) => Self::E_FAILED_TO_SHOW_PICKER,
            DocumentError::PickerCancelled => Self::E_PICKER_CANCELLED,
            DocumentError::PickerNoData => Self::E_PICKER_NO_DATA,
            DocumentError::PickerBusy => Self::E_PICKER_BUSY,
            DocumentError::ActivityDestroyed => Self::E_ACTIVITY_DESTROYED,
        }
    }

    pub(crate) fn share(err: BridgeError) -> Self {
        DocumentError::ShareFailed(platform_message(err))
    }

    pub(crate) fn save(err: BridgeError) -> Self {
        DocumentError::SaveFailed(platform_message(err))
    }

    pub(crate) fn show_picker(err: BridgeError) -> Self {
        DocumentError::FailedToShowPicker(platform_message(err))
    }
}

/// The platform's own message, without the bridge error prefix
fn platform_message(err: BridgeError) -> String {
    match err {
        BridgeError::NotAvailable(message)
        | BridgeError::OperationFailed(message)
        | BridgeError::InvalidUri(message) => message,
        BridgeError::Io(io) => io.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, DocumentError>;
