use core_documents::DocumentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("{0}")]
    Documents(#[from] DocumentError),

    #[error("Invalid call: {0}")]
    InvalidCall(String),
}

impl CoreError {
    pub const E_INVALID_CALL: &'static str = "E_INVALID_CALL";
    pub const E_INITIALIZATION_FAILED: &'static str = "E_INITIALIZATION_FAILED";

    /// Wire code reported to the shell.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Documents(err) => err.code(),
            CoreError::InvalidCall(_) => Self::E_INVALID_CALL,
            CoreError::CapabilityMissing { .. } | CoreError::Runtime(_) => Self::E_INITIALIZATION_FAILED,
        }
    }

    /// Surface configuration capability errors as `CapabilityMissing`.
    pub(crate) fn from_config(err: core_runtime::Error) -> Self {
        match err {
            core_runtime::Error::CapabilityMissing {
                capability,
                message,
            } => CoreError::CapabilityMissing {
                capability,
                message,
            },
            other => CoreError::Runtime(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_failures_share_one_code() {
        let missing = CoreError::from_config(core_runtime::Error::CapabilityMissing {
            capability: "UriProvider".to_string(),
            message: "no provider".to_string(),
        });
        assert!(matches!(missing, CoreError::CapabilityMissing { .. }));
        assert_eq!(missing.code(), CoreError::E_INITIALIZATION_FAILED);

        let invalid = CoreError::from_config(core_runtime::Error::Config("bad".to_string()));
        assert!(matches!(invalid, CoreError::Runtime(_)));
        assert_eq!(invalid.code(), CoreError::E_INITIALIZATION_FAILED);
    }

    #[test]
    fn test_call_and_document_codes() {
        assert_eq!(
            CoreError::InvalidCall("unknown method".to_string()).code(),
            "E_INVALID_CALL"
        );
        assert_eq!(
            CoreError::from(DocumentError::PickerCancelled).code(),
            DocumentError::E_PICKER_CANCELLED
        );
    }
}
