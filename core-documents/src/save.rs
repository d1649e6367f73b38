//! Save a copy of a local file wherever the user chooses

use crate::error::{DocumentError, Result};
use crate::{emit, intents, or_default};
use bridge_traits::{
    activity::ActivityLauncher,
    provider::{UriGrant, UriProvider},
    storage::FileSystemAccess,
};
use core_runtime::config::BridgeConfig;
use core_runtime::events::{DocumentEvent, EventBus};
use core_runtime::logging::strip_path;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub(crate) const OPERATION: &str = "saveFile";

/// Opens the platform's document-creation UI with the destination name
/// pre-populated. Completion means the UI was shown, not that anything was
/// written.
pub struct SaveOperation {
    file_system: Arc<dyn FileSystemAccess>,
    uri_provider: Arc<dyn UriProvider>,
    launcher: Arc<dyn ActivityLauncher>,
    authority: String,
    default_mime_type: String,
    event_bus: Option<EventBus>,
}

impl SaveOperation {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            file_system: config.file_system.clone(),
            uri_provider: config.uri_provider.clone(),
            launcher: config.activity_launcher.clone(),
            authority: config.authority.clone(),
            default_mime_type: config.default_mime_type.clone(),
            event_bus: config.event_bus.clone(),
        }
    }

    /// Offer `source_path` for saving as `destination_filename`.
    ///
    /// # Errors
    ///
    /// - `SourceNotFound` when the source does not exist; nothing is launched
    /// - `SaveFailed` for a blank destination name on an existing source, and
    ///   with the platform message when the existence check, URI minting or
    ///   the launch fails
    #[instrument(
        skip(self, source_path),
        fields(source = %strip_path(source_path))
    )]
    pub async fn save_file(
        &self,
        source_path: &str,
        destination_filename: &str,
        mime_type: Option<&str>,
    ) -> Result<bool> {
        let mime_type = or_default(mime_type, &self.default_mime_type);

        match self.dispatch(source_path, destination_filename, mime_type).await {
            Ok(()) => {
                info!(mime_type, "Document UI dispatched");
                emit(
                    &self.event_bus,
                    DocumentEvent::SaveDispatched {
                        file_name: destination_filename.to_string(),
                        mime_type: mime_type.to_string(),
                    },
                );
                Ok(true)
            }
            Err(err) => {
                warn!(code = err.code(), "Save rejected");
                emit(
                    &self.event_bus,
                    DocumentEvent::OperationRejected {
                        operation: OPERATION.to_string(),
                        code: err.code().to_string(),
                    },
                );
                Err(err)
            }
        }
    }

    async fn dispatch(
        &self,
        source_path: &str,
        destination_filename: &str,
        mime_type: &str,
    ) -> Result<()> {
        let path = Path::new(source_path);
        let exists = self
            .file_system
            .exists(path)
            .await
            .map_err(DocumentError::save)?;
        if !exists {
            return Err(DocumentError::SourceNotFound {
                path: source_path.to_string(),
            });
        }

        if destination_filename.trim().is_empty() {
            return Err(DocumentError::SaveFailed(
                "Destination filename cannot be empty".to_string(),
            ));
        }

        let handle = self
            .uri_provider
            .grant_uri(&self.authority, path, UriGrant::ReadWrite)
            .map_err(DocumentError::save)?;
        debug!(uri = %handle.uri, "Granted read/write access");

        self.launcher
            .start_activity(intents::save_intent(handle, mime_type, destination_filename))
            .map_err(DocumentError::save)
    }
}
