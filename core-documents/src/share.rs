//! Share a local file through the platform's application chooser

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

pub(crate) const OPERATION: &str = "shareFile";

/// Hands a file to any application that accepts it.
///
/// Success means the chooser was dispatched; whether the user picked a target
/// is never reported back.
pub struct ShareOperation {
    file_system: Arc<dyn FileSystemAccess>,
    uri_provider: Arc<dyn UriProvider>,
    launcher: Arc<dyn ActivityLauncher>,
    authority: String,
    default_mime_type: String,
    default_title: String,
    event_bus: Option<EventBus>,
}

impl ShareOperation {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            file_system: config.file_system.clone(),
            uri_provider: config.uri_provider.clone(),
            launcher: config.activity_launcher.clone(),
            authority: config.authority.clone(),
            default_mime_type: config.default_mime_type.clone(),
            default_title: config.share_title.clone(),
            event_bus: config.event_bus.clone(),
        }
    }

    /// Share `file_path`.
    ///
    /// `mime_type` defaults to the configured MIME type and `title` to the
    /// localized chooser title. Blank values count as absent.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` when the file does not exist; nothing is launched
    /// - `ShareFailed` with the platform message when the existence check,
    ///   URI minting or the launch fails
    #[instrument(skip(self, file_path, title), fields(file = %strip_path(file_path)))]
    pub async fn share_file(
        &self,
        file_path: &str,
        mime_type: Option<&str>,
        title: Option<&str>,
    ) -> Result<bool> {
        let mime_type = or_default(mime_type, &self.default_mime_type);
        let title = or_default(title, &self.default_title);

        match self.dispatch(file_path, mime_type, title).await {
            Ok(()) => {
                info!(mime_type, "Share chooser dispatched");
                emit(
                    &self.event_bus,
                    DocumentEvent::ShareDispatched {
                        mime_type: mime_type.to_string(),
                        title: title.to_string(),
                    },
                );
                Ok(true)
            }
            Err(err) => {
                warn!(code = err.code(), "Share rejected");
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

    async fn dispatch(&self, file_path: &str, mime_type: &str, title: &str) -> Result<()> {
        let path = Path::new(file_path);

        let exists = self
            .file_system
            .exists(path)
            .await
            .map_err(DocumentError::share)?;
        if !exists {
            return Err(DocumentError::FileNotFound {
                path: file_path.to_string(),
            });
        }

        let handle = self
            .uri_provider
            .grant_uri(&self.authority, path, UriGrant::Read)
            .map_err(DocumentError::share)?;
        debug!(uri = %handle.uri, "Granted read access");

        self.launcher
            .start_activity(intents::share_intent(handle, mime_type, title))
            .map_err(DocumentError::share)
    }
}
