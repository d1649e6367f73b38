//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (filesystem, URI
//! provider, activity launcher and host) into the document operations and
//! exposes them as one [`FileBridgeService`]. Desktop shells and test
//! harnesses typically enable the `desktop-shims` feature (which depends on
//! `bridge-desktop`) and call [`bootstrap_desktop`]; mobile hosts build a
//! [`BridgeConfig`] around their own bridges.
//!
//! The JavaScript side knows the bridge as two native modules,
//! [`FILE_SHARE_MODULE`] (`shareFile`, `saveFile`) and
//! [`FOLDER_PICKER_MODULE`] (`pickFolder`). Shells that dispatch by name can
//! hand a [`BridgeCall`] to [`FileBridgeService::invoke`].

pub mod commands;
pub mod error;

pub use commands::{BridgeCall, Rejection, SaveFileArgs, ShareFileArgs};
pub use error::{CoreError, Result};

use bridge_traits::activity::{ActivityResult, ResultCode, ResultData};
use core_documents::{FolderPicker, PendingResult, SaveOperation, ShareOperation};
use core_runtime::config::{BridgeConfig, BridgeConfigBuilder};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[cfg(feature = "desktop-shims")]
use bridge_desktop::{ChannelActivityHost, LaunchRequest};
#[cfg(feature = "desktop-shims")]
use tokio::sync::mpsc::UnboundedReceiver;

/// Module exposing `shareFile` and `saveFile`.
pub const FILE_SHARE_MODULE: &str = "FileShareModule";

/// Module exposing `pickFolder`.
pub const FOLDER_PICKER_MODULE: &str = "FolderPicker";

struct ServiceInner {
    config: BridgeConfig,
    share: ShareOperation,
    save: SaveOperation,
    picker: FolderPicker,
}

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share the folder-pick slot, so a result delivered
/// through any clone completes a pick started through another.
#[derive(Clone)]
pub struct FileBridgeService {
    inner: Arc<ServiceInner>,
}

impl FileBridgeService {
    /// Create a service from a built configuration.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        config.validate()?;

        info!(
            authority = %config.authority,
            request_code = config.folder_pick_request_code,
            "File bridge ready"
        );

        Ok(Self {
            inner: Arc::new(ServiceInner {
                share: ShareOperation::new(&config),
                save: SaveOperation::new(&config),
                picker: FolderPicker::new(&config),
                config,
            }),
        })
    }

    /// Build the configuration and create the service.
    pub fn from_builder(builder: BridgeConfigBuilder) -> Result<Self> {
        let config = builder.build().map_err(CoreError::from_config)?;
        Self::new(config)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// `FileShareModule.shareFile`
    pub async fn share_file(
        &self,
        file_path: &str,
        mime_type: Option<&str>,
        title: Option<&str>,
    ) -> Result<bool> {
        Ok(self
            .inner
            .share
            .share_file(file_path, mime_type, title)
            .await?)
    }

    /// `FileShareModule.saveFile`
    pub async fn save_file(
        &self,
        source_path: &str,
        destination_filename: &str,
        mime_type: Option<&str>,
    ) -> Result<bool> {
        Ok(self
            .inner
            .save
            .save_file(source_path, destination_filename, mime_type)
            .await?)
    }

    /// `FolderPicker.pickFolder`
    pub fn pick_folder(&self) -> PendingResult<String> {
        self.inner.picker.pick_folder()
    }

    /// Host entry point for activity results.
    ///
    /// Returns whether the result completed an outstanding folder pick.
    pub fn on_activity_result(
        &self,
        request_code: i32,
        result_code: ResultCode,
        data: Option<ResultData>,
    ) -> bool {
        self.inner
            .picker
            .on_activity_result(request_code, result_code, data)
    }

    pub fn deliver_result(&self, result: ActivityResult) -> bool {
        self.inner.picker.deliver(result)
    }

    /// Host entry point for activity teardown.
    pub fn on_host_destroy(&self) -> bool {
        self.inner.picker.on_host_destroy()
    }

    pub fn is_awaiting_folder(&self) -> bool {
        self.inner.picker.is_awaiting()
    }

    /// Run a call addressed by method name.
    ///
    /// Share and save-as resolve to `true`; a folder pick resolves to the
    /// folder URI string once the host delivers the result.
    #[instrument(skip(self, call), fields(module = call.module(), method = call.method()))]
    pub async fn invoke(&self, call: BridgeCall) -> std::result::Result<Value, Rejection> {
        debug!("Dispatching bridge call");

        let outcome = match call {
            BridgeCall::ShareFile(args) => self
                .share_file(
                    &args.file_path,
                    args.mime_type.as_deref(),
                    args.title.as_deref(),
                )
                .await
                .map(Value::Bool),
            BridgeCall::SaveFile(args) => self
                .save_file(
                    &args.source_path,
                    &args.destination_filename,
                    args.mime_type.as_deref(),
                )
                .await
                .map(Value::Bool),
            BridgeCall::PickFolder => self
                .pick_folder()
                .await
                .map(Value::String)
                .map_err(CoreError::from),
        };

        outcome.map_err(Rejection::from)
    }

    /// [`invoke`](Self::invoke) for a call still in its JSON text form.
    pub async fn invoke_json(&self, request: &str) -> std::result::Result<Value, Rejection> {
        let call = BridgeCall::from_json(request)?;
        self.invoke(call).await
    }
}

/// A service wired to the desktop adapters, plus the shell's ends of them.
#[cfg(feature = "desktop-shims")]
pub struct DesktopBridge {
    pub service: FileBridgeService,
    /// Lifecycle control for the channel-backed host
    pub host: Arc<ChannelActivityHost>,
    /// Launches the shell must present
    pub launches: UnboundedReceiver<LaunchRequest>,
}

/// Convenience bootstrapper for desktop shells and test harnesses.
///
/// Files are shared from `data_directory` (or the platform data directory
/// when `None`).
///
/// ```
/// # #[cfg(feature = "desktop-shims")]
/// # fn example() -> core_service::Result<()> {
/// use core_service::bootstrap_desktop;
///
/// let bridge = bootstrap_desktop("com.dmch.winetastingnotesapp", "en", None)?;
/// assert_eq!(
///     bridge.service.config().authority,
///     "com.dmch.winetastingnotesapp.fileprovider"
/// );
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(
    application_id: &str,
    language: &str,
    data_directory: Option<std::path::PathBuf>,
) -> Result<DesktopBridge> {
    let (host, launches) = ChannelActivityHost::new();
    let host = Arc::new(host);

    let mut builder = BridgeConfig::builder()
        .application_id(application_id)
        .language(language)
        .activity_bridge(host.clone());
    if let Some(dir) = data_directory {
        builder = builder.data_directory(dir);
    }

    let service = FileBridgeService::from_builder(builder)?;
    Ok(DesktopBridge {
        service,
        host,
        launches,
    })
}
