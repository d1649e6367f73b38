//! # Bridge Configuration Module
//!
//! Provides configuration management for the file bridge.
//!
//! ## Overview
//!
//! [`BridgeConfig`] holds every injected bridge plus the few settings the
//! operations need: the provider authority that namespaces shareable URIs, the
//! default MIME type, the share chooser title and the request code that tags
//! folder-picker results. It is built with [`BridgeConfigBuilder`], which fails
//! fast when a required capability is missing.
//!
//! ## Required Dependencies
//!
//! - `ActivityLauncher` - starts the share chooser and document UI
//! - `ActivityHost` - exposes the activity that launches the folder picker
//! - an authority, given directly or derived from the application id
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `FileSystemAccess` (desktop default: tokio fs)
//! - `UriProvider` (desktop default: content URIs under the data directory)
//!
//! Desktop defaults are injected when the `desktop-shims` feature is enabled.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//! use std::sync::Arc;
//!
//! let (host, launches) = bridge_desktop::ChannelActivityHost::new();
//! let config = BridgeConfig::builder()
//!     .application_id("com.dmch.winetastingnotesapp")
//!     .language("ru")
//!     .activity_bridge(Arc::new(host))
//!     .build()?;
//!
//! assert_eq!(config.authority, "com.dmch.winetastingnotesapp.fileprovider");
//! assert_eq!(config.share_title, "Поделиться файлом");
//! ```

use crate::error::{Error, Result};
use crate::events::EventBus;
use bridge_traits::{ActivityHost, ActivityLauncher, FileSystemAccess, UriProvider};
use std::path::PathBuf;
use std::sync::Arc;

/// MIME type used when a caller does not provide one.
pub const DEFAULT_MIME_TYPE: &str = "application/json";

/// Request code tagging folder-picker launches and their results.
pub const DEFAULT_FOLDER_PICK_REQUEST_CODE: i32 = 1001;

/// Appended to the application id to form the default provider authority.
pub const FILE_PROVIDER_SUFFIX: &str = ".fileprovider";

/// Localized default titles for the share chooser.
pub struct ShareTitle;

impl ShareTitle {
    pub const DEFAULT: &'static str = "Share file";

    /// Title for a BCP 47 language tag; unknown languages fall back to English.
    ///
    /// ```
    /// use core_runtime::config::ShareTitle;
    ///
    /// assert_eq!(ShareTitle::localized("ru-RU"), "Поделиться файлом");
    /// assert_eq!(ShareTitle::localized("de"), "Share file");
    /// ```
    pub fn localized(language: &str) -> &'static str {
        let primary = language
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "ru" => "Поделиться файлом",
            _ => Self::DEFAULT,
        }
    }
}

/// Configuration for the file bridge.
///
/// Use [`BridgeConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct BridgeConfig {
    /// Authority namespacing shareable URIs (`<application id>.fileprovider`)
    pub authority: String,

    /// MIME type for share and save-as calls that omit one
    pub default_mime_type: String,

    /// Share chooser title for calls that omit one
    pub share_title: String,

    /// Request code for folder-picker launches
    pub folder_pick_request_code: i32,

    /// Filesystem existence checks
    pub file_system: Arc<dyn FileSystemAccess>,

    /// Mints shareable handles for local files
    pub uri_provider: Arc<dyn UriProvider>,

    /// Application-context launcher (share, save-as)
    pub activity_launcher: Arc<dyn ActivityLauncher>,

    /// Current host activity accessor (folder picker)
    pub activity_host: Arc<dyn ActivityHost>,

    /// Optional bus receiving document and host events
    pub event_bus: Option<EventBus>,
}

impl std::fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("authority", &self.authority)
            .field("default_mime_type", &self.default_mime_type)
            .field("share_title", &self.share_title)
            .field("folder_pick_request_code", &self.folder_pick_request_code)
            .field("file_system", &"FileSystemAccess { ... }")
            .field("uri_provider", &"UriProvider { ... }")
            .field("activity_launcher", &"ActivityLauncher { ... }")
            .field("activity_host", &"ActivityHost { ... }")
            .field("event_bus", &self.event_bus)
            .finish()
    }
}

impl BridgeConfig {
    /// Creates a new builder for constructing a `BridgeConfig`.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Authority is non-empty and contains no whitespace or `/`
    /// - Default MIME type has the `type/subtype` form
    /// - Share title is not blank
    /// - Request code fits in the lower 16 bits the platform reserves for it
    pub fn validate(&self) -> Result<()> {
        if self.authority.is_empty() {
            return Err(Error::InvalidValue {
                field: "authority",
                message: "authority cannot be empty".to_string(),
            });
        }

        if self
            .authority
            .chars()
            .any(|c| c.is_whitespace() || c == '/')
        {
            return Err(Error::InvalidValue {
                field: "authority",
                message: format!(
                    "'{}' must not contain whitespace or '/'",
                    self.authority
                ),
            });
        }

        if !is_mime_type(&self.default_mime_type) {
            return Err(Error::InvalidValue {
                field: "default_mime_type",
                message: format!(
                    "'{}' is not of the form type/subtype",
                    self.default_mime_type
                ),
            });
        }

        if self.share_title.trim().is_empty() {
            return Err(Error::InvalidValue {
                field: "share_title",
                message: "share title cannot be blank".to_string(),
            });
        }

        if !(0..=0xFFFF).contains(&self.folder_pick_request_code) {
            return Err(Error::InvalidValue {
                field: "folder_pick_request_code",
                message: format!(
                    "{} is outside 0..=65535",
                    self.folder_pick_request_code
                ),
            });
        }

        Ok(())
    }
}

/// `type/subtype` with both halves present
pub fn is_mime_type(value: &str) -> bool {
    match value.split_once('/') {
        Some((kind, subtype)) => {
            !kind.trim().is_empty() && !subtype.trim().is_empty() && !subtype.contains('/')
        }
        None => false,
    }
}

fn launcher_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "ActivityLauncher".to_string(),
        message: "An ActivityLauncher is required to show the share chooser and the \
                 document UI. Android: wrap the application context. \
                 Desktop: use bridge_desktop::ChannelActivityHost."
            .to_string(),
    }
}

fn host_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "ActivityHost".to_string(),
        message: "An ActivityHost is required to launch the folder picker. \
                 Android: expose the current activity. \
                 Desktop: use bridge_desktop::ChannelActivityHost."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system(
    data_directory: Option<PathBuf>,
) -> Result<Arc<bridge_desktop::TokioFileSystem>> {
    use bridge_desktop::TokioFileSystem;

    let fs = match data_directory {
        Some(dir) => TokioFileSystem::with_data_directory(dir),
        None => TokioFileSystem::new(),
    };
    Ok(Arc::new(fs))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_uri_provider(data_directory: PathBuf) -> Result<Arc<dyn UriProvider>> {
    use bridge_desktop::ContentUriProvider;

    let provider: Arc<dyn UriProvider> =
        Arc::new(ContentUriProvider::for_data_directory(data_directory));
    Ok(provider)
}

/// Builder for constructing [`BridgeConfig`] instances.
#[derive(Default)]
pub struct BridgeConfigBuilder {
    application_id: Option<String>,
    authority: Option<String>,
    default_mime_type: Option<String>,
    share_title: Option<String>,
    language: Option<String>,
    folder_pick_request_code: Option<i32>,
    data_directory: Option<PathBuf>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
    uri_provider: Option<Arc<dyn UriProvider>>,
    activity_launcher: Option<Arc<dyn ActivityLauncher>>,
    activity_host: Option<Arc<dyn ActivityHost>>,
    event_bus: Option<EventBus>,
}

impl BridgeConfigBuilder {
    /// Sets the application id; the authority defaults to `<id>.fileprovider`.
    pub fn application_id(mut self, id: impl Into<String>) -> Self {
        self.application_id = Some(id.into());
        self
    }

    /// Sets the provider authority explicitly, overriding the derived one.
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Sets the MIME type used when a call omits one.
    ///
    /// Default: `application/json`
    pub fn default_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.default_mime_type = Some(mime_type.into());
        self
    }

    /// Sets the share chooser title, overriding the localized default.
    pub fn share_title(mut self, title: impl Into<String>) -> Self {
        self.share_title = Some(title.into());
        self
    }

    /// Selects the language of the default share chooser title.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the request code tagging folder-picker results.
    ///
    /// Default: 1001
    pub fn folder_pick_request_code(mut self, code: i32) -> Self {
        self.folder_pick_request_code = Some(code);
        self
    }

    /// Directory backing the desktop filesystem and URI provider defaults.
    pub fn data_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.data_directory = Some(path.into());
        self
    }

    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    pub fn uri_provider(mut self, provider: Arc<dyn UriProvider>) -> Self {
        self.uri_provider = Some(provider);
        self
    }

    pub fn activity_launcher(mut self, launcher: Arc<dyn ActivityLauncher>) -> Self {
        self.activity_launcher = Some(launcher);
        self
    }

    pub fn activity_host(mut self, host: Arc<dyn ActivityHost>) -> Self {
        self.activity_host = Some(host);
        self
    }

    /// Uses one object as both the launcher and the activity host.
    pub fn activity_bridge<T>(mut self, bridge: Arc<T>) -> Self
    where
        T: ActivityLauncher + ActivityHost + 'static,
    {
        self.activity_launcher = Some(bridge.clone());
        self.activity_host = Some(bridge);
        self
    }

    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - `Error::Config` when neither an authority nor an application id is set
    /// - `Error::CapabilityMissing` when a required bridge is absent
    /// - `Error::InvalidValue` when validation fails
    pub fn build(self) -> Result<BridgeConfig> {
        let authority = match (self.authority, self.application_id) {
            (Some(authority), _) => authority,
            (None, Some(id)) => format!("{}{}", id, FILE_PROVIDER_SUFFIX),
            (None, None) => {
                return Err(Error::Config(
                    "Either an authority or an application id must be provided".to_string(),
                ))
            }
        };

        let activity_launcher = self.activity_launcher.ok_or_else(launcher_missing_error)?;
        let activity_host = self.activity_host.ok_or_else(host_missing_error)?;

        let share_title = match (self.share_title, self.language) {
            (Some(title), _) => title,
            (None, Some(language)) => ShareTitle::localized(&language).to_string(),
            (None, None) => ShareTitle::DEFAULT.to_string(),
        };

        let (file_system, uri_provider) =
            resolve_file_bridges(self.file_system, self.uri_provider, self.data_directory)?;

        let config = BridgeConfig {
            authority,
            default_mime_type: self
                .default_mime_type
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            share_title,
            folder_pick_request_code: self
                .folder_pick_request_code
                .unwrap_or(DEFAULT_FOLDER_PICK_REQUEST_CODE),
            file_system,
            uri_provider,
            activity_launcher,
            activity_host,
            event_bus: self.event_bus,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "desktop-shims")]
fn resolve_file_bridges(
    file_system: Option<Arc<dyn FileSystemAccess>>,
    uri_provider: Option<Arc<dyn UriProvider>>,
    data_directory: Option<PathBuf>,
) -> Result<(Arc<dyn FileSystemAccess>, Arc<dyn UriProvider>)> {
    match (file_system, uri_provider) {
        (Some(fs), Some(provider)) => Ok((fs, provider)),
        (fs, provider) => {
            let default_fs = provide_default_file_system(data_directory)?;
            let provider = match provider {
                Some(provider) => provider,
                None => provide_default_uri_provider(default_fs.data_dir().to_path_buf())?,
            };
            let fs: Arc<dyn FileSystemAccess> = match fs {
                Some(fs) => fs,
                None => default_fs,
            };
            Ok((fs, provider))
        }
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn resolve_file_bridges(
    file_system: Option<Arc<dyn FileSystemAccess>>,
    uri_provider: Option<Arc<dyn UriProvider>>,
    _data_directory: Option<PathBuf>,
) -> Result<(Arc<dyn FileSystemAccess>, Arc<dyn UriProvider>)> {
    let fs = file_system.ok_or_else(|| Error::CapabilityMissing {
        capability: "FileSystemAccess".to_string(),
        message: "FileSystemAccess is required to check files before sharing. \
                 Desktop: enable the 'desktop-shims' feature. \
                 Mobile: inject the platform filesystem adapter."
            .to_string(),
    })?;
    let provider = uri_provider.ok_or_else(|| Error::CapabilityMissing {
        capability: "UriProvider".to_string(),
        message: "UriProvider is required to mint shareable handles. \
                 Desktop: enable the 'desktop-shims' feature. \
                 Android: wrap FileProvider.getUriForFile."
            .to_string(),
    })?;
    Ok((fs, provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HostActivity, Intent, ShareableHandle, UriGrant};
    use mockall::mock;
    use std::path::Path;

    mock! {
        Fs {}

        #[async_trait]
        impl FileSystemAccess for Fs {
            async fn exists(&self, path: &Path) -> BridgeResult<bool>;
        }
    }

    mock! {
        Provider {}

        impl UriProvider for Provider {
            fn grant_uri(&self, authority: &str, path: &Path, grant: UriGrant) -> BridgeResult<ShareableHandle>;
        }
    }

    struct NullActivityBridge;

    impl ActivityLauncher for NullActivityBridge {
        fn start_activity(&self, _intent: Intent) -> BridgeResult<()> {
            Ok(())
        }
    }

    impl ActivityHost for NullActivityBridge {
        fn current_activity(&self) -> Option<Arc<dyn HostActivity>> {
            None
        }
    }

    fn builder() -> BridgeConfigBuilder {
        BridgeConfig::builder()
            .file_system(Arc::new(MockFs::new()))
            .uri_provider(Arc::new(MockProvider::new()))
            .activity_bridge(Arc::new(NullActivityBridge))
    }

    #[test]
    fn test_defaults() {
        let config = builder()
            .application_id("com.dmch.winetastingnotesapp")
            .build()
            .unwrap();

        assert_eq!(config.authority, "com.dmch.winetastingnotesapp.fileprovider");
        assert_eq!(config.default_mime_type, "application/json");
        assert_eq!(config.share_title, "Share file");
        assert_eq!(config.folder_pick_request_code, 1001);
        assert!(config.event_bus.is_none());
    }

    #[test]
    fn test_explicit_authority_wins() {
        let config = builder()
            .application_id("com.example.app")
            .authority("com.example.shared")
            .build()
            .unwrap();

        assert_eq!(config.authority, "com.example.shared");
    }

    #[test]
    fn test_localized_title_and_override() {
        let localized = builder().authority("a.b").language("ru").build().unwrap();
        assert_eq!(localized.share_title, "Поделиться файлом");

        let explicit = builder()
            .authority("a.b")
            .language("ru")
            .share_title("Export notes")
            .build()
            .unwrap();
        assert_eq!(explicit.share_title, "Export notes");
    }

    #[test]
    fn test_missing_authority() {
        let err = builder().build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_activity_bridges() {
        let err = BridgeConfig::builder()
            .authority("a.b")
            .file_system(Arc::new(MockFs::new()))
            .uri_provider(Arc::new(MockProvider::new()))
            .build()
            .unwrap_err();

        match err {
            Error::CapabilityMissing { capability, .. } => {
                assert_eq!(capability, "ActivityLauncher")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = BridgeConfig::builder()
            .authority("a.b")
            .file_system(Arc::new(MockFs::new()))
            .uri_provider(Arc::new(MockProvider::new()))
            .activity_launcher(Arc::new(NullActivityBridge))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::CapabilityMissing { ref capability, .. } if capability == "ActivityHost"
        ));
    }

    #[test]
    fn test_validation_failures() {
        let cases = [
            builder().authority("with space").build(),
            builder().authority("a/b").build(),
            builder().authority("a.b").default_mime_type("json").build(),
            builder().authority("a.b").default_mime_type("application/").build(),
            builder().authority("a.b").share_title("   ").build(),
            builder().authority("a.b").folder_pick_request_code(0x1_0000).build(),
            builder().authority("a.b").folder_pick_request_code(-1).build(),
        ];

        for result in cases {
            assert!(matches!(result, Err(Error::InvalidValue { .. })));
        }
    }

    #[test]
    fn test_is_mime_type() {
        assert!(is_mime_type("application/json"));
        assert!(is_mime_type("text/plain"));
        assert!(!is_mime_type("application"));
        assert!(!is_mime_type("/json"));
        assert!(!is_mime_type("a/b/c"));
    }

    #[test]
    fn test_share_title_localization() {
        assert_eq!(ShareTitle::localized("ru"), "Поделиться файлом");
        assert_eq!(ShareTitle::localized("RU_ru"), "Поделиться файлом");
        assert_eq!(ShareTitle::localized("en-US"), "Share file");
        assert_eq!(ShareTitle::localized(""), "Share file");
    }
}
