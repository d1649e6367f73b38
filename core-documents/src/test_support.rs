//! Mocks shared by the unit tests

use async_trait::async_trait;
use bridge_traits::activity::{ActivityHost, ActivityLauncher, HostActivity, Intent};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::provider::{ContentUri, ShareableHandle, UriGrant, UriProvider};
use bridge_traits::storage::FileSystemAccess;
use core_runtime::config::BridgeConfig;
use mockall::mock;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

mock! {
    pub Fs {}

    #[async_trait]
    impl FileSystemAccess for Fs {
        async fn exists(&self, path: &Path) -> BridgeResult<bool>;
    }
}

mock! {
    pub Provider {}

    impl UriProvider for Provider {
        fn grant_uri(&self, authority: &str, path: &Path, grant: UriGrant) -> BridgeResult<ShareableHandle>;
    }
}

mock! {
    pub Launcher {}

    impl ActivityLauncher for Launcher {
        fn start_activity(&self, intent: Intent) -> BridgeResult<()>;
    }
}

mock! {
    pub Host {}

    impl ActivityHost for Host {
        fn current_activity(&self) -> Option<Arc<dyn HostActivity>>;
    }
}

mock! {
    pub Activity {}

    impl HostActivity for Activity {
        fn start_activity_for_result(&self, intent: Intent, request_code: i32) -> BridgeResult<()>;
    }
}

pub fn handle(grant: UriGrant) -> ShareableHandle {
    ShareableHandle::new(
        ContentUri::parse("content://com.dmch.winetastingnotesapp.fileprovider/files/notes.json")
            .unwrap(),
        grant,
    )
}

fn builder() -> core_runtime::config::BridgeConfigBuilder {
    BridgeConfig::builder().application_id("com.dmch.winetastingnotesapp")
}

/// Configuration for the share and save-as tests; no host activity.
pub fn config(fs: MockFs, provider: MockProvider, launcher: MockLauncher) -> BridgeConfig {
    let mut host = MockHost::new();
    host.expect_current_activity().returning(|| None);

    builder()
        .file_system(Arc::new(fs))
        .uri_provider(Arc::new(provider))
        .activity_launcher(Arc::new(launcher))
        .activity_host(Arc::new(host))
        .build()
        .unwrap()
}

/// Configuration for the folder picker tests.
pub fn config_with_host(host: MockHost) -> BridgeConfig {
    builder()
        .file_system(Arc::new(MockFs::new()))
        .uri_provider(Arc::new(MockProvider::new()))
        .activity_launcher(Arc::new(MockLauncher::new()))
        .activity_host(Arc::new(host))
        .build()
        .unwrap()
}

/// Formatted log output collected in memory.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

pub fn capture_logs() -> LogCapture {
    LogCapture::default()
}

impl LogCapture {
    pub fn dispatch(&self) -> tracing::Dispatch {
        tracing::Dispatch::new(
            tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .finish(),
        )
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
