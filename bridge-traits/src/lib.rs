//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the file bridge core and the
//! platform it runs on. Each trait represents a capability the core consumes
//! but does not own: the filesystem, the provider that turns local paths into
//! permission-scoped URIs, and the activity machinery that shows the share
//! sheet, the document-creation UI and the folder picker.
//!
//! ## Traits
//!
//! ### Files
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Existence checks and app directories
//! - [`UriProvider`](provider::UriProvider) - Mint [`ShareableHandle`](provider::ShareableHandle)s for local files
//!
//! ### Activities
//! - [`ActivityLauncher`](activity::ActivityLauncher) - Fire-and-forget launches from the app context
//! - [`ActivityHost`](activity::ActivityHost) - Access to the current [`HostActivity`](activity::HostActivity), if any
//! - [`HostActivity`](activity::HostActivity) - Launches that report back with a request code
//!
//! ### Utilities
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Channel-backed host |
//! | Android  | host shell (JNI)    | 📋 Planned |
//! | iOS      | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert platform exceptions into
//! `BridgeError::OperationFailed` with the exception's message, since that
//! message is surfaced to the caller verbatim.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single service instance can be
//! shared by the tasks that call it and the host callback that delivers
//! activity results.

pub mod activity;
pub mod error;
pub mod log;
pub mod provider;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use activity::{
    ActivityHost, ActivityLauncher, ActivityResult, HostActivity, Intent, IntentAction,
    IntentCategory, IntentFlag, LifecycleState, ResultCode, ResultData,
};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use provider::{ContentUri, ShareableHandle, UriGrant, UriProvider};
pub use storage::FileSystemAccess;
