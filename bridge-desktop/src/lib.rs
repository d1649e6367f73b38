//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux) and for headless test harnesses.
//!
//! ## Overview
//!
//! - `FileSystemAccess` using `tokio::fs`
//! - `UriProvider` synthesizing `content://<authority>/<root>/...` URIs for
//!   files under configured roots
//! - `ActivityLauncher` + `ActivityHost` forwarding every launch to a channel
//!   drained by the embedding shell
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ChannelActivityHost, ContentUriProvider, TokioFileSystem};
//!
//! #[tokio::main]
//! async fn main() {
//!     let fs = TokioFileSystem::new();
//!     let provider = ContentUriProvider::for_data_directory("/path/to/data");
//!     let (host, mut launches) = ChannelActivityHost::new();
//!
//!     // Use in bridge configuration, then drain `launches` in the shell
//! }
//! ```

mod activity;
mod filesystem;
mod uri_provider;

pub use activity::{ChannelActivityHost, LaunchRequest};
pub use filesystem::TokioFileSystem;
pub use uri_provider::{ContentUriProvider, ProviderRoot};
