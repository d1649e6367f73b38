//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-service`). Host shells can depend on
//! `file-bridge-workspace` and enable `desktop-shims` without wiring each crate
//! individually.

#[cfg(feature = "desktop-shims")]
pub use core_service::{FileBridgeService, FILE_SHARE_MODULE, FOLDER_PICKER_MODULE};
