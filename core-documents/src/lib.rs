//! # Document Operations
//!
//! Hands local files to other applications and asks the user for folders.
//!
//! ## Overview
//!
//! - [`ShareOperation`] - share a file through the application chooser
//! - [`SaveOperation`] - offer a copy of a file through the document-creation UI
//! - [`FolderPicker`] - launch the folder picker and correlate its result
//!
//! Share and save-as complete as soon as the platform accepts the request.
//! Folder picks complete later, when the host feeds the activity result back
//! through [`FolderPicker::on_activity_result`]; callers await the
//! [`PendingResult`] returned by [`FolderPicker::pick_folder`].
//!
//! Every failure is a [`DocumentError`] with a stable wire code.

pub mod completion;
pub mod error;
pub mod intents;
pub mod picker;
pub mod save;
pub mod share;

#[cfg(test)]
mod test_support;

pub use completion::{Completion, PendingResult};
pub use error::{DocumentError, Result};
pub use picker::FolderPicker;
pub use save::SaveOperation;
pub use share::ShareOperation;

use core_runtime::events::{CoreEvent, EventBus};

/// Publish to the bus if one is configured. Having no subscribers is fine.
pub(crate) fn emit(bus: &Option<EventBus>, event: impl Into<CoreEvent>) {
    if let Some(bus) = bus {
        let _ = bus.emit(event.into());
    }
}

/// `value` unless it is absent or blank.
pub(crate) fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => default,
    }
}
