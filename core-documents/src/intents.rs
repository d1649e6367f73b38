//! Request descriptors for the three document flows

use bridge_traits::activity::{Intent, IntentAction, IntentCategory, IntentFlag};
use bridge_traits::provider::ShareableHandle;

/// Application chooser around a `Send` of `handle`.
///
/// Both the inner request and the chooser start a new task, since they are
/// launched from the application context rather than an activity.
pub fn share_intent(handle: ShareableHandle, mime_type: &str, title: &str) -> Intent {
    let send = Intent::new(IntentAction::Send)
        .with_mime_type(mime_type)
        .with_stream(handle)
        .with_flag(IntentFlag::ActivityNewTask);

    Intent::chooser(send, title).with_flag(IntentFlag::ActivityNewTask)
}

/// Document-creation UI pre-populated with `file_name`.
pub fn save_intent(handle: ShareableHandle, mime_type: &str, file_name: &str) -> Intent {
    Intent::new(IntentAction::CreateDocument)
        .with_category(IntentCategory::Openable)
        .with_mime_type(mime_type)
        .with_title(file_name)
        .with_stream(handle)
        .with_flag(IntentFlag::ActivityNewTask)
}

/// Folder (document tree) picker.
pub fn folder_tree_intent() -> Intent {
    Intent::new(IntentAction::OpenDocumentTree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::provider::{ContentUri, UriGrant};

    fn handle(grant: UriGrant) -> ShareableHandle {
        ShareableHandle::new(
            ContentUri::parse("content://com.example.fileprovider/files/notes.json").unwrap(),
            grant,
        )
    }

    #[test]
    fn test_share_intent_shape() {
        let chooser = share_intent(handle(UriGrant::Read), "application/json", "Share file");

        assert_eq!(chooser.action, IntentAction::Chooser);
        assert_eq!(chooser.extras.title.as_deref(), Some("Share file"));
        assert!(chooser.has_flag(IntentFlag::ActivityNewTask));

        let send = chooser.extras.target.as_deref().unwrap();
        assert_eq!(send.action, IntentAction::Send);
        assert_eq!(send.mime_type.as_deref(), Some("application/json"));
        assert_eq!(send.extras.stream, Some(handle(UriGrant::Read)));
        assert!(send.has_flag(IntentFlag::GrantReadUriPermission));
        assert!(send.has_flag(IntentFlag::ActivityNewTask));
        assert!(!send.has_flag(IntentFlag::GrantWriteUriPermission));
    }

    #[test]
    fn test_save_intent_shape() {
        let intent = save_intent(handle(UriGrant::ReadWrite), "text/csv", "tasting.csv");

        assert_eq!(intent.action, IntentAction::CreateDocument);
        assert_eq!(intent.categories, vec![IntentCategory::Openable]);
        assert_eq!(intent.mime_type.as_deref(), Some("text/csv"));
        assert_eq!(intent.extras.title.as_deref(), Some("tasting.csv"));
        assert_eq!(intent.extras.stream, Some(handle(UriGrant::ReadWrite)));
        assert_eq!(intent.flag_bits(), 0x1000_0003);
    }

    #[test]
    fn test_folder_tree_intent_is_bare() {
        let intent = folder_tree_intent();
        assert_eq!(intent.action, IntentAction::OpenDocumentTree);
        assert!(intent.flags.is_empty());
        assert!(intent.extras.stream.is_none());
    }
}
