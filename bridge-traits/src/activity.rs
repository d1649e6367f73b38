//! Activity and Intent Abstractions
//!
//! Describes requests for external UI (share sheet, document creation, folder
//! picker) and the host capabilities that launch them.
//!
//! Two launch paths exist:
//! - [`ActivityLauncher`] starts a request from the application context. The
//!   caller never hears back; the platform UI talks to the user directly.
//! - [`HostActivity`] starts a request *for a result*. The platform later
//!   reports an [`ActivityResult`] tagged with the same request code, which
//!   the host forwards to whoever issued the request.
//!
//! The host activity may be absent (app backgrounded or torn down), which is
//! why it is reached through [`ActivityHost::current_activity`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::Result;
use crate::provider::ShareableHandle;

/// What an intent asks the platform to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntentAction {
    /// Hand content to another application
    Send,
    /// Let the user choose where a new document is created
    CreateDocument,
    /// Let the user choose a directory tree
    OpenDocumentTree,
    /// Present an application chooser for a wrapped target intent
    Chooser,
}

impl IntentAction {
    /// Android action string
    pub fn platform_name(&self) -> &'static str {
        match self {
            IntentAction::Send => "android.intent.action.SEND",
            IntentAction::CreateDocument => "android.intent.action.CREATE_DOCUMENT",
            IntentAction::OpenDocumentTree => "android.intent.action.OPEN_DOCUMENT_TREE",
            IntentAction::Chooser => "android.intent.action.CHOOSER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntentCategory {
    /// Only content that can be opened as a stream
    Openable,
}

impl IntentCategory {
    pub fn platform_name(&self) -> &'static str {
        match self {
            IntentCategory::Openable => "android.intent.category.OPENABLE",
        }
    }
}

/// Launch and permission flags carried by an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntentFlag {
    GrantReadUriPermission,
    GrantWriteUriPermission,
    /// Required when launching from a non-activity context
    ActivityNewTask,
}

impl IntentFlag {
    /// Android `Intent.FLAG_*` bit
    pub fn bits(&self) -> u32 {
        match self {
            IntentFlag::GrantReadUriPermission => 0x0000_0001,
            IntentFlag::GrantWriteUriPermission => 0x0000_0002,
            IntentFlag::ActivityNewTask => 0x1000_0000,
        }
    }
}

/// Optional payload attached to an intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentExtras {
    /// `EXTRA_STREAM`
    pub stream: Option<ShareableHandle>,
    /// `EXTRA_TITLE` for documents, chooser title for choosers
    pub title: Option<String>,
    /// `EXTRA_INTENT`: the request a chooser wraps
    pub target: Option<Box<Intent>>,
}

/// Request descriptor handed to the platform.
///
/// # Example
///
/// ```
/// use bridge_traits::activity::{Intent, IntentAction, IntentFlag};
///
/// let intent = Intent::new(IntentAction::Send)
///     .with_mime_type("application/json")
///     .with_flag(IntentFlag::ActivityNewTask);
///
/// assert!(intent.has_flag(IntentFlag::ActivityNewTask));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub action: IntentAction,
    pub mime_type: Option<String>,
    pub categories: Vec<IntentCategory>,
    pub extras: IntentExtras,
    pub flags: BTreeSet<IntentFlag>,
}

impl Intent {
    pub fn new(action: IntentAction) -> Self {
        Self {
            action,
            mime_type: None,
            categories: Vec::new(),
            extras: IntentExtras::default(),
            flags: BTreeSet::new(),
        }
    }

    /// Wrap `target` in an application chooser titled `title`.
    pub fn chooser(target: Intent, title: impl Into<String>) -> Self {
        let mut chooser = Self::new(IntentAction::Chooser);
        chooser.extras.title = Some(title.into());
        chooser.extras.target = Some(Box::new(target));
        chooser
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_category(mut self, category: IntentCategory) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    /// Attach a handle as the stream payload.
    ///
    /// The handle's grant flags are added along with it; a handle never
    /// travels without its permissions.
    pub fn with_stream(mut self, handle: ShareableHandle) -> Self {
        self.flags.extend(handle.grant.intent_flags().iter().copied());
        self.extras.stream = Some(handle);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.extras.title = Some(title.into());
        self
    }

    pub fn with_flag(mut self, flag: IntentFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn has_flag(&self, flag: IntentFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Combined `Intent.setFlags` value
    pub fn flag_bits(&self) -> u32 {
        self.flags.iter().fold(0, |bits, flag| bits | flag.bits())
    }
}

/// Outcome code reported with an activity result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ResultCode {
    /// `RESULT_OK`
    Ok,
    /// `RESULT_CANCELED`
    Canceled,
    /// Any application-defined code
    Other(i32),
}

impl ResultCode {
    pub const RAW_OK: i32 = -1;
    pub const RAW_CANCELED: i32 = 0;

    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::RAW_OK => ResultCode::Ok,
            Self::RAW_CANCELED => ResultCode::Canceled,
            other => ResultCode::Other(other),
        }
    }

    pub fn raw(&self) -> i32 {
        match self {
            ResultCode::Ok => Self::RAW_OK,
            ResultCode::Canceled => Self::RAW_CANCELED,
            ResultCode::Other(raw) => *raw,
        }
    }
}

impl From<i32> for ResultCode {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}

impl From<ResultCode> for i32 {
    fn from(code: ResultCode) -> Self {
        code.raw()
    }
}

/// Payload returned with an activity result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultData {
    /// `Intent.getData()` as a string, exactly as the platform produced it
    pub uri: Option<String>,
}

impl ResultData {
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
        }
    }
}

/// A result delivered by the platform for a request launched for a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResult {
    pub request_code: i32,
    pub result_code: ResultCode,
    pub data: Option<ResultData>,
}

/// Lifecycle state of the host activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Activity is in the foreground and can present UI
    Foreground,
    /// Activity exists but is in the background
    Background,
    /// Activity has been destroyed
    Destroyed,
}

/// Starts external UI from the application context.
///
/// Completion only means the platform accepted the request.
pub trait ActivityLauncher: Send + Sync {
    fn start_activity(&self, intent: Intent) -> Result<()>;
}

/// The activity currently hosting the application UI.
pub trait HostActivity: Send + Sync {
    /// Launch `intent` and ask the platform to report back with `request_code`.
    ///
    /// The result arrives later, on the host's own dispatch path, or never if
    /// the activity is destroyed first. Implementations may deliver it before
    /// this call returns.
    fn start_activity_for_result(&self, intent: Intent, request_code: i32) -> Result<()>;
}

/// Accessor for the current host activity.
pub trait ActivityHost: Send + Sync {
    /// `None` while the application is backgrounded or torn down.
    fn current_activity(&self) -> Option<Arc<dyn HostActivity>>;
}
