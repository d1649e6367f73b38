//! Bridge events
//!
//! Every share, save-as and folder-pick outcome is also published on an
//! [`EventBus`] (a `tokio::sync::broadcast` channel) as a [`CoreEvent`].
//! Callers still learn the result of their own request through its return
//! value or completion; the bus is for shells that drive UI or telemetry
//! from one place.
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, DocumentEvent, EventBus};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(
//!     DocumentEvent::FolderPickStarted {
//!         request_id: "7f1c".to_string(),
//!     }
//!     .into(),
//! )
//! .ok();
//!
//! assert!(matches!(rx.recv().await, Ok(CoreEvent::Documents(_))));
//! # }
//! ```
//!
//! `emit` fails only when nobody is subscribed, which emitters ignore.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Capacity used by `EventBus::default`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Share, save-as and folder-pick events
    Documents(DocumentEvent),
    /// Events about the host activity and its result delivery
    Host(HostEvent),
}

impl CoreEvent {
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Documents(e) => e.description(),
            CoreEvent::Host(e) => e.description(),
        }
    }

    /// Cancellation is routine; only failures the user did not choose warn.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Documents(DocumentEvent::OperationRejected { .. }) => {
                EventSeverity::Warning
            }
            CoreEvent::Documents(DocumentEvent::FolderPickFailed { code, .. })
                if code != "E_PICKER_CANCELLED" =>
            {
                EventSeverity::Warning
            }
            CoreEvent::Host(HostEvent::HostDestroyed { had_pending: true }) => {
                EventSeverity::Warning
            }
            CoreEvent::Documents(DocumentEvent::ShareDispatched { .. })
            | CoreEvent::Documents(DocumentEvent::SaveDispatched { .. })
            | CoreEvent::Documents(DocumentEvent::FolderPicked { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

impl From<DocumentEvent> for CoreEvent {
    fn from(event: DocumentEvent) -> Self {
        CoreEvent::Documents(event)
    }
}

impl From<HostEvent> for CoreEvent {
    fn from(event: HostEvent) -> Self {
        CoreEvent::Host(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum DocumentEvent {
    /// The share chooser was handed to the platform.
    ShareDispatched {
        /// MIME type advertised to receiving applications.
        mime_type: String,
        /// Chooser title shown to the user.
        title: String,
    },
    /// The document-creation UI was handed to the platform.
    SaveDispatched {
        /// Pre-populated destination name.
        file_name: String,
        mime_type: String,
    },
    /// A share or save-as call failed before or during dispatch.
    OperationRejected {
        /// `"shareFile"` or `"saveFile"`.
        operation: String,
        /// Failure code returned to the caller.
        code: String,
    },
    /// A folder picker request is now awaiting its result.
    FolderPickStarted { request_id: String },
    /// The folder picker returned a folder.
    FolderPicked { request_id: String, uri: String },
    /// The folder picker request was rejected.
    FolderPickFailed {
        /// `None` when the request was rejected before it was stored.
        request_id: Option<String>,
        code: String,
    },
}

impl DocumentEvent {
    fn description(&self) -> &str {
        match self {
            DocumentEvent::ShareDispatched { .. } => "Share chooser dispatched",
            DocumentEvent::SaveDispatched { .. } => "Save-as document UI dispatched",
            DocumentEvent::OperationRejected { .. } => "File operation rejected",
            DocumentEvent::FolderPickStarted { .. } => "Folder picker started",
            DocumentEvent::FolderPicked { .. } => "Folder picked",
            DocumentEvent::FolderPickFailed { .. } => "Folder pick failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum HostEvent {
    /// An activity result reached the bridge but nothing was waiting for it.
    ResultIgnored {
        request_code: i32,
        /// `"foreign_request_code"` or `"no_pending_request"`.
        reason: String,
    },
    /// The host activity was torn down.
    HostDestroyed {
        /// Whether a folder pick was still awaiting its result.
        had_pending: bool,
    },
}

impl HostEvent {
    fn description(&self) -> &str {
        match self {
            HostEvent::ResultIgnored { .. } => "Activity result ignored",
            HostEvent::HostDestroyed { .. } => "Host activity destroyed",
        }
    }
}

/// Broadcast channel shared by every emitter in the bridge.
///
/// Clones publish into the same channel. Subscribers more than `capacity`
/// events behind see `RecvError::Lagged`.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity).0,
        }
    }

    /// Number of subscribers reached, or the event back when there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Events emitted from now on; nothing is replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

type Predicate = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A subscription that skips events failing a predicate.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let documents = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Documents(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    predicate: Option<Predicate>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            predicate: None,
        }
    }

    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    fn wants(&self, event: &CoreEvent) -> bool {
        match &self.predicate {
            Some(predicate) => predicate(event),
            None => true,
        }
    }

    /// Next matching event; lag and closure surface as errors.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.wants(&event) {
                return Ok(event);
            }
        }
    }

    /// Next matching event already queued, if any.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        use broadcast::error::TryRecvError;

        loop {
            let event = match self.receiver.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Lagged(skipped)) => return Some(Err(RecvError::Lagged(skipped))),
                Err(TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            };
            if self.wants(&event) {
                return Some(Ok(event));
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("filtered", &self.predicate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked() -> CoreEvent {
        CoreEvent::Documents(DocumentEvent::FolderPicked {
            request_id: "req-1".to_string(),
            uri: "content://com.android.externalstorage.documents/tree/primary%3AWine"
                .to_string(),
        })
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        assert!(bus.emit(picked()).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        assert_eq!(bus.emit(picked()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), picked());
        assert_eq!(sub2.recv().await.unwrap(), picked());
    }

    #[tokio::test]
    async fn test_event_stream_filter_skips_other_events() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Documents(_)));

        bus.emit(CoreEvent::Host(HostEvent::ResultIgnored {
            request_code: 42,
            reason: "foreign_request_code".to_string(),
        }))
        .ok();
        bus.emit(picked()).ok();

        assert_eq!(stream.recv().await.unwrap(), picked());
        assert!(stream.try_recv().is_none());
    }

    #[test]
    fn test_cancellation_is_not_a_warning() {
        let cancelled = CoreEvent::Documents(DocumentEvent::FolderPickFailed {
            request_id: Some("req-1".to_string()),
            code: "E_PICKER_CANCELLED".to_string(),
        });
        let no_activity = CoreEvent::Documents(DocumentEvent::FolderPickFailed {
            request_id: None,
            code: "E_NO_ACTIVITY".to_string(),
        });

        assert_eq!(cancelled.severity(), EventSeverity::Debug);
        assert_eq!(no_activity.severity(), EventSeverity::Warning);
        assert_eq!(picked().severity(), EventSeverity::Info);
    }

    #[test]
    fn test_event_serialization_shape() {
        let json = serde_json::to_value(picked()).unwrap();

        assert_eq!(json["type"], "Documents");
        assert_eq!(json["payload"]["event"], "FolderPicked");
        assert_eq!(json["payload"]["request_id"], "req-1");
    }
}
