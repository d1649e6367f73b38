//! # Folder Picker
//!
//! Launches the platform's folder (document tree) picker and correlates the
//! asynchronous result back to the caller that asked for it.
//!
//! ## State machine
//!
//! ```text
//!            pick_folder (activity present, slot empty)
//!   Idle ─────────────────────────────────────────────▶ Awaiting
//!    ▲                                                     │
//!    └──── matching result / dispatch failure / destroy ───┘
//! ```
//!
//! At most one request is outstanding. A second `pick_folder` while one is
//! awaiting is rejected with `E_PICKER_BUSY` and leaves the first untouched.
//! Results carrying another request code, and results arriving when nothing
//! is awaiting, are ignored.
//!
//! The slot lock is never held while calling into the platform: a host may
//! deliver the result from inside `start_activity_for_result`.

use crate::completion::{completion, Completion, PendingResult};
use crate::emit;
use crate::error::DocumentError;
use crate::intents;
use bridge_traits::activity::{ActivityHost, ActivityResult, ResultCode, ResultData};
use chrono::{DateTime, Utc};
use core_runtime::config::BridgeConfig;
use core_runtime::events::{DocumentEvent, EventBus, HostEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// An outstanding folder pick.
#[derive(Debug)]
struct PendingPick {
    request_id: String,
    completion: Completion<String>,
    started_at: DateTime<Utc>,
}

#[derive(Debug)]
enum PickerState {
    Idle,
    Awaiting(PendingPick),
}

/// Pending-request correlator for the folder picker.
pub struct FolderPicker {
    host: Arc<dyn ActivityHost>,
    request_code: i32,
    state: Mutex<PickerState>,
    event_bus: Option<EventBus>,
}

impl FolderPicker {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            host: config.activity_host.clone(),
            request_code: config.folder_pick_request_code,
            state: Mutex::new(PickerState::Idle),
            event_bus: config.event_bus.clone(),
        }
    }

    /// Request code the picker is launched with.
    pub fn request_code(&self) -> i32 {
        self.request_code
    }

    /// Whether a pick is waiting for its result.
    pub fn is_awaiting(&self) -> bool {
        matches!(*self.state.lock(), PickerState::Awaiting(_))
    }

    /// Ask the user to choose a folder.
    ///
    /// The returned future resolves with the folder URI exactly as the
    /// platform delivered it. Precondition failures (`E_NO_ACTIVITY`,
    /// `E_PICKER_BUSY`, `E_FAILED_TO_SHOW_PICKER`) are settled before this
    /// method returns.
    #[instrument(skip(self), fields(request_code = self.request_code))]
    pub fn pick_folder(&self) -> PendingResult<String> {
        let Some(activity) = self.host.current_activity() else {
            warn!("No host activity to launch the folder picker from");
            return self.reject_unstored(DocumentError::NoActivity);
        };

        let (completion, pending) = completion();
        let request_id = Uuid::new_v4().to_string();

        {
            let mut state = self.state.lock();
            let in_progress = match &*state {
                PickerState::Awaiting(current) => Some(current.request_id.clone()),
                PickerState::Idle => None,
            };
            if let Some(pending_request) = in_progress {
                drop(state);
                warn!(%pending_request, "Folder pick already in progress");
                return self.reject_unstored(DocumentError::PickerBusy);
            }
            *state = PickerState::Awaiting(PendingPick {
                request_id: request_id.clone(),
                completion,
                started_at: Utc::now(),
            });
        }

        debug!(%request_id, "Launching folder picker");
        emit(
            &self.event_bus,
            DocumentEvent::FolderPickStarted {
                request_id: request_id.clone(),
            },
        );

        if let Err(err) = activity
            .start_activity_for_result(intents::folder_tree_intent(), self.request_code)
        {
            let error = DocumentError::show_picker(err);
            match self.take_pending(|pick| pick.request_id == request_id) {
                Some(pick) => self.fail(pick, error),
                None => debug!(
                    error = %error,
                    "Picker launch failed after its result was already delivered"
                ),
            }
        }

        pending
    }

    /// Feed an activity result from the host.
    ///
    /// Returns whether the result completed the outstanding pick.
    #[instrument(skip(self, data))]
    pub fn on_activity_result(
        &self,
        request_code: i32,
        result_code: ResultCode,
        data: Option<ResultData>,
    ) -> bool {
        if request_code != self.request_code {
            debug!("Result belongs to another request");
            self.ignore(request_code, "foreign_request_code");
            return false;
        }

        let Some(pick) = self.take_pending(|_| true) else {
            debug!("No folder pick is awaiting a result");
            self.ignore(request_code, "no_pending_request");
            return false;
        };

        let outcome = match result_code {
            ResultCode::Ok => data
                .and_then(|data| data.uri)
                .ok_or(DocumentError::PickerNoData),
            ResultCode::Canceled | ResultCode::Other(_) => Err(DocumentError::PickerCancelled),
        };

        match outcome {
            Ok(uri) => self.succeed(pick, uri),
            Err(error) => self.fail(pick, error),
        }
        true
    }

    /// [`on_activity_result`](Self::on_activity_result) for a whole result.
    pub fn deliver(&self, result: ActivityResult) -> bool {
        self.on_activity_result(result.request_code, result.result_code, result.data)
    }

    /// The host activity is going away; settle any outstanding pick.
    ///
    /// Returns whether a pick was outstanding.
    pub fn on_host_destroy(&self) -> bool {
        let pending = self.take_pending(|_| true);
        let had_pending = pending.is_some();

        if let Some(pick) = pending {
            warn!(request_id = %pick.request_id, "Host destroyed while folder pick was awaiting");
            self.fail(pick, DocumentError::ActivityDestroyed);
        }

        emit(&self.event_bus, HostEvent::HostDestroyed { had_pending });
        had_pending
    }

    /// The only way back to `Idle`.
    fn take_pending<F>(&self, accept: F) -> Option<PendingPick>
    where
        F: FnOnce(&PendingPick) -> bool,
    {
        let mut state = self.state.lock();
        let accepted = match &*state {
            PickerState::Awaiting(pick) => accept(pick),
            PickerState::Idle => false,
        };
        if !accepted {
            return None;
        }

        match std::mem::replace(&mut *state, PickerState::Idle) {
            PickerState::Awaiting(pick) => Some(pick),
            PickerState::Idle => None,
        }
    }

    fn succeed(&self, pick: PendingPick, uri: String) {
        info!(
            request_id = %pick.request_id,
            elapsed_ms = elapsed_ms(pick.started_at),
            "Folder picked"
        );
        emit(
            &self.event_bus,
            DocumentEvent::FolderPicked {
                request_id: pick.request_id,
                uri: uri.clone(),
            },
        );
        if !pick.completion.resolve(uri) {
            debug!("Caller stopped waiting for the folder");
        }
    }

    fn fail(&self, pick: PendingPick, error: DocumentError) {
        info!(
            request_id = %pick.request_id,
            code = error.code(),
            elapsed_ms = elapsed_ms(pick.started_at),
            "Folder pick failed"
        );
        emit(
            &self.event_bus,
            DocumentEvent::FolderPickFailed {
                request_id: Some(pick.request_id),
                code: error.code().to_string(),
            },
        );
        if !pick.completion.reject(error) {
            debug!("Caller stopped waiting for the folder");
        }
    }

    fn reject_unstored(&self, error: DocumentError) -> PendingResult<String> {
        emit(
            &self.event_bus,
            DocumentEvent::FolderPickFailed {
                request_id: None,
                code: error.code().to_string(),
            },
        );
        PendingResult::rejected(error)
    }

    fn ignore(&self, request_code: i32, reason: &str) {
        emit(
            &self.event_bus,
            HostEvent::ResultIgnored {
                request_code,
                reason: reason.to_string(),
            },
        );
    }
}

fn elapsed_ms(started_at: DateTime<Utc>) -> i64 {
    (Utc::now() - started_at).num_milliseconds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config_with_host, MockActivity, MockHost};
    use bridge_traits::activity::{HostActivity, IntentAction};
    use bridge_traits::error::BridgeError;

    const TREE: &str = "content://com.android.externalstorage.documents/tree/primary%3AWine";

    fn host_with(activity: MockActivity) -> MockHost {
        let activity: Arc<dyn HostActivity> = Arc::new(activity);
        let mut host = MockHost::new();
        host.expect_current_activity()
            .returning(move || Some(activity.clone()));
        host
    }

    fn accepting_activity() -> MockActivity {
        let mut activity = MockActivity::new();
        activity
            .expect_start_activity_for_result()
            .withf(|intent, code| intent.action == IntentAction::OpenDocumentTree && *code == 1001)
            .returning(|_, _| Ok(()));
        activity
    }

    #[tokio::test]
    async fn test_no_activity() {
        let mut host = MockHost::new();
        host.expect_current_activity().returning(|| None);
        let picker = FolderPicker::new(&config_with_host(host));

        let mut pending = picker.pick_folder();

        assert_eq!(pending.try_result(), Some(Err(DocumentError::NoActivity)));
        assert!(!picker.is_awaiting());
    }

    #[tokio::test]
    async fn test_result_resolves_exact_uri() {
        let picker = FolderPicker::new(&config_with_host(host_with(accepting_activity())));

        let pending = picker.pick_folder();
        assert!(picker.is_awaiting());

        assert!(picker.on_activity_result(1001, ResultCode::Ok, Some(ResultData::with_uri(TREE))));
        assert!(!picker.is_awaiting());
        assert_eq!(pending.await.unwrap(), TREE);
    }

    #[tokio::test]
    async fn test_cancel_and_other_codes() {
        let picker = FolderPicker::new(&config_with_host(host_with(accepting_activity())));

        let pending = picker.pick_folder();
        picker.on_activity_result(1001, ResultCode::Canceled, None);
        assert_eq!(pending.await.unwrap_err(), DocumentError::PickerCancelled);

        let pending = picker.pick_folder();
        picker.on_activity_result(1001, ResultCode::Other(2), Some(ResultData::with_uri(TREE)));
        assert_eq!(pending.await.unwrap_err(), DocumentError::PickerCancelled);
        assert!(!picker.is_awaiting());
    }

    #[tokio::test]
    async fn test_ok_without_data() {
        let picker = FolderPicker::new(&config_with_host(host_with(accepting_activity())));

        let pending = picker.pick_folder();
        picker.on_activity_result(1001, ResultCode::Ok, None);
        assert_eq!(pending.await.unwrap_err(), DocumentError::PickerNoData);

        let pending = picker.pick_folder();
        picker.on_activity_result(1001, ResultCode::Ok, Some(ResultData::default()));
        assert_eq!(pending.await.unwrap_err(), DocumentError::PickerNoData);
    }

    #[tokio::test]
    async fn test_foreign_code_is_ignored() {
        let picker = FolderPicker::new(&config_with_host(host_with(accepting_activity())));

        let mut pending = picker.pick_folder();

        assert!(!picker.on_activity_result(42, ResultCode::Ok, Some(ResultData::with_uri(TREE))));
        assert!(picker.is_awaiting());
        assert!(pending.try_result().is_none());
    }

    #[test]
    fn test_result_without_pending_is_ignored() {
        let picker = FolderPicker::new(&config_with_host(host_with(accepting_activity())));
        assert!(!picker.on_activity_result(1001, ResultCode::Canceled, None));
        assert!(!picker.is_awaiting());
    }

    #[tokio::test]
    async fn test_dispatch_failure() {
        let mut activity = MockActivity::new();
        activity.expect_start_activity_for_result().returning(|_, _| {
            Err(BridgeError::OperationFailed(
                "No Activity found to handle Intent { act=android.intent.action.OPEN_DOCUMENT_TREE }"
                    .to_string(),
            ))
        });
        let picker = FolderPicker::new(&config_with_host(host_with(activity)));

        let mut pending = picker.pick_folder();

        assert!(!picker.is_awaiting());
        match pending.try_result() {
            Some(Err(DocumentError::FailedToShowPicker(message))) => {
                assert!(message.starts_with("No Activity found"))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_host_destroy() {
        let picker = FolderPicker::new(&config_with_host(host_with(accepting_activity())));

        let pending = picker.pick_folder();
        assert!(picker.on_host_destroy());
        assert!(!picker.is_awaiting());
        assert_eq!(pending.await.unwrap_err(), DocumentError::ActivityDestroyed);

        assert!(!picker.on_host_destroy());
    }

    #[tokio::test]
    async fn test_dropping_picker_settles_waiter() {
        let picker = FolderPicker::new(&config_with_host(host_with(accepting_activity())));

        let pending = picker.pick_folder();
        drop(picker);

        assert_eq!(pending.await.unwrap_err(), DocumentError::ActivityDestroyed);
    }

    #[tokio::test]
    async fn test_deliver_whole_result() {
        let picker = FolderPicker::new(&config_with_host(host_with(accepting_activity())));

        let pending = picker.pick_folder();
        let consumed = picker.deliver(ActivityResult {
            request_code: picker.request_code(),
            result_code: ResultCode::Ok,
            data: Some(ResultData::with_uri(TREE)),
        });

        assert!(consumed);
        assert_eq!(pending.await.unwrap(), TREE);
    }
}
