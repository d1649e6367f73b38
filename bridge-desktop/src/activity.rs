//! Channel-backed activity host
//!
//! Desktop shells and test harnesses have no Android activity stack. This host
//! forwards every launch to an unbounded channel so the embedding shell can
//! render its own share/save/folder UI, and it reports an activity only while
//! its lifecycle state is `Foreground`. The shell delivers results back to the
//! bridge through the service's `on_activity_result`.

use bridge_traits::{
    activity::{ActivityHost, ActivityLauncher, HostActivity, Intent, LifecycleState},
    error::{BridgeError, Result},
};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// A launch forwarded to the embedding shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchRequest {
    /// Fire-and-forget launch from the application context
    Activity(Intent),
    /// Launch whose result must be reported with `request_code`
    ForResult { intent: Intent, request_code: i32 },
}

impl LaunchRequest {
    pub fn intent(&self) -> &Intent {
        match self {
            LaunchRequest::Activity(intent) => intent,
            LaunchRequest::ForResult { intent, .. } => intent,
        }
    }
}

fn forward(sender: &mpsc::UnboundedSender<LaunchRequest>, request: LaunchRequest) -> Result<()> {
    debug!(action = ?request.intent().action, "Forwarding launch request to shell");
    sender.send(request).map_err(|_| {
        BridgeError::NotAvailable("Host shell is no longer receiving launch requests".to_string())
    })
}

struct ChannelHostActivity {
    sender: mpsc::UnboundedSender<LaunchRequest>,
}

impl HostActivity for ChannelHostActivity {
    fn start_activity_for_result(&self, intent: Intent, request_code: i32) -> Result<()> {
        forward(
            &self.sender,
            LaunchRequest::ForResult {
                intent,
                request_code,
            },
        )
    }
}

/// Activity host and launcher that hands launches to a channel
pub struct ChannelActivityHost {
    sender: mpsc::UnboundedSender<LaunchRequest>,
    activity: Arc<ChannelHostActivity>,
    state: RwLock<LifecycleState>,
}

impl ChannelActivityHost {
    /// Create a host in the `Foreground` state together with the receiving end
    /// the shell drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LaunchRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let host = Self {
            activity: Arc::new(ChannelHostActivity {
                sender: sender.clone(),
            }),
            sender,
            state: RwLock::new(LifecycleState::Foreground),
        };
        (host, receiver)
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        *self.state.read()
    }

    pub fn set_lifecycle_state(&self, state: LifecycleState) {
        debug!(?state, "Host lifecycle changed");
        *self.state.write() = state;
    }
}

impl ActivityLauncher for ChannelActivityHost {
    fn start_activity(&self, intent: Intent) -> Result<()> {
        forward(&self.sender, LaunchRequest::Activity(intent))
    }
}

impl ActivityHost for ChannelActivityHost {
    fn current_activity(&self) -> Option<Arc<dyn HostActivity>> {
        match self.lifecycle_state() {
            LifecycleState::Foreground => Some(self.activity.clone() as Arc<dyn HostActivity>),
            LifecycleState::Background | LifecycleState::Destroyed => None,
        }
    }
}
