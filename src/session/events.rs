//! Events broadcast by `SessionController`.

use super::SessionSnapshot;
use crate::network::NetworkCheck;
use crate::poller::PollOutcome;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// State changed, either through a setter or a poll write.
    Updated(SessionSnapshot),
    PollFinished(PollOutcome),
    NetworkChecked(NetworkCheck),
    /// The wallet could not be moved to the expected chain.
    NetworkError { message: String },
    /// Derived state was cleared after a chain switch or an explicit `reset()`.
    Reset,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Updated(_) => "updated",
            SessionEvent::PollFinished(_) => "poll_finished",
            SessionEvent::NetworkChecked(_) => "network_checked",
            SessionEvent::NetworkError { .. } => "network_error",
            SessionEvent::Reset => "reset",
        }
    }
}
