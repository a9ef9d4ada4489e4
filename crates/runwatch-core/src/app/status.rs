//! Status - ポーラーの観測用スナップショット

use serde::{Deserialize, Serialize};

use crate::domain::{PollerState, TerminalOutcome};

/// Point-in-time view of a poller.
///
/// # 使用例
/// ```ignore
/// let status = poller.status();
/// tracing::info!(?status);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerStatus {
    pub started: bool,
    pub terminated: bool,
    pub polls_started: u64,
    pub polls_completed: u64,
    pub query_errors: u64,
    pub late_replies_ignored: u64,
    pub outcome: Option<TerminalOutcome>,
}

impl From<&PollerState> for PollerStatus {
    fn from(state: &PollerState) -> Self {
        Self {
            started: state.started,
            terminated: state.terminated,
            polls_started: state.polls_started,
            polls_completed: state.polls_completed,
            query_errors: state.query_errors,
            late_replies_ignored: state.late_replies_ignored,
            outcome: state.outcome.clone(),
        }
    }
}
