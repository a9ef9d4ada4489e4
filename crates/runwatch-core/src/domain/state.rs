//! State - ポーラーの状態
//!
//! # 所有権
//! - `timer` は StatusPoller だけが保持する（start で作成、終端遷移で 1 回だけ解放）
//! - `terminated` は一度 true になったら戻らない
//!
//! マルチスレッドの tokio ランタイム上で動くため、PollerState は Mutex の内側に置きます。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::Verdict;

/// The single terminal result of a poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalOutcome {
    /// Always `Success` or `Failure`.
    pub verdict: Verdict,
    pub job_url: String,
    pub observed_at: DateTime<Utc>,
}

impl TerminalOutcome {
    pub fn is_success(&self) -> bool {
        self.verdict == Verdict::Success
    }
}

/// Mutable state of one poller.
#[derive(Debug, Default)]
pub struct PollerState {
    pub timer: Option<JoinHandle<()>>,
    pub started: bool,
    pub terminated: bool,
    pub outcome: Option<TerminalOutcome>,

    pub polls_started: u64,
    pub polls_completed: u64,
    pub query_errors: u64,
    /// Replies that arrived after the terminal transition.
    pub late_replies_ignored: u64,
}

impl PollerState {
    /// Mark the poller terminated and release the timer.
    ///
    /// Returns `false` if it was already terminated; the caller must not render
    /// anything in that case.
    pub fn terminate(&mut self, outcome: TerminalOutcome) -> bool {
        if self.terminated {
            return false;
        }
        self.terminated = true;
        self.outcome = Some(outcome);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        true
    }
}
