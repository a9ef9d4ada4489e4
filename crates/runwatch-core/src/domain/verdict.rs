//! Verdict - ステータスの終端判定
//!
//! `classify` は純粋関数です（タイマーや I/O に依存しない）。
//! DefaultDecider と同じく「観測 → 次のアクション」だけを返します。
//!
//! # 判定ルール（優先順）
//! 1. `status == "completed"` かつ `conclusion == "success"` → Success
//! 2. status が実行中の集合、または conclusion が中立の集合 → Continue
//! 3. それ以外 → Failure（未知の文字列も含む）

use serde::{Deserialize, Serialize};

use super::StatusRecord;

/// Statuses that mean "the job is still going, keep polling".
pub const RUNNING_STATUSES: [&str; 5] = ["in_progress", "queued", "requested", "waiting", "pending"];

/// Conclusions that mean "do not finalize yet", whatever the status says.
pub const NEUTRAL_CONCLUSIONS: [&str; 3] = ["action_required", "neutral", "skipped"];

const COMPLETED: &str = "completed";
const SUCCESS: &str = "success";

/// What the poller should do after observing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Not finished yet; the next scheduled query will fire.
    Continue,
    /// Finished successfully.
    Success,
    /// Finished in any other way.
    Failure,
}

impl Verdict {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Verdict::Continue)
    }
}

/// Classify a record.
///
/// The "keep polling" sets are a closed allow-list: any status/conclusion pair
/// outside them that is not exactly `completed`/`success` is a failure.
pub fn classify(record: &StatusRecord) -> Verdict {
    let conclusion = record.conclusion();

    if record.status == COMPLETED && conclusion == Some(SUCCESS) {
        return Verdict::Success;
    }

    let still_running = RUNNING_STATUSES.contains(&record.status.as_str());
    let neutral = conclusion.is_some_and(|c| NEUTRAL_CONCLUSIONS.contains(&c));
    if still_running || neutral {
        return Verdict::Continue;
    }

    Verdict::Failure
}
