//! Presenter port - 判定結果の表示
//!
//! # 契約
//! - `show_progress` はポーリングごとに呼ばれる
//! - `show_success` / `show_failure` は合計で最大 1 回（両方は呼ばれない）
//! - 終端遷移の後は何も呼ばれない

/// Rendering sink the poller reports into.
///
/// Every method runs while the poller holds its state lock. Implementations
/// must not call back into the poller (`StatusPoller::status`, `start`), that
/// deadlocks. A [`PollHandle`](crate::app::PollHandle) does not take the lock
/// and is safe to read from here.
pub trait Presenter: Send + Sync {
    /// Live status text, with the raw values of the latest poll.
    fn show_progress(&self, status: &str, conclusion: Option<&str>);

    /// Final success message linking to the job.
    fn show_success(&self, job_url: &str);

    /// Final error message linking to the job.
    fn show_failure(&self, job_url: &str);
}
