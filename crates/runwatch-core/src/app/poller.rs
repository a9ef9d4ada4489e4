//! StatusPoller - ポーリングと終端検出のステートマシン
//!
//! # フロー
//! 1. start() で即時に 1 回問い合わせ、以後 interval ごとに問い合わせ
//! 2. 応答ごとに Presenter::show_progress → classify
//! 3. Success / Failure ならタイマーを止め、終端表示を 1 回だけ行う
//! 4. Continue なら何もしない（次のティックが自然に来る）
//!
//! # 並行性
//! - タイマーは壁時計ベース。前回の問い合わせを待たずに次を発行する
//! - そのため問い合わせは重なり得る。終端後に届いた応答は no-op
//! - 状態の変更と Presenter 呼び出しは同じ Mutex の下で行う

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::domain::{
    PollerError, PollerState, QueryError, StatusRecord, TerminalOutcome, Verdict, classify,
};
use crate::ports::{Presenter, StatusSource};

use super::status::PollerStatus;

struct Shared {
    source: Arc<dyn StatusSource>,
    presenter: Arc<dyn Presenter>,
    state: Mutex<PollerState>,
    done_tx: watch::Sender<Option<TerminalOutcome>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called on every tick. Returns the poll sequence number, or `None` once
    /// the poller is terminated.
    fn begin_poll(&self) -> Option<u64> {
        let mut state = self.lock();
        if state.terminated {
            return None;
        }
        state.polls_started += 1;
        Some(state.polls_started)
    }

    fn on_reply(&self, seq: u64, record: &StatusRecord) {
        let mut state = self.lock();
        if state.terminated {
            state.late_replies_ignored += 1;
            tracing::debug!(seq, status = %record.status, "reply after termination ignored");
            return;
        }
        state.polls_completed += 1;

        self.presenter.show_progress(&record.status, record.conclusion());

        let verdict = classify(record);
        tracing::debug!(
            seq,
            status = %record.status,
            conclusion = record.conclusion().unwrap_or("null"),
            ?verdict,
            "poll completed"
        );
        if !verdict.is_terminal() {
            return;
        }

        let outcome = TerminalOutcome {
            verdict,
            job_url: record.job_url.clone(),
            observed_at: Utc::now(),
        };
        if !state.terminate(outcome.clone()) {
            return;
        }

        if verdict == Verdict::Success {
            self.presenter.show_success(&record.job_url);
        } else {
            self.presenter.show_failure(&record.job_url);
        }
        tracing::info!(seq, ?verdict, job_url = %record.job_url, "job reached terminal state");

        self.done_tx.send_replace(Some(outcome));
    }

    fn on_query_error(&self, seq: u64, err: &QueryError) {
        let mut state = self.lock();
        if state.terminated {
            state.late_replies_ignored += 1;
            return;
        }
        state.query_errors += 1;
        tracing::warn!(seq, kind = ?err.kind(), error = %err, "status query failed, will retry on next tick");
    }
}

/// Polls a [`StatusSource`] until the job is finished and reports into a
/// [`Presenter`].
///
/// # 使用例
/// ```ignore
/// let poller = StatusPoller::new(source, presenter);
/// let handle = poller.start(Duration::from_secs(5))?;
/// let outcome = handle.wait().await?;
/// ```
pub struct StatusPoller {
    shared: Arc<Shared>,
}

impl StatusPoller {
    pub fn new(source: Arc<dyn StatusSource>, presenter: Arc<dyn Presenter>) -> Self {
        let (done_tx, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                source,
                presenter,
                state: Mutex::new(PollerState::default()),
                done_tx,
            }),
        }
    }

    /// Start polling: one query right away, then one per `interval`.
    ///
    /// Call-once. A second call returns [`PollerError::AlreadyStarted`] and
    /// leaves the running timer alone.
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, interval: Duration) -> Result<PollHandle, PollerError> {
        if interval.is_zero() {
            return Err(PollerError::ZeroInterval);
        }

        // Hold the lock across spawn so that no reply can be handled before
        // the timer handle is stored.
        let mut state = self.shared.lock();
        if state.started {
            return Err(PollerError::AlreadyStarted);
        }
        state.started = true;
        state.timer = Some(tokio::spawn(run_timer(Arc::clone(&self.shared), interval)));
        tracing::debug!(interval_ms = interval.as_millis() as u64, "poller started");

        Ok(self.handle())
    }

    /// A handle to await the terminal outcome. Can be taken before or after
    /// `start`.
    pub fn handle(&self) -> PollHandle {
        PollHandle {
            done_rx: self.shared.done_tx.subscribe(),
        }
    }

    pub fn status(&self) -> PollerStatus {
        PollerStatus::from(&*self.shared.lock())
    }
}

async fn run_timer(shared: Arc<Shared>, interval: Duration) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(seq) = shared.begin_poll() else {
            break;
        };
        // Each query runs on its own task: a slow reply must not hold back
        // the next tick.
        tokio::spawn(poll_once(Arc::clone(&shared), seq));
    }
}

async fn poll_once(shared: Arc<Shared>, seq: u64) {
    match shared.source.fetch().await {
        Ok(record) => shared.on_reply(seq, &record),
        Err(err) => shared.on_query_error(seq, &err),
    }
}

/// Resolves once the poller has rendered its terminal outcome.
#[derive(Clone)]
pub struct PollHandle {
    done_rx: watch::Receiver<Option<TerminalOutcome>>,
}

impl PollHandle {
    /// Wait for the terminal outcome.
    ///
    /// Returns [`PollerError::Stopped`] if the poller is dropped without ever
    /// having been started.
    pub async fn wait(mut self) -> Result<TerminalOutcome, PollerError> {
        let outcome = self
            .done_rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| PollerError::Stopped)?;
        outcome.clone().ok_or(PollerError::Stopped)
    }

    /// The terminal outcome, if already reached.
    pub fn outcome(&self) -> Option<TerminalOutcome> {
        self.done_rx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{PresenterCall, RecordingPresenter, ScriptedReply, ScriptedStatusSource};

    const INTERVAL: Duration = Duration::from_millis(5000);

    fn poller(source: &Arc<ScriptedStatusSource>, presenter: &Arc<RecordingPresenter>) -> StatusPoller {
        StatusPoller::new(source.clone(), presenter.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn first_query_is_immediate() {
        let source = Arc::new(ScriptedStatusSource::repeating(vec![ScriptedReply::record(
            StatusRecord::running("queued"),
        )]));
        let presenter = Arc::new(RecordingPresenter::new());
        let p = poller(&source, &presenter);

        p.start(INTERVAL).unwrap();
        time::sleep(Duration::from_millis(1)).await;

        assert_eq!(source.calls(), 1);
        assert_eq!(
            presenter.calls(),
            vec![PresenterCall::progress("queued", None)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_rejected() {
        let source = Arc::new(ScriptedStatusSource::repeating(vec![ScriptedReply::record(
            StatusRecord::running("in_progress"),
        )]));
        let presenter = Arc::new(RecordingPresenter::new());
        let p = poller(&source, &presenter);

        p.start(INTERVAL).unwrap();
        let again = p.start(INTERVAL);
        assert!(matches!(again, Err(PollerError::AlreadyStarted)));

        time::sleep(Duration::from_millis(5001)).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(p.status().polls_started, 2);
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let source = Arc::new(ScriptedStatusSource::new(vec![]));
        let presenter = Arc::new(RecordingPresenter::new());
        let p = poller(&source, &presenter);

        assert!(matches!(p.start(Duration::ZERO), Err(PollerError::ZeroInterval)));
        assert!(!p.status().started);
    }

    #[tokio::test]
    async fn wait_fails_when_poller_dropped_unstarted() {
        let source = Arc::new(ScriptedStatusSource::new(vec![]));
        let presenter = Arc::new(RecordingPresenter::new());
        let p = poller(&source, &presenter);
        let handle = p.handle();
        drop(p);

        assert!(matches!(handle.wait().await, Err(PollerError::Stopped)));
    }

    #[tokio::test(start_paused = true)]
    async fn no_query_after_terminal() {
        let source = Arc::new(ScriptedStatusSource::repeating(vec![ScriptedReply::record(
            StatusRecord::new("completed", Some("failure"), "https://x/2"),
        )]));
        let presenter = Arc::new(RecordingPresenter::new());
        let p = poller(&source, &presenter);

        let handle = p.start(INTERVAL).unwrap();
        let outcome = handle.clone().wait().await.unwrap();
        assert_eq!(outcome.verdict, Verdict::Failure);

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(presenter.terminal_calls(), 1);
        assert_eq!(handle.outcome().map(|o| o.job_url), Some("https://x/2".to_string()));
    }

    /// Reads the poll handle from inside the terminal callback.
    struct HandleReadingPresenter {
        handle: std::sync::OnceLock<PollHandle>,
        seen_in_callback: Mutex<Option<Option<TerminalOutcome>>>,
    }

    impl Presenter for HandleReadingPresenter {
        fn show_progress(&self, _status: &str, _conclusion: Option<&str>) {}

        fn show_success(&self, _job_url: &str) {
            let seen = self.handle.get().map(PollHandle::outcome);
            *self.seen_in_callback.lock().unwrap() = seen;
        }

        fn show_failure(&self, _job_url: &str) {}
    }

    #[tokio::test(start_paused = true)]
    async fn presenter_can_read_handle_during_callback() {
        let source = Arc::new(ScriptedStatusSource::new(vec![ScriptedReply::record(
            StatusRecord::new("completed", Some("success"), "https://x/h"),
        )]));
        let presenter = Arc::new(HandleReadingPresenter {
            handle: std::sync::OnceLock::new(),
            seen_in_callback: Mutex::new(None),
        });
        let p = StatusPoller::new(source, presenter.clone());
        let _ = presenter.handle.set(p.handle());

        let outcome = p.start(INTERVAL).unwrap().wait().await.unwrap();

        assert!(outcome.is_success());
        // the outcome is published after the presenter returns
        assert_eq!(*presenter.seen_in_callback.lock().unwrap(), Some(None));
    }
}
