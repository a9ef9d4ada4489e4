//! RecordingPresenter - 呼び出しを記録するだけの Presenter
//!
//! テストや埋め込み先での検証用です。

use std::sync::{Mutex, PoisonError};

use crate::ports::Presenter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    Progress {
        status: String,
        conclusion: Option<String>,
    },
    Success {
        job_url: String,
    },
    Failure {
        job_url: String,
    },
}

impl PresenterCall {
    pub fn progress(status: &str, conclusion: Option<&str>) -> Self {
        PresenterCall::Progress {
            status: status.to_string(),
            conclusion: conclusion.map(str::to_string),
        }
    }

    pub fn success(job_url: &str) -> Self {
        PresenterCall::Success {
            job_url: job_url.to_string(),
        }
    }

    pub fn failure(job_url: &str) -> Self {
        PresenterCall::Failure {
            job_url: job_url.to_string(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PresenterCall::Progress { .. })
    }
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    calls: Mutex<Vec<PresenterCall>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn terminal_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.is_terminal()).count()
    }

    fn push(&self, call: PresenterCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn show_progress(&self, status: &str, conclusion: Option<&str>) {
        self.push(PresenterCall::progress(status, conclusion));
    }

    fn show_success(&self, job_url: &str) {
        self.push(PresenterCall::success(job_url));
    }

    fn show_failure(&self, job_url: &str) {
        self.push(PresenterCall::failure(job_url));
    }
}
