//! ConsolePresenter - 端末向けの Presenter
//!
//! ステータスが変わったときだけ進捗行を出し、終端メッセージを 1 回出します。

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::ports::Presenter;

const CELEBRATION: &str = "*  .  *  .  *  .  *  .  *  .  *  .  *";

struct Inner {
    out: Box<dyn Write + Send>,
    last_progress: Option<(String, Option<String>)>,
}

const REVOKE_HINT: &str = "You can also revoke the access token now that the run is done.";

/// Writes progress and the final message to any `Write` sink.
pub struct ConsolePresenter {
    inner: Mutex<Inner>,
    revoke_hint: bool,
}

impl ConsolePresenter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                out,
                last_progress: None,
            }),
            revoke_hint: false,
        }
    }

    /// Remind the user to revoke the token once the job succeeded.
    pub fn with_revoke_hint(mut self, enabled: bool) -> Self {
        self.revoke_hint = enabled;
        self
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn write(&self, f: impl FnOnce(&mut Inner) -> io::Result<()>) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut inner);
        if let Err(err) = result.and_then(|()| inner.out.flush()) {
            tracing::warn!(error = %err, "failed to write to console");
        }
    }
}

impl Presenter for ConsolePresenter {
    fn show_progress(&self, status: &str, conclusion: Option<&str>) {
        self.write(|inner| {
            let current = (status.to_string(), conclusion.map(str::to_string));
            if inner.last_progress.as_ref() == Some(&current) {
                return Ok(());
            }
            inner.last_progress = Some(current);
            writeln!(
                inner.out,
                "status: {status}  conclusion: {}",
                conclusion.unwrap_or("-")
            )
        });
    }

    fn show_success(&self, job_url: &str) {
        self.write(|inner| {
            writeln!(inner.out, "{CELEBRATION}")?;
            writeln!(inner.out, "Congratulations, everything works!")?;
            writeln!(inner.out, "You can go to the workflow page to check the logs: {job_url}")?;
            if self.revoke_hint {
                writeln!(inner.out, "{REVOKE_HINT}")?;
            }
            writeln!(inner.out, "{CELEBRATION}")
        });
    }

    fn show_failure(&self, job_url: &str) {
        self.write(|inner| {
            writeln!(inner.out, "Oops, there was an unexpected error!")?;
            writeln!(inner.out, "Go to the workflow page to see what happened: {job_url}")
        });
    }
}
