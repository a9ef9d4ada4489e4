//! StatusRecord - 1 回のポーリングで得られるジョブ状態
//!
//! # 設計原則
//! - 受信後は不変（ポーリングごとに新しいレコード）
//! - ポーリング間で状態をマージしない（判定は StatusPoller のみが行う）

use serde::{Deserialize, Serialize};

/// One poll's response from the status endpoint.
///
/// Only `status`, `conclusion` and `job_url` are consumed; any other field in
/// the JSON payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Lifecycle phase reported by the remote system (open vocabulary).
    pub status: String,

    /// Terminal classification. `null` and a missing field both decode to `None`.
    #[serde(default)]
    pub conclusion: Option<String>,

    /// Link surfaced in both final messages.
    #[serde(default)]
    pub job_url: String,
}

impl StatusRecord {
    pub fn new(status: impl Into<String>, conclusion: Option<&str>, job_url: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            conclusion: conclusion.map(str::to_string),
            job_url: job_url.into(),
        }
    }

    /// A record for a job that is still running (no conclusion, no link yet).
    pub fn running(status: impl Into<String>) -> Self {
        Self::new(status, None, String::new())
    }

    pub fn conclusion(&self) -> Option<&str> {
        self.conclusion.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_null_conclusion() {
        let r: StatusRecord = serde_json::from_str(
            r#"{"status":"in_progress","conclusion":null,"job_url":"https://x/1"}"#,
        )
        .unwrap();
        assert_eq!(r.status, "in_progress");
        assert_eq!(r.conclusion(), None);
        assert_eq!(r.job_url, "https://x/1");
    }

    #[test]
    fn missing_fields_default_and_extra_fields_are_ignored() {
        let r: StatusRecord =
            serde_json::from_str(r#"{"status":"queued","run_attempt":2}"#).unwrap();
        assert_eq!(r, StatusRecord::running("queued"));
    }

    #[test]
    fn missing_status_is_rejected() {
        let r = serde_json::from_str::<StatusRecord>(r#"{"conclusion":"success"}"#);
        assert!(r.is_err());
    }
}
