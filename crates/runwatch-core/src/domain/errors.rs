//! Errors - エラー型と分類
//!
//! # 分類
//! - QueryError: StatusSource の失敗（ネットワーク・HTTP・JSON）。常に Transient
//! - PollerError: StatusPoller の誤用・停止
//!
//! ジョブ自体の失敗（Verdict::Failure）はエラーではなく、判定結果として扱います。

use thiserror::Error;

/// ErrorKind は実行エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 一時的なエラー（次のポーリングで回復する可能性がある）
    Transient,
    /// 呼び出し側の誤用
    Misuse,
}

/// A failed status query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("malformed status payload: {0}")]
    Decode(String),

    #[error("no more scripted replies")]
    Exhausted,
}

impl QueryError {
    /// Every query failure is retried by the next scheduled poll.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Transient
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Decode(err.to_string())
    }
}

/// Errors returned by the poller itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollerError {
    #[error("poller already started")]
    AlreadyStarted,

    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("poller stopped before reaching a terminal state")]
    Stopped,
}

impl PollerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PollerError::AlreadyStarted | PollerError::ZeroInterval => ErrorKind::Misuse,
            PollerError::Stopped => ErrorKind::Transient,
        }
    }
}
