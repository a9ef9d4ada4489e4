//! ScriptedStatusSource - 台本どおりに応答する StatusSource
//!
//! # 学習ポイント
//! - 応答ごとに遅延を指定できる（tokio::time::sleep）
//! - `start_paused` のテストでは仮想時間で進むので、遅い応答の競合を再現できる

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{QueryError, StatusRecord};
use crate::ports::StatusSource;

/// One scripted answer.
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    pub delay: Duration,
    pub result: Result<StatusRecord, QueryError>,
}

impl ScriptedReply {
    pub fn record(record: StatusRecord) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(record),
        }
    }

    pub fn error(err: QueryError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(err),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Replays replies in order, one per `fetch`.
///
/// Once the script runs out it either repeats the last reply (`repeating`) or
/// fails with [`QueryError::Exhausted`] (`new`).
#[derive(Debug)]
pub struct ScriptedStatusSource {
    replies: Mutex<VecDeque<ScriptedReply>>,
    repeat_last: bool,
    calls: AtomicUsize,
}

impl ScriptedStatusSource {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            repeat_last: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn repeating(replies: Vec<ScriptedReply>) -> Self {
        Self {
            repeat_last: true,
            ..Self::new(replies)
        }
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> Option<ScriptedReply> {
        let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        if self.repeat_last && replies.len() == 1 {
            return replies.front().cloned();
        }
        replies.pop_front()
    }
}

#[async_trait]
impl StatusSource for ScriptedStatusSource {
    async fn fetch(&self) -> Result<StatusRecord, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(reply) = self.next_reply() else {
            return Err(QueryError::Exhausted);
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_exhausts() {
        let source = ScriptedStatusSource::new(vec![
            ScriptedReply::record(StatusRecord::running("queued")),
            ScriptedReply::error(QueryError::HttpStatus(502)),
        ]);

        assert_eq!(source.fetch().await.unwrap().status, "queued");
        assert_eq!(source.fetch().await, Err(QueryError::HttpStatus(502)));
        assert_eq!(source.fetch().await, Err(QueryError::Exhausted));
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn repeating_keeps_last_reply() {
        let source = ScriptedStatusSource::repeating(vec![
            ScriptedReply::error(QueryError::Network("reset".into())),
            ScriptedReply::record(StatusRecord::running("in_progress")),
        ]);

        assert!(source.fetch().await.is_err());
        for _ in 0..3 {
            assert_eq!(source.fetch().await.unwrap().status, "in_progress");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied() {
        let source = ScriptedStatusSource::new(vec![
            ScriptedReply::record(StatusRecord::running("queued")).after(Duration::from_millis(700)),
        ]);
        let start = tokio::time::Instant::now();
        source.fetch().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(700));
    }
}
