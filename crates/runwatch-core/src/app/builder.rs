//! AppBuilder - ポーラーの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）

use std::sync::Arc;

use crate::domain::PollerError;
use crate::ports::{Presenter, StatusSource};

use super::config::PollerConfig;
use super::poller::{PollHandle, StatusPoller};

/// AppBuilder は StatusSource と Presenter を束ねて App を作る
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .source(Arc::new(HttpStatusSource::new(url, HttpSettings::default())?))
///     .presenter(Arc::new(ConsolePresenter::stdout()))
///     .config(PollerConfig::from_millis(2000))
///     .build()?;
/// let outcome = app.start()?.wait().await?;
/// ```
#[derive(Default)]
pub struct AppBuilder {
    source: Option<Arc<dyn StatusSource>>,
    presenter: Option<Arc<dyn Presenter>>,
    config: PollerConfig,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no status source configured")]
    MissingSource,

    #[error("no presenter configured")]
    MissingPresenter,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: Arc<dyn StatusSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn config(mut self, config: PollerConfig) -> Self {
        self.config = config;
        self
    }

    /// # 検証
    /// - source と presenter が両方そろっているか
    pub fn build(self) -> Result<App, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let presenter = self.presenter.ok_or(BuildError::MissingPresenter)?;
        Ok(App {
            poller: StatusPoller::new(source, presenter),
            config: self.config,
        })
    }
}

/// A wired poller plus its configuration.
pub struct App {
    pub poller: StatusPoller,
    pub config: PollerConfig,
}

impl App {
    /// Start polling at the configured interval.
    pub fn start(&self) -> Result<PollHandle, PollerError> {
        self.poller.start(self.config.interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatusRecord;
    use crate::impls::{RecordingPresenter, ScriptedReply, ScriptedStatusSource};

    #[test]
    fn build_requires_source() {
        let app = AppBuilder::new()
            .presenter(Arc::new(RecordingPresenter::new()))
            .build();
        assert!(matches!(app, Err(BuildError::MissingSource)));
    }

    #[test]
    fn build_requires_presenter() {
        let app = AppBuilder::new()
            .source(Arc::new(ScriptedStatusSource::new(vec![])))
            .build();
        assert!(matches!(app, Err(BuildError::MissingPresenter)));
    }

    #[tokio::test(start_paused = true)]
    async fn built_app_polls_with_configured_interval() {
        let source = Arc::new(ScriptedStatusSource::new(vec![
            ScriptedReply::record(StatusRecord::running("queued")),
            ScriptedReply::record(StatusRecord::new("completed", Some("success"), "https://x/9")),
        ]));
        let app = AppBuilder::new()
            .source(source.clone())
            .presenter(Arc::new(RecordingPresenter::new()))
            .config(PollerConfig::from_millis(100))
            .build()
            .unwrap();

        let started = tokio::time::Instant::now();
        let outcome = app.start().unwrap().wait().await.unwrap();

        assert!(outcome.is_success());
        let elapsed = started.elapsed();
        assert!(elapsed >= std::time::Duration::from_millis(100));
        assert!(elapsed < std::time::Duration::from_millis(200));
        assert_eq!(source.calls(), 2);
    }
}
