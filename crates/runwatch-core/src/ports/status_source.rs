//! StatusSource port - リモートのジョブ状態を取得する
//!
//! 認証・ページング・リトライは実装側の責務です（コアは関知しない）。

use async_trait::async_trait;

use crate::domain::{QueryError, StatusRecord};

/// StatusSource は引数なしで最新の StatusRecord を返す
///
/// # 実装
/// - `HttpStatusSource`: 任意のステータス URL（本番用）
/// - `GithubJobsSource`: GitHub Actions の jobs API
/// - `ScriptedStatusSource`: テスト用の台本
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<StatusRecord, QueryError>;
}
