//! App - アプリケーション層
//!
//! ports を組み合わせてポーリングロジックを実装します。
//!
//! # 主要コンポーネント
//! - **StatusPoller**: ポーリングと終端検出
//! - **AppBuilder**: StatusSource / Presenter / PollerConfig のワイヤリング
//! - **PollerStatus**: 観測用スナップショット

pub mod builder;
pub mod config;
pub mod poller;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::config::{DEFAULT_POLL_INTERVAL_MS, PollerConfig};
pub use self::poller::{PollHandle, StatusPoller};
pub use self::status::PollerStatus;
