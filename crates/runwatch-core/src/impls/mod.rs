//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **HttpStatusSource** / **GithubJobsSource**: 本番用の StatusSource（reqwest）
//! - **ConsolePresenter**: 端末向けの Presenter
//! - **RecordingPresenter**: 呼び出しを記録する Presenter（テスト用）
//! - **ScriptedStatusSource**: 台本どおりに応答する StatusSource（テスト用）

pub mod console;
pub mod http;
pub mod recording;
pub mod scripted;

pub use self::console::ConsolePresenter;
pub use self::http::{GITHUB_API, GithubJobsSource, HttpSettings, HttpStatusSource};
pub use self::recording::{PresenterCall, RecordingPresenter};
pub use self::scripted::{ScriptedReply, ScriptedStatusSource};
