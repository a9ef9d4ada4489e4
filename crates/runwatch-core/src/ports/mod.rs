//! Ports - 抽象化レイヤー
//!
//! StatusPoller が依存する外部コラボレーターの trait を定義します。
//! 実装は `impls` にあります。

pub mod presenter;
pub mod status_source;

pub use self::presenter::Presenter;
pub use self::status_source::StatusSource;
