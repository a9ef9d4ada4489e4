//! runwatch-core
//!
//! Polls a remote job-status endpoint until the job is finished and renders
//! exactly one final outcome.
//!
//! # モジュール構成
//! - **domain**: StatusRecord, Verdict / classify, PollerState, errors
//! - **ports**: StatusSource, Presenter
//! - **app**: StatusPoller, AppBuilder, PollerConfig, PollerStatus
//! - **impls**: HTTP / GitHub sources, console / recording presenters, scripted source

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{App, AppBuilder, PollHandle, PollerConfig, PollerStatus, StatusPoller};
pub use domain::{QueryError, StatusRecord, TerminalOutcome, Verdict, classify};
pub use ports::{Presenter, StatusSource};
