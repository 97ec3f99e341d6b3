//! foobartory-core
//!
//! A small resource economy: workers mine foo and bar, assemble foobar,
//! sell it for money and buy more workers until the pool reaches a goal.
//!
//! # モジュール構成
//! - **domain**: task, outcome, ledger, ids, errors
//! - **ports**: 乱数・待機・時刻・ID の抽象化
//! - **impls**: ports の実装（tokio / seeded / テスト用）
//! - **app**: dispatcher, worker pool, decider, timing, builder
//! - **config**: 起動パラメータ

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{BuildError, Dispatcher, DispatcherBuilder, RunReport};
pub use config::{ConfigError, FactoryConfig};
pub use domain::{FactoryError, Outcome, ResourceLedger, Task};
