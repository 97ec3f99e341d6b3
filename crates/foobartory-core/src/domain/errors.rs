//! Errors - シミュレーション実行時のエラー
//!
//! どれも「回復してリトライする」種類のエラーではありません。
//! 発生したら run を中断して呼び出し側に返します。

use thiserror::Error;

use super::ids::WorkerId;
use super::ledger::ResourceLedger;
use super::task::Task;

#[derive(Debug, Error)]
pub enum FactoryError {
    /// A channel that must live for the whole run was closed.
    #[error("{channel} channel closed")]
    ChannelClosed { channel: &'static str },

    /// A reservation would have driven a ledger field negative.
    #[error("insufficient resources to reserve {task}: {ledger:?}")]
    InsufficientResources { task: Task, ledger: ResourceLedger },

    /// A worker task panicked or was aborted before it could be joined.
    #[error("worker {worker} did not stop cleanly: {reason}")]
    WorkerPanicked { worker: WorkerId, reason: String },

    /// A task in the worker pool could not be joined and is not a known worker.
    #[error("failed to join worker task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl FactoryError {
    pub(crate) fn task_channel_closed() -> Self {
        Self::ChannelClosed { channel: "task" }
    }

    pub(crate) fn outcome_channel_closed() -> Self {
        Self::ChannelClosed { channel: "outcome" }
    }
}
