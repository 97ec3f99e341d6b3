//! WorkerLoop - タスク実行ループ
//!
//! # フロー
//! 1. 起動時に `Ready` を送る
//! 2. task channel から 1 件受け取る（stop シグナルと select で競合させる）
//! 3. TimingModel で所要時間と結果を決め、Sleeper で待つ
//! 4. outcome channel に結果を送る
//!
//! Worker は ledger を一切知りません。覚えているのは直前の task だけです。

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{trace, warn};

use super::timing::TimingModel;
use crate::domain::{FactoryError, Outcome, Task, WorkerId};
use crate::ports::{RandomSource, Sleeper};

pub struct Worker {
    id: WorkerId,
    last_task: Option<Task>,
    timing: Arc<TimingModel>,
    random: Arc<dyn RandomSource>,
    sleeper: Arc<dyn Sleeper>,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        timing: Arc<TimingModel>,
        random: Arc<dyn RandomSource>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            id,
            last_task: None,
            timing,
            random,
            sleeper,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn last_task(&self) -> Option<Task> {
        self.last_task
    }

    /// Perform `task` and return its outcome.
    ///
    /// The context-switch penalty is computed against the previous task, then
    /// `last_task` is updated before suspending.
    pub async fn execute(&mut self, task: Task) -> Outcome {
        let penalty = self.timing.penalty(self.last_task, task);
        self.last_task = Some(task);

        let (base, outcome) = self.timing.run(task, self.random.as_ref());
        debug_assert_eq!(outcome.task(), Some(task));
        let delay = self.timing.to_delay(penalty + base);
        trace!(worker = %self.id, %task, penalty, base, ?delay, "executing task");

        self.sleeper.sleep(delay).await;
        outcome
    }

    /// Run until the stop signal fires.
    ///
    /// Stop is observed while waiting for a task, never in the middle of one:
    /// a worker that is sleeping through a task finishes it and reports the
    /// outcome first.
    pub async fn run(
        mut self,
        tasks: flume::Receiver<Task>,
        outcomes: mpsc::UnboundedSender<Outcome>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), FactoryError> {
        outcomes
            .send(Outcome::Ready)
            .map_err(|_| FactoryError::outcome_channel_closed())?;

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            // idle 中の worker は recv で待ち続けるので、stop と select で競合させる
            let task = tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    // sender が drop されたら stop と同じ扱い
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                received = tasks.recv_async() => match received {
                    Ok(task) => task,
                    Err(_) => {
                        warn!(worker = %self.id, "task channel closed before shutdown");
                        return Err(FactoryError::task_channel_closed());
                    }
                },
            };

            let outcome = self.execute(task).await;

            if outcomes.send(outcome).is_err() {
                if *shutdown.borrow() {
                    break;
                }
                warn!(worker = %self.id, %outcome, "outcome channel closed before shutdown");
                return Err(FactoryError::outcome_channel_closed());
            }
        }

        trace!(worker = %self.id, last_task = ?self.last_task, "worker stopped");
        Ok(())
    }
}
