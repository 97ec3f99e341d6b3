//! Dispatcher - ledger と pool の唯一の持ち主
//!
//! # フロー
//! 1. outcome を 1 件受け取る
//! 2. ledger に反映（BuyWorkerDone ならその場で pool を増やす）
//! 3. Decider で次の task を決める
//! 4. その task が消費する資源を予約（差し引き）
//! 5. task を送る
//!
//! 2〜4 は `step()` で同期的に行うので、判断と予約の間に他の outcome が割り込むことはありません。
//! ledger も pool も dispatcher の task からしか触らないので、ロックは不要です。

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::builder::DispatcherBuilder;
use super::decider::Decider;
use super::pool::WorkerPool;
use super::status::{OutcomeCounts, RunReport, TaskCounts};
use crate::config::FactoryConfig;
use crate::domain::{FactoryError, Outcome, ResourceLedger, RunId, Task};
use crate::ports::Clock;

pub struct Dispatcher {
    pub(crate) config: FactoryConfig,
    pub(crate) run_id: RunId,
    pub(crate) ledger: ResourceLedger,
    pub(crate) decider: Arc<dyn Decider>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) pool: WorkerPool,
    pub(crate) task_tx: flume::Sender<Task>,
    pub(crate) outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    pub(crate) tasks_issued: TaskCounts,
    pub(crate) outcomes_applied: OutcomeCounts,
}

impl Dispatcher {
    pub fn builder(config: FactoryConfig) -> DispatcherBuilder {
        DispatcherBuilder::new(config)
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn tasks_issued(&self) -> &TaskCounts {
        &self.tasks_issued
    }

    pub fn outcomes_applied(&self) -> &OutcomeCounts {
        &self.outcomes_applied
    }

    /// Apply one outcome to the ledger.
    ///
    /// `BuyWorkerDone` grows the pool right here, so pool growth never races
    /// the decision that follows. Spawning needs a tokio runtime.
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        self.ledger.apply(outcome);
        self.outcomes_applied.record(outcome);

        if outcome == Outcome::BuyWorkerDone {
            let worker = self.pool.spawn();
            info!(
                %worker,
                pool_size = self.pool.len(),
                goal = self.config.goal_worker_count,
                "pool grew"
            );
        }
    }

    pub fn decide_next_task(&self) -> Task {
        self.decider.decide(&self.ledger)
    }

    /// Deduct what `task` will consume.
    pub fn reserve(&mut self, task: Task) -> Result<(), FactoryError> {
        self.ledger.reserve(task)
    }

    /// Apply `outcome`, pick the next task and reserve its resources.
    ///
    /// This is one iteration of the dispatch loop minus the send.
    pub fn step(&mut self, outcome: Outcome) -> Result<Task, FactoryError> {
        self.apply_outcome(outcome);
        let task = self.decide_next_task();
        self.reserve(task)?;
        self.tasks_issued.record(task);

        let l = &self.ledger;
        debug!(
            %outcome,
            %task,
            foo = l.foo,
            bar = l.bar,
            foobar = l.foobar,
            money = l.money,
            "dispatching"
        );
        Ok(task)
    }

    /// Spawn the initial workers, dispatch until the pool reaches the goal,
    /// then stop and join every worker.
    ///
    /// Workers are joined even when the loop fails, so no worker task outlives
    /// the call.
    pub async fn run(mut self) -> Result<RunReport, FactoryError> {
        let started_at = self.clock.now();
        info!(
            run = %self.run_id,
            initial = self.config.initial_worker_count,
            goal = self.config.goal_worker_count,
            time_scale = self.config.time_scale,
            "factory started"
        );

        for _ in 0..self.config.initial_worker_count {
            self.pool.spawn();
        }

        let dispatched = self.dispatch_until_goal().await;

        let Dispatcher {
            config,
            run_id,
            ledger,
            clock,
            pool,
            task_tx,
            outcome_rx,
            tasks_issued,
            outcomes_applied,
            ..
        } = self;
        let pool_size = pool.len();

        // join が終わるまで channel を生かしておく
        let joined = pool.shutdown_and_join().await;
        drop(task_tx);
        drop(outcome_rx);

        dispatched?;
        let workers_stopped = joined?;

        let report = RunReport {
            run_id,
            started_at,
            finished_at: clock.now(),
            ledger,
            pool_size,
            goal_worker_count: config.goal_worker_count,
            workers_stopped,
            tasks_issued,
            outcomes_applied,
        };
        info!(
            run = %report.run_id,
            pool_size = report.pool_size,
            tasks = report.tasks_issued.total(),
            outcomes = report.outcomes_applied.total(),
            foo = ledger.foo,
            bar = ledger.bar,
            foobar = ledger.foobar,
            money = ledger.money,
            "factory finished"
        );
        Ok(report)
    }

    async fn dispatch_until_goal(&mut self) -> Result<(), FactoryError> {
        while self.pool.len() < self.config.goal_worker_count {
            // 落ちた worker は outcome を返さないので、待ち続けずに run を失敗させる
            let outcome = tokio::select! {
                biased;
                failure = self.pool.next_failure() => return Err(failure),
                received = self.outcome_rx.recv() => {
                    received.ok_or_else(FactoryError::outcome_channel_closed)?
                }
            };

            let task = self.step(outcome)?;

            self.task_tx
                .send_async(task)
                .await
                .map_err(|_| FactoryError::task_channel_closed())?;
        }
        Ok(())
    }
}
