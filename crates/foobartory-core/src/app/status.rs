//! Status - run の集計と最終レポート

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Outcome, ResourceLedger, RunId, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub mine_foo: u64,
    pub mine_bar: u64,
    pub process: u64,
    pub sell: u64,
    pub buy_worker: u64,
}

impl TaskCounts {
    pub fn record(&mut self, task: Task) {
        *self.slot(task) += 1;
    }

    pub fn get(&self, task: Task) -> u64 {
        match task {
            Task::MineFoo => self.mine_foo,
            Task::MineBar => self.mine_bar,
            Task::Process => self.process,
            Task::Sell => self.sell,
            Task::BuyWorker => self.buy_worker,
        }
    }

    pub fn total(&self) -> u64 {
        Task::ALL.iter().map(|t| self.get(*t)).sum()
    }

    fn slot(&mut self, task: Task) -> &mut u64 {
        match task {
            Task::MineFoo => &mut self.mine_foo,
            Task::MineBar => &mut self.mine_bar,
            Task::Process => &mut self.process,
            Task::Sell => &mut self.sell,
            Task::BuyWorker => &mut self.buy_worker,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub ready: u64,
    pub mine_foo_done: u64,
    pub mine_bar_done: u64,
    pub process_succeeded: u64,
    pub process_failed: u64,
    pub sell_done: u64,
    pub buy_worker_done: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: Outcome) {
        let slot = match outcome {
            Outcome::Ready => &mut self.ready,
            Outcome::MineFooDone => &mut self.mine_foo_done,
            Outcome::MineBarDone => &mut self.mine_bar_done,
            Outcome::ProcessSucceeded => &mut self.process_succeeded,
            Outcome::ProcessFailed => &mut self.process_failed,
            Outcome::SellDone => &mut self.sell_done,
            Outcome::BuyWorkerDone => &mut self.buy_worker_done,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u64 {
        self.ready
            + self.mine_foo_done
            + self.mine_bar_done
            + self.process_succeeded
            + self.process_failed
            + self.sell_done
            + self.buy_worker_done
    }
}

/// Final state of a finished run.
///
/// Outcomes still in flight when the goal was reached are not applied, so the
/// ledger reflects the dispatcher's view at the moment it stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub ledger: ResourceLedger,
    pub pool_size: usize,
    pub goal_worker_count: usize,
    /// Workers that observed the stop signal and exited cleanly.
    pub workers_stopped: usize,
    pub tasks_issued: TaskCounts,
    pub outcomes_applied: OutcomeCounts,
}

impl RunReport {
    pub fn goal_reached(&self) -> bool {
        self.pool_size >= self.goal_worker_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_counts_record_and_total() {
        let mut counts = TaskCounts::default();
        counts.record(Task::MineFoo);
        counts.record(Task::MineFoo);
        counts.record(Task::Sell);

        assert_eq!(counts.get(Task::MineFoo), 2);
        assert_eq!(counts.get(Task::Sell), 1);
        assert_eq!(counts.get(Task::BuyWorker), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn outcome_counts_record_each_variant() {
        let mut counts = OutcomeCounts::default();
        for outcome in Outcome::ALL {
            counts.record(outcome);
        }
        assert_eq!(counts.total(), Outcome::ALL.len() as u64);
        assert_eq!(counts.process_failed, 1);
    }

    #[test]
    fn counts_serialize_with_snake_case_keys() {
        let mut counts = TaskCounts::default();
        counts.record(Task::BuyWorker);
        let v = serde_json::to_value(counts).unwrap();
        assert_eq!(v["buy_worker"], 1);
        assert_eq!(v["mine_foo"], 0);
    }
}
