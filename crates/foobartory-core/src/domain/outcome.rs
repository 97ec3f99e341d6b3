//! Outcome model: what a worker reports back after finishing a task.
//!
//! Outcomes map 1:1 to the task that produced them, except `Process`, which
//! either succeeds or fails. `Ready` is not tied to any task; a freshly spawned
//! worker sends it once to announce that it can take work.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Worker startup announcement.
    Ready,
    MineFooDone,
    MineBarDone,
    ProcessSucceeded,
    ProcessFailed,
    SellDone,
    BuyWorkerDone,
}

impl Outcome {
    pub const ALL: [Outcome; 7] = [
        Outcome::Ready,
        Outcome::MineFooDone,
        Outcome::MineBarDone,
        Outcome::ProcessSucceeded,
        Outcome::ProcessFailed,
        Outcome::SellDone,
        Outcome::BuyWorkerDone,
    ];

    /// The task this outcome answers, if any.
    pub fn task(self) -> Option<Task> {
        match self {
            Outcome::Ready => None,
            Outcome::MineFooDone => Some(Task::MineFoo),
            Outcome::MineBarDone => Some(Task::MineBar),
            Outcome::ProcessSucceeded | Outcome::ProcessFailed => Some(Task::Process),
            Outcome::SellDone => Some(Task::Sell),
            Outcome::BuyWorkerDone => Some(Task::BuyWorker),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ready => "ready",
            Outcome::MineFooDone => "mine_foo_done",
            Outcome::MineBarDone => "mine_bar_done",
            Outcome::ProcessSucceeded => "process_succeeded",
            Outcome::ProcessFailed => "process_failed",
            Outcome::SellDone => "sell_done",
            Outcome::BuyWorkerDone => "buy_worker_done",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
