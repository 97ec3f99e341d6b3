//! Task - ワーカーに渡す作業の種類
//!
//! Task は payload を持たない純粋な「意図」です。
//! 何をどれだけ消費するかは Ledger 側、どれだけ時間がかかるかは TimingModel 側が決めます。

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unit of work the dispatcher hands to a worker.
///
/// The set is closed: every `match` over it is exhaustive, so there is no
/// "unknown task" path at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    MineFoo,
    MineBar,
    Process,
    Sell,
    BuyWorker,
}

impl Task {
    /// All variants, in declaration order.
    pub const ALL: [Task; 5] = [
        Task::MineFoo,
        Task::MineBar,
        Task::Process,
        Task::Sell,
        Task::BuyWorker,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Task::MineFoo => "mine_foo",
            Task::MineBar => "mine_bar",
            Task::Process => "process",
            Task::Sell => "sell",
            Task::BuyWorker => "buy_worker",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_as_snake_case() {
        let s = serde_json::to_string(&Task::BuyWorker).unwrap();
        assert_eq!(s, "\"buy_worker\"");

        let back: Task = serde_json::from_str("\"mine_bar\"").unwrap();
        assert_eq!(back, Task::MineBar);
    }

    #[test]
    fn display_matches_serialized_name() {
        for task in Task::ALL {
            let json = serde_json::to_string(&task).unwrap();
            assert_eq!(json.trim_matches('"'), task.to_string());
        }
    }
}
