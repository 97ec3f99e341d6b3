//! Decision policy: which task the factory needs next.
//!
//! Deciders are pure functions of the ledger. They never mutate it; the
//! dispatcher reserves the chosen task's resources right after asking.

use crate::domain::{ResourceLedger, Task};

/// Chooses the next task from the current ledger.
///
/// Implementations must only return a task the ledger can afford
/// (see [`ResourceLedger::cost_of`]); the dispatcher treats a failed
/// reservation as fatal.
pub trait Decider: Send + Sync {
    fn decide(&self, ledger: &ResourceLedger) -> Task;
}

/// Fixed greedy priority policy. First matching rule wins:
///
/// 1. `foo >= 6 && money >= 3` → `BuyWorker`
/// 2. `foobar >= 5` → `Sell`
/// 3. `foo >= 1 && bar >= 1 && money < 3` → `Process`
/// 4. `foo > bar` → `MineBar`
/// 5. otherwise → `MineFoo`
///
/// Processing stops once a worker is affordable money-wise, so foo/bar are
/// funneled into growth. Selling waits for a batch of 5 because a sale costs a
/// fixed 10 time units regardless of size.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyDecider;

impl Decider for GreedyDecider {
    fn decide(&self, ledger: &ResourceLedger) -> Task {
        decide_next_task(ledger)
    }
}

pub fn decide_next_task(ledger: &ResourceLedger) -> Task {
    let buy_cost = ResourceLedger::cost_of(Task::BuyWorker);

    if ledger.can_afford(&buy_cost) {
        Task::BuyWorker
    } else if ledger.can_afford(&ResourceLedger::cost_of(Task::Sell)) {
        Task::Sell
    } else if ledger.can_afford(&ResourceLedger::cost_of(Task::Process))
        && ledger.money < buy_cost.money
    {
        Task::Process
    } else if ledger.foo > ledger.bar {
        Task::MineBar
    } else {
        Task::MineFoo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ledger(foo: u32, bar: u32, foobar: u32, money: u32) -> ResourceLedger {
        ResourceLedger::new(foo, bar, foobar, money)
    }

    #[test]
    fn empty_ledger_mines_foo() {
        let l = ResourceLedger::default();
        assert_eq!(decide_next_task(&l), Task::MineFoo);
        // 判断は ledger を変更しない
        assert_eq!(l, ResourceLedger::default());
    }

    #[rstest]
    // rule 1
    #[case::buy_at_threshold(ledger(6, 0, 0, 3), Task::BuyWorker)]
    #[case::buy_beats_sell(ledger(6, 0, 5, 3), Task::BuyWorker)]
    #[case::buy_short_on_money(ledger(6, 0, 0, 2), Task::MineBar)]
    #[case::buy_short_on_money_falls_to_process(ledger(6, 1, 0, 2), Task::Process)]
    #[case::buy_short_on_foo(ledger(5, 0, 0, 3), Task::MineBar)]
    // rule 2
    #[case::sell_at_threshold(ledger(0, 0, 5, 0), Task::Sell)]
    #[case::sell_beats_process(ledger(1, 1, 5, 0), Task::Sell)]
    #[case::no_sell_below_batch(ledger(0, 0, 4, 0), Task::MineFoo)]
    // rule 3
    #[case::process_at_threshold(ledger(1, 1, 0, 0), Task::Process)]
    #[case::process_with_money_two(ledger(1, 1, 0, 2), Task::Process)]
    #[case::no_process_when_money_is_enough(ledger(1, 1, 0, 3), Task::MineFoo)]
    #[case::no_process_without_bar(ledger(1, 0, 0, 0), Task::MineBar)]
    // rule 4 / 5
    #[case::bar_lags_foo(ledger(3, 2, 0, 3), Task::MineBar)]
    #[case::foo_equals_bar(ledger(2, 2, 0, 3), Task::MineFoo)]
    #[case::bar_ahead(ledger(0, 4, 0, 0), Task::MineFoo)]
    fn priority_order(#[case] l: ResourceLedger, #[case] expected: Task) {
        assert_eq!(decide_next_task(&l), expected);
    }

    #[test]
    fn chosen_task_is_always_affordable() {
        for foo in 0..8 {
            for bar in 0..8 {
                for foobar in 0..7 {
                    for money in 0..5 {
                        let l = ledger(foo, bar, foobar, money);
                        let task = GreedyDecider.decide(&l);
                        assert!(
                            l.can_afford(&ResourceLedger::cost_of(task)),
                            "{task} chosen for unaffordable {l:?}"
                        );
                    }
                }
            }
        }
    }
}
