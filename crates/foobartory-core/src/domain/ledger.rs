//! Resource ledger: the shared counts owned by the dispatcher.
//!
//! The ledger is a plain value. It has no interior mutability and no locks;
//! whoever owns it (the dispatcher) is the only one who can change it.

use serde::{Deserialize, Serialize};

use super::errors::FactoryError;
use super::outcome::Outcome;
use super::task::Task;

/// Counts of every resource in the factory.
///
/// Fields are unsigned, and every deduction goes through [`ResourceLedger::reserve`],
/// which refuses to underflow instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub foo: u32,
    pub bar: u32,
    pub foobar: u32,
    pub money: u32,
}

impl ResourceLedger {
    pub const fn new(foo: u32, bar: u32, foobar: u32, money: u32) -> Self {
        Self {
            foo,
            bar,
            foobar,
            money,
        }
    }

    /// Resources consumed when `task` is issued.
    ///
    /// The decision policy checks affordability against the same table, so a
    /// task is only chosen when its reservation can succeed.
    pub const fn cost_of(task: Task) -> ResourceLedger {
        match task {
            Task::BuyWorker => ResourceLedger::new(6, 0, 0, 3),
            Task::Sell => ResourceLedger::new(0, 0, 5, 0),
            Task::Process => ResourceLedger::new(1, 1, 0, 0),
            Task::MineFoo | Task::MineBar => ResourceLedger::new(0, 0, 0, 0),
        }
    }

    pub fn can_afford(&self, cost: &ResourceLedger) -> bool {
        self.foo >= cost.foo
            && self.bar >= cost.bar
            && self.foobar >= cost.foobar
            && self.money >= cost.money
    }

    /// Credit the resources produced by `outcome`.
    ///
    /// A failed process gives the bar back; the foo is lost. `Ready` and
    /// `BuyWorkerDone` do not touch the ledger (pool growth is the dispatcher's job).
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::MineFooDone => self.foo += 1,
            Outcome::MineBarDone => self.bar += 1,
            Outcome::ProcessSucceeded => self.foobar += 1,
            Outcome::ProcessFailed => self.bar += 1,
            Outcome::SellDone => self.money += 1,
            Outcome::Ready | Outcome::BuyWorkerDone => {}
        }
    }

    /// Deduct what `task` will consume.
    ///
    /// Either every field is deducted or none is.
    pub fn reserve(&mut self, task: Task) -> Result<(), FactoryError> {
        let cost = Self::cost_of(task);
        let insufficient = || FactoryError::InsufficientResources {
            task,
            ledger: *self,
        };

        let next = ResourceLedger {
            foo: self.foo.checked_sub(cost.foo).ok_or_else(insufficient)?,
            bar: self.bar.checked_sub(cost.bar).ok_or_else(insufficient)?,
            foobar: self.foobar.checked_sub(cost.foobar).ok_or_else(insufficient)?,
            money: self.money.checked_sub(cost.money).ok_or_else(insufficient)?,
        };
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn foo_mining_credits_one_foo() {
        let mut ledger = ResourceLedger::default();
        ledger.apply(Outcome::MineFooDone);
        assert_eq!(ledger, ResourceLedger::new(1, 0, 0, 0));
    }

    #[rstest]
    #[case::mine_bar(Outcome::MineBarDone, ResourceLedger::new(0, 1, 0, 0))]
    #[case::process_succeeded(Outcome::ProcessSucceeded, ResourceLedger::new(0, 0, 1, 0))]
    #[case::process_failed_returns_bar(Outcome::ProcessFailed, ResourceLedger::new(0, 1, 0, 0))]
    #[case::sell(Outcome::SellDone, ResourceLedger::new(0, 0, 0, 1))]
    #[case::ready(Outcome::Ready, ResourceLedger::default())]
    #[case::buy_worker(Outcome::BuyWorkerDone, ResourceLedger::default())]
    fn apply_credits_outcome(#[case] outcome: Outcome, #[case] expected: ResourceLedger) {
        let mut ledger = ResourceLedger::default();
        ledger.apply(outcome);
        assert_eq!(ledger, expected);
    }

    #[test]
    fn process_round_trip_nets() {
        // 成功: foo -1, bar -1, foobar +1
        let mut ok = ResourceLedger::new(1, 1, 0, 0);
        ok.reserve(Task::Process).unwrap();
        ok.apply(Outcome::ProcessSucceeded);
        assert_eq!(ok, ResourceLedger::new(0, 0, 1, 0));

        // 失敗: foo -1, bar は戻る
        let mut failed = ResourceLedger::new(1, 1, 0, 0);
        failed.reserve(Task::Process).unwrap();
        failed.apply(Outcome::ProcessFailed);
        assert_eq!(failed, ResourceLedger::new(0, 1, 0, 0));
    }

    #[rstest]
    #[case::buy_worker(Task::BuyWorker, ResourceLedger::new(6, 0, 0, 3), ResourceLedger::default())]
    #[case::sell(Task::Sell, ResourceLedger::new(0, 0, 5, 0), ResourceLedger::default())]
    #[case::process(Task::Process, ResourceLedger::new(1, 1, 0, 0), ResourceLedger::default())]
    #[case::mine_foo(Task::MineFoo, ResourceLedger::new(2, 3, 4, 5), ResourceLedger::new(2, 3, 4, 5))]
    #[case::mine_bar(Task::MineBar, ResourceLedger::default(), ResourceLedger::default())]
    fn reserve_deducts_cost(
        #[case] task: Task,
        #[case] before: ResourceLedger,
        #[case] after: ResourceLedger,
    ) {
        let mut ledger = before;
        ledger.reserve(task).unwrap();
        assert_eq!(ledger, after);
    }

    #[test]
    fn reserve_refuses_to_underflow_and_leaves_ledger_untouched() {
        // foo は足りるが money が足りない
        let mut ledger = ResourceLedger::new(6, 0, 0, 2);
        let err = ledger.reserve(Task::BuyWorker).unwrap_err();
        assert!(matches!(
            err,
            FactoryError::InsufficientResources { task: Task::BuyWorker, .. }
        ));
        assert_eq!(ledger, ResourceLedger::new(6, 0, 0, 2));
    }

    #[test]
    fn can_afford_matches_cost_table() {
        let cost = ResourceLedger::cost_of(Task::BuyWorker);
        assert!(ResourceLedger::new(6, 0, 0, 3).can_afford(&cost));
        assert!(!ResourceLedger::new(5, 9, 9, 9).can_afford(&cost));
        assert!(!ResourceLedger::new(9, 9, 9, 2).can_afford(&cost));
    }
}
