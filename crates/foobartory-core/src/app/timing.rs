//! TimingModel - タスクの所要時間と結果
//!
//! 単位は「time unit」(f64)。最後に time_scale を掛けて `Duration` (秒) にします。
//! time_scale = 0.0 にすると wall-clock の待ちがなくなります。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{Outcome, Task};
use crate::ports::RandomSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingModel {
    /// Extra cost when a worker switches to a different task type.
    pub switch_penalty: f64,
    pub mine_foo: f64,
    /// `MineBar` takes a uniform draw from `[min, max)`.
    pub mine_bar_min: f64,
    pub mine_bar_max: f64,
    pub process: f64,
    pub process_success_probability: f64,
    pub sell: f64,
    pub buy_worker: f64,
    pub time_scale: f64,
}

impl Default for TimingModel {
    fn default() -> Self {
        Self {
            switch_penalty: 5.0,
            mine_foo: 1.0,
            mine_bar_min: 0.5,
            mine_bar_max: 2.0,
            process: 2.0,
            process_success_probability: 0.6,
            sell: 10.0,
            buy_worker: 0.0,
            time_scale: 1.0,
        }
    }
}

impl TimingModel {
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Penalty for moving from `previous` to `next`. The first task is free.
    pub fn penalty(&self, previous: Option<Task>, next: Task) -> f64 {
        match previous {
            Some(prev) if prev != next => self.switch_penalty,
            _ => 0.0,
        }
    }

    /// Base duration of `task` and the outcome it will report.
    ///
    /// Draws from `random` for `MineBar` (duration) and `Process` (success).
    pub fn run(&self, task: Task, random: &dyn RandomSource) -> (f64, Outcome) {
        match task {
            Task::MineFoo => (self.mine_foo, Outcome::MineFooDone),
            Task::MineBar => (
                random.uniform(self.mine_bar_min, self.mine_bar_max),
                Outcome::MineBarDone,
            ),
            Task::Process => {
                let outcome = if random.chance(self.process_success_probability) {
                    Outcome::ProcessSucceeded
                } else {
                    Outcome::ProcessFailed
                };
                (self.process, outcome)
            }
            Task::Sell => (self.sell, Outcome::SellDone),
            Task::BuyWorker => (self.buy_worker, Outcome::BuyWorkerDone),
        }
    }

    /// Convert time units into a wall-clock delay.
    pub fn to_delay(&self, units: f64) -> Duration {
        // Duration::from_secs_f64 は負値・NaN・オーバーフローで panic する
        let secs = units * self.time_scale;
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::ScriptedRandom;
    use rstest::rstest;

    #[rstest]
    #[case::first_task(None, Task::MineFoo, 0.0)]
    #[case::same_task(Some(Task::MineFoo), Task::MineFoo, 0.0)]
    #[case::switch(Some(Task::MineBar), Task::MineFoo, 5.0)]
    #[case::switch_to_sell(Some(Task::Process), Task::Sell, 5.0)]
    fn penalty_only_on_switch(
        #[case] previous: Option<Task>,
        #[case] next: Task,
        #[case] expected: f64,
    ) {
        assert_eq!(TimingModel::default().penalty(previous, next), expected);
    }

    #[rstest]
    #[case::mine_foo(Task::MineFoo, 1.0, Outcome::MineFooDone)]
    #[case::sell(Task::Sell, 10.0, Outcome::SellDone)]
    #[case::buy_worker(Task::BuyWorker, 0.0, Outcome::BuyWorkerDone)]
    #[case::process(Task::Process, 2.0, Outcome::ProcessSucceeded)]
    fn fixed_costs(#[case] task: Task, #[case] units: f64, #[case] outcome: Outcome) {
        let random = ScriptedRandom::fixed(0.0);
        assert_eq!(TimingModel::default().run(task, &random), (units, outcome));
    }

    #[test]
    fn mine_bar_spans_half_to_two() {
        let model = TimingModel::default();
        assert_eq!(model.run(Task::MineBar, &ScriptedRandom::fixed(0.0)).0, 0.5);
        assert_eq!(model.run(Task::MineBar, &ScriptedRandom::fixed(0.5)).0, 1.25);
        let near_top = model.run(Task::MineBar, &ScriptedRandom::fixed(0.999)).0;
        assert!(near_top < 2.0);
    }

    #[rstest]
    #[case::succeeds_below_threshold(0.59, Outcome::ProcessSucceeded)]
    #[case::fails_at_threshold(0.6, Outcome::ProcessFailed)]
    #[case::fails_above_threshold(0.95, Outcome::ProcessFailed)]
    fn process_success_probability(#[case] draw: f64, #[case] expected: Outcome) {
        let (_, outcome) = TimingModel::default().run(Task::Process, &ScriptedRandom::fixed(draw));
        assert_eq!(outcome, expected);
    }

    #[test]
    fn time_scale_compresses_delay() {
        let model = TimingModel::default().with_time_scale(0.5);
        assert_eq!(model.to_delay(6.0), Duration::from_secs(3));

        let instant = TimingModel::default().with_time_scale(0.0);
        assert_eq!(instant.to_delay(10.0), Duration::ZERO);
    }

    #[rstest]
    #[case::just_below_u64_max_secs(1.0e19, 1.0)]
    #[case::past_u64_max_secs(1.0e20, 1.0)]
    #[case::infinite_product(f64::MAX, 10.0)]
    fn huge_time_scale_saturates_instead_of_panicking(#[case] scale: f64, #[case] units: f64) {
        let model = TimingModel::default().with_time_scale(scale);
        let delay = model.to_delay(units);
        assert!(delay >= Duration::from_secs(u64::MAX / 2));
    }

    #[test]
    fn overflowing_delay_is_clamped_to_max() {
        let model = TimingModel::default().with_time_scale(1.0e20);
        assert_eq!(model.to_delay(1.0), Duration::MAX);
        assert_eq!(model.to_delay(-1.0), Duration::ZERO);
        assert_eq!(model.to_delay(f64::NAN), Duration::ZERO);
    }
}
