//! DispatcherBuilder - dispatcher の構築とワイヤリング
//!
//! 起動時に config を検証し、差し替えられなかった port にはデフォルト実装を入れます。
//! 検証に失敗したら worker を一つも spawn せずに BuildError を返します。

use std::sync::Arc;

use tokio::sync::mpsc;

use super::decider::{Decider, GreedyDecider};
use super::dispatcher::Dispatcher;
use super::pool::{WorkerContext, WorkerPool};
use super::status::{OutcomeCounts, TaskCounts};
use super::timing::TimingModel;
use crate::config::{ConfigError, FactoryConfig};
use crate::domain::ResourceLedger;
use crate::impls::{SeededRandom, ThreadRandom, TokioSleeper};
use crate::ports::{Clock, IdGenerator, RandomSource, Sleeper, SystemClock, UlidGenerator};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Wires a [`Dispatcher`] from a config plus optional port overrides.
///
/// # Defaults
/// - random: `SeededRandom` when `config.seed` is set, `ThreadRandom` otherwise
/// - sleeper: `TokioSleeper`
/// - clock: `SystemClock`
/// - ids: `UlidGenerator` over the clock
/// - decider: `GreedyDecider`
///
/// The timing model's `time_scale` always comes from the config.
pub struct DispatcherBuilder {
    config: FactoryConfig,
    ledger: ResourceLedger,
    timing: Option<TimingModel>,
    random: Option<Arc<dyn RandomSource>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    decider: Option<Arc<dyn Decider>>,
}

impl DispatcherBuilder {
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            config,
            ledger: ResourceLedger::default(),
            timing: None,
            random: None,
            sleeper: None,
            clock: None,
            ids: None,
            decider: None,
        }
    }

    pub fn timing(mut self, timing: TimingModel) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn decider(mut self, decider: Arc<dyn Decider>) -> Self {
        self.decider = Some(decider);
        self
    }

    /// Start from a non-empty ledger instead of all zeros.
    pub fn initial_ledger(mut self, ledger: ResourceLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn build(self) -> Result<Dispatcher, BuildError> {
        self.config.validate()?;

        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(Arc::clone(&clock))),
        };
        let random: Arc<dyn RandomSource> = match (self.random, self.config.seed) {
            (Some(random), _) => random,
            (None, Some(seed)) => Arc::new(SeededRandom::new(seed)),
            (None, None) => Arc::new(ThreadRandom),
        };
        let timing = self
            .timing
            .unwrap_or_default()
            .with_time_scale(self.config.time_scale);

        let context = WorkerContext {
            timing: Arc::new(timing),
            random,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            ids: Arc::clone(&ids),
        };

        let (task_tx, task_rx) = flume::unbounded();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Ok(Dispatcher {
            run_id: ids.generate_run_id(),
            config: self.config,
            ledger: self.ledger,
            decider: self.decider.unwrap_or_else(|| Arc::new(GreedyDecider)),
            clock,
            pool: WorkerPool::new(context, task_rx, outcome_tx),
            task_tx,
            outcome_rx,
            tasks_issued: TaskCounts::default(),
            outcomes_applied: OutcomeCounts::default(),
        })
    }
}
