use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, warn};

use super::timing::TimingModel;
use super::worker_loop::Worker;
use crate::domain::{FactoryError, Outcome, Task, WorkerId};
use crate::ports::{IdGenerator, RandomSource, Sleeper};

/// Everything a new worker is built from.
///
/// Cloned into every spawned worker; none of it is mutable shared state.
#[derive(Clone)]
pub struct WorkerContext {
    pub timing: Arc<TimingModel>,
    pub random: Arc<dyn RandomSource>,
    pub sleeper: Arc<dyn Sleeper>,
    pub ids: Arc<dyn IdGenerator>,
}

type WorkerExit = (WorkerId, Result<(), FactoryError>);

/// Append-only pool of running workers.
/// - `next_failure()` で stop 前に落ちた worker を検知
/// - `request_shutdown()` で全 worker に stop を通知
/// - `shutdown_and_join()` で全 worker の終了を待つ
pub struct WorkerPool {
    context: WorkerContext,
    tasks: flume::Receiver<Task>,
    outcomes: mpsc::UnboundedSender<Outcome>,
    shutdown_tx: watch::Sender<bool>,
    workers: JoinSet<WorkerExit>,
    // panic した task は JoinError しか返さないので、task id から worker を引く
    spawned: HashMap<task::Id, WorkerId>,
    stopped: usize,
}

impl WorkerPool {
    pub fn new(
        context: WorkerContext,
        tasks: flume::Receiver<Task>,
        outcomes: mpsc::UnboundedSender<Outcome>,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            context,
            tasks,
            outcomes,
            shutdown_tx,
            workers: JoinSet::new(),
            spawned: HashMap::new(),
            stopped: 0,
        }
    }

    /// Spawn one worker. It announces itself with `Outcome::Ready`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&mut self) -> WorkerId {
        let id = self.context.ids.generate_worker_id();
        let worker = Worker::new(
            id,
            Arc::clone(&self.context.timing),
            Arc::clone(&self.context.random),
            Arc::clone(&self.context.sleeper),
        );

        let run = worker.run(
            self.tasks.clone(),
            self.outcomes.clone(),
            self.shutdown_tx.subscribe(),
        );
        let handle = self.workers.spawn(async move { (id, run.await) });
        self.spawned.insert(handle.id(), id);
        debug!(worker = %id, pool_size = self.spawned.len(), "worker spawned");
        id
    }

    #[cfg(test)]
    pub(crate) fn context(&self) -> &WorkerContext {
        &self.context
    }

    /// Workers spawned so far, including any that already exited.
    pub fn len(&self) -> usize {
        self.spawned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty()
    }

    /// Wait until a worker exits with an error or panics.
    ///
    /// Never resolves while every worker is healthy. Cancel-safe, so it can be
    /// raced against the outcome channel.
    pub async fn next_failure(&mut self) -> FactoryError {
        loop {
            match self.workers.join_next_with_id().await {
                Some(joined) => {
                    if let Err(err) = self.settle(joined) {
                        return err;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        }
    }

    /// Ask every worker to stop. Busy workers finish their current task first.
    pub fn request_shutdown(&self) {
        // send_replace は receiver がいなくても値を更新する
        self.shutdown_tx.send_replace(true);
    }

    /// Stop every worker and wait for all of them.
    ///
    /// Returns how many workers stopped cleanly, or the first error once every
    /// worker has been joined. Workers already reported by `next_failure` are
    /// not reported again.
    pub async fn shutdown_and_join(mut self) -> Result<usize, FactoryError> {
        self.request_shutdown();

        let mut first_error = None;
        while let Some(joined) = self.workers.join_next_with_id().await {
            if let Err(err) = self.settle(joined) {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(self.stopped),
        }
    }

    fn settle(
        &mut self,
        joined: Result<(task::Id, WorkerExit), JoinError>,
    ) -> Result<(), FactoryError> {
        match joined {
            Ok((_, (_, Ok(())))) => {
                self.stopped += 1;
                Ok(())
            }
            Ok((_, (id, Err(err)))) => {
                warn!(worker = %id, error = %err, "worker exited with error");
                Err(err)
            }
            Err(join_err) => match self.spawned.get(&join_err.id()).copied() {
                Some(id) => {
                    warn!(worker = %id, error = %join_err, "worker task failed");
                    Err(FactoryError::WorkerPanicked {
                        worker: id,
                        reason: join_err.to_string(),
                    })
                }
                None => Err(FactoryError::Join(join_err)),
            },
        }
    }
}
