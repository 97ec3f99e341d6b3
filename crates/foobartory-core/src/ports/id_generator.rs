//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース。Clock から timestamp を取るので、
//!   FixedClock を渡せば timestamp 部分は決定的になります。

use crate::domain::ids::{RunId, WorkerId};
use crate::ports::Clock;
use ulid::Ulid;

/// Generates ids for workers and runs.
///
/// `Send + Sync` because the dispatcher hands it to spawned code.
pub trait IdGenerator: Send + Sync {
    fn generate_worker_id(&self) -> WorkerId;

    fn generate_run_id(&self) -> RunId;
}

pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_worker_id(&self) -> WorkerId {
        WorkerId::from(self.next_ulid())
    }

    fn generate_run_id(&self) -> RunId {
        RunId::from(self.next_ulid())
    }
}
