//! App - アプリケーション層
//!
//! domain と ports を組み合わせて factory を動かします。
//!
//! # 主要コンポーネント
//! - **DispatcherBuilder**: config の検証と port のワイヤリング
//! - **Dispatcher**: ledger と pool の唯一の持ち主。outcome を受けて次の task を送る
//! - **Decider**: ledger から次の task を選ぶ方針
//! - **WorkerPool / Worker**: task を実行して outcome を返す
//! - **TimingModel**: task ごとの所要時間と結果
//! - **RunReport**: 終了時の集計

pub mod builder;
pub mod decider;
pub mod dispatcher;
pub mod pool;
pub mod status;
pub mod timing;
pub mod worker_loop;

pub use self::builder::{BuildError, DispatcherBuilder};
pub use self::decider::{Decider, GreedyDecider, decide_next_task};
pub use self::dispatcher::Dispatcher;
pub use self::pool::{WorkerContext, WorkerPool};
pub use self::status::{OutcomeCounts, RunReport, TaskCounts};
pub use self::timing::TimingModel;
pub use self::worker_loop::Worker;
