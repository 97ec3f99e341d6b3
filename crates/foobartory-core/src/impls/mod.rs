//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **ThreadRandom / SeededRandom / ScriptedRandom**: RandomSource
//! - **TokioSleeper / RecordingSleeper**: Sleeper
//!
//! Clock の実装（SystemClock, FixedClock）は小さいので `ports::clock` に同居しています。

pub mod random;
pub mod sleeper;

pub use self::random::{ScriptedRandom, SeededRandom, ThreadRandom};
pub use self::sleeper::{RecordingSleeper, TokioSleeper};
