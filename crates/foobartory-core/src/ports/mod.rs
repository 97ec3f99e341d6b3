//! Ports - 環境依存の抽象化レイヤー
//!
//! 時刻・ID・乱数・待機はすべて trait 越しに使います。
//! dispatcher と worker はこれらの具体的な実装を知りません。

pub mod clock;
pub mod id_generator;
pub mod random;
pub mod sleeper;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::random::RandomSource;
pub use self::sleeper::Sleeper;
