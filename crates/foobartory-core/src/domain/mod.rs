//! Domain model (tasks, outcomes, ledger, ids, errors).
//!
//! ここには I/O も並行性もありません。dispatcher と worker が共有する
//! 「語彙」だけを定義します。

pub mod errors;
pub mod ids;
pub mod ledger;
pub mod outcome;
pub mod task;

pub use errors::FactoryError;
pub use ids::{RunId, WorkerId};
pub use ledger::ResourceLedger;
pub use outcome::Outcome;
pub use task::Task;
