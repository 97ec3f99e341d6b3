//! RandomSource port - 乱数の抽象化
//!
//! MineBar の所要時間と Process の成否だけが乱数に依存します。
//! プロセスグローバルな乱数に頼らず、ここを差し替えて決定的なテストにします。
//!
//! 実装は `impls::random` にあります。

/// A source of uniformly distributed values in `[0, 1)`.
///
/// Shared by every worker, hence `Send + Sync` and `&self`.
pub trait RandomSource: Send + Sync {
    /// Next value in `[0, 1)`.
    fn next_unit(&self) -> f64;

    /// Uniform value in `[low, high)`.
    fn uniform(&self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }

    /// `true` with probability `probability`.
    fn chance(&self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}
