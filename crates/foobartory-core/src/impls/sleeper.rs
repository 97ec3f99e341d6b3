//! Sleeper implementations.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::Sleeper;

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Records every requested delay and returns without waiting.
///
/// It still yields once so other tasks on the runtime get a turn, the way a
/// real timer would let them.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Duration> {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        // ロックは await を跨がない
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(delay);
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn recording_sleeper_records_without_waiting() {
        let sleeper = RecordingSleeper::new();
        let start = Instant::now();

        sleeper.sleep(Duration::from_secs(10)).await;
        sleeper.sleep(Duration::from_secs(5)).await;

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(10), Duration::from_secs(5)]
        );
        assert_eq!(sleeper.last(), Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn tokio_sleeper_waits() {
        let start = Instant::now();
        TokioSleeper.sleep(Duration::from_millis(50)).await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
