//! Sleeper port - ワーカーが「作業している」時間の抽象化
//!
//! 本番は tokio の timer、テストは要求された delay を記録するだけの実装を使います。

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}
