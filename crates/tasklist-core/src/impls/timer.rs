//! Timer 実装

use async_trait::async_trait;
use std::time::Duration;

use crate::ports::Timer;

/// Real delays on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Skips every delay but still yields once, so other tasks get a turn
/// exactly where the browser would run its event loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateTimer;

#[async_trait(?Send)]
impl Timer for ImmediateTimer {
    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}
