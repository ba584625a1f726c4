//! Timer port - `setTimeout` の抽象化
//!
//! ダイアログの表示 tick と非表示トランジションの待ちに使います。

use async_trait::async_trait;
use std::time::Duration;

/// `?Send`: ブラウザ側の実装（JS の Promise）は Send にできないため
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}
