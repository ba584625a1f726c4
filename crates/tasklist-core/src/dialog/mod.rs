//! Dialog - alert / confirm / prompt as non-blocking overlays.
//!
//! # 学習ポイント
//! - oneshot channel で「ユーザーが閉じるまで待つ」非同期 API を作る
//! - watch channel で状態を外に公開する（テストや host が購読する）
//! - Drop guard で、途中で future が捨てられても single-flight の枠を解放する

mod service;
mod view;

pub use self::service::{DialogPhase, DialogService, DialogSnapshot, Dispatcher};
pub use self::view::{DialogButton, DialogView};
