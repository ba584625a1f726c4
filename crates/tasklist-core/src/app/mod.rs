//! App - アプリケーション層
//!
//! StorageFacade と DialogService を組み合わせて、タスクリストの操作
//! （読み込み・追加・削除）を実装します。DOM への描画はここには含みません。

pub mod controller;

pub use self::controller::{DeleteOutcome, TaskListController};
