//! Domain model (tasks, storage methods, dialog values, ids, errors).
//!
//! このモジュールは環境（DOM, Web Storage, cookie）を一切仮定しません。
//! 値の「形」だけを定義し、振る舞いは ports / storage / dialog 側に置きます。

pub mod dialog;
pub mod errors;
pub mod ids;
pub mod storage_method;
pub mod task;

pub use self::dialog::{DialogAction, DialogEvent, DialogKind, DialogOutcome, DialogRequest, Key};
pub use self::errors::{ConfigError, DialogError, StorageError};
pub use self::ids::{DialogId, Id, IdMarker};
pub use self::storage_method::StorageMethod;
pub use self::task::{TaskList, TaskRecord};
