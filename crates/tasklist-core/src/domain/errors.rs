//! Errors - エラー型
//!
//! ほとんどのエラーは呼び出し側まで届きません。
//! StorageFacade はフォールバックか「値なし」に落とし、
//! ダイアログのキャンセルはエラーではなく結果の一種です。

use thiserror::Error;

use super::ids::DialogId;
use super::storage_method::StorageMethod;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Probe failed; the selector moves on to the next candidate.
    #[error("{method} is unavailable: {reason}")]
    Unavailable {
        method: StorageMethod,
        reason: String,
    },

    /// Write failed after selection (quota exceeded, access denied, ...).
    #[error("{method} write failed for key={key}: {reason}")]
    WriteFailed {
        method: StorageMethod,
        key: String,
        reason: String,
    },

    #[error("{method} read failed for key={key}: {reason}")]
    ReadFailed {
        method: StorageMethod,
        key: String,
        reason: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogError {
    /// Another dialog is still in flight.
    #[error("dialog {0} is still open")]
    Busy(DialogId),

    /// The pending dialog was torn down without a dismissal.
    #[error("dialog was abandoned before it was dismissed")]
    Abandoned,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
