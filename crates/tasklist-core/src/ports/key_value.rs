//! KeyValueArea port - Web Storage API (localStorage / sessionStorage)

use thiserror::Error;

/// Failure reported by a browser API (a thrown `DOMException` and the like).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct AccessError(pub String);

impl AccessError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// The `Storage` interface surface the backends need.
///
/// # 実装
/// - `impls::MemoryArea`（テスト用、quota と故障を再現できる）
/// - `impls::web::WebStorageArea`（`web` feature）
pub trait KeyValueArea {
    fn get_item(&self, key: &str) -> Result<Option<String>, AccessError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), AccessError>;

    fn remove_item(&self, key: &str) -> Result<(), AccessError>;
}
